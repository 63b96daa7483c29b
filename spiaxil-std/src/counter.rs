//! Bounded counters.
//!
//! Counters in hardware are registers of a fixed width; these types make the behavior at the
//! bound explicit instead of relying on integer overflow.

use crate::*;

/// Counter over `0..N` which wraps back to zero.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WrapCounter<const N: usize> {
    value: usize,
}

impl<const N: usize> WrapCounter<N> {
    /// Creates a counter at zero.
    pub const fn new() -> Self { Self { value: 0 } }

    /// Returns the value.
    pub const fn value(self) -> usize { self.value }

    /// Increments the counter.
    ///
    /// Returns the next counter and whether it wrapped, i.e. whether `N` increments have
    /// completed.
    pub const fn increment(self) -> (Self, bool) {
        if self.value + 1 >= N {
            (Self { value: 0 }, true)
        } else {
            (Self { value: self.value + 1 }, false)
        }
    }
}

impl<const N: usize> Signal for WrapCounter<N> {
    const WIDTH: usize = clog2(N);

    fn transl(&self) -> Vec<bool> { (0..Self::WIDTH).map(|i| (self.value >> i) & 1 != 0).collect() }

    fn port_decls() -> PortDecls { PortDecls::Bits(Self::WIDTH) }
}

/// Counter over `0..=N` which stops at `N`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SatCounter<const N: usize> {
    value: usize,
}

impl<const N: usize> SatCounter<N> {
    /// Creates a counter at zero.
    pub const fn new() -> Self { Self { value: 0 } }

    /// Returns the value.
    pub const fn value(self) -> usize { self.value }

    /// Returns whether the counter reached `N`.
    pub const fn is_saturated(self) -> bool { self.value >= N }

    /// Increments the counter, staying at `N` once reached.
    pub const fn increment(self) -> Self {
        if self.value >= N {
            self
        } else {
            Self { value: self.value + 1 }
        }
    }
}

impl<const N: usize> Signal for SatCounter<N> {
    const WIDTH: usize = clog2(N + 1);

    fn transl(&self) -> Vec<bool> { (0..Self::WIDTH).map(|i| (self.value >> i) & 1 != 0).collect() }

    fn port_decls() -> PortDecls { PortDecls::Bits(Self::WIDTH) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_counter_reports_completion() {
        let mut counter = WrapCounter::<8>::new();
        for i in 1..8 {
            let (next, wrapped) = counter.increment();
            assert!(!wrapped);
            assert_eq!(next.value(), i);
            counter = next;
        }
        let (counter, wrapped) = counter.increment();
        assert!(wrapped);
        assert_eq!(counter.value(), 0);
        assert_eq!(<WrapCounter<8> as Signal>::WIDTH, 3);
    }

    #[test]
    fn sat_counter_stops_at_bound() {
        let mut counter = SatCounter::<11>::new();
        for _ in 0..20 {
            counter = counter.increment();
        }
        assert!(counter.is_saturated());
        assert_eq!(counter.value(), 11);
        assert_eq!(<SatCounter<11> as Signal>::WIDTH, 4);
        assert_eq!(counter.transl(), vec![true, true, false, true]);
    }
}
