//! Utilities for valid-ready channels.

use spiaxil_macro::Signal;

use crate::*;

/// Valid/ready channel's forward signals.
///
/// A transfer happens in every cycle in which the producer's `valid` and the consumer's
/// `ready` are both high.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Signal)]
pub struct Valid<V: Signal> {
    /// Inner data
    #[member(name = "")]
    pub inner: V,

    /// Valid bit
    pub valid: bool,
}

impl<V: Signal> Valid<V> {
    /// Creates a new value.
    pub fn new(valid: bool, inner: V) -> Self { Self { inner, valid } }

    /// Creates a valid value.
    pub fn valid(inner: V) -> Self { Self::new(true, inner) }

    /// Creates an invalid value.
    pub fn invalid() -> Self
    where V: Default {
        Self::new(false, V::default())
    }

    /// Returns whether a transfer happens in this cycle.
    pub fn fire(&self, ready: &Ready) -> bool { self.valid && ready.ready }
}

/// Ready signal.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Signal)]
pub struct Ready {
    /// Ready bit
    pub ready: bool,
}

impl Ready {
    /// Creates a new ready signal.
    pub fn new(ready: bool) -> Self { Self { ready } }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fire_needs_both_sides() {
        let fwd = Valid::valid(7u8);
        assert!(fwd.fire(&Ready::new(true)));
        assert!(!fwd.fire(&Ready::new(false)));
        assert!(!Valid::<u8>::invalid().fire(&Ready::new(true)));
    }

    #[test]
    fn inner_ports_are_flattened() {
        assert_eq!(<Valid<u8> as Signal>::WIDTH, 9);
        assert_eq!(Valid::<u8>::port_decls().flatten("aw"), vec![("aw".to_string(), 8), ("aw_valid".to_string(), 1)]);
        assert_eq!(Valid::valid(0x81u8).transl().len(), 9);
    }
}
