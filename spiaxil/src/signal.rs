use std::fmt::Debug;

use crate::*;

/// Bit-representable values.
///
/// Every port bundle and every state register of a model implements this trait, which is what
/// lets a [`Trace`] dump them without knowing their concrete types.
pub trait Signal: 'static + Debug + Clone {
    /// Signal's bit width.
    ///
    /// # Note
    ///
    /// `Self::WIDTH`, `Self::port_decls().width()` and `self.transl().len()` should be equal.
    const WIDTH: usize;

    /// Flattens the value into bits.
    ///
    /// Each leaf of [`Signal::port_decls`] contributes its bits in declaration order, least
    /// significant bit first.
    fn transl(&self) -> Vec<bool>;

    /// Port names and bitwidths.
    ///
    /// # Example
    ///
    /// Port declarations of `Valid<WRes>` used for the write response channel are as follows:
    ///
    /// ```ignore
    /// Struct([
    ///     (None, Struct([(Some("resp"), Bits(2))])),
    ///     (Some("valid"), Bits(1)),
    /// ])
    /// ```
    fn port_decls() -> PortDecls;
}

impl Signal for () {
    const WIDTH: usize = 0;

    fn transl(&self) -> Vec<bool> { vec![] }

    fn port_decls() -> PortDecls { PortDecls::Bits(0) }
}

impl Signal for bool {
    const WIDTH: usize = 1;

    fn transl(&self) -> Vec<bool> { vec![*self] }

    fn port_decls() -> PortDecls { PortDecls::Bits(1) }
}

macro_rules! impl_signal {
    ($typ:ty) => {
        impl Signal for $typ {
            const WIDTH: usize = ::std::mem::size_of::<$typ>() * 8;

            fn transl(&self) -> Vec<bool> { (0..Self::WIDTH).map(|i| (*self >> i) & 1 != 0).collect::<Vec<_>>() }

            fn port_decls() -> PortDecls { PortDecls::Bits(Self::WIDTH) }
        }
    };
}

impl_signal!(u8);
impl_signal!(u16);
impl_signal!(u32);
impl_signal!(u64);

macro_rules! impl_signal_tuple {
    ($($a:ident $idx:tt)+) => {
        impl<$($a: Signal,)+> Signal for ($($a,)+) {
            const WIDTH: usize = 0 $(+ <$a as Signal>::WIDTH)+;

            fn transl(&self) -> Vec<bool> {
                ::std::iter::empty::<bool>()
                    $(.chain(self.$idx.transl()))+
                    .collect()
            }

            fn port_decls() -> PortDecls {
                PortDecls::Struct(vec![$((Some(stringify!($idx).to_string()), <$a as Signal>::port_decls()),)+])
            }
        }
    };
}

impl_signal_tuple! { V0 0 V1 1 }
impl_signal_tuple! { V0 0 V1 1 V2 2 }
impl_signal_tuple! { V0 0 V1 1 V2 2 V3 3 }

impl<V: Signal, const N: usize> Signal for [V; N] {
    const WIDTH: usize = V::WIDTH * N;

    fn transl(&self) -> Vec<bool> { self.iter().flat_map(|v| v.transl()).collect() }

    fn port_decls() -> PortDecls { V::port_decls().multiple(N) }
}

/// Bits type of width `N`, up to 64 bits.
///
/// Bits above `N` are always zero.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Bits<const N: usize>(u64);

impl<const N: usize> Bits<N> {
    /// Creates new bits, truncating `value` to `N` bits.
    pub const fn new(value: u64) -> Self { Self(value & mask(N)) }

    /// Returns the value.
    pub const fn value(self) -> u64 { self.0 }

    /// Returns the `index`-th bit.
    pub const fn bit(self, index: usize) -> bool { index < N && (self.0 >> index) & 1 != 0 }
}

impl<const N: usize> Signal for Bits<N> {
    const WIDTH: usize = N;

    fn transl(&self) -> Vec<bool> { (0..N).map(|i| self.bit(i)).collect() }

    fn port_decls() -> PortDecls { PortDecls::Bits(N) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Signal)]
    enum Light {
        Red,
        Green,
        Blue,
    }

    #[derive(Debug, Clone, Signal)]
    struct Lamp {
        #[member(name = "")]
        light: Light,
        on: bool,
        level: Bits<3>,
    }

    #[test]
    fn primitive_bits_are_lsb_first() {
        assert_eq!(0x81u8.transl(), vec![true, false, false, false, false, false, false, true]);
        assert_eq!(<u32 as Signal>::WIDTH, 32);
        assert_eq!(Bits::<4>::new(0x1f).value(), 0xf);
        assert_eq!(Bits::<3>::new(0b101).transl(), vec![true, false, true]);
    }

    #[test]
    fn derived_struct_concatenates_fields() {
        let lamp = Lamp { light: Light::Blue, on: true, level: Bits::new(0b011) };
        assert_eq!(<Lamp as Signal>::WIDTH, 6);
        assert_eq!(lamp.transl(), vec![false, true, true, true, true, false]);
        assert_eq!(Lamp::port_decls().flatten("lamp"), vec![
            ("lamp".to_string(), 2),
            ("lamp_on".to_string(), 1),
            ("lamp_level".to_string(), 3)
        ]);
    }

    #[test]
    fn arrays_and_tuples() {
        let value = ([true, false], 3u8);
        assert_eq!(<([bool; 2], u8) as Signal>::WIDTH, 10);
        assert_eq!(value.transl().len(), 10);
        assert_eq!(<([bool; 2], u8)>::port_decls().flatten("x"), vec![
            ("x_0_0".to_string(), 1),
            ("x_0_1".to_string(), 1),
            ("x_1".to_string(), 8)
        ]);
    }
}
