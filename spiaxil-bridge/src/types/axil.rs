//! AXI4-Lite types.

use spiaxil::*;
use spiaxil_std::*;
use static_assertions::*;

use crate::constants::axil::*;

/// Response code carried by the B and R channels.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Signal)]
pub enum Resp {
    /// Normal access success.
    #[default]
    Okay,
    /// Exclusive access success.
    ExOkay,
    /// Slave error.
    SlvErr,
    /// Decode error.
    DecErr,
}

const_assert_eq!(<Resp as Signal>::WIDTH, 2);

impl Resp {
    /// Decodes the two low bits of `bits`.
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => Self::Okay,
            0b01 => Self::ExOkay,
            0b10 => Self::SlvErr,
            _ => Self::DecErr,
        }
    }

    /// Returns the two-bit encoding.
    pub const fn bits(self) -> u8 {
        match self {
            Self::Okay => 0b00,
            Self::ExOkay => 0b01,
            Self::SlvErr => 0b10,
            Self::DecErr => 0b11,
        }
    }

    /// Returns whether the access took effect.
    pub const fn is_ok(self) -> bool { matches!(self, Self::Okay | Self::ExOkay) }
}

/// Address channel (AW or AR) payload.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Signal)]
pub struct Addr<const W: usize> {
    pub addr: Bits<W>,
    pub prot: Bits<PROT_WIDTH>,
}

/// Write data channel (W) payload.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Signal)]
pub struct WReq {
    pub data: u32,
    pub strb: Bits<STRB_WIDTH>,
}

const_assert_eq!(<u32 as Signal>::WIDTH, DATA_WIDTH);

/// Write response channel (B) payload.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Signal)]
pub struct WRes {
    pub resp: Resp,
}

/// Read data channel (R) payload.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Signal)]
pub struct RRes {
    pub data: u32,
    pub resp: Resp,
}

/// Signals driven by the master.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Signal)]
pub struct AxilFwd<const W: usize> {
    pub aw: Valid<Addr<W>>,
    pub w: Valid<WReq>,
    pub b: Ready,
    pub ar: Valid<Addr<W>>,
    pub r: Ready,
}

/// Signals driven by the slave.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Signal)]
pub struct AxilBwd {
    pub aw: Ready,
    pub w: Ready,
    pub b: Valid<WRes>,
    pub ar: Ready,
    pub r: Valid<RRes>,
}

/// AXI4-Lite interface with a `W`-bit address.
#[derive(Debug)]
pub struct Axil<const W: usize>;

impl<const W: usize> Interface for Axil<W> {
    type Bwd = AxilBwd;
    type Fwd = AxilFwd<W>;
}
