//! SPI types.

use spiaxil::*;
use spiaxil_std::*;

/// SPI clock mode: idle clock level (CPOL) and sampling phase (CPHA).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SpiMode {
    /// CPOL=0, CPHA=0.
    #[default]
    Mode0,
    /// CPOL=0, CPHA=1.
    Mode1,
    /// CPOL=1, CPHA=0.
    Mode2,
    /// CPOL=1, CPHA=1.
    Mode3,
}

/// What an SCK edge means to the slave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeRole {
    /// Capture MOSI.
    Sample,
    /// Shift the next bit onto MISO.
    Drive,
    /// No edge.
    Neither,
}

impl SpiMode {
    /// All four modes.
    pub const ALL: [Self; 4] = [Self::Mode0, Self::Mode1, Self::Mode2, Self::Mode3];

    /// Creates a mode from its clock polarity and phase.
    pub const fn new(cpol: bool, cpha: bool) -> Self {
        match (cpol, cpha) {
            (false, false) => Self::Mode0,
            (false, true) => Self::Mode1,
            (true, false) => Self::Mode2,
            (true, true) => Self::Mode3,
        }
    }

    /// Idle level of SCK.
    pub const fn cpol(self) -> bool { matches!(self, Self::Mode2 | Self::Mode3) }

    /// Whether data is sampled on the trailing edge.
    pub const fn cpha(self) -> bool { matches!(self, Self::Mode1 | Self::Mode3) }

    /// Classifies an SCK edge.
    ///
    /// Sampling happens on the rising edge iff CPOL equals CPHA; the other edge drives.
    pub const fn classify(self, edge: Option<Edge>) -> EdgeRole {
        let sample_on_rising = self.cpol() == self.cpha();
        match edge {
            None => EdgeRole::Neither,
            Some(Edge::Rising) if sample_on_rising => EdgeRole::Sample,
            Some(Edge::Falling) if !sample_on_rising => EdgeRole::Sample,
            Some(_) => EdgeRole::Drive,
        }
    }
}

/// Lines driven by the SPI master.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Signal)]
pub struct SpiFwd {
    pub sck: bool,
    pub cs_n: bool,
    pub mosi: bool,
}

/// Lines driven by the SPI slave.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Signal)]
pub struct SpiBwd {
    pub miso: bool,
}

/// Four-wire SPI interface.
#[derive(Debug)]
pub struct Spi;

impl Interface for Spi {
    type Bwd = SpiBwd;
    type Fwd = SpiFwd;
}
