//! Bit-banged SPI master used to drive the bridge in simulation.
//!
//! Each transfer is laid out in advance as one [`Step`] per bridge clock cycle: an idle gap with
//! CS# high, CS# setup, two half periods per bit, CS# hold and another idle gap. The master
//! drives MOSI on its drive edges and captures MISO on its sample edges.

use arrayvec::ArrayVec;
use thiserror::Error;

use crate::constants::master::*;
use crate::types::spi::{SpiBwd, SpiFwd, SpiMode};

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum MasterError {
    #[error("half period of {half_period} cycles is shorter than {min} cycles")]
    HalfPeriodTooShort { half_period: u32, min: u32 },
    #[error("idle gap must last at least one cycle")]
    NoIdleGap,
    #[error("transfer of {len} bytes exceeds {max} bytes")]
    TooLong { len: usize, max: usize },
    #[error("empty transfer")]
    Empty,
    #[error("transfer in progress")]
    Busy,
}

/// Master timing, in bridge clock cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MasterConfig {
    pub mode: SpiMode,
    /// Cycles between two SCK edges.
    pub half_period: u32,
    /// Cycles of CS# high before and after each transfer.
    pub idle_cycles: u32,
}

impl Default for MasterConfig {
    fn default() -> Self { Self { mode: SpiMode::default(), half_period: HALF_PERIOD, idle_cycles: IDLE_CYCLES } }
}

#[derive(Debug, Clone, Copy)]
struct Step {
    pins: SpiFwd,
    /// Capture MISO in this cycle.
    sample: bool,
}

#[derive(Debug, Clone)]
pub struct SpiMaster {
    config: MasterConfig,
    schedule: Vec<Step>,
    cursor: usize,
    rx: ArrayVec<u8, MAX_TRANSFER_LEN>,
    rx_shift: u8,
    rx_bits: u8,
}

impl SpiMaster {
    pub fn new(config: MasterConfig) -> Result<Self, MasterError> {
        if config.half_period < MIN_HALF_PERIOD {
            return Err(MasterError::HalfPeriodTooShort { half_period: config.half_period, min: MIN_HALF_PERIOD });
        }
        if config.idle_cycles == 0 {
            return Err(MasterError::NoIdleGap);
        }
        Ok(Self { config, schedule: Vec::new(), cursor: 0, rx: ArrayVec::new(), rx_shift: 0, rx_bits: 0 })
    }

    pub fn config(&self) -> MasterConfig { self.config }

    /// Lines driven between transfers.
    pub fn idle_pins(&self) -> SpiFwd { SpiFwd { sck: self.config.mode.cpol(), cs_n: true, mosi: false } }

    /// Starts a transfer of `bytes`.
    ///
    /// With `deselect_after`, CS# is released after that many bytes and the rest is not sent.
    pub fn start(&mut self, bytes: &[u8], deselect_after: Option<usize>) -> Result<(), MasterError> {
        if !self.is_done() {
            return Err(MasterError::Busy);
        }
        if bytes.is_empty() {
            return Err(MasterError::Empty);
        }
        if bytes.len() > MAX_TRANSFER_LEN {
            return Err(MasterError::TooLong { len: bytes.len(), max: MAX_TRANSFER_LEN });
        }

        let sent = &bytes[..deselect_after.unwrap_or(bytes.len()).min(bytes.len())];
        self.schedule = self.layout(sent);
        self.cursor = 0;
        self.rx.clear();
        self.rx_shift = 0;
        self.rx_bits = 0;
        Ok(())
    }

    fn layout(&self, bytes: &[u8]) -> Vec<Step> {
        let MasterConfig { mode, half_period, idle_cycles } = self.config;
        let (cpol, cpha) = (mode.cpol(), mode.cpha());
        let bits = bytes.iter().flat_map(|byte| (0..8).rev().map(move |i| (byte >> i) & 1 != 0)).collect::<Vec<_>>();

        let mut schedule = Vec::new();
        let mut hold = |pins: SpiFwd, sample: bool, cycles: u32| {
            schedule.extend((0..cycles).map(|i| Step { pins, sample: sample && i == 0 }));
        };
        let idle = self.idle_pins();
        let selected = |sck: bool, mosi: bool| SpiFwd { sck, cs_n: false, mosi };

        hold(idle, false, idle_cycles);
        // With CPHA=0 the first bit must be on MOSI before the first edge.
        let first = !cpha && bits.first().copied().unwrap_or(false);
        hold(selected(cpol, first), false, half_period);
        for (i, bit) in bits.iter().enumerate() {
            hold(selected(!cpol, *bit), !cpha, half_period);
            let trailing = if cpha { *bit } else { bits.get(i + 1).copied().unwrap_or(*bit) };
            hold(selected(cpol, trailing), cpha, half_period);
        }
        hold(selected(cpol, bits.last().copied().unwrap_or(false)), false, half_period);
        hold(idle, false, idle_cycles);
        schedule
    }

    /// Returns whether the current transfer, if any, completed.
    pub fn is_done(&self) -> bool { self.cursor >= self.schedule.len() }

    /// Number of cycles left in the current transfer.
    pub fn remaining(&self) -> usize { self.schedule.len().saturating_sub(self.cursor) }

    /// SPI lines driven in the current cycle.
    pub fn output(&self) -> SpiFwd { self.schedule.get(self.cursor).map_or_else(|| self.idle_pins(), |step| step.pins) }

    /// Advances one clock cycle.
    pub fn tick(&mut self, spi: &SpiBwd) {
        let step = match self.schedule.get(self.cursor) {
            Some(step) => *step,
            None => return,
        };
        if step.sample {
            self.rx_shift = (self.rx_shift << 1) | spi.miso as u8;
            self.rx_bits += 1;
            if self.rx_bits == 8 {
                // `start` bounds the transfer length by the capacity.
                let _ = self.rx.try_push(self.rx_shift);
                self.rx_bits = 0;
            }
        }
        self.cursor += 1;
    }

    /// Bytes received in the current transfer so far.
    pub fn received(&self) -> &[u8] { &self.rx }
}
