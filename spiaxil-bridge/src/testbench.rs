//! Testbench wiring an SPI master, the bridge and an AXI4-Lite responder in lock-step.

use itertools::Itertools;
use log::debug;
use spiaxil::*;
use thiserror::Error;

use crate::bridge::{Bridge, BridgeConfig};
use crate::master::{MasterConfig, MasterError, SpiMaster};
use crate::responder::{Responder, ResponderConfig};
use crate::types::frame::{FrameError, Reply, Request};
use crate::types::spi::SpiMode;

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum TestbenchError {
    #[error("master error: {error}")]
    Master {
        #[from]
        error: MasterError,
    },
    #[error("frame error: {error}")]
    Frame {
        #[from]
        error: FrameError,
    },
    #[error("trace error: {error}")]
    Trace {
        #[from]
        error: TraceError,
    },
    #[error("not idle after {cycles} cycles")]
    Stalled { cycles: u64 },
}

#[derive(Debug)]
pub struct Testbench<const W: usize = 32> {
    bridge: Bridge<W>,
    master: SpiMaster,
    responder: Responder<W>,
    trace: Option<Trace>,
    cycle: u64,
}

impl<const W: usize> Testbench<W> {
    pub fn new(mode: SpiMode) -> Result<Self, TestbenchError> {
        Self::with_config(MasterConfig { mode, ..MasterConfig::default() }, ResponderConfig::default())
    }

    pub fn with_config(master: MasterConfig, responder: ResponderConfig) -> Result<Self, TestbenchError> {
        Ok(Self {
            bridge: Bridge::new(BridgeConfig { mode: master.mode }),
            master: SpiMaster::new(master)?,
            responder: Responder::new(responder),
            trace: None,
            cycle: 0,
        })
    }

    /// Starts recording every cycle from now on.
    pub fn enable_trace(&mut self) { self.trace.get_or_insert_with(|| Trace::new("10ns")); }

    pub fn trace(&self) -> Option<&Trace> { self.trace.as_ref() }

    pub fn bridge(&self) -> &Bridge<W> { &self.bridge }

    pub fn bridge_mut(&mut self) -> &mut Bridge<W> { &mut self.bridge }

    pub fn responder(&self) -> &Responder<W> { &self.responder }

    pub fn responder_mut(&mut self) -> &mut Responder<W> { &mut self.responder }

    pub fn cycle(&self) -> u64 { self.cycle }

    /// Advances every component one clock cycle.
    pub fn step(&mut self) {
        let spi_fwd = self.master.output();
        let spi_bwd = self.bridge.spi();
        let axil_fwd = self.bridge.axil();
        let axil_bwd = self.responder.output();

        if let Some(trace) = &mut self.trace {
            trace.record("tb.spi", &spi_fwd);
            trace.record("tb.spi", &spi_bwd);
            trace.record("tb.m_axil", &axil_fwd);
            trace.record("tb.m_axil", &axil_bwd);
            self.bridge.probe(trace, "tb");
            trace.step();
        }

        self.master.tick(&spi_bwd);
        self.bridge.tick(&spi_fwd, &axil_bwd);
        self.responder.tick(&axil_fwd);
        self.cycle += 1;
    }

    pub fn run(&mut self, cycles: u64) {
        for _ in 0..cycles {
            self.step();
        }
    }

    /// Clocks `bytes` through in one frame and returns the bytes received.
    pub fn transfer(&mut self, bytes: &[u8]) -> Result<Vec<u8>, TestbenchError> { self.clock(bytes, None) }

    /// Like [`Testbench::transfer`], but releases CS# after `sent` bytes.
    pub fn transfer_partial(&mut self, bytes: &[u8], sent: usize) -> Result<Vec<u8>, TestbenchError> {
        self.clock(bytes, Some(sent))
    }

    fn clock(&mut self, bytes: &[u8], sent: Option<usize>) -> Result<Vec<u8>, TestbenchError> {
        self.master.start(bytes, sent)?;
        while !self.master.is_done() {
            self.step();
        }
        let received = self.master.received().to_vec();
        debug!("mosi: {:02x}", bytes.iter().format(" "));
        debug!("miso: {:02x}", received.iter().format(" "));
        Ok(received)
    }

    pub fn request(&mut self, request: Request) -> Result<Reply, TestbenchError> {
        let received = self.transfer(&request.to_bytes())?;
        Ok(Reply::decode(request.command(), &received)?)
    }

    pub fn write(&mut self, addr: u32, data: u32) -> Result<Reply, TestbenchError> { self.request(Request::Write { addr, data }) }

    pub fn read(&mut self, addr: u32) -> Result<Reply, TestbenchError> { self.request(Request::Read { addr }) }

    /// Steps until neither the bridge nor the responder has a transaction in flight.
    pub fn settle(&mut self, max_cycles: u64) -> Result<u64, TestbenchError> {
        for cycles in 0..=max_cycles {
            if self.bridge.is_idle() && self.responder.is_idle() {
                return Ok(cycles);
            }
            self.step();
        }
        Err(TestbenchError::Stalled { cycles: max_cycles })
    }
}
