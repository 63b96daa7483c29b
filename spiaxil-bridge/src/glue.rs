//! Registers shared between the frame engine and the command sequencer.

use spiaxil::*;

use crate::types::axil::Resp;
use crate::types::frame::Status;

/// Driven by the frame engine.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Signal)]
pub struct Glue {
    /// Command byte of the current frame.
    pub cmd: u8,
    /// Address, assembled most significant byte first.
    pub addr: u32,
    /// Write data, assembled most significant byte first.
    pub wdata: u32,
    /// One-cycle pulse: every field the command needs has been received.
    pub cmd_ready: bool,
    /// High while CS# is deasserted.
    pub engine_reset: bool,
}

/// Driven by the command sequencer: the result of the last bus transaction.
///
/// The valid flags are cleared when a command is accepted and on `engine_reset`. The response
/// codes and data are only overwritten when a new response arrives, so they may be stale.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Signal)]
pub struct Outcome {
    pub write_valid: bool,
    pub bresp: Resp,
    pub read_valid: bool,
    pub rresp: Resp,
    pub rdata: u32,
}

impl Outcome {
    pub fn write_status(&self) -> Status { Status { valid: self.write_valid, resp: self.bresp } }

    pub fn read_status(&self) -> Status { Status { valid: self.read_valid, resp: self.rresp } }
}
