//! SPI slave to AXI4-Lite master bridge.
//!
//! An SPI host reads and writes 32-bit registers on an AXI4-Lite bus through fixed 11-byte
//! frames. The bridge runs on the bus clock; SCK and CS# are brought into that domain by
//! synchronizers, and every register of the design is modeled as a [`spiaxil::Fsm`].

#![allow(clippy::needless_lifetimes)]
#![allow(clippy::type_complexity)]

pub mod bridge;
pub mod constants;
pub mod frame_engine;
pub mod glue;
pub mod master;
pub mod responder;
pub mod sequencer;
pub mod testbench;
pub mod types;

pub use bridge::{Bridge, BridgeConfig};
pub use master::{MasterConfig, MasterError, SpiMaster};
pub use responder::{Responder, ResponderConfig, Transaction};
pub use testbench::{Testbench, TestbenchError};
pub use types::axil::Resp;
pub use types::frame::{Command, FrameError, Reply, Request, Status};
pub use types::spi::SpiMode;
