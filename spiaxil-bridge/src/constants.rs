//! Constants for the bridge.

use static_assertions::*;

// Frame layout, as byte indices into the 11-byte frame.
pub mod frame {
    pub const FRAME_LEN: usize = 11;

    pub const CMD_WRITE: u8 = 0x00;
    pub const CMD_READ: u8 = 0x01;

    pub const CMD_INDEX: usize = 0;
    pub const ADDR_FIRST: usize = 1;
    pub const ADDR_LAST: usize = 4;
    pub const WDATA_FIRST: usize = 5;
    pub const WDATA_LAST: usize = 8;
    pub const RDATA_FIRST: usize = 6;
    pub const RDATA_LAST: usize = 9;
    pub const STATUS_INDEX: usize = 10;

    /// Status bit 2: the bus transaction had not completed when the status byte was prepared.
    pub const STATUS_NOT_VALID: u8 = 1 << 2;
    pub const STATUS_RESP_MASK: u8 = 0b11;
}

// AXI4-Lite channel widths and fixed qualifiers.
pub mod axil {
    pub const ADDR_WIDTH: usize = 32;
    pub const DATA_WIDTH: usize = 32;
    pub const STRB_WIDTH: usize = DATA_WIDTH / 8;
    pub const PROT_WIDTH: usize = 3;

    /// Unprivileged, secure, data access.
    pub const PROT: u64 = 0b000;
    pub const STRB_FULL: u64 = (1 << STRB_WIDTH) - 1;
}

// Depths of the SCK and CS# synchronizers.
pub mod sync {
    pub const SYNC_STAGES: usize = 1;
    pub const GUARD_STAGES: usize = 1;
    pub const LATENCY: usize = SYNC_STAGES + GUARD_STAGES;
}

// Timing of the testbench SPI master, in bridge clock cycles.
pub mod master {
    use super::sync;

    pub const HALF_PERIOD: u32 = 8;
    /// Synchronizer latency, one cycle to register the edge and one cycle for `LOAD_TX_BYTE`.
    pub const MIN_HALF_PERIOD: u32 = sync::LATENCY as u32 + 2;
    pub const IDLE_CYCLES: u32 = 8;
    pub const MAX_TRANSFER_LEN: usize = 16;
}

const_assert_eq!(frame::STATUS_INDEX, frame::FRAME_LEN - 1);
const_assert!(frame::ADDR_LAST - frame::ADDR_FIRST + 1 == 4);
const_assert!(frame::WDATA_LAST - frame::WDATA_FIRST + 1 == 4);
const_assert!(frame::RDATA_LAST - frame::RDATA_FIRST + 1 == 4);
const_assert!(frame::RDATA_LAST < frame::STATUS_INDEX);
const_assert!(master::MAX_TRANSFER_LEN > frame::FRAME_LEN);
const_assert!(master::HALF_PERIOD >= master::MIN_HALF_PERIOD);
