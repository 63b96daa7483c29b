//! SPI frame engine.
//!
//! Shifts bytes in from MOSI and out to MISO at the SCK edges of the configured mode, decodes
//! the command fields into [`Glue`] and prepares each response byte one byte ahead of the host.
//! SCK and CS# must already be synchronized; MOSI is only looked at on sample edges, long after
//! it settled.

use log::{trace, warn};
use spiaxil::*;
use spiaxil_std::*;

use crate::constants::frame::*;
use crate::glue::{Glue, Outcome};
use crate::types::frame::Command;
use crate::types::spi::{EdgeRole, SpiMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Signal)]
pub enum EngineState {
    /// Waiting for SCK edges.
    Receive,
    /// A received byte is in `rx_shift`.
    ProcessByte,
    /// The next response byte is to be prepared.
    LoadTxByte,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Signal)]
pub struct EngineRegs {
    pub state: EngineState,
    pub sck_prev: bool,
    pub rx_shift: u8,
    pub rx_bits: WrapCounter<8>,
    /// Index of the next received byte to process.
    pub rx_bytes: SatCounter<FRAME_LEN>,
    pub tx_shift: u8,
    pub tx_bits: WrapCounter<8>,
    /// Index of the last response byte prepared.
    pub tx_bytes: SatCounter<STATUS_INDEX>,
    /// Response byte waiting for the next drive edge (CPHA=1 only).
    pub tx_pending: u8,
    pub tx_load: bool,
    pub glue: Glue,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Signal)]
pub struct EngineInput {
    pub sck: bool,
    pub cs_n: bool,
    pub mosi: bool,
    pub outcome: Outcome,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Signal)]
pub struct EngineOutput {
    pub miso: bool,
    pub glue: Glue,
}

/// Frame engine for one SPI mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameEngine {
    mode: SpiMode,
}

impl FrameEngine {
    pub fn new(mode: SpiMode) -> Self { Self { mode } }

    pub fn mode(&self) -> SpiMode { self.mode }

    fn deselect(&self, next: &mut EngineRegs) {
        next.state = EngineState::Receive;
        next.rx_bits = WrapCounter::new();
        next.rx_bytes = SatCounter::new();
        next.tx_shift = 0;
        next.tx_bits = WrapCounter::new();
        next.tx_bytes = SatCounter::new();
        next.tx_pending = 0;
        next.tx_load = self.mode.cpha();
    }

    fn sample(&self, mosi: bool, regs: &EngineRegs, next: &mut EngineRegs) {
        let (rx_bits, complete) = regs.rx_bits.increment();
        next.rx_shift = (regs.rx_shift << 1) | mosi as u8;
        next.rx_bits = rx_bits;
        if complete {
            if regs.rx_bytes.is_saturated() {
                warn!("frame overrun, dropping byte {:#04x}", next.rx_shift);
            } else {
                next.state = EngineState::ProcessByte;
            }
        }
    }

    fn drive(&self, regs: &EngineRegs, next: &mut EngineRegs) {
        if regs.tx_load {
            next.tx_shift = regs.tx_pending;
            next.tx_load = false;
        } else {
            next.tx_shift = regs.tx_shift << 1;
        }

        let (tx_bits, complete) = regs.tx_bits.increment();
        next.tx_bits = tx_bits;
        if complete && !regs.tx_bytes.is_saturated() {
            next.state = EngineState::LoadTxByte;
        }
    }

    fn process_byte(&self, regs: &EngineRegs, next: &mut EngineRegs) {
        let index = regs.rx_bytes.value();
        let byte = regs.rx_shift;
        trace!("rx byte {}: {:#04x}", index, byte);

        let cmd = if index == CMD_INDEX { byte } else { regs.glue.cmd };
        let command = Command::from_byte(cmd);
        match (index, command) {
            (CMD_INDEX, None) => {
                next.glue.cmd = byte;
                warn!("unsupported command {:#04x}, frame ignored", byte);
            }
            (CMD_INDEX, Some(_)) => next.glue.cmd = byte,
            (ADDR_FIRST..=ADDR_LAST, Some(_)) => next.glue.addr = (regs.glue.addr << 8) | u32::from(byte),
            (WDATA_FIRST..=WDATA_LAST, Some(Command::Write)) => {
                next.glue.wdata = (regs.glue.wdata << 8) | u32::from(byte)
            }
            _ => {}
        }

        next.glue.cmd_ready = match command {
            Some(Command::Write) => index == WDATA_LAST,
            Some(Command::Read) => index == ADDR_LAST,
            None => false,
        };
        next.rx_bytes = regs.rx_bytes.increment();
        next.state = EngineState::Receive;
    }

    fn load_tx_byte(&self, outcome: &Outcome, regs: &EngineRegs, next: &mut EngineRegs) {
        let tx_bytes = regs.tx_bytes.increment();
        let byte = response_byte(regs.glue.cmd, tx_bytes.value(), outcome);
        trace!("tx byte {}: {:#04x}", tx_bytes.value(), byte);

        next.tx_bytes = tx_bytes;
        next.tx_pending = byte;
        if self.mode.cpha() {
            next.tx_load = true;
        } else {
            next.tx_shift = byte;
        }
        next.state = EngineState::Receive;
    }
}

/// Response byte at `index` of a frame with command byte `cmd`.
pub fn response_byte(cmd: u8, index: usize, outcome: &Outcome) -> u8 {
    match Command::from_byte(cmd) {
        Some(Command::Write) if index == STATUS_INDEX => outcome.write_status().to_byte(),
        Some(Command::Read) => match index {
            RDATA_FIRST..=RDATA_LAST => outcome.rdata.to_be_bytes()[index - RDATA_FIRST],
            STATUS_INDEX => outcome.read_status().to_byte(),
            _ => 0,
        },
        None if index == STATUS_INDEX => STATUS_NOT_VALID,
        _ => 0,
    }
}

impl Fsm for FrameEngine {
    type In = EngineInput;
    type Out = EngineOutput;
    type State = EngineRegs;

    fn init(&self) -> EngineRegs {
        EngineRegs {
            state: EngineState::Receive,
            sck_prev: self.mode.cpol(),
            rx_shift: 0,
            rx_bits: WrapCounter::new(),
            rx_bytes: SatCounter::new(),
            tx_shift: 0,
            tx_bits: WrapCounter::new(),
            tx_bytes: SatCounter::new(),
            tx_pending: 0,
            tx_load: self.mode.cpha(),
            glue: Glue { engine_reset: true, ..Glue::default() },
        }
    }

    fn output(&self, regs: &EngineRegs) -> EngineOutput { EngineOutput { miso: regs.tx_shift & 0x80 != 0, glue: regs.glue } }

    fn next(&self, input: &EngineInput, regs: &EngineRegs) -> EngineRegs {
        let mut next = *regs;
        next.sck_prev = input.sck;
        next.glue.cmd_ready = false;
        next.glue.engine_reset = input.cs_n;

        // Deselect wins over every state.
        if input.cs_n {
            self.deselect(&mut next);
            return next;
        }

        match regs.state {
            EngineState::Receive => match self.mode.classify(Edge::detect(regs.sck_prev, input.sck)) {
                EdgeRole::Sample => self.sample(input.mosi, regs, &mut next),
                EdgeRole::Drive => self.drive(regs, &mut next),
                EdgeRole::Neither => {}
            },
            EngineState::ProcessByte => self.process_byte(regs, &mut next),
            EngineState::LoadTxByte => self.load_tx_byte(&input.outcome, regs, &mut next),
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::master::{MasterConfig, SpiMaster};
    use crate::types::axil::Resp;
    use crate::types::frame::Request;

    /// Clocks `bytes` into an engine wired straight to the master, without synchronizers.
    fn clock(mode: SpiMode, bytes: &[u8], outcome: Outcome) -> (Vec<u8>, Vec<Glue>) {
        let mut engine = Module::new("engine", FrameEngine::new(mode));
        let mut master = SpiMaster::new(MasterConfig { mode, ..MasterConfig::default() }).unwrap();
        master.start(bytes, None).unwrap();

        let mut commands = vec![];
        while !master.is_done() {
            let pins = master.output();
            let out = engine.output();
            if out.glue.cmd_ready {
                commands.push(out.glue);
            }
            master.tick(&crate::types::spi::SpiBwd { miso: out.miso });
            engine.tick(&EngineInput { sck: pins.sck, cs_n: pins.cs_n, mosi: pins.mosi, outcome });
        }
        assert!(engine.output().glue.engine_reset);
        (master.received().to_vec(), commands)
    }

    #[test]
    fn decodes_write_fields() {
        for mode in SpiMode::ALL {
            let bytes = Request::Write { addr: 0x7654_3210, data: 0x1234_5678 }.to_bytes();
            let (_, commands) = clock(mode, &bytes, Outcome::default());
            assert_eq!(commands.len(), 1, "{:?}", mode);
            assert_eq!(commands[0].cmd, 0x00);
            assert_eq!(commands[0].addr, 0x7654_3210);
            assert_eq!(commands[0].wdata, 0x1234_5678);
        }
    }

    #[test]
    fn read_response_bytes() {
        let outcome = Outcome { read_valid: true, rresp: Resp::ExOkay, rdata: 0xdead_beef, ..Outcome::default() };
        for mode in SpiMode::ALL {
            let (received, commands) = clock(mode, &Request::Read { addr: 0x10 }.to_bytes(), outcome);
            assert_eq!(commands.len(), 1);
            assert_eq!(commands[0].addr, 0x10);
            assert_eq!(received, vec![0, 0, 0, 0, 0, 0, 0xde, 0xad, 0xbe, 0xef, 0x01], "{:?}", mode);
        }
    }

    #[test]
    fn unsupported_command_is_inert() {
        for mode in SpiMode::ALL {
            let mut bytes = [0xa5; FRAME_LEN];
            bytes[0] = 0x42;
            let (received, commands) = clock(mode, &bytes, Outcome::default());
            assert!(commands.is_empty());
            assert_eq!(received, vec![0, 0, 0, 0, 0, 0, 0, 0, 0, 0, STATUS_NOT_VALID]);
        }
    }

    #[test]
    fn overrun_is_ignored() {
        let outcome = Outcome { write_valid: true, bresp: Resp::SlvErr, ..Outcome::default() };
        for mode in SpiMode::ALL {
            let mut bytes = Request::Write { addr: 1, data: 2 }.to_bytes().to_vec();
            bytes.push(0xff);
            let (received, commands) = clock(mode, &bytes, outcome);
            assert_eq!(commands.len(), 1);
            assert_eq!(commands[0].wdata, 2);
            assert_eq!(received.len(), FRAME_LEN + 1);
            assert_eq!(received[STATUS_INDEX], 0x02);
            assert_eq!(received[FRAME_LEN], 0x00);
        }
    }

    #[test]
    fn deselect_resets_counters() {
        let engine = FrameEngine::new(SpiMode::Mode1);
        let mut regs = engine.init();
        regs.rx_bytes = regs.rx_bytes.increment();
        regs.tx_shift = 0xff;
        regs.state = EngineState::ProcessByte;

        let next = engine.next(&EngineInput { cs_n: true, ..EngineInput::default() }, &regs);
        assert_eq!(next.state, EngineState::Receive);
        assert_eq!(next.rx_bytes.value(), 0);
        assert_eq!(next.tx_shift, 0);
        assert!(next.tx_load);
        assert!(next.glue.engine_reset);
    }
}
