//! AXI4-Lite command sequencer.
//!
//! Runs one bus transaction per `cmd_ready` pulse: AW and W are raised together and each drops
//! on its own handshake, then B is awaited; a read raises AR, then awaits R. At most one
//! transaction is outstanding. `engine_reset` abandons whatever is in flight.

use log::debug;
use spiaxil::*;
use spiaxil_std::*;

use crate::constants::axil::*;
use crate::glue::{Glue, Outcome};
use crate::types::axil::*;
use crate::types::frame::Command;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Signal)]
pub enum SequencerState {
    Idle,
    WriteAck,
    WriteResponse,
    ReadAddrAck,
    ReadData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Signal)]
pub struct SequencerRegs<const W: usize> {
    pub state: SequencerState,
    pub awvalid: bool,
    pub wvalid: bool,
    pub bready: bool,
    pub arvalid: bool,
    pub rready: bool,
    pub addr: Bits<W>,
    pub wdata: u32,
    pub outcome: Outcome,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Signal)]
pub struct SequencerInput {
    pub glue: Glue,
    pub axil: AxilBwd,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Signal)]
pub struct SequencerOutput<const W: usize> {
    pub axil: AxilFwd<W>,
    pub outcome: Outcome,
}

/// Sequencer driving a `W`-bit address bus; command addresses are truncated to `W` bits.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Sequencer<const W: usize>;

impl<const W: usize> Fsm for Sequencer<W> {
    type In = SequencerInput;
    type Out = SequencerOutput<W>;
    type State = SequencerRegs<W>;

    fn init(&self) -> Self::State {
        SequencerRegs {
            state: SequencerState::Idle,
            awvalid: false,
            wvalid: false,
            bready: false,
            arvalid: false,
            rready: false,
            addr: Bits::default(),
            wdata: 0,
            outcome: Outcome::default(),
        }
    }

    fn output(&self, regs: &Self::State) -> Self::Out {
        let addr = Addr { addr: regs.addr, prot: Bits::new(PROT) };
        SequencerOutput {
            axil: AxilFwd {
                aw: Valid::new(regs.awvalid, addr),
                w: Valid::new(regs.wvalid, WReq { data: regs.wdata, strb: Bits::new(STRB_FULL) }),
                b: Ready::new(regs.bready),
                ar: Valid::new(regs.arvalid, addr),
                r: Ready::new(regs.rready),
            },
            outcome: regs.outcome,
        }
    }

    fn next(&self, input: &Self::In, regs: &Self::State) -> Self::State {
        let fwd = self.output(regs).axil;
        let bwd = &input.axil;
        let mut next = *regs;

        if input.glue.engine_reset {
            if regs.state != SequencerState::Idle {
                debug!("deselected in {:?}, transaction abandoned", regs.state);
            }
            next = SequencerRegs { addr: regs.addr, wdata: regs.wdata, outcome: regs.outcome, ..self.init() };
            next.outcome.write_valid = false;
            next.outcome.read_valid = false;
            return next;
        }

        match regs.state {
            SequencerState::Idle if input.glue.cmd_ready => {
                next.outcome.write_valid = false;
                next.outcome.read_valid = false;
                let addr = Bits::new(u64::from(input.glue.addr));
                match Command::from_byte(input.glue.cmd) {
                    Some(Command::Write) => {
                        next.addr = addr;
                        debug!("write {:#010x} <- {:#010x}", next.addr.value(), input.glue.wdata);
                        next.wdata = input.glue.wdata;
                        next.awvalid = true;
                        next.wvalid = true;
                        next.state = SequencerState::WriteAck;
                    }
                    Some(Command::Read) => {
                        next.addr = addr;
                        debug!("read {:#010x}", next.addr.value());
                        next.arvalid = true;
                        next.state = SequencerState::ReadAddrAck;
                    }
                    None => {}
                }
            }
            SequencerState::Idle => {}
            SequencerState::WriteAck => {
                next.awvalid = regs.awvalid && !fwd.aw.fire(&bwd.aw);
                next.wvalid = regs.wvalid && !fwd.w.fire(&bwd.w);
                if !next.awvalid && !next.wvalid {
                    next.bready = true;
                    next.state = SequencerState::WriteResponse;
                }
            }
            SequencerState::WriteResponse => {
                if bwd.b.fire(&fwd.b) {
                    debug!("write response {:?}", bwd.b.inner.resp);
                    next.outcome.bresp = bwd.b.inner.resp;
                    next.outcome.write_valid = true;
                    next.bready = false;
                    next.state = SequencerState::Idle;
                }
            }
            SequencerState::ReadAddrAck => {
                if fwd.ar.fire(&bwd.ar) {
                    next.arvalid = false;
                    next.rready = true;
                    next.state = SequencerState::ReadData;
                }
            }
            SequencerState::ReadData => {
                if bwd.r.fire(&fwd.r) {
                    debug!("read response {:?}, data {:#010x}", bwd.r.inner.resp, bwd.r.inner.data);
                    next.outcome.rdata = bwd.r.inner.data;
                    next.outcome.rresp = bwd.r.inner.resp;
                    next.outcome.read_valid = true;
                    next.rready = false;
                    next.state = SequencerState::Idle;
                }
            }
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::frame::{CMD_READ, CMD_WRITE};

    fn command(cmd: u8, addr: u32, wdata: u32) -> SequencerInput {
        SequencerInput { glue: Glue { cmd, addr, wdata, cmd_ready: true, engine_reset: false }, axil: AxilBwd::default() }
    }

    #[test]
    fn write_waits_for_both_handshakes() {
        let mut seq = Module::new("seq", Sequencer::<32>);
        seq.tick(&command(CMD_WRITE, 0x40, 0xaa55));
        let out = seq.output().axil;
        assert!(out.aw.valid && out.w.valid && !out.b.ready);
        assert_eq!(out.aw.inner.addr.value(), 0x40);
        assert_eq!(out.w.inner.strb.value(), 0xf);
        assert_eq!(out.aw.inner.prot.value(), 0);

        // W accepted first, AW later.
        let mut input = SequencerInput::default();
        input.axil.w.ready = true;
        seq.tick(&input);
        assert!(seq.output().axil.aw.valid && !seq.output().axil.w.valid);
        input.axil.w.ready = false;
        input.axil.aw.ready = true;
        seq.tick(&input);
        assert!(!seq.output().axil.aw.valid);
        assert!(seq.output().axil.b.ready);

        input.axil.aw.ready = false;
        input.axil.b = Valid::valid(WRes { resp: Resp::SlvErr });
        seq.tick(&input);
        assert_eq!(seq.state().state, SequencerState::Idle);
        assert_eq!(seq.output().outcome.write_status().to_byte(), 0x02);
    }

    #[test]
    fn read_latches_data() {
        let mut seq = Module::new("seq", Sequencer::<32>);
        seq.tick(&command(CMD_READ, 0x1234, 0));
        assert!(seq.output().axil.ar.valid);

        let mut input = SequencerInput::default();
        input.axil.ar.ready = true;
        seq.tick(&input);
        assert!(seq.output().axil.r.ready && !seq.output().axil.ar.valid);

        input.axil.ar.ready = false;
        input.axil.r = Valid::valid(RRes { data: 0x1234_5678, resp: Resp::Okay });
        seq.tick(&input);
        let outcome = seq.output().outcome;
        assert!(outcome.read_valid);
        assert_eq!(outcome.rdata, 0x1234_5678);
    }

    #[test]
    fn reset_abandons_but_keeps_stale_values() {
        let mut seq = Module::new("seq", Sequencer::<32>);
        seq.tick(&command(CMD_READ, 0, 0));
        let mut input = SequencerInput::default();
        input.axil.ar.ready = true;
        seq.tick(&input);
        input.axil.ar.ready = false;
        input.axil.r = Valid::valid(RRes { data: 7, resp: Resp::DecErr });
        seq.tick(&input);

        seq.tick(&command(CMD_READ, 4, 0));
        assert!(!seq.output().outcome.read_valid);
        seq.tick(&SequencerInput { glue: Glue { engine_reset: true, ..Glue::default() }, ..SequencerInput::default() });
        let out = seq.output();
        assert!(!out.axil.ar.valid && !out.axil.r.ready);
        assert_eq!(seq.state().state, SequencerState::Idle);
        assert_eq!(out.outcome.read_status().to_byte(), 0x07);
        assert_eq!(out.outcome.rdata, 7);
    }

    #[test]
    fn address_is_truncated() {
        let mut seq = Module::new("seq", Sequencer::<12>);
        seq.tick(&command(CMD_WRITE, 0x1234_5678, 0));
        assert_eq!(seq.output().axil.aw.inner.addr.value(), 0x678);
    }

    #[test]
    fn unknown_command_starts_nothing() {
        let mut seq = Module::new("seq", Sequencer::<32>);
        seq.tick(&command(0x42, 0, 0));
        assert_eq!(seq.state().state, SequencerState::Idle);
        let out = seq.output().axil;
        assert!(!out.aw.valid && !out.w.valid && !out.ar.valid && !out.b.ready && !out.r.ready);
    }
}
