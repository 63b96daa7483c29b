//! AXI4-Lite slave model backed by a sparse word memory.
//!
//! Ready and valid outputs are registered. Each channel waits a configurable number of cycles
//! before acknowledging a request or producing a response, so tests can make the bridge wait
//! for as long as they need.

use std::collections::BTreeMap;
use std::ops::Range;

use log::debug;
use spiaxil_std::*;

use crate::constants::axil::STRB_WIDTH;
use crate::types::axil::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponderConfig {
    /// Cycles an AW request is held before AWREADY rises.
    pub aw_latency: u32,
    pub w_latency: u32,
    /// Cycles between accepting AW and W and raising BVALID.
    pub b_latency: u32,
    pub ar_latency: u32,
    /// Cycles between accepting AR and raising RVALID.
    pub r_latency: u32,
    pub write_resp: Resp,
    pub read_resp: Resp,
    /// Decoded address window; accesses outside it get `DECERR`. `None` maps everything.
    pub mapped: Option<Range<u32>>,
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self {
            aw_latency: 0,
            w_latency: 0,
            b_latency: 0,
            ar_latency: 0,
            r_latency: 0,
            write_resp: Resp::Okay,
            read_resp: Resp::Okay,
            mapped: None,
        }
    }
}

/// Completed bus transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transaction {
    Write { addr: u32, data: u32, strb: u8, prot: u8, resp: Resp },
    Read { addr: u32, prot: u8, data: u32, resp: Resp },
}

#[derive(Debug, Clone)]
pub struct Responder<const W: usize = 32> {
    config: ResponderConfig,
    memory: BTreeMap<u32, u32>,
    out: AxilBwd,
    aw: Option<Addr<W>>,
    w: Option<WReq>,
    ar: Option<Addr<W>>,
    aw_wait: u32,
    w_wait: u32,
    ar_wait: u32,
    b_wait: u32,
    r_wait: u32,
    transactions: Vec<Transaction>,
}

/// Returns the next ready level of a channel. Withdrawing the request restarts the wait.
fn acknowledge(request: bool, wait: &mut u32, latency: u32) -> bool {
    if !request {
        *wait = 0;
        false
    } else if *wait >= latency {
        true
    } else {
        *wait += 1;
        false
    }
}

impl<const W: usize> Responder<W> {
    pub fn new(config: ResponderConfig) -> Self {
        Self {
            config,
            memory: BTreeMap::new(),
            out: AxilBwd::default(),
            aw: None,
            w: None,
            ar: None,
            aw_wait: 0,
            w_wait: 0,
            ar_wait: 0,
            b_wait: 0,
            r_wait: 0,
            transactions: Vec::new(),
        }
    }

    pub fn config(&self) -> &ResponderConfig { &self.config }

    pub fn config_mut(&mut self) -> &mut ResponderConfig { &mut self.config }

    pub fn peek(&self, addr: u32) -> Option<u32> { self.memory.get(&addr).copied() }

    pub fn poke(&mut self, addr: u32, data: u32) { self.memory.insert(addr, data); }

    pub fn transactions(&self) -> &[Transaction] { &self.transactions }

    /// Signals driven in the current cycle.
    pub fn output(&self) -> AxilBwd { self.out }

    /// Returns whether nothing is accepted or pending.
    pub fn is_idle(&self) -> bool {
        self.aw.is_none() && self.w.is_none() && self.ar.is_none() && !self.out.b.valid && !self.out.r.valid
    }

    fn resolve(&self, addr: u32, resp: Resp) -> Resp {
        match &self.config.mapped {
            Some(window) if !window.contains(&addr) => Resp::DecErr,
            _ => resp,
        }
    }

    fn write(&mut self, aw: Addr<W>, w: WReq) -> Resp {
        let addr = aw.addr.value() as u32;
        let resp = self.resolve(addr, self.config.write_resp);
        let strb = w.strb.value() as u8;
        if resp.is_ok() {
            let old = self.peek(addr).unwrap_or(0).to_le_bytes();
            let new = w.data.to_le_bytes();
            let merged = (0..STRB_WIDTH).map(|i| if strb & (1 << i) != 0 { new[i] } else { old[i] }).collect::<Vec<_>>();
            self.poke(addr, u32::from_le_bytes([merged[0], merged[1], merged[2], merged[3]]));
        }
        debug!("responder write {:#010x} <- {:#010x}: {:?}", addr, w.data, resp);
        self.transactions.push(Transaction::Write { addr, data: w.data, strb, prot: aw.prot.value() as u8, resp });
        resp
    }

    fn read(&mut self, ar: Addr<W>) -> RRes {
        let addr = ar.addr.value() as u32;
        let resp = self.resolve(addr, self.config.read_resp);
        let data = if resp.is_ok() { self.peek(addr).unwrap_or(0) } else { 0 };
        debug!("responder read {:#010x} -> {:#010x}: {:?}", addr, data, resp);
        self.transactions.push(Transaction::Read { addr, prot: ar.prot.value() as u8, data, resp });
        RRes { data, resp }
    }

    /// Advances one clock cycle.
    pub fn tick(&mut self, fwd: &AxilFwd<W>) {
        let out = self.out;
        let mut next = out;

        // Responses.
        if out.b.fire(&fwd.b) {
            next.b = Valid::invalid();
        } else if !out.b.valid {
            if let (Some(aw), Some(w)) = (self.aw, self.w) {
                if self.b_wait >= self.config.b_latency {
                    let resp = self.write(aw, w);
                    next.b = Valid::valid(WRes { resp });
                    self.aw = None;
                    self.w = None;
                    self.b_wait = 0;
                } else {
                    self.b_wait += 1;
                }
            }
        }
        if out.r.fire(&fwd.r) {
            next.r = Valid::invalid();
        } else if !out.r.valid {
            if let Some(ar) = self.ar {
                if self.r_wait >= self.config.r_latency {
                    next.r = Valid::valid(self.read(ar));
                    self.ar = None;
                    self.r_wait = 0;
                } else {
                    self.r_wait += 1;
                }
            }
        }

        // Requests. A response nobody collected is dropped when the next request arrives.
        if fwd.aw.fire(&out.aw) {
            self.aw = Some(fwd.aw.inner);
            next.aw.ready = false;
            self.aw_wait = 0;
            if out.b.valid && !fwd.b.ready {
                debug!("responder dropping uncollected write response");
                next.b = Valid::invalid();
            }
        } else {
            next.aw.ready = acknowledge(fwd.aw.valid && self.aw.is_none(), &mut self.aw_wait, self.config.aw_latency);
        }
        if fwd.w.fire(&out.w) {
            self.w = Some(fwd.w.inner);
            next.w.ready = false;
            self.w_wait = 0;
        } else {
            next.w.ready = acknowledge(fwd.w.valid && self.w.is_none(), &mut self.w_wait, self.config.w_latency);
        }
        if fwd.ar.fire(&out.ar) {
            self.ar = Some(fwd.ar.inner);
            next.ar.ready = false;
            self.ar_wait = 0;
            if out.r.valid && !fwd.r.ready {
                debug!("responder dropping uncollected read response");
                next.r = Valid::invalid();
            }
        } else {
            next.ar.ready = acknowledge(fwd.ar.valid && self.ar.is_none(), &mut self.ar_wait, self.config.ar_latency);
        }

        self.out = next;
    }
}
