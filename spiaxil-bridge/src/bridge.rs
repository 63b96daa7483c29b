//! Top-level bridge: synchronizers, frame engine and command sequencer.

use spiaxil::*;
use spiaxil_std::*;

use crate::constants::axil::ADDR_WIDTH;
use crate::constants::sync::*;
use crate::frame_engine::{EngineInput, EngineRegs, FrameEngine};
use crate::sequencer::{Sequencer, SequencerInput, SequencerRegs, SequencerState};
use crate::types::axil::Axil;
use crate::types::spi::{Spi, SpiBwd, SpiMode};

/// Bridge configuration.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BridgeConfig {
    pub mode: SpiMode,
}

type LineSync = Synchronizer<SYNC_STAGES, GUARD_STAGES>;

/// SPI slave to AXI4-Lite master bridge with a `W`-bit address bus.
///
/// All outputs are registered. Every [`Bridge::tick`] samples the outputs of every submodule
/// first and only then advances them, so the wiring order does not matter.
#[derive(Debug, Clone)]
pub struct Bridge<const W: usize = ADDR_WIDTH> {
    config: BridgeConfig,
    sck_sync: Module<LineSync>,
    cs_sync: Module<LineSync>,
    engine: Module<FrameEngine>,
    sequencer: Module<Sequencer<W>>,
}

impl<const W: usize> Bridge<W> {
    const ADDR_WIDTH_CHECK: () = assert!(W >= 1 && W <= ADDR_WIDTH, "address width must be within 1..=32");

    pub fn new(config: BridgeConfig) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::ADDR_WIDTH_CHECK;
        Self {
            config,
            sck_sync: Module::new("sck_sync", Synchronizer::new(config.mode.cpol())),
            cs_sync: Module::new("cs_sync", Synchronizer::new(true)),
            engine: Module::new("engine", FrameEngine::new(config.mode)),
            sequencer: Module::new("sequencer", Sequencer),
        }
    }

    pub fn config(&self) -> BridgeConfig { self.config }

    /// SPI lines driven by the bridge in the current cycle.
    pub fn spi(&self) -> <Spi as Interface>::Bwd { SpiBwd { miso: self.engine.output().miso } }

    /// AXI4-Lite lines driven by the bridge in the current cycle.
    pub fn axil(&self) -> <Axil<W> as Interface>::Fwd { self.sequencer.output().axil }

    pub fn engine(&self) -> &EngineRegs { self.engine.state() }

    pub fn sequencer(&self) -> &SequencerRegs<W> { self.sequencer.state() }

    /// Returns whether no bus transaction is in flight.
    pub fn is_idle(&self) -> bool { self.sequencer.state().state == SequencerState::Idle }

    /// Advances one clock cycle.
    pub fn tick(&mut self, spi: &<Spi as Interface>::Fwd, axil: &<Axil<W> as Interface>::Bwd) {
        let sck = self.sck_sync.output();
        let cs_n = self.cs_sync.output();
        let engine = self.engine.output();
        let sequencer = self.sequencer.output();

        self.sck_sync.tick(&spi.sck);
        self.cs_sync.tick(&spi.cs_n);
        self.engine.tick(&EngineInput { sck, cs_n, mosi: spi.mosi, outcome: sequencer.outcome });
        self.sequencer.tick(&SequencerInput { glue: engine.glue, axil: *axil });
    }

    /// Asynchronous reset of every register.
    pub fn reset(&mut self) {
        self.sck_sync.reset();
        self.cs_sync.reset();
        self.engine.reset();
        self.sequencer.reset();
    }

    /// Records every submodule under `prefix.bridge`.
    pub fn probe(&self, trace: &mut Trace, prefix: &str) {
        let scope = if prefix.is_empty() { "bridge".to_string() } else { format!("{}.bridge", prefix) };
        self.sck_sync.probe(trace, &scope);
        self.cs_sync.probe(trace, &scope);
        self.engine.probe(trace, &scope);
        self.sequencer.probe(trace, &scope);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::axil::AxilBwd;
    use crate::types::spi::SpiFwd;

    #[test]
    fn idle_after_reset() {
        for mode in SpiMode::ALL {
            let mut bridge = Bridge::<32>::new(BridgeConfig { mode });
            assert_eq!(bridge.config().mode, mode);
            let idle = SpiFwd { sck: mode.cpol(), cs_n: true, mosi: false };
            for _ in 0..4 {
                bridge.tick(&idle, &AxilBwd::default());
            }
            assert!(!bridge.spi().miso);
            assert_eq!(bridge.axil(), Bridge::<32>::new(BridgeConfig { mode }).axil());
            assert!(bridge.is_idle());
            assert!(bridge.engine().glue.engine_reset);
        }
    }

    #[test]
    fn cs_reaches_engine_after_sync_latency() {
        let mut bridge = Bridge::<32>::new(BridgeConfig::default());
        let selected = SpiFwd { sck: false, cs_n: false, mosi: false };
        for _ in 0..LATENCY {
            bridge.tick(&selected, &AxilBwd::default());
            assert!(bridge.engine().glue.engine_reset);
        }
        bridge.tick(&selected, &AxilBwd::default());
        assert!(!bridge.engine().glue.engine_reset);

        bridge.reset();
        assert!(bridge.engine().glue.engine_reset);
    }

    #[test]
    fn probe_names_submodules() {
        let mut trace = Trace::default();
        Bridge::<16>::new(BridgeConfig::default()).probe(&mut trace, "tb");
        assert!(trace.last("tb.bridge.sequencer.out_axil_aw_addr").is_some());
        assert!(trace.last("tb.bridge.engine.state_state").is_some());
        assert_eq!(trace.signals().find(|(name, _)| *name == "tb.bridge.sequencer.out_axil_aw_addr").map(|(_, w)| w), Some(16));
    }
}
