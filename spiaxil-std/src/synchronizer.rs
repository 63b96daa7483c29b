//! Clock-domain crossing synchronizer for single-bit signals.

use crate::*;

/// Shift chain bringing an asynchronous single-bit signal into the local clock domain.
///
/// The input is captured by `SYNC` synchronizing stages, followed by `GUARD` guard stages.
/// The output is the last guard stage, so a change of the input becomes visible
/// `SYNC + GUARD` cycles later and metastability is confined to the synchronizing stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Synchronizer<const SYNC: usize, const GUARD: usize> {
    init: bool,
}

/// Registers of [`Synchronizer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Signal)]
pub struct Chain<const SYNC: usize, const GUARD: usize> {
    /// Synchronizing stages, the first one sampling the asynchronous input.
    pub sync: [bool; SYNC],
    /// Guard stages.
    pub guard: [bool; GUARD],
}

impl<const SYNC: usize, const GUARD: usize> Synchronizer<SYNC, GUARD> {
    const DEPTH_CHECK: () = assert!(SYNC >= 1 && GUARD >= 1, "synchronizer needs at least one stage of each kind");

    /// Creates a synchronizer whose stages all take `init` on reset.
    pub fn new(init: bool) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::DEPTH_CHECK;
        Self { init }
    }

    /// Number of cycles between an input change and the output change.
    pub const fn latency(&self) -> usize { SYNC + GUARD }
}

impl<const SYNC: usize, const GUARD: usize> Fsm for Synchronizer<SYNC, GUARD> {
    type In = bool;
    type Out = bool;
    type State = Chain<SYNC, GUARD>;

    fn init(&self) -> Self::State { Chain { sync: [self.init; SYNC], guard: [self.init; GUARD] } }

    fn output(&self, state: &Self::State) -> bool { state.guard.last().copied().unwrap_or(self.init) }

    fn next(&self, input: &bool, state: &Self::State) -> Self::State {
        let mut next = *state;
        next.sync[0] = *input;
        next.sync[1..].copy_from_slice(&state.sync[..SYNC - 1]);
        next.guard[0] = state.sync[SYNC - 1];
        next.guard[1..].copy_from_slice(&state.guard[..GUARD - 1]);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_follows_after_latency() {
        let mut module = Module::new("sync", Synchronizer::<2, 1>::new(false));
        assert_eq!(module.fsm().latency(), 3);

        let mut outputs = vec![];
        for input in [true, true, true, true, false, false, false, false] {
            outputs.push(module.output());
            module.tick(&input);
        }
        assert_eq!(outputs, vec![false, false, false, true, true, true, true, false]);
    }

    #[test]
    fn pulse_shorter_than_chain_still_passes() {
        let mut module = Module::new("sync", Synchronizer::<1, 1>::new(false));
        let mut outputs = vec![];
        for input in [true, false, false, false] {
            outputs.push(module.output());
            module.tick(&input);
        }
        assert_eq!(outputs, vec![false, false, true, false]);
    }

    #[test]
    fn reset_takes_initial_value() {
        let mut module = Module::new("cs_n", Synchronizer::<1, 2>::new(true));
        for _ in 0..5 {
            module.tick(&false);
        }
        assert!(!module.output());
        module.reset();
        assert!(module.output());
        assert_eq!(module.state().transl(), vec![true, true, true]);
    }
}
