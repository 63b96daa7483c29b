//! Finite state machine (Moore machine).

use crate::*;

/// Finite state machine clocked by the model's single clock.
///
/// Outputs are registered: they depend only on the current state, never on the current input.
/// This lets any number of machines be wired to each other's outputs and advanced in
/// lock-step without combinational loops: read every `output`, then compute every `next`.
pub trait Fsm {
    /// Inputs sampled at the clock edge.
    type In: Signal;

    /// Outputs driven during the current cycle.
    type Out: Signal;

    /// Registers.
    type State: Signal;

    /// Initial value of registers in the FSM, also taken on reset.
    fn init(&self) -> Self::State;

    /// Outputs of the current cycle.
    fn output(&self, state: &Self::State) -> Self::Out;

    /// Registers of the next cycle.
    fn next(&self, input: &Self::In, state: &Self::State) -> Self::State;
}

/// An instance of an FSM holding its registers.
#[derive(Debug, Clone)]
pub struct Module<M: Fsm> {
    /// Instance name.
    name: String,
    /// FSM description.
    fsm: M,
    /// Current registers.
    state: M::State,
}

impl<M: Fsm> Module<M> {
    /// Creates a new instance in its initial state.
    pub fn new(name: &str, fsm: M) -> Self {
        let state = fsm.init();
        Self { name: name.to_string(), fsm, state }
    }

    /// Returns the instance name.
    pub fn name(&self) -> &str { &self.name }

    /// Returns the FSM description.
    pub fn fsm(&self) -> &M { &self.fsm }

    /// Returns the current registers.
    pub fn state(&self) -> &M::State { &self.state }

    /// Returns the outputs of the current cycle.
    pub fn output(&self) -> M::Out { self.fsm.output(&self.state) }

    /// Advances one clock cycle.
    pub fn tick(&mut self, input: &M::In) { self.state = self.fsm.next(input, &self.state); }

    /// Asynchronous reset: registers take their initial value immediately.
    pub fn reset(&mut self) { self.state = self.fsm.init(); }

    /// Records the registers and outputs of the current cycle, under `prefix.name`.
    pub fn probe(&self, trace: &mut Trace, prefix: &str) {
        let scope = if prefix.is_empty() { self.name.clone() } else { format!("{}.{}", prefix, self.name) };
        trace.record(&format!("{}.state", scope), &self.state);
        trace.record(&format!("{}.out", scope), &self.output());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts enabled cycles, wrapping at 4.
    #[derive(Debug)]
    struct Counter;

    impl Fsm for Counter {
        type In = bool;
        type Out = Bits<2>;
        type State = Bits<2>;

        fn init(&self) -> Bits<2> { Bits::new(0) }

        fn output(&self, state: &Bits<2>) -> Bits<2> { *state }

        fn next(&self, input: &bool, state: &Bits<2>) -> Bits<2> {
            if *input {
                Bits::new(state.value() + 1)
            } else {
                *state
            }
        }
    }

    #[test]
    fn output_is_registered() {
        let mut module = Module::new("counter", Counter);
        assert_eq!(module.name(), "counter");
        assert_eq!(module.output().value(), 0);
        module.tick(&true);
        assert_eq!(module.output().value(), 1);
        module.tick(&false);
        assert_eq!(module.output().value(), 1);
        for _ in 0..3 {
            module.tick(&true);
        }
        assert_eq!(module.output().value(), 0);
        module.tick(&true);
        module.reset();
        assert_eq!(module.state().value(), 0);
    }

    #[test]
    fn probe_records_state_and_output() {
        let mut trace = Trace::default();
        let module = Module::new("counter", Counter);
        module.probe(&mut trace, "top");
        assert_eq!(trace.signals().map(|(name, width)| (name.to_string(), width)).collect::<Vec<_>>(), vec![
            ("top.counter.state".to_string(), 2),
            ("top.counter.out".to_string(), 2)
        ]);
    }
}
