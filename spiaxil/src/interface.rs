//! Interface.

use crate::*;

/// A bundle of wires between two components, split into the signals driven by the producer
/// (`Fwd`) and the signals driven back by the consumer (`Bwd`).
pub trait Interface {
    /// Forward signals, driven by the producer.
    type Fwd: Signal;

    /// Backward signals, driven by the consumer.
    type Bwd: Signal;
}
