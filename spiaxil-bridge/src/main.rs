#![allow(clippy::needless_lifetimes)]

use std::path::Path;

use log::info;
use spiaxil_bridge::*;

/// Runs the reference write and read in every mode and dumps their waveforms into `./build`.
fn main() -> Result<(), TestbenchError> {
    env_logger::init();

    for (index, mode) in SpiMode::ALL.iter().enumerate() {
        let mut tb = Testbench::<32>::new(*mode)?;
        tb.enable_trace();

        let write = tb.write(0x7654_3210, 0x1234_5678)?;
        info!("{:?}: write status {:#04x}", mode, write.status.to_byte());

        tb.responder_mut().poke(0x1234_5678, 0x1234_5678);
        let read = tb.read(0x1234_5678)?;
        info!("{:?}: read {:#010x?}, status {:#04x}", mode, read.data, read.status.to_byte());

        tb.settle(1_000)?;
        if let Some(trace) = tb.trace() {
            trace.write_vcd(Path::new(&format!("./build/mode{}.vcd", index)))?;
        }
    }
    Ok(())
}
