//! spiaxil: cycle-accurate modeling of clocked hardware with typed signals and state machines.

// # Tries to deny all lints (`rustc -W help`).
#![deny(absolute_paths_not_starting_with_crate)]
#![deny(anonymous_parameters)]
#![deny(deprecated_in_future)]
#![deny(explicit_outlives_requirements)]
#![deny(keyword_idents)]
#![deny(macro_use_extern_crate)]
#![deny(missing_debug_implementations)]
#![deny(non_ascii_idents)]
#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![deny(unused_extern_crates)]
#![deny(unused_import_braces)]
//
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::missing_crate_level_docs)]
#![deny(rustdoc::invalid_codeblock_attributes)]
#![deny(rustdoc::invalid_html_tags)]
#![deny(rustdoc::invalid_rust_codeblocks)]
#![deny(rustdoc::bare_urls)]
//
#![allow(clippy::needless_lifetimes)]
#![allow(elided_lifetimes_in_paths)]

mod fsm;
mod interface;
mod port;
mod signal;
pub mod trace;
pub mod utils;

pub use fsm::{Fsm, Module};
pub use interface::Interface;
pub use port::PortDecls;
pub use signal::{Bits, Signal};
pub use spiaxil_macro::Signal;
pub use trace::{Trace, TraceError};
pub use utils::*;
