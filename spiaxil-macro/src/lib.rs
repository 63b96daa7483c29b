//! Implementation of proc macros on signal types.
//!
//! # Note
//!
//! To use `#[derive(Signal)]` on struct, it is assumed that its `port_decls()` method
//! implementation of `Signal` trait is constructed as struct of its fields, and that its bits
//! are the concatenation of its fields' bits in declaration order.
//!
//! For example, the derived implementation for `Valid` is equivalent to the following.
//!
//! ```ignore
//! #[derive(Debug, Clone, Signal)]
//! pub struct Valid<V: Signal> {
//!     #[member(name = "")]
//!     inner: V,
//!     valid: bool,
//! }
//!
//! impl<V: Signal> Signal for Valid<V> {
//!     const WIDTH: usize = 0 + <V>::WIDTH + <bool>::WIDTH;
//!     ...
//!     fn port_decls() -> PortDecls {
//!         PortDecls::Struct(vec![
//!             (None, <V>::port_decls()),
//!             (Some("valid".to_string()), <bool>::port_decls()),
//!         ])
//!     }
//! }
//! ```
//!
//! The generated code refers to `Signal` and `PortDecls` unqualified, so the deriving module
//! is expected to glob-import `spiaxil::*`.

mod signal;
mod utils;

use proc_macro::{self, TokenStream};

#[proc_macro_derive(Signal, attributes(member, width, encode))]
pub fn signal(input: TokenStream) -> TokenStream { signal::derive(input) }
