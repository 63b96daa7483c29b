//! Types.

pub mod axil;
pub mod frame;
pub mod spi;
