// nfcjuke/src/transport/mod.rs

//! Raw byte-level communication with the NFC reader chip.
//!
//! The [`NfcBus`] trait is the I/O seam; [`Reader`] layers the chip's
//! command set on top of it and exposes the page-oriented
//! [`TagReader`] contract consumed by the session state machine.

#[cfg(feature = "i2c")]
pub mod i2c;
pub mod mock;
pub mod reader;
pub mod traits;

#[cfg(feature = "i2c")]
pub use i2c::I2cBus;
pub use mock::MockBus;
pub use reader::Reader;
pub use traits::{NfcBus, TagReader};
