// nfcjuke/src/lib.rs

//! nfcjuke
//!
//! NFC tag detection and media resolution core for a tag-triggered jukebox.
//!
//! A single worker thread owns the reader hardware and drives a ~100ms poll
//! loop; detected tags are debounced, their NDEF URI payload is decoded, and
//! the result is resolved to a media reference via narrow collaborator
//! traits (database, playback, feedback). An admin surface can arm a
//! one-shot NDEF write that takes priority over resolution.
#![warn(missing_docs)]

pub mod constants;
pub mod error;
pub mod ndef;
pub mod prelude;
pub mod resolver;
pub mod session;
pub mod test_support;
pub mod transport;
pub mod types;
pub mod utils;
pub mod worker;

// Re-export common types at crate root so `crate::Error`, `crate::Result`,
// and the newtypes in `types` are available for consumers and for
// convenient `prelude` re-exports.
pub use crate::error::*;
pub use crate::types::*;

pub use prelude::*;
