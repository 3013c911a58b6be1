// nfcjuke/src/prelude.rs

//! Convenient single-import surface for crate consumers.
//!
//! ```
//! use nfcjuke::prelude::*;
//! ```

pub use crate::error::{Error, Result};
pub use crate::ndef::{decode_ndef, encode_ndef_uri, encode_ndef_uri_padded};
pub use crate::resolver::{
    is_media_source_url, Feedback, FeedbackKind, MediaRef, MediaStore, Playback, Resolver,
};
pub use crate::session::{SessionConfig, SessionEvent, SessionState, TagSession};
#[cfg(feature = "i2c")]
pub use crate::transport::I2cBus;
pub use crate::transport::{MockBus, NfcBus, Reader, TagReader};
pub use crate::types::{
    HardwareErrorKind, NdefRecord, TagDetection, TagFamily, TagUid, WriteRequest, WriteStatus,
};
pub use crate::utils::{bytes_to_hex_spaced, bytes_to_hex_upper};
pub use crate::worker::{NfcHandle, NfcWorker, WorkerConfig};
