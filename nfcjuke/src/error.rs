// nfcjuke/src/error.rs

//! Crate-wide error type.

use thiserror::Error;

/// Common error type for the NFC subsystem.
#[derive(Error, Debug)]
pub enum Error {
    /// The reader chip did not respond at connect time. Fatal to the NFC
    /// subsystem; the rest of the application keeps running without it.
    #[error("nfc reader unavailable: {0}")]
    HardwareUnavailable(String),

    /// Underlying bus I/O failure.
    // real bus support is an optional dependency so the core builds anywhere
    #[cfg(feature = "i2c")]
    #[error("i2c bus error: {0}")]
    Bus(#[from] i2cdev::linux::LinuxI2CError),

    /// Underlying bus I/O failure (stringly-typed without the `i2c`
    /// feature).
    #[cfg(not(feature = "i2c"))]
    #[error("i2c bus error: {0}")]
    BusString(String),

    /// A page read failed. Transient; the session retries a bounded number
    /// of times before surfacing the failure as a raw detection error.
    #[error("read failed at page {page}")]
    Read {
        /// Page at which the multi-page read aborted.
        page: u8,
    },

    /// A page write failed. Transient and retryable.
    #[error("write failed at page {page}")]
    Write {
        /// Page at which the multi-page write aborted.
        page: u8,
    },

    /// The tag reports the page or its sector as locked. Terminal for the
    /// write attempt; never retried.
    #[error("page {page} is locked against writes")]
    NotWritable {
        /// First locked page encountered.
        page: u8,
    },

    /// A buffer or response was the wrong size for the operation.
    #[error("invalid length: expected {expected}, got {actual}")]
    InvalidLength {
        /// Expected byte count.
        expected: usize,
        /// Actual byte count.
        actual: usize,
    },

    /// UID bytes outside the 4..=10 range the anti-collision sequence can
    /// produce.
    #[error("invalid uid length: {0} bytes")]
    InvalidUid(usize),

    /// The chip answered with a response code the command does not allow.
    #[error("unexpected response code: expected {expected:#04x}, got {actual:#04x}")]
    UnexpectedResponse {
        /// Response code the command expects.
        expected: u8,
        /// Response code actually received.
        actual: u8,
    },

    /// The chip produced no response within the operation's timeout.
    #[error("operation timed out")]
    Timeout,

    /// A write request was submitted while another one is armed.
    #[error("a write request is already armed")]
    WriteBusy,

    /// Rejected write request payload.
    #[error("cannot encode an empty uri")]
    EmptyUri,

    /// An external collaborator (database, playback) refused a call. The
    /// current cycle is treated as unresolved; the next detection retries.
    #[error("{collaborator} unavailable: {reason}")]
    Collaborator {
        /// Which collaborator failed.
        collaborator: &'static str,
        /// Collaborator-supplied failure detail.
        reason: String,
    },
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
