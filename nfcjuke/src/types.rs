// nfcjuke/src/types.rs

//! Core value types shared across the transport, session, and resolver.

use crate::Error;
use std::convert::TryFrom;
use std::time::Duration;

/// TagUid - Newtype Pattern (4 to 10 bytes as produced by anti-collision).
///
/// Formatted as an uppercase hex string for all external use. Immutable once
/// read from hardware.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagUid(Vec<u8>);

impl TagUid {
    /// Borrow the raw UID bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Uppercase hex rendering used everywhere outside the transport.
    pub fn to_hex(&self) -> String {
        crate::utils::bytes_to_hex_upper(&self.0)
    }
}

impl TryFrom<&[u8]> for TagUid {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        if !(4..=10).contains(&bytes.len()) {
            return Err(Error::InvalidUid(bytes.len()));
        }
        Ok(Self(bytes.to_vec()))
    }
}

impl std::fmt::Display for TagUid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for TagUid {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// A decoded NDEF record. Only URI records are recognized; every other
/// record type is ignored by the codec.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum NdefRecord {
    /// An NDEF URI record with the prefix already expanded.
    Uri(String),
}

impl NdefRecord {
    /// The URI carried by the record.
    pub fn uri(&self) -> &str {
        match self {
            Self::Uri(uri) => uri,
        }
    }
}

/// Broad classification of a hardware failure surfaced to consumers of a
/// [`TagDetection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum HardwareErrorKind {
    /// Page or poll read failed after retries.
    Read,
    /// Page write failed after retries.
    Write,
    /// The chip stopped answering within its timeout.
    Timeout,
}

impl From<&Error> for HardwareErrorKind {
    fn from(err: &Error) -> Self {
        match err {
            Error::Write { .. } | Error::NotWritable { .. } => Self::Write,
            Error::Timeout => Self::Timeout,
            _ => Self::Read,
        }
    }
}

/// The transient result of one poll cycle. Created fresh every tick, never
/// mutated, discarded once consumed.
///
/// Exactly one of "uid present", "no tag", or "hardware error" holds; an
/// NDEF record is only ever present together with a UID.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TagDetection {
    /// UID of the detected tag, if any.
    pub uid: Option<TagUid>,
    /// Decoded NDEF URI record, if the tag carries one.
    pub ndef: Option<NdefRecord>,
    /// Hardware failure classification, if the cycle errored.
    pub raw_error: Option<HardwareErrorKind>,
}

impl TagDetection {
    /// A detection for a present tag, with or without NDEF data.
    pub fn tag(uid: TagUid, ndef: Option<NdefRecord>) -> Self {
        Self {
            uid: Some(uid),
            ndef,
            raw_error: None,
        }
    }

    /// A detection for an unreadable-but-present tag.
    pub fn unreadable(uid: TagUid, kind: HardwareErrorKind) -> Self {
        Self {
            uid: Some(uid),
            ndef: None,
            raw_error: Some(kind),
        }
    }

    /// No tag in range this cycle.
    pub fn absent() -> Self {
        Self {
            uid: None,
            ndef: None,
            raw_error: None,
        }
    }

    /// A hardware error with no tag engaged.
    pub fn error(kind: HardwareErrorKind) -> Self {
        Self {
            uid: None,
            ndef: None,
            raw_error: Some(kind),
        }
    }
}

/// A pending request to write an NDEF URI record to the next tag presented.
///
/// Only one request is active at a time; arming a new one cancels any
/// previous pending request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRequest {
    /// URI to encode onto the tag.
    pub target_uri: String,
    /// How long to wait for a tag before the request times out.
    pub timeout: Duration,
}

impl WriteRequest {
    /// Build a request for `uri` with the given arming timeout.
    pub fn new(uri: impl Into<String>, timeout: Duration) -> Self {
        Self {
            target_uri: uri.into(),
            timeout,
        }
    }

    /// Build a request for `uri` with the default one-minute timeout.
    pub fn with_default_timeout(uri: impl Into<String>) -> Self {
        Self::new(uri, crate::utils::default_write_timeout())
    }
}

/// Outcome of the most recent write request, as reported to the admin API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum WriteStatus {
    /// No write request has been armed.
    #[default]
    Idle,
    /// Waiting for a tag to be presented.
    Armed,
    /// The record was written to a tag.
    Succeeded,
    /// The write failed (locked tag or persistent hardware error).
    Failed,
    /// No tag was presented before the request's timeout elapsed.
    TimedOut,
}

/// Closed set of tag families the transport knows how to drive.
///
/// Selected once by the capability probe at connect time; the
/// `read_pages`/`write_pages` contract is identical across families, only
/// the underlying command sequence differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagFamily {
    /// NTAG21x-class Type 2 tags: 4-byte pages, open access.
    Ntag215,
    /// MIFARE Classic: 16-byte blocks, sector authentication before access.
    MifareClassic,
}

impl TagFamily {
    /// Physical page/block size in bytes.
    pub fn page_size(&self) -> usize {
        match self {
            Self::Ntag215 => 4,
            Self::MifareClassic => 16,
        }
    }

    /// Select a family from the capability code reported by the version
    /// probe. Unknown codes default to the open-access family.
    pub fn from_capability(code: u8) -> Self {
        match code {
            crate::constants::FAMILY_MIFARE_CLASSIC => Self::MifareClassic,
            _ => Self::Ntag215,
        }
    }
}
