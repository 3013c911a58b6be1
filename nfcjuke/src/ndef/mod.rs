// nfcjuke/src/ndef/mod.rs

//! NDEF codec for Type 2 tags.
//!
//! Converts between a linear NDEF message and the TLV-wrapped, page-padded
//! byte layout the tags expose, and between raw message bytes and a
//! structured URI record. Corrupt or absent NDEF data decodes to `None`,
//! never an error: tags without a (valid) message are an expected case.

pub mod tlv;
pub mod uri;

pub use tlv::{message_extent, unwrap_message, wrap_message};
pub use uri::{decode_first_record, encode_uri_record};

use crate::types::NdefRecord;
use crate::{Error, Result};

/// Decode the first URI record out of raw tag memory bytes.
///
/// Returns `None` if no NDEF Message TLV is found, the message is
/// truncated, or its first record is not a URI record.
pub fn decode_ndef(raw: &[u8]) -> Option<NdefRecord> {
    let message = unwrap_message(raw)?;
    decode_first_record(message)
}

/// Encode `uri` as a single-record NDEF message in the tag's TLV layout,
/// padded to a multiple of `page_size` and ready for `write_pages`.
pub fn encode_ndef_uri_padded(uri: &str, page_size: usize) -> Result<Vec<u8>> {
    if uri.is_empty() {
        return Err(Error::EmptyUri);
    }
    let message = encode_uri_record(uri);
    wrap_message(&message, page_size)
}

/// [`encode_ndef_uri_padded`] for the dominant 4-byte page size.
pub fn encode_ndef_uri(uri: &str) -> Result<Vec<u8>> {
    encode_ndef_uri_padded(uri, 4)
}
