// nfcjuke/src/ndef/tlv.rs

//! Type 2 Tag TLV wrapper around NDEF messages.
//!
//! Length encoding follows the short/long-form rule exactly: a length byte
//! below `0xFF` is the length; `0xFF` introduces a 16-bit big-endian
//! length. This boundary (254/255/256-byte messages) is a classic
//! interoperability bug source and is covered by dedicated tests.

use crate::constants::{TLV_LONG_FORM, TLV_NDEF_MESSAGE, TLV_NULL, TLV_TERMINATOR};
use crate::{Error, Result};

/// Wrap an NDEF message in its TLV header, append a Terminator TLV unless
/// the buffer already ends on a page boundary, and zero-pad to a multiple
/// of `page_size`. The result can be handed to `write_pages` directly.
///
/// The long-form length field is 16 bits, so messages beyond 65535 bytes
/// are rejected with [`Error::InvalidLength`] rather than truncated.
pub fn wrap_message(message: &[u8], page_size: usize) -> Result<Vec<u8>> {
    debug_assert!(page_size > 0);

    if message.len() > u16::MAX as usize {
        return Err(Error::InvalidLength {
            expected: u16::MAX as usize,
            actual: message.len(),
        });
    }

    let mut out = Vec::with_capacity(4 + message.len() + page_size);
    out.push(TLV_NDEF_MESSAGE);
    if message.len() < TLV_LONG_FORM as usize {
        out.push(message.len() as u8);
    } else {
        out.push(TLV_LONG_FORM);
        out.extend_from_slice(&(message.len() as u16).to_be_bytes());
    }
    out.extend_from_slice(message);

    // The terminator itself counts toward page alignment.
    if out.len() % page_size != 0 {
        out.push(TLV_TERMINATOR);
    }
    while out.len() % page_size != 0 {
        out.push(TLV_NULL);
    }
    Ok(out)
}

/// Parse one TLV header at `raw[i..]`. Returns the tag byte, the offset of
/// the value, and the value length; `None` if the header is truncated.
fn parse_header(raw: &[u8], i: usize) -> Option<(u8, usize, usize)> {
    let tag = *raw.get(i)?;
    let len_byte = *raw.get(i + 1)?;
    if len_byte == TLV_LONG_FORM {
        let hi = *raw.get(i + 2)?;
        let lo = *raw.get(i + 3)?;
        Some((tag, i + 4, u16::from_be_bytes([hi, lo]) as usize))
    } else {
        Some((tag, i + 2, len_byte as usize))
    }
}

/// Scan `raw` for the NDEF Message TLV and return its value bytes.
///
/// NULL TLVs are skipped, unknown TLVs are skipped by their declared
/// length, and a Terminator ends the scan. Truncated data yields `None`.
pub fn unwrap_message(raw: &[u8]) -> Option<&[u8]> {
    let mut i = 0usize;
    while i < raw.len() {
        match raw[i] {
            TLV_NULL => i += 1,
            TLV_TERMINATOR => return None,
            _ => {
                let (tag, start, len) = parse_header(raw, i)?;
                let end = start.checked_add(len)?;
                if end > raw.len() {
                    return None;
                }
                if tag == TLV_NDEF_MESSAGE {
                    return Some(&raw[start..end]);
                }
                i = end;
            }
        }
    }
    None
}

/// Total number of bytes from the start of `raw` through the end of the
/// NDEF Message TLV's value, as declared by its header.
///
/// Used to size multi-page reads: the result may exceed `raw.len()` when
/// only the first chunk of tag memory has been read so far.
pub fn message_extent(raw: &[u8]) -> Option<usize> {
    let mut i = 0usize;
    while i < raw.len() {
        match raw[i] {
            TLV_NULL => i += 1,
            TLV_TERMINATOR => return None,
            _ => {
                let (tag, start, len) = parse_header(raw, i)?;
                if tag == TLV_NDEF_MESSAGE {
                    return start.checked_add(len);
                }
                let end = start.checked_add(len)?;
                if end > raw.len() {
                    return None;
                }
                i = end;
            }
        }
    }
    None
}
