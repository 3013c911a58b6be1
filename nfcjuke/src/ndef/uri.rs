// nfcjuke/src/ndef/uri.rs

//! NDEF URI record codec.

use crate::types::NdefRecord;

/// TNF value for NFC Forum well-known types.
const TNF_WELL_KNOWN: u8 = 0x01;
/// Record type byte for URI records.
const RTD_URI: u8 = b'U';

const FLAG_MESSAGE_BEGIN: u8 = 0x80;
const FLAG_MESSAGE_END: u8 = 0x40;
const FLAG_SHORT_RECORD: u8 = 0x10;
const FLAG_ID_LENGTH: u8 = 0x08;

/// Standard URI identifier-code prefix table (codes 0x00..=0x23).
pub const URI_PREFIXES: [&str; 36] = [
    "",
    "http://www.",
    "https://www.",
    "http://",
    "https://",
    "tel:",
    "mailto:",
    "ftp://anonymous:anonymous@",
    "ftp://ftp.",
    "ftps://",
    "sftp://",
    "smb://",
    "nfs://",
    "ftp://",
    "dav://",
    "news:",
    "telnet://",
    "imap:",
    "rtsp://",
    "urn:",
    "pop:",
    "sip:",
    "sips:",
    "tftp:",
    "btspp://",
    "btl2cap://",
    "btgoep://",
    "tcpobex://",
    "irdaobex://",
    "file://",
    "urn:epc:id:",
    "urn:epc:tag:",
    "urn:epc:pat:",
    "urn:epc:raw:",
    "urn:epc:",
    "urn:nfc:",
];

/// Compress `uri` against the prefix table: the longest matching prefix
/// wins, so `urn:nfc:` beats `urn:` and `https://www.` beats `https://`.
fn compress(uri: &str) -> (u8, &str) {
    let mut best: (u8, &str) = (0, uri);
    for (idx, prefix) in URI_PREFIXES.iter().enumerate().skip(1) {
        if prefix.len() > URI_PREFIXES[best.0 as usize].len() {
            if let Some(rest) = uri.strip_prefix(prefix) {
                best = (idx as u8, rest);
            }
        }
    }
    best
}

/// Encode `uri` as a single-record NDEF message (MB and ME both set).
///
/// Uses the short-record form while the payload fits in one length byte
/// and the 4-byte payload length otherwise.
pub fn encode_uri_record(uri: &str) -> Vec<u8> {
    let (prefix_code, rest) = compress(uri);
    let payload_len = 1 + rest.len();

    let mut out = Vec::with_capacity(5 + payload_len);
    if payload_len < 256 {
        out.push(FLAG_MESSAGE_BEGIN | FLAG_MESSAGE_END | FLAG_SHORT_RECORD | TNF_WELL_KNOWN);
        out.push(1); // type length
        out.push(payload_len as u8);
    } else {
        out.push(FLAG_MESSAGE_BEGIN | FLAG_MESSAGE_END | TNF_WELL_KNOWN);
        out.push(1);
        out.extend_from_slice(&(payload_len as u32).to_be_bytes());
    }
    out.push(RTD_URI);
    out.push(prefix_code);
    out.extend_from_slice(rest.as_bytes());
    out
}

/// Decode the first record of an NDEF message. Only URI records are
/// recognized; anything else yields `None`.
pub fn decode_first_record(message: &[u8]) -> Option<NdefRecord> {
    let header = *message.first()?;
    let tnf = header & 0x07;
    let short_record = header & FLAG_SHORT_RECORD != 0;
    let has_id = header & FLAG_ID_LENGTH != 0;

    let type_len = *message.get(1)? as usize;
    let mut i = 2usize;

    let payload_len = if short_record {
        let len = *message.get(i)? as usize;
        i += 1;
        len
    } else {
        let bytes: [u8; 4] = message.get(i..i + 4)?.try_into().ok()?;
        i += 4;
        u32::from_be_bytes(bytes) as usize
    };

    let id_len = if has_id {
        let len = *message.get(i)? as usize;
        i += 1;
        len
    } else {
        0
    };

    let record_type = message.get(i..i + type_len)?;
    i += type_len + id_len;
    let payload = message.get(i..i + payload_len)?;

    if tnf != TNF_WELL_KNOWN || record_type != [RTD_URI] {
        return None;
    }

    let prefix_code = *payload.first()? as usize;
    // Out-of-range identifier codes fall back to no prefix.
    let prefix = URI_PREFIXES.get(prefix_code).copied().unwrap_or("");
    let rest = std::str::from_utf8(&payload[1..]).ok()?;
    Some(NdefRecord::Uri(format!("{}{}", prefix, rest)))
}
