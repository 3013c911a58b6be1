// TLV length-form selection at the 254/255/256 boundary, plus the
// encode/decode round-trip law over arbitrary URIs.

use nfcjuke::ndef::{decode_ndef, encode_ndef_uri};
use proptest::prelude::*;

/// A URI whose encoded NDEF message is exactly `message_len` bytes long.
///
/// A short URI record for "https://" + tail is 3 header bytes, 1 type
/// byte, and a payload of prefix code + tail.
fn uri_with_message_len(message_len: usize) -> String {
    let tail_len = message_len - 5;
    format!("https://{}", "a".repeat(tail_len))
}

#[test]
fn short_form_at_254() {
    let uri = uri_with_message_len(254);
    let out = encode_ndef_uri(&uri).unwrap();
    assert_eq!(&out[..2], &[0x03, 0xFE]);
    assert_eq!(decode_ndef(&out).unwrap().uri(), uri);
}

#[test]
fn long_form_at_255() {
    let uri = uri_with_message_len(255);
    let out = encode_ndef_uri(&uri).unwrap();
    assert_eq!(&out[..4], &[0x03, 0xFF, 0x00, 0xFF]);
    assert_eq!(decode_ndef(&out).unwrap().uri(), uri);
}

#[test]
fn long_form_at_256() {
    let uri = uri_with_message_len(256);
    let out = encode_ndef_uri(&uri).unwrap();
    assert_eq!(&out[..4], &[0x03, 0xFF, 0x01, 0x00]);
    assert_eq!(decode_ndef(&out).unwrap().uri(), uri);
}

proptest! {
    #[test]
    fn encode_decode_roundtrip_prop(tail in "[a-z0-9]{1,500}") {
        let uri = format!("https://{}", tail);
        let out = encode_ndef_uri(&uri).unwrap();
        let decoded = decode_ndef(&out).unwrap();
        prop_assert_eq!(decoded.uri(), uri.as_str());
    }

    #[test]
    fn encoded_length_is_page_aligned_prop(tail in "[a-z0-9/._-]{1,500}") {
        let uri = format!("https://{}", tail);
        let out = encode_ndef_uri(&uri).unwrap();
        prop_assert_eq!(out.len() % 4, 0);
    }
}
