// URI record decoding against hand-assembled tag memory images.

#[path = "../common/fixtures.rs"]
mod fixtures;

use nfcjuke::ndef::{decode_ndef, encode_ndef_uri_padded};

#[test]
fn minimal_short_form_tlv_decodes() {
    // NDEF Message TLV (11 bytes), MB|ME|SR record of type "U" with a
    // 7-byte payload: the "http://" prefix code and "abc.co", then the
    // terminator and padding.
    let raw = hex::decode("030bd1010755036162632e636ffe0000").unwrap();
    assert_eq!(decode_ndef(&raw).unwrap().uri(), "http://abc.co");
}

#[test]
fn message_preceded_by_other_tlvs_decodes() {
    // NULL TLV, then a lock-control TLV, then the NDEF message as real
    // NTAG dumps often lay it out.
    let mut raw = vec![0x00, 0x01, 0x03, 0xA0, 0x10, 0x44];
    raw.extend_from_slice(&fixtures::ndef_image(fixtures::MEDIA_URL));
    assert_eq!(decode_ndef(&raw).unwrap().uri(), fixtures::MEDIA_URL);
}

#[test]
fn blank_tag_decodes_to_none() {
    assert_eq!(decode_ndef(&[0x00; 64]), None);
    assert_eq!(decode_ndef(&[0xFF; 64]), None);
}

#[test]
fn terminator_before_message_hides_it() {
    let mut raw = vec![0xFE];
    raw.extend_from_slice(&fixtures::ndef_image(fixtures::MEDIA_URL));
    assert_eq!(decode_ndef(&raw), None);
}

#[test]
fn prefix_table_spot_checks() {
    for (uri, leading) in [
        ("http://www.example.com", 0x01u8),
        ("https://www.example.com", 0x02),
        ("http://example.com", 0x03),
        ("https://example.com", 0x04),
        ("tel:+4912345", 0x05),
        ("mailto:a@b.c", 0x06),
        ("urn:nfc:x", 0x23),
    ] {
        let out = encode_ndef_uri_padded(uri, 4).unwrap();
        // TLV header (2), record header (3), type (1), then the code.
        assert_eq!(out[6], leading, "prefix code for {uri}");
        assert_eq!(decode_ndef(&out).unwrap().uri(), uri);
    }
}

#[test]
fn sixteen_byte_block_padding() {
    let out = encode_ndef_uri_padded(fixtures::MEDIA_URL, 16).unwrap();
    assert_eq!(out.len() % 16, 0);
    assert_eq!(decode_ndef(&out).unwrap().uri(), fixtures::MEDIA_URL);
}
