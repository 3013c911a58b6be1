// fixtures.rs — commonly used UIDs, URLs, and tag memory images

use nfcjuke::ndef;
use nfcjuke::types::TagUid;

pub const MEDIA_URL: &str = "https://youtu.be/dQw4w9WgXcQ";
pub const OTHER_MEDIA_URL: &str = "https://www.youtube.com/watch?v=9bZkp7q19f0";

pub fn sample_uid_bytes() -> [u8; 4] {
    [0x04, 0xA1, 0xB2, 0xC3]
}

pub fn sample_uid() -> TagUid {
    TagUid::try_from(&sample_uid_bytes()[..]).unwrap()
}

pub fn other_uid_bytes() -> [u8; 7] {
    [0x04, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66]
}

pub fn other_uid() -> TagUid {
    TagUid::try_from(&other_uid_bytes()[..]).unwrap()
}

/// Page-padded tag memory image carrying `url` as an NDEF URI record.
pub fn ndef_image(url: &str) -> Vec<u8> {
    ndef::encode_ndef_uri(url).unwrap()
}
