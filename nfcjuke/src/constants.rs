// nfcjuke/src/constants.rs
//! Reader chip protocol and Type 2 Tag constants used across the crate.

/// Reader chip command: hard reset.
pub const CMD_RESET: u8 = 0x01;
/// Reader chip command: firmware version / capability probe.
pub const CMD_VERSION: u8 = 0x02;
/// Reader chip command: anti-collision/select poll.
pub const CMD_POLL: u8 = 0x03;
/// Reader chip command: read one page/block.
pub const CMD_READ_PAGE: u8 = 0x04;
/// Reader chip command: write one page/block.
pub const CMD_WRITE_PAGE: u8 = 0x05;
/// Reader chip command: MIFARE Classic sector authentication.
pub const CMD_AUTHENTICATE: u8 = 0x06;

/// Chip response code: command succeeded.
pub const RESP_SUCCESS: u8 = 0x00;
/// Chip response code: command failed (followed by a detail code).
pub const RESP_ERROR: u8 = 0xFF;
/// Chip error detail: no tag in range.
pub const RESP_NO_TAG: u8 = 0xFE;
/// Chip error detail: page/sector is write-locked.
pub const RESP_LOCKED: u8 = 0xFD;

/// Capability code reported by `CMD_VERSION` for NTAG215-class tags.
pub const FAMILY_NTAG215: u8 = 0x01;
/// Capability code reported by `CMD_VERSION` for MIFARE Classic tags.
pub const FAMILY_MIFARE_CLASSIC: u8 = 0x02;

/// Type 2 Tag TLV tag byte: NULL (single-byte filler, no length).
pub const TLV_NULL: u8 = 0x00;
/// Type 2 Tag TLV tag byte: NDEF Message.
pub const TLV_NDEF_MESSAGE: u8 = 0x03;
/// Type 2 Tag TLV tag byte: Terminator.
pub const TLV_TERMINATOR: u8 = 0xFE;
/// TLV length byte escape introducing the 16-bit long form.
pub const TLV_LONG_FORM: u8 = 0xFF;

/// First user-memory page where NDEF data starts on Type 2 tags.
pub const NDEF_START_PAGE: u8 = 4;

/// Poll timeout in milliseconds. The poll loop runs at a ~100ms cadence so
/// a single bus transaction must stay well under one tick.
pub const POLL_TIMEOUT_MS: u64 = 25;
/// Per-page read/write timeout in milliseconds.
pub const PAGE_IO_TIMEOUT_MS: u64 = 50;
/// Connect-time version probe timeout in milliseconds.
pub const CONNECT_TIMEOUT_MS: u64 = 250;

/// Consecutive transport failures that trigger an automatic chip reset
/// before the next poll.
pub const RESET_FAILURE_THRESHOLD: u8 = 3;

/// Factory default MIFARE Classic key A.
pub const MIFARE_DEFAULT_KEY: [u8; 6] = [0xFF; 6];
