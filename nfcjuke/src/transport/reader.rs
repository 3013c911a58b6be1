// nfcjuke/src/transport/reader.rs

use log::{debug, info, warn};

use crate::constants::*;
use crate::transport::traits::{NfcBus, TagReader};
use crate::types::{TagFamily, TagUid};
use crate::{Error, Result};

/// Command-level driver for the reader chip.
///
/// Owns the bus exclusively. The chip has no multi-page burst command, so
/// multi-page operations loop one command per page in software and abort
/// at the first failed page, reporting which page failed.
pub struct Reader {
    bus: Box<dyn NfcBus>,
    family: TagFamily,
    firmware: (u8, u8),
    consecutive_failures: u8,
    authed_sector: Option<u8>,
}

impl Reader {
    /// Open the reader over `bus`: probe the firmware version and select
    /// the tag family from the chip's capability code.
    ///
    /// Fails with [`Error::HardwareUnavailable`] if the chip does not
    /// answer the probe — fatal to the NFC subsystem.
    pub fn connect(mut bus: Box<dyn NfcBus>) -> Result<Self> {
        bus.send(&[CMD_VERSION])
            .map_err(|e| Error::HardwareUnavailable(e.to_string()))?;
        let resp = bus
            .receive(CONNECT_TIMEOUT_MS)
            .map_err(|e| Error::HardwareUnavailable(e.to_string()))?;
        if resp.len() < 2 {
            return Err(Error::HardwareUnavailable(format!(
                "short version response ({} bytes)",
                resp.len()
            )));
        }

        let firmware = (resp[0], resp[1]);
        let family = TagFamily::from_capability(resp.get(2).copied().unwrap_or(FAMILY_NTAG215));
        info!(
            "reader connected: firmware v{}.{}, family {:?}",
            firmware.0, firmware.1, family
        );

        Ok(Self {
            bus,
            family,
            firmware,
            consecutive_failures: 0,
            authed_sector: None,
        })
    }

    /// Firmware version reported by the chip at connect time.
    pub fn firmware_version(&self) -> String {
        format!("v{}.{}", self.firmware.0, self.firmware.1)
    }

    fn transact(&mut self, cmd: u8, params: &[u8], timeout_ms: u64) -> Result<Vec<u8>> {
        let mut frame = Vec::with_capacity(1 + params.len());
        frame.push(cmd);
        frame.extend_from_slice(params);
        self.bus.send(&frame)?;
        let resp = self.bus.receive(timeout_ms)?;
        debug!(
            "cmd {:02x} -> {}",
            cmd,
            crate::utils::bytes_to_hex_spaced(&resp)
        );
        Ok(resp)
    }

    fn note_failure(&mut self) {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
    }

    fn note_success(&mut self) {
        self.consecutive_failures = 0;
    }

    /// Recover a wedged chip before the next poll if enough commands have
    /// failed back to back.
    fn reset_if_wedged(&mut self) -> Result<()> {
        if self.consecutive_failures >= RESET_FAILURE_THRESHOLD {
            warn!(
                "{} consecutive transport failures, resetting reader",
                self.consecutive_failures
            );
            self.reset()?;
        }
        Ok(())
    }

    /// MIFARE Classic requires authenticating a sector (4 blocks) with the
    /// factory default key before any block in it can be accessed.
    fn ensure_authenticated(&mut self, page: u8) -> Result<()> {
        if self.family != TagFamily::MifareClassic {
            return Ok(());
        }
        let sector = page / 4;
        if self.authed_sector == Some(sector) {
            return Ok(());
        }

        let mut params = vec![page, 0x00]; // key type A
        params.extend_from_slice(&MIFARE_DEFAULT_KEY);
        let resp = self.transact(CMD_AUTHENTICATE, &params, PAGE_IO_TIMEOUT_MS)?;
        if resp.first() != Some(&RESP_SUCCESS) {
            return Err(Error::UnexpectedResponse {
                expected: RESP_SUCCESS,
                actual: resp.first().copied().unwrap_or(0),
            });
        }
        self.authed_sector = Some(sector);
        Ok(())
    }

    fn read_page_once(&mut self, page: u8) -> Result<Vec<u8>> {
        self.ensure_authenticated(page)?;
        let resp = self.transact(CMD_READ_PAGE, &[page], PAGE_IO_TIMEOUT_MS)?;
        if resp.first() == Some(&RESP_ERROR) {
            return Err(Error::UnexpectedResponse {
                expected: RESP_SUCCESS,
                actual: resp.get(1).copied().unwrap_or(0),
            });
        }
        if resp.len() != self.family.page_size() {
            return Err(Error::InvalidLength {
                expected: self.family.page_size(),
                actual: resp.len(),
            });
        }
        Ok(resp)
    }

    fn write_page_once(&mut self, page: u8, data: &[u8]) -> Result<()> {
        self.ensure_authenticated(page)
            .map_err(|_| Error::Write { page })?;
        let mut params = Vec::with_capacity(1 + data.len());
        params.push(page);
        params.extend_from_slice(data);
        let resp = self.transact(CMD_WRITE_PAGE, &params, PAGE_IO_TIMEOUT_MS)?;
        match resp.first() {
            Some(&RESP_SUCCESS) => Ok(()),
            Some(&RESP_ERROR) if resp.get(1) == Some(&RESP_LOCKED) => {
                Err(Error::NotWritable { page })
            }
            _ => Err(Error::Write { page }),
        }
    }
}

impl TagReader for Reader {
    fn poll(&mut self) -> Result<Option<TagUid>> {
        self.reset_if_wedged()?;
        // A new select invalidates any MIFARE sector authentication.
        self.authed_sector = None;

        match self.transact(CMD_POLL, &[], POLL_TIMEOUT_MS) {
            Ok(resp) if resp.first() == Some(&RESP_ERROR) => {
                if resp.get(1) == Some(&RESP_NO_TAG) {
                    self.note_success();
                    Ok(None)
                } else {
                    self.note_failure();
                    Err(Error::UnexpectedResponse {
                        expected: RESP_SUCCESS,
                        actual: resp.get(1).copied().unwrap_or(0),
                    })
                }
            }
            Ok(resp) => match TagUid::try_from(&resp[..]) {
                Ok(uid) => {
                    self.note_success();
                    Ok(Some(uid))
                }
                Err(e) => {
                    self.note_failure();
                    Err(e)
                }
            },
            Err(e) => {
                debug!("poll transaction failed: {}", e);
                self.note_failure();
                Err(e)
            }
        }
    }

    fn read_pages(&mut self, start_page: u8, count: usize) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(count * self.family.page_size());
        for i in 0..count {
            let page = start_page
                .checked_add(i as u8)
                .ok_or(Error::Read { page: u8::MAX })?;
            match self.read_page_once(page) {
                Ok(bytes) => out.extend_from_slice(&bytes),
                Err(e) => {
                    debug!("read of page {} failed: {}", page, e);
                    self.note_failure();
                    return Err(Error::Read { page });
                }
            }
        }
        self.note_success();
        Ok(out)
    }

    fn write_pages(&mut self, start_page: u8, data: &[u8]) -> Result<()> {
        let page_size = self.family.page_size();
        if data.is_empty() || data.len() % page_size != 0 {
            return Err(Error::InvalidLength {
                expected: data.len().div_ceil(page_size).max(1) * page_size,
                actual: data.len(),
            });
        }

        for (i, chunk) in data.chunks(page_size).enumerate() {
            let page = start_page
                .checked_add(i as u8)
                .ok_or(Error::Write { page: u8::MAX })?;
            match self.write_page_once(page, chunk) {
                Ok(()) => {}
                Err(e @ Error::NotWritable { .. }) => {
                    // Definitive chip answer, not a transport fault.
                    return Err(e);
                }
                Err(e) => {
                    debug!("write of page {} failed: {}", page, e);
                    self.note_failure();
                    return Err(Error::Write { page });
                }
            }
        }
        self.note_success();
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        // The chip does not answer the reset command; give it and the bus
        // a clean slate.
        self.bus.send(&[CMD_RESET])?;
        self.bus.reset()?;
        self.consecutive_failures = 0;
        self.authed_sector = None;
        info!("reader chip reset");
        Ok(())
    }

    fn family(&self) -> TagFamily {
        self.family
    }
}
