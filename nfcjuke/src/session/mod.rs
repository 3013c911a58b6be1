// nfcjuke/src/session/mod.rs

//! Tag session state machine.
//!
//! Turns the raw poll stream into a debounced, human-meaningful lifecycle
//! for a single tag interaction: idle → tag present → cooldown → idle, with
//! a parallel write-armed mode that takes priority over read-and-resolve.
//! One `tick` performs at most one bus transaction sequence and never
//! blocks beyond the transport timeouts.

use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::constants::NDEF_START_PAGE;
use crate::ndef;
use crate::transport::TagReader;
use crate::types::{
    HardwareErrorKind, NdefRecord, TagDetection, TagUid, WriteRequest, WriteStatus,
};
use crate::{Error, Result};

/// Tuning knobs for the state machine.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Consecutive no-tag polls before a tag counts as removed. Absorbs
    /// reader jitter that alternates between a UID and nothing.
    pub removal_debounce: u8,
    /// Retries for the NDEF read after a tag is first seen.
    pub read_retries: u8,
    /// Retries for a transient write failure within one presentation.
    pub write_retries: u8,
    /// Consecutive failing polls tolerated before one error detection is
    /// reported.
    pub poll_error_tolerance: u8,
    /// How long a tag sitting on the reader is ignored before the same UID
    /// may trigger again.
    pub cooldown: Duration,
    /// Upper bound on pages read while sizing an NDEF message.
    pub max_ndef_pages: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            removal_debounce: 2,
            read_retries: 2,
            write_retries: 2,
            poll_error_tolerance: 3,
            cooldown: Duration::from_secs(60),
            max_ndef_pages: 64,
        }
    }
}

/// Externally visible lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No tag engaged.
    Idle,
    /// A tag has been processed and sits on the reader; repeated
    /// detections of the same UID are ignored.
    Cooldown,
}

/// What one tick produced. Typed events instead of callbacks: the
/// resolution loop consumes these from its owning thread.
#[derive(Debug)]
pub enum SessionEvent {
    /// Nothing actionable happened (no tag, debouncing, cooldown).
    Idle,
    /// A newly presented tag was read (or found unreadable).
    Detected(TagDetection),
    /// The armed NDEF write completed on the given tag.
    WriteCompleted(TagUid),
    /// The armed NDEF write failed terminally.
    WriteFailed(Error),
}

struct Engaged {
    uid: TagUid,
    since: Instant,
}

struct ArmedWrite {
    request: WriteRequest,
    armed_at: Instant,
}

/// Debouncing state machine over a [`TagReader`].
pub struct TagSession<R: TagReader> {
    reader: R,
    config: SessionConfig,
    engaged: Option<Engaged>,
    misses: u8,
    poll_errors: u8,
    write: Option<ArmedWrite>,
    write_status: WriteStatus,
}

impl<R: TagReader> TagSession<R> {
    /// Wrap `reader` with the given tuning.
    pub fn new(reader: R, config: SessionConfig) -> Self {
        Self {
            reader,
            config,
            engaged: None,
            misses: 0,
            poll_errors: 0,
            write: None,
            write_status: WriteStatus::Idle,
        }
    }

    /// Borrow the underlying reader.
    pub fn reader(&self) -> &R {
        &self.reader
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        if self.engaged.is_some() {
            SessionState::Cooldown
        } else {
            SessionState::Idle
        }
    }

    /// Arm a one-shot NDEF write for the next presented tag. A new request
    /// cancels any previous pending one.
    pub fn arm_write(&mut self, request: WriteRequest, now: Instant) {
        if self.write.is_some() {
            info!("replacing pending write request");
        }
        info!(
            "write armed for {:?} ({}s timeout)",
            request.target_uri,
            request.timeout.as_secs()
        );
        self.write = Some(ArmedWrite {
            request,
            armed_at: now,
        });
        self.write_status = WriteStatus::Armed;
    }

    /// Status of the most recent write request.
    pub fn write_status(&self) -> WriteStatus {
        self.write_status
    }

    /// Drive one poll cycle. `now` is injected so tests can simulate the
    /// clock.
    pub fn tick(&mut self, now: Instant) -> SessionEvent {
        self.expire_write(now);

        match self.reader.poll() {
            Ok(Some(uid)) => {
                self.poll_errors = 0;
                self.misses = 0;

                if let Some(engaged) = &self.engaged {
                    let same = engaged.uid == uid;
                    let cooled = now.duration_since(engaged.since) >= self.config.cooldown;
                    if same && !cooled {
                        return SessionEvent::Idle;
                    }
                }
                self.present(uid, now)
            }
            Ok(None) => {
                self.poll_errors = 0;
                if self.engaged.is_some() {
                    self.misses = self.misses.saturating_add(1);
                    if self.misses >= self.config.removal_debounce {
                        debug!("tag removed");
                        self.engaged = None;
                        self.misses = 0;
                    }
                }
                SessionEvent::Idle
            }
            Err(e) => {
                self.poll_errors = self.poll_errors.saturating_add(1);
                if self.poll_errors >= self.config.poll_error_tolerance {
                    warn!("persistent poll failures: {}", e);
                    self.poll_errors = 0;
                    SessionEvent::Detected(TagDetection::error(HardwareErrorKind::from(&e)))
                } else {
                    debug!("transient poll failure: {}", e);
                    SessionEvent::Idle
                }
            }
        }
    }

    /// When a write request's timeout elapses without a tag, write mode is
    /// cancelled and the caller learns about it via the status endpoint.
    fn expire_write(&mut self, now: Instant) {
        if let Some(armed) = &self.write {
            if now.duration_since(armed.armed_at) >= armed.request.timeout {
                info!("write request timed out");
                self.write = None;
                self.write_status = WriteStatus::TimedOut;
            }
        }
    }

    /// Handle a fresh presentation: a write if one is armed, otherwise a
    /// read. Either way the tag enters cooldown afterwards.
    fn present(&mut self, uid: TagUid, now: Instant) -> SessionEvent {
        info!("tag presented: {}", uid);
        self.engaged = Some(Engaged {
            uid: uid.clone(),
            since: now,
        });

        if let Some(armed) = self.write.take() {
            return self.perform_write(uid, armed.request);
        }

        match self.read_ndef() {
            Ok(ndef) => SessionEvent::Detected(TagDetection::tag(uid, ndef)),
            Err(e) => {
                warn!("tag {} present but unreadable: {}", uid, e);
                SessionEvent::Detected(TagDetection::unreadable(uid, HardwareErrorKind::from(&e)))
            }
        }
    }

    fn perform_write(&mut self, uid: TagUid, request: WriteRequest) -> SessionEvent {
        let page_size = self.reader.family().page_size();
        let data = match ndef::encode_ndef_uri_padded(&request.target_uri, page_size) {
            Ok(data) => data,
            Err(e) => {
                self.write_status = WriteStatus::Failed;
                return SessionEvent::WriteFailed(e);
            }
        };

        let mut attempt = 0u8;
        loop {
            match self.reader.write_pages(NDEF_START_PAGE, &data) {
                Ok(()) => {
                    info!("wrote {:?} to tag {}", request.target_uri, uid);
                    self.write_status = WriteStatus::Succeeded;
                    return SessionEvent::WriteCompleted(uid);
                }
                Err(e @ Error::NotWritable { .. }) => {
                    warn!("tag {} rejected write: {}", uid, e);
                    self.write_status = WriteStatus::Failed;
                    return SessionEvent::WriteFailed(e);
                }
                Err(e) => {
                    attempt += 1;
                    if attempt > self.config.write_retries {
                        warn!("write to tag {} failed: {}", uid, e);
                        self.write_status = WriteStatus::Failed;
                        return SessionEvent::WriteFailed(e);
                    }
                    debug!("write attempt {} failed, retrying: {}", attempt, e);
                }
            }
        }
    }

    /// Read and decode the tag's NDEF area, retrying transient hardware
    /// errors. "Tag present but unreadable" propagates as an error so the
    /// caller can distinguish it from "nothing there".
    fn read_ndef(&mut self) -> Result<Option<NdefRecord>> {
        let mut attempt = 0u8;
        loop {
            match self.read_ndef_once() {
                Ok(record) => return Ok(record),
                Err(e) => {
                    attempt += 1;
                    if attempt > self.config.read_retries {
                        return Err(e);
                    }
                    debug!("ndef read attempt {} failed, retrying: {}", attempt, e);
                }
            }
        }
    }

    fn read_ndef_once(&mut self) -> Result<Option<NdefRecord>> {
        let page_size = self.reader.family().page_size();
        // First chunk: 16 bytes, enough to size the TLV.
        let first_pages = (16 / page_size).max(1);
        let mut data = self.reader.read_pages(NDEF_START_PAGE, first_pages)?;

        if let Some(extent) = ndef::message_extent(&data) {
            let total_pages = extent
                .div_ceil(page_size)
                .min(self.config.max_ndef_pages)
                .max(first_pages);
            if total_pages > first_pages {
                let more = self
                    .reader
                    .read_pages(NDEF_START_PAGE + first_pages as u8, total_pages - first_pages)?;
                data.extend_from_slice(&more);
            }
        }

        Ok(ndef::decode_ndef(&data))
    }
}
