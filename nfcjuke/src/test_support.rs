//! Test support helpers intended for use by unit and integration tests.
//!
//! These helpers centralize common MockBus setup so tests across the crate
//! and tests/ directory can reuse the same scripting logic.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::constants::*;
use crate::resolver::{Feedback, FeedbackKind, MediaRef, MediaStore, Playback};
use crate::transport::mock::MockBus;
use crate::transport::traits::{NfcBus, TagReader};
use crate::transport::Reader;
use crate::types::{TagFamily, TagUid};
use crate::{Error, Result};

/// Bus wrapper that delegates into a shared [`MockBus`] so tests can keep
/// inspecting the command log after a `Reader` takes ownership of the bus.
pub struct SharedBus {
    inner: Arc<Mutex<MockBus>>,
}

impl SharedBus {
    /// Wrap `inner` for handing to a `Reader`.
    pub fn new(inner: Arc<Mutex<MockBus>>) -> Self {
        Self { inner }
    }
}

impl NfcBus for SharedBus {
    fn send(&mut self, data: &[u8]) -> Result<()> {
        self.inner.lock().unwrap().send(data)
    }

    fn receive(&mut self, timeout_ms: u64) -> Result<Vec<u8>> {
        self.inner.lock().unwrap().receive(timeout_ms)
    }

    fn reset(&mut self) -> Result<()> {
        self.inner.lock().unwrap().reset()
    }
}

/// Chip reply announcing firmware v1.0 and the given tag family code.
pub fn version_response(family_code: u8) -> Vec<u8> {
    vec![1, 0, family_code]
}

/// Chip reply for a poll with no tag in range.
pub fn no_tag_response() -> Vec<u8> {
    vec![RESP_ERROR, RESP_NO_TAG]
}

/// Chip reply for a poll that selected a tag with `uid`.
pub fn uid_response(uid: &[u8]) -> Vec<u8> {
    uid.to_vec()
}

/// Chip reply reporting a generic command failure.
pub fn error_response(code: u8) -> Vec<u8> {
    vec![RESP_ERROR, code]
}

/// Build a connected `Reader` over a shared mock bus pre-seeded with the
/// version probe reply and `script`. Returns the reader plus the shared
/// mock for inspecting sent frames and queueing further replies.
pub fn connected_reader(
    family_code: u8,
    script: Vec<Vec<u8>>,
) -> (Reader, Arc<Mutex<MockBus>>) {
    let mut mock = MockBus::new();
    mock.push_response(version_response(family_code));
    for resp in script {
        mock.push_response(resp);
    }
    let shared = Arc::new(Mutex::new(mock));
    let reader = Reader::connect(Box::new(SharedBus::new(shared.clone())))
        .expect("mock connect should succeed");
    (reader, shared)
}

/// Outcome of one scripted poll.
#[derive(Debug, Clone)]
pub enum PollStep {
    /// A tag with the given UID bytes is in range.
    Tag(Vec<u8>),
    /// No tag in range.
    Absent,
    /// The poll transaction fails.
    Fail,
}

/// A [`TagReader`] driven by an explicit script, for exercising the session
/// state machine without a bus underneath.
#[derive(Debug)]
pub struct ScriptedReader {
    /// Upcoming poll outcomes, consumed front-to-back. An exhausted script
    /// keeps answering with the last step.
    pub polls: VecDeque<PollStep>,
    /// Tag memory image starting at [`NDEF_START_PAGE`]; reads past the end
    /// are zero-filled.
    pub tag_memory: Vec<u8>,
    /// Number of upcoming `read_pages` calls that fail.
    pub read_failures: usize,
    /// Queued `write_pages` outcomes; an empty queue means success.
    pub write_outcomes: VecDeque<Error>,
    /// Every `write_pages` call, recorded as `(start_page, data)`.
    pub writes: Vec<(u8, Vec<u8>)>,
    /// Number of `reset` calls.
    pub resets: usize,
    family: TagFamily,
    last_step: PollStep,
}

impl ScriptedReader {
    /// Empty script on an NTAG-family reader.
    pub fn new() -> Self {
        Self {
            polls: VecDeque::new(),
            tag_memory: Vec::new(),
            read_failures: 0,
            write_outcomes: VecDeque::new(),
            writes: Vec::new(),
            resets: 0,
            family: TagFamily::Ntag215,
            last_step: PollStep::Absent,
        }
    }

    /// Queue `n` polls that find a tag with `uid`.
    pub fn present(&mut self, uid: &[u8], n: usize) -> &mut Self {
        for _ in 0..n {
            self.polls.push_back(PollStep::Tag(uid.to_vec()));
        }
        self
    }

    /// Queue `n` polls that find nothing.
    pub fn absent(&mut self, n: usize) -> &mut Self {
        for _ in 0..n {
            self.polls.push_back(PollStep::Absent);
        }
        self
    }

    /// Queue `n` failing polls.
    pub fn fail(&mut self, n: usize) -> &mut Self {
        for _ in 0..n {
            self.polls.push_back(PollStep::Fail);
        }
        self
    }

    /// Place an encoded NDEF TLV image in tag memory.
    pub fn with_ndef(&mut self, tlv: Vec<u8>) -> &mut Self {
        self.tag_memory = tlv;
        self
    }
}

impl Default for ScriptedReader {
    fn default() -> Self {
        Self::new()
    }
}

impl TagReader for ScriptedReader {
    fn poll(&mut self) -> Result<Option<TagUid>> {
        if let Some(step) = self.polls.pop_front() {
            self.last_step = step;
        }
        match &self.last_step {
            PollStep::Tag(uid) => Ok(Some(TagUid::try_from(&uid[..])?)),
            PollStep::Absent => Ok(None),
            PollStep::Fail => Err(Error::Timeout),
        }
    }

    fn read_pages(&mut self, start_page: u8, count: usize) -> Result<Vec<u8>> {
        if self.read_failures > 0 {
            self.read_failures -= 1;
            return Err(Error::Read { page: start_page });
        }
        let page_size = self.family.page_size();
        let offset = (start_page.saturating_sub(NDEF_START_PAGE)) as usize * page_size;
        let mut out = vec![0u8; count * page_size];
        for (i, byte) in out.iter_mut().enumerate() {
            if let Some(b) = self.tag_memory.get(offset + i) {
                *byte = *b;
            }
        }
        Ok(out)
    }

    fn write_pages(&mut self, start_page: u8, data: &[u8]) -> Result<()> {
        self.writes.push((start_page, data.to_vec()));
        match self.write_outcomes.pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn reset(&mut self) -> Result<()> {
        self.resets += 1;
        Ok(())
    }

    fn family(&self) -> TagFamily {
        self.family
    }
}

fn collaborator_down(name: &'static str) -> Error {
    Error::Collaborator {
        collaborator: name,
        reason: "unavailable".into(),
    }
}

#[derive(Default)]
struct StoreState {
    by_uid: HashMap<String, MediaRef>,
    by_url: HashMap<String, MediaRef>,
    created: Vec<String>,
    playbacks: Vec<(Option<String>, MediaRef)>,
    next_id: i64,
    fail: bool,
    resolve_delay: Duration,
}

/// In-memory [`MediaStore`] with inspectable state. Cloning shares the
/// state, so a clone can be boxed for the resolver while the test keeps a
/// handle for assertions.
#[derive(Clone, Default)]
pub struct FakeStore {
    state: Arc<Mutex<StoreState>>,
}

impl FakeStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed a tag→media association and return its reference.
    pub fn insert_uid(&self, uid: &TagUid) -> MediaRef {
        let mut s = self.state.lock().unwrap();
        s.next_id += 1;
        let media = MediaRef::new(s.next_id);
        s.by_uid.insert(uid.to_hex(), media.clone());
        media
    }

    /// Make every store call fail until cleared.
    pub fn set_fail(&self, fail: bool) {
        self.state.lock().unwrap().fail = fail;
    }

    /// Make URL resolution block for `delay`, like a slow database would.
    pub fn set_resolve_delay(&self, delay: Duration) {
        self.state.lock().unwrap().resolve_delay = delay;
    }

    /// URLs for which a record was created (not merely resolved).
    pub fn created(&self) -> Vec<String> {
        self.state.lock().unwrap().created.clone()
    }

    /// Resolve a URL without going through the trait.
    pub fn lookup_url(&self, url: &str) -> Option<MediaRef> {
        self.state.lock().unwrap().by_url.get(url).cloned()
    }

    /// Resolve a UID without going through the trait.
    pub fn lookup_uid(&self, uid: &TagUid) -> Option<MediaRef> {
        self.state.lock().unwrap().by_uid.get(&uid.to_hex()).cloned()
    }

    /// Recorded playback-history events.
    pub fn playbacks(&self) -> Vec<(Option<String>, MediaRef)> {
        self.state.lock().unwrap().playbacks.clone()
    }
}

impl MediaStore for FakeStore {
    fn resolve_media_by_uid(&mut self, uid: &TagUid) -> Result<Option<MediaRef>> {
        let s = self.state.lock().unwrap();
        if s.fail {
            return Err(collaborator_down("store"));
        }
        Ok(s.by_uid.get(&uid.to_hex()).cloned())
    }

    fn resolve_or_create_media_by_url(
        &mut self,
        url: &str,
        uid: Option<&TagUid>,
    ) -> Result<MediaRef> {
        // Sleep outside the lock so inspection calls stay responsive.
        let delay = self.state.lock().unwrap().resolve_delay;
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
        let mut s = self.state.lock().unwrap();
        if s.fail {
            return Err(collaborator_down("store"));
        }
        let media = match s.by_url.get(url) {
            Some(media) => media.clone(),
            None => {
                s.next_id += 1;
                let media = MediaRef::new(s.next_id);
                s.by_url.insert(url.to_string(), media.clone());
                s.created.push(url.to_string());
                media
            }
        };
        if let Some(uid) = uid {
            s.by_uid.insert(uid.to_hex(), media.clone());
        }
        Ok(media)
    }

    fn record_playback(&mut self, uid: Option<&TagUid>, media: &MediaRef) -> Result<()> {
        let mut s = self.state.lock().unwrap();
        if s.fail {
            return Err(collaborator_down("store"));
        }
        s.playbacks.push((uid.map(TagUid::to_hex), media.clone()));
        Ok(())
    }
}

/// One call observed by [`FakePlayback`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackCall {
    /// `stop()` was invoked.
    Stop,
    /// `play(media)` was invoked.
    Play(MediaRef),
}

/// Recording [`Playback`] collaborator. Clones share the call log.
#[derive(Clone, Default)]
pub struct FakePlayback {
    calls: Arc<Mutex<Vec<PlaybackCall>>>,
    fail: Arc<Mutex<bool>>,
}

impl FakePlayback {
    /// Collaborator that succeeds and records every call.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `play` fail until cleared.
    pub fn set_fail(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }

    /// Observed calls in order.
    pub fn calls(&self) -> Vec<PlaybackCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl Playback for FakePlayback {
    fn stop(&mut self) -> Result<()> {
        self.calls.lock().unwrap().push(PlaybackCall::Stop);
        Ok(())
    }

    fn play(&mut self, media: &MediaRef) -> Result<()> {
        if *self.fail.lock().unwrap() {
            return Err(collaborator_down("playback"));
        }
        self.calls.lock().unwrap().push(PlaybackCall::Play(media.clone()));
        Ok(())
    }
}

/// Recording [`Feedback`] collaborator. Clones share the sound log.
#[derive(Clone, Default)]
pub struct FakeFeedback {
    sounds: Arc<Mutex<Vec<FeedbackKind>>>,
}

impl FakeFeedback {
    /// Collaborator that records every feedback sound.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feedback sounds played, in order.
    pub fn sounds(&self) -> Vec<FeedbackKind> {
        self.sounds.lock().unwrap().clone()
    }
}

impl Feedback for FakeFeedback {
    fn play_feedback(&mut self, kind: FeedbackKind) -> Result<()> {
        self.sounds.lock().unwrap().push(kind);
        Ok(())
    }
}
