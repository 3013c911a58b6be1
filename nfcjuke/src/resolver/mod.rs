// nfcjuke/src/resolver/mod.rs

//! Tag-to-media resolution.
//!
//! Consumes [`SessionEvent`]s and turns each detection into a playback
//! action or a recorded unknown-tag event. The media store, playback, and
//! feedback subsystems are collaborators behind narrow traits; their
//! failures are contained here and never stop the poll loop.
//!
//! Every handled detection produces exactly one outcome: playback started,
//! or an error feedback signal. Idle cycles are silent.

pub mod source;

pub use source::is_media_source_url;

use log::{debug, info, warn};

use crate::session::SessionEvent;
use crate::types::{TagDetection, TagUid};
use crate::Result;

/// Opaque handle to a media record owned by the store collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaRef(i64);

impl MediaRef {
    /// Wrap a store-assigned record id.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// The store-assigned record id.
    pub fn id(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for MediaRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "media#{}", self.0)
    }
}

/// Audible feedback category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    /// A write completed.
    Success,
    /// Unknown tag, hardware error, or write failure.
    Error,
}

/// Tag-to-media association store (backed by the external database).
///
/// Calls are synchronous and may fail with [`Error::Collaborator`]; the
/// cycle is then treated as unresolved and retried naturally on the next
/// detection.
///
/// [`Error::Collaborator`]: crate::Error::Collaborator
pub trait MediaStore {
    /// Look up an existing tag association by UID.
    fn resolve_media_by_uid(&mut self, uid: &TagUid) -> Result<Option<MediaRef>>;

    /// Resolve `url` to a media record, creating one if none exists.
    /// Creation is idempotent per URL. When `uid` is given the tag is
    /// linked to the record.
    fn resolve_or_create_media_by_url(
        &mut self,
        url: &str,
        uid: Option<&TagUid>,
    ) -> Result<MediaRef>;

    /// Append a playback-history event.
    fn record_playback(&mut self, uid: Option<&TagUid>, media: &MediaRef) -> Result<()>;
}

/// Playback control. Fire-and-forget: failures are logged, signalled via
/// feedback, and never crash the loop.
pub trait Playback {
    /// Stop whatever is currently playing.
    fn stop(&mut self) -> Result<()>;

    /// Start playing `media`.
    fn play(&mut self, media: &MediaRef) -> Result<()>;
}

/// Best-effort audible feedback.
pub trait Feedback {
    /// Play the feedback sound for `kind`.
    fn play_feedback(&mut self, kind: FeedbackKind) -> Result<()>;
}

/// Drives the per-detection resolution algorithm against the collaborators.
pub struct Resolver {
    store: Box<dyn MediaStore + Send>,
    playback: Box<dyn Playback + Send>,
    feedback: Box<dyn Feedback + Send>,
}

impl Resolver {
    /// Wire the collaborators together.
    pub fn new(
        store: Box<dyn MediaStore + Send>,
        playback: Box<dyn Playback + Send>,
        feedback: Box<dyn Feedback + Send>,
    ) -> Self {
        Self {
            store,
            playback,
            feedback,
        }
    }

    /// Consume one session event. Never returns an error: all collaborator
    /// failures end the cycle with error feedback.
    pub fn handle_event(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::Idle => {}
            SessionEvent::Detected(detection) => self.handle_detection(detection),
            SessionEvent::WriteCompleted(uid) => {
                info!("ndef write to tag {} confirmed", uid);
                self.signal(FeedbackKind::Success);
            }
            SessionEvent::WriteFailed(e) => {
                warn!("ndef write failed: {}", e);
                self.signal(FeedbackKind::Error);
            }
        }
    }

    fn handle_detection(&mut self, detection: &TagDetection) {
        if let Some(kind) = detection.raw_error {
            warn!("hardware error during detection: {:?}", kind);
            self.signal(FeedbackKind::Error);
            return;
        }

        match self.resolve(detection) {
            Ok(Some(media)) => self.start_playback(detection.uid.as_ref(), media),
            Ok(None) => {
                match &detection.uid {
                    Some(uid) => info!("unknown tag {}", uid),
                    None => debug!("empty detection, nothing to resolve"),
                }
                self.signal(FeedbackKind::Error);
            }
            Err(e) => {
                warn!("resolution failed, cycle unresolved: {}", e);
                self.signal(FeedbackKind::Error);
            }
        }
    }

    /// URL resolution always runs before UID lookup, so a tag carrying both
    /// a known UID and a newer NDEF URL defers to the URL.
    fn resolve(&mut self, detection: &TagDetection) -> Result<Option<MediaRef>> {
        if let Some(record) = &detection.ndef {
            let uri = record.uri();
            if is_media_source_url(uri) {
                let media = self
                    .store
                    .resolve_or_create_media_by_url(uri, detection.uid.as_ref())?;
                return Ok(Some(media));
            }
            debug!("tag uri {:?} is not a recognized media source", uri);
        }
        match &detection.uid {
            Some(uid) => self.store.resolve_media_by_uid(uid),
            None => Ok(None),
        }
    }

    fn start_playback(&mut self, uid: Option<&TagUid>, media: MediaRef) {
        if let Err(e) = self.playback.stop() {
            warn!("stopping current playback failed: {}", e);
        }
        if let Err(e) = self.playback.play(&media) {
            warn!("starting playback of {} failed: {}", media, e);
            self.signal(FeedbackKind::Error);
            return;
        }
        // History is bookkeeping; a store hiccup here must not undo an
        // already-started playback.
        if let Err(e) = self.store.record_playback(uid, &media) {
            warn!("recording playback history failed: {}", e);
        }
        info!("playback started for {}", media);
    }

    fn signal(&mut self, kind: FeedbackKind) {
        if let Err(e) = self.feedback.play_feedback(kind) {
            debug!("feedback sound failed: {}", e);
        }
    }
}
