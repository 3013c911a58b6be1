// Session + resolver wired together: the full detection-to-playback path
// minus the worker thread, driven on a simulated clock.

#[path = "../common/fixtures.rs"]
mod fixtures;

use std::time::{Duration, Instant};

use nfcjuke::resolver::{FeedbackKind, Resolver};
use nfcjuke::session::{SessionConfig, TagSession};
use nfcjuke::test_support::{
    FakeFeedback, FakePlayback, FakeStore, PlaybackCall, ScriptedReader,
};

struct Rig {
    session: TagSession<ScriptedReader>,
    resolver: Resolver,
    store: FakeStore,
    playback: FakePlayback,
    feedback: FakeFeedback,
}

fn rig(reader: ScriptedReader) -> Rig {
    let store = FakeStore::new();
    let playback = FakePlayback::new();
    let feedback = FakeFeedback::new();
    Rig {
        session: TagSession::new(reader, SessionConfig::default()),
        resolver: Resolver::new(
            Box::new(store.clone()),
            Box::new(playback.clone()),
            Box::new(feedback.clone()),
        ),
        store,
        playback,
        feedback,
    }
}

impl Rig {
    fn run(&mut self, ticks: usize) {
        let mut now = Instant::now();
        for _ in 0..ticks {
            let event = self.session.tick(now);
            self.resolver.handle_event(&event);
            now += Duration::from_millis(100);
        }
    }

    fn plays(&self) -> usize {
        self.playback
            .calls()
            .iter()
            .filter(|c| matches!(c, PlaybackCall::Play(_)))
            .count()
    }
}

#[test]
fn ndef_tag_creates_and_plays() {
    let mut reader = ScriptedReader::new();
    reader.present(&fixtures::sample_uid_bytes(), 5);
    reader.with_ndef(fixtures::ndef_image(fixtures::MEDIA_URL));
    let mut rig = rig(reader);

    rig.run(5);

    assert_eq!(rig.store.created(), vec![fixtures::MEDIA_URL.to_string()]);
    assert_eq!(rig.plays(), 1);
    assert!(rig.feedback.sounds().is_empty());
    // The tag got linked, so a later bare-UID presentation resolves too.
    assert!(rig.store.lookup_uid(&fixtures::sample_uid()).is_some());
}

#[test]
fn url_resolution_runs_before_uid_lookup() {
    let mut reader = ScriptedReader::new();
    reader.present(&fixtures::sample_uid_bytes(), 1);
    reader.with_ndef(fixtures::ndef_image(fixtures::MEDIA_URL));
    let mut rig = rig(reader);

    // The UID is already associated with some other media.
    let old = rig.store.insert_uid(&fixtures::sample_uid());
    rig.run(1);

    let url_media = rig.store.lookup_url(fixtures::MEDIA_URL).unwrap();
    assert_ne!(url_media, old);
    assert_eq!(
        rig.playback.calls(),
        vec![PlaybackCall::Stop, PlaybackCall::Play(url_media)]
    );
}

#[test]
fn one_outcome_per_cycle_across_a_day_at_the_reader() {
    let mut reader = ScriptedReader::new();
    // Known tag, removed; unknown tag, removed; persistent poll errors.
    reader
        .present(&fixtures::sample_uid_bytes(), 4)
        .absent(3)
        .present(&fixtures::other_uid_bytes(), 4)
        .absent(3)
        .fail(3)
        .absent(3);
    let mut rig = rig(reader);
    rig.store.insert_uid(&fixtures::sample_uid());

    rig.run(20);

    // Exactly one playback (known tag) and two error sounds (unknown tag,
    // hardware error). Debounced polls and empty polls are silent.
    assert_eq!(rig.plays(), 1);
    assert_eq!(
        rig.feedback.sounds(),
        vec![FeedbackKind::Error, FeedbackKind::Error]
    );
}

#[test]
fn store_outage_is_retried_on_next_presentation() {
    let mut reader = ScriptedReader::new();
    reader
        .present(&fixtures::sample_uid_bytes(), 1)
        .absent(2)
        .present(&fixtures::sample_uid_bytes(), 1);
    let mut rig = rig(reader);
    rig.store.insert_uid(&fixtures::sample_uid());
    rig.store.set_fail(true);

    rig.run(3);
    assert_eq!(rig.plays(), 0);
    assert_eq!(rig.feedback.sounds(), vec![FeedbackKind::Error]);

    rig.store.set_fail(false);
    rig.run(1);
    assert_eq!(rig.plays(), 1);
}
