// Debounce laws: one action per tag presentation, regardless of how many
// polls the tag sits through, and one action per distinct tag.

#[path = "../common/fixtures.rs"]
mod fixtures;

use std::time::{Duration, Instant};

use nfcjuke::session::{SessionConfig, SessionEvent, TagSession};
use nfcjuke::test_support::ScriptedReader;
use proptest::prelude::*;

fn run_ticks(session: &mut TagSession<ScriptedReader>, ticks: usize) -> Vec<SessionEvent> {
    let mut now = Instant::now();
    let mut events = Vec::new();
    for _ in 0..ticks {
        events.push(session.tick(now));
        now += Duration::from_millis(100);
    }
    events
}

fn detections(events: &[SessionEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, SessionEvent::Detected(_)))
        .count()
}

proptest! {
    #[test]
    fn one_action_per_presentation_prop(n in 1usize..50) {
        let mut reader = ScriptedReader::new();
        reader.present(&fixtures::sample_uid_bytes(), n);
        let mut session = TagSession::new(reader, SessionConfig::default());

        let events = run_ticks(&mut session, n);
        prop_assert_eq!(detections(&events), 1);
    }

    #[test]
    fn two_tags_two_actions_prop(gap in 2usize..10, hold in 1usize..10) {
        let mut reader = ScriptedReader::new();
        reader
            .present(&fixtures::sample_uid_bytes(), hold)
            .absent(gap)
            .present(&fixtures::other_uid_bytes(), hold);
        let mut session = TagSession::new(reader, SessionConfig::default());

        let events = run_ticks(&mut session, hold * 2 + gap);
        prop_assert_eq!(detections(&events), 2);
    }
}

#[test]
fn swapped_tag_without_gap_still_triggers_twice() {
    let mut reader = ScriptedReader::new();
    reader
        .present(&fixtures::sample_uid_bytes(), 3)
        .present(&fixtures::other_uid_bytes(), 3);
    let mut session = TagSession::new(reader, SessionConfig::default());

    let events = run_ticks(&mut session, 6);
    assert_eq!(detections(&events), 2);
}

#[test]
fn jitter_below_debounce_does_not_retrigger() {
    let mut reader = ScriptedReader::new();
    // Alternating hit/miss: a single miss never counts as removal.
    for _ in 0..10 {
        reader.present(&fixtures::sample_uid_bytes(), 1).absent(1);
    }
    let mut session = TagSession::new(reader, SessionConfig::default());

    let events = run_ticks(&mut session, 20);
    assert_eq!(detections(&events), 1);
}

#[test]
fn detected_uid_reaches_the_event() {
    let mut reader = ScriptedReader::new();
    reader.present(&fixtures::sample_uid_bytes(), 1);
    reader.with_ndef(fixtures::ndef_image(fixtures::MEDIA_URL));
    let mut session = TagSession::new(reader, SessionConfig::default());

    match session.tick(Instant::now()) {
        SessionEvent::Detected(d) => {
            assert_eq!(d.uid.unwrap(), fixtures::sample_uid());
            assert_eq!(d.ndef.unwrap().uri(), fixtures::MEDIA_URL);
        }
        other => panic!("expected detection, got {other:?}"),
    }
}
