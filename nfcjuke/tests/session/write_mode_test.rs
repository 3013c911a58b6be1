// Write-armed mode: priority over resolution, timeout on a simulated
// clock, and recovery back to normal reads.

#[path = "../common/fixtures.rs"]
mod fixtures;

use std::time::{Duration, Instant};

use nfcjuke::constants::NDEF_START_PAGE;
use nfcjuke::ndef::decode_ndef;
use nfcjuke::session::{SessionConfig, SessionEvent, TagSession};
use nfcjuke::test_support::ScriptedReader;
use nfcjuke::types::{WriteRequest, WriteStatus};

fn request(timeout_secs: u64) -> WriteRequest {
    WriteRequest::new(fixtures::MEDIA_URL, Duration::from_secs(timeout_secs))
}

#[test]
fn armed_write_preempts_resolution() {
    let mut reader = ScriptedReader::new();
    reader.present(&fixtures::sample_uid_bytes(), 1);
    reader.with_ndef(fixtures::ndef_image(fixtures::OTHER_MEDIA_URL));
    let mut session = TagSession::new(reader, SessionConfig::default());

    let now = Instant::now();
    session.arm_write(request(5), now);

    // The tag's existing NDEF content is never read while armed.
    match session.tick(now) {
        SessionEvent::WriteCompleted(uid) => assert_eq!(uid, fixtures::sample_uid()),
        other => panic!("expected write completion, got {other:?}"),
    }

    let (page, data) = &session.reader().writes[0];
    assert_eq!(*page, NDEF_START_PAGE);
    assert_eq!(decode_ndef(data).unwrap().uri(), fixtures::MEDIA_URL);
}

#[test]
fn timeout_on_simulated_clock_then_normal_read() {
    let mut reader = ScriptedReader::new();
    reader.absent(50).present(&fixtures::sample_uid_bytes(), 1);
    reader.with_ndef(fixtures::ndef_image(fixtures::MEDIA_URL));
    let mut session = TagSession::new(reader, SessionConfig::default());

    let t0 = Instant::now();
    session.arm_write(request(5), t0);
    assert_eq!(session.write_status(), WriteStatus::Armed);

    let mut now = t0;
    for _ in 0..50 {
        assert!(matches!(session.tick(now), SessionEvent::Idle));
        now += Duration::from_millis(100);
    }
    // 5s elapsed exactly: the next tick expires the request first.
    assert_eq!(now - t0, Duration::from_secs(5));
    match session.tick(now) {
        SessionEvent::Detected(d) => assert_eq!(d.ndef.unwrap().uri(), fixtures::MEDIA_URL),
        other => panic!("expected a normal read, got {other:?}"),
    }
    assert_eq!(session.write_status(), WriteStatus::TimedOut);
    assert!(session.reader().writes.is_empty());
}

#[test]
fn rearm_after_timeout_succeeds() {
    let mut reader = ScriptedReader::new();
    reader.absent(1).present(&fixtures::sample_uid_bytes(), 1);
    let mut session = TagSession::new(reader, SessionConfig::default());

    let t0 = Instant::now();
    session.arm_write(request(1), t0);
    session.tick(t0 + Duration::from_secs(2)); // expires, polls absent
    assert_eq!(session.write_status(), WriteStatus::TimedOut);

    let t1 = t0 + Duration::from_secs(3);
    session.arm_write(request(5), t1);
    match session.tick(t1) {
        SessionEvent::WriteCompleted(_) => {}
        other => panic!("expected write completion, got {other:?}"),
    }
    assert_eq!(session.write_status(), WriteStatus::Succeeded);
}

#[test]
fn write_target_stays_engaged_afterwards() {
    let mut reader = ScriptedReader::new();
    reader.present(&fixtures::sample_uid_bytes(), 5);
    let mut session = TagSession::new(reader, SessionConfig::default());

    let mut now = Instant::now();
    session.arm_write(request(5), now);

    let mut events = Vec::new();
    for _ in 0..5 {
        events.push(session.tick(now));
        now += Duration::from_millis(100);
    }

    // One write, and the tag sitting on the reader afterwards does not
    // additionally trigger resolution.
    assert!(matches!(events[0], SessionEvent::WriteCompleted(_)));
    assert!(events[1..]
        .iter()
        .all(|e| matches!(e, SessionEvent::Idle)));
}
