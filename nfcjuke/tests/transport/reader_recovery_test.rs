// Wedged-bus recovery: repeated command failures trigger exactly one chip
// reset before the next poll, after which the reader works normally.

#[path = "../common/fixtures.rs"]
mod fixtures;

use nfcjuke::constants::{CMD_POLL, CMD_RESET, FAMILY_NTAG215};
use nfcjuke::test_support::{connected_reader, no_tag_response, uid_response};
use nfcjuke::transport::TagReader;
use nfcjuke::Error;

#[test]
fn three_read_failures_trigger_one_reset() {
    let (mut reader, bus) = connected_reader(FAMILY_NTAG215, vec![]);
    bus.lock().unwrap().set_receive_failures(3);

    for _ in 0..3 {
        assert!(matches!(reader.read_pages(4, 1), Err(Error::Read { .. })));
    }
    assert_eq!(bus.lock().unwrap().sent_count(CMD_RESET), 0);

    bus.lock()
        .unwrap()
        .push_response(uid_response(&fixtures::sample_uid_bytes()));
    let uid = reader.poll().unwrap().unwrap();

    let bus = bus.lock().unwrap();
    assert_eq!(uid, fixtures::sample_uid());
    assert_eq!(bus.sent_count(CMD_RESET), 1);
    assert_eq!(bus.bus_resets, 1);
}

#[test]
fn reset_counter_clears_after_recovery() {
    let (mut reader, bus) = connected_reader(
        FAMILY_NTAG215,
        vec![no_tag_response(), no_tag_response()],
    );
    bus.lock().unwrap().set_receive_failures(3);

    for _ in 0..3 {
        assert!(reader.read_pages(4, 1).is_err());
    }
    assert_eq!(reader.poll().unwrap(), None); // resets, then polls clean
    assert_eq!(reader.poll().unwrap(), None);

    // Only the one reset; healthy polls do not accumulate failures.
    assert_eq!(bus.lock().unwrap().sent_count(CMD_RESET), 1);
}

#[test]
fn failures_below_threshold_do_not_reset() {
    let (mut reader, bus) = connected_reader(
        FAMILY_NTAG215,
        vec![no_tag_response()],
    );
    bus.lock().unwrap().set_receive_failures(2);

    assert!(reader.read_pages(4, 1).is_err());
    assert!(reader.read_pages(4, 1).is_err());
    assert_eq!(reader.poll().unwrap(), None);

    let bus = bus.lock().unwrap();
    assert_eq!(bus.sent_count(CMD_RESET), 0);
    assert_eq!(bus.sent_count(CMD_POLL), 1);
}
