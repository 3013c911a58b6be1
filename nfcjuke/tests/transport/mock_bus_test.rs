// Sanity coverage for the scripted bus the other tests stand on.

use nfcjuke::test_support::{no_tag_response, version_response};
use nfcjuke::transport::{MockBus, NfcBus};
use nfcjuke::Error;

#[test]
fn responses_come_back_in_order() {
    let mut bus = MockBus::new();
    bus.push_response(version_response(0x01));
    bus.push_response(no_tag_response());

    bus.send(&[0x02]).unwrap();
    assert_eq!(bus.receive(50).unwrap(), vec![1, 0, 0x01]);
    assert_eq!(bus.receive(50).unwrap(), vec![0xFF, 0xFE]);
    assert!(matches!(bus.receive(50), Err(Error::Timeout)));
}

#[test]
fn idle_response_feeds_long_running_loops() {
    let mut bus = MockBus::new();
    bus.set_idle_response(no_tag_response());
    for _ in 0..100 {
        assert_eq!(bus.receive(50).unwrap(), vec![0xFF, 0xFE]);
    }
}

#[test]
fn injected_failures_run_out() {
    let mut bus = MockBus::new();
    bus.set_idle_response(no_tag_response());
    bus.set_receive_failures(2);

    assert!(bus.receive(50).is_err());
    assert!(bus.receive(50).is_err());
    assert!(bus.receive(50).is_ok());
}
