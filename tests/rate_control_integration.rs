//! Rate negotiation through the control channel

mod common;

use common::TestRig;
use pinwatch::WatchConfig;

#[test]
fn test_plain_decimal_request() {
    let rig = TestRig::new();
    rig.watch.handle_control(b"1000");
    assert_eq!(rig.watch.interval_ms(), 1000);
}

#[test]
fn test_plain_decimal_clamped_to_max() {
    let rig = TestRig::new();
    rig.watch.handle_control(b"90000000");
    assert_eq!(rig.watch.interval_ms(), 60_000);
}

#[test]
fn test_json_request_clamped_to_min() {
    let rig = TestRig::new();
    rig.watch.handle_control(b"{\"rate\":25}");
    assert_eq!(rig.watch.interval_ms(), 50);
}

#[test]
fn test_legacy_key_accepted() {
    let rig = TestRig::new();
    rig.watch.handle_control(b"{\"dbg_int\":750}");
    assert_eq!(rig.watch.interval_ms(), 750);
}

#[test]
fn test_zero_and_garbage_leave_rate_unchanged() {
    let rig = TestRig::new();
    let before = rig.watch.interval_ms();

    rig.watch.handle_control(b"");
    rig.watch.handle_control(b"0");
    rig.watch.handle_control(b"go faster");
    rig.watch.handle_control(b"{\"unrelated\":1}");
    rig.watch.handle_control(&[0x80, 0xff]);

    assert_eq!(rig.watch.interval_ms(), before);
}

#[test]
fn test_new_rate_appears_in_packet_headers() {
    let rig = TestRig::new();
    rig.watch.send_round();
    rig.watch.handle_control(b"125");
    rig.watch.send_round();

    let packets = rig.published_packets();
    assert_eq!(packets[0].rate, WatchConfig::default().interval_ms);
    assert_eq!(packets[1].rate, 125);
}
