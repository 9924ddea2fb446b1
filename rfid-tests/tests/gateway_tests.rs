//! Integration Tests für das Verification Gateway
//!
//! Async-Code wird auf dem Host mit `embassy_futures::block_on` ausgeführt.

use embassy_futures::block_on;
use rfid_core::config::DEBOUNCE_WINDOW_MS;
use rfid_core::{FrameParser, Gateway, NetError, RelayStatus, Source, Uid, Verdict};
use rfid_tests::{MockAuthority, MockLink, MockNet, MockRelay};

type TestGateway = Gateway<MockNet, MockAuthority, MockRelay>;

fn gateway(net: MockNet, authority: MockAuthority) -> TestGateway {
    Gateway::new(net, authority, MockRelay::default(), DEBOUNCE_WINDOW_MS)
}

fn uid(s: &str) -> Uid {
    Uid::parse(s).unwrap()
}

// ============================================================================
// Tests: check() + Cache
// ============================================================================

#[test]
fn test_deny_is_cached_within_window() {
    let mut gw = gateway(MockNet::online(), MockAuthority::always(Ok(false)));
    let tag = uid("AABBCCDDEE");

    assert_eq!(block_on(gw.check(&tag, 0)), Verdict::Deny);
    assert_eq!(block_on(gw.check(&tag, DEBOUNCE_WINDOW_MS - 1)), Verdict::Deny);
    assert_eq!(gw.authority().call_count(), 1);
}

#[test]
fn test_window_expiry_issues_new_call() {
    let authority = MockAuthority::sequence(&[Ok(false), Ok(true)]);
    let mut gw = gateway(MockNet::online(), authority);
    let tag = uid("AABBCCDDEE");

    assert_eq!(block_on(gw.check(&tag, 0)), Verdict::Deny);
    assert_eq!(block_on(gw.check(&tag, DEBOUNCE_WINDOW_MS)), Verdict::Accept);
    assert_eq!(gw.authority().call_count(), 2);
}

#[test]
fn test_different_uid_evicts_entry() {
    let mut gw = gateway(MockNet::online(), MockAuthority::always(Ok(true)));
    let first = uid("AABBCCDDEE");
    let second = uid("0011223344");

    block_on(gw.check(&first, 0));
    block_on(gw.check(&second, 10));
    assert_eq!(gw.authority().call_count(), 2);
    assert_eq!(gw.cache().entry().map(|e| e.uid), Some(second));

    // Erste UID ist nicht mehr im Cache → erneute Remote-Prüfung
    block_on(gw.check(&first, 20));
    assert_eq!(gw.authority().call_count(), 3);
}

#[test]
fn test_always_accepted_uid_one_call_per_window() {
    let mut gw = gateway(MockNet::online(), MockAuthority::always(Ok(true)));
    let tag = uid("360046D804");

    // Scans alle 250 ms über drei volle Fenster
    let mut now = 0;
    while now < 3 * DEBOUNCE_WINDOW_MS {
        assert_eq!(block_on(gw.check(&tag, now)), Verdict::Accept);
        now += 250;
    }

    assert_eq!(gw.authority().call_count(), 3);
}

#[test]
fn test_cache_hit_does_not_extend_window() {
    let mut gw = gateway(MockNet::online(), MockAuthority::always(Ok(true)));
    let tag = uid("360046D804");

    block_on(gw.check(&tag, 0));
    block_on(gw.check(&tag, DEBOUNCE_WINDOW_MS - 1));
    assert_eq!(gw.cache().entry().map(|e| e.timestamp_ms), Some(0));
}

#[test]
fn test_evaluate_reports_source() {
    let mut gw = gateway(MockNet::online(), MockAuthority::always(Ok(true)));
    let tag = uid("360046D804");

    assert_eq!(block_on(gw.evaluate(&tag, 0)), (Verdict::Accept, Source::Remote));
    assert_eq!(block_on(gw.evaluate(&tag, 1)), (Verdict::Accept, Source::Cache));
}

// ============================================================================
// Tests: Fehlerbehandlung
// ============================================================================

#[test]
fn test_offline_denies_without_authority_call() {
    let mut gw = gateway(MockNet::offline(), MockAuthority::always(Ok(true)));
    let (verdict, source) = block_on(gw.evaluate(&uid("360046D804"), 0));

    assert_eq!(verdict, Verdict::Deny);
    assert_eq!(source, Source::Failed(NetError::NotConnected));
    assert_eq!(gw.authority().call_count(), 0);
    assert_eq!(gw.net().connect_attempts, 1);
}

#[test]
fn test_offline_retries_connect_on_next_scan() {
    let mut gw = gateway(MockNet::offline(), MockAuthority::always(Ok(true)));
    let tag = uid("360046D804");

    assert_eq!(block_on(gw.check(&tag, 0)), Verdict::Deny);
    // Innerhalb des Fensters: kein Cache-Treffer, neuer Verbindungsversuch
    let (verdict, source) = block_on(gw.evaluate(&tag, 500));
    assert_eq!(verdict, Verdict::Deny);
    assert_eq!(source, Source::Failed(NetError::NotConnected));
    assert_eq!(gw.net().connect_attempts, 2);
    assert!(gw.cache().entry().is_none());
}

#[test]
fn test_failure_keeps_previous_cache_entry() {
    let authority = MockAuthority::sequence(&[Ok(true), Err(NetError::Timeout), Ok(false)]);
    let mut gw = gateway(MockNet::online(), authority);
    let first = uid("360046D804");
    let second = uid("AABBCCDDEE");

    block_on(gw.check(&first, 0));
    assert_eq!(block_on(gw.check(&second, 10)), Verdict::Deny);
    assert_eq!(gw.cache().entry().map(|e| e.uid), Some(first));

    // Fehlgeschlagene Prüfung wird beim nächsten Scan wiederholt
    assert_eq!(block_on(gw.evaluate(&second, 20)), (Verdict::Deny, Source::Remote));
    assert_eq!(gw.authority().call_count(), 3);
    assert_eq!(gw.cache().entry().map(|e| e.uid), Some(second));
}

#[test]
fn test_connect_is_lazy_and_idempotent() {
    let mut gw = gateway(MockNet::online(), MockAuthority::always(Ok(false)));
    assert_eq!(gw.net().connect_attempts, 0);

    block_on(gw.check(&uid("AABBCCDDEE"), 0));
    block_on(gw.check(&uid("0011223344"), 1));
    assert_eq!(gw.net().connect_attempts, 1);
}

#[test]
fn test_protocol_errors_are_deny() {
    for error in [
        NetError::Status(500),
        NetError::MalformedReply,
        NetError::Timeout,
        NetError::ConnectFailed,
    ] {
        let mut gw = gateway(MockNet::online(), MockAuthority::always(Err(error)));
        assert_eq!(block_on(gw.check(&uid("AABBCCDDEE"), 0)), Verdict::Deny);
    }
}

// ============================================================================
// Tests: handle_frame() End-to-End
// ============================================================================

#[test]
fn test_accept_sends_one_and_triggers_relay() {
    let mut gw = gateway(MockNet::online(), MockAuthority::always(Ok(true)));
    let mut link = MockLink::default();

    let outcome = block_on(gw.handle_frame(&uid("360046D804"), 0, &mut link));

    assert_eq!(outcome.verdict, Verdict::Accept);
    assert_eq!(outcome.relay, RelayStatus::Triggered);
    assert_eq!(link.sent, vec![0x01]);
    assert_eq!(gw.relay().triggers, 1);
}

#[test]
fn test_unreachable_sends_zero_and_no_relay() {
    let mut gw = gateway(MockNet::offline(), MockAuthority::always(Ok(true)));
    let mut link = MockLink::default();

    let outcome = block_on(gw.handle_frame(&uid("360046D804"), 0, &mut link));

    assert_eq!(outcome.verdict, Verdict::Deny);
    assert_eq!(outcome.relay, RelayStatus::NotRequested);
    assert_eq!(link.sent, vec![0x00]);
    assert_eq!(gw.relay().triggers, 0);
}

#[test]
fn test_relay_failure_does_not_change_verdict() {
    let mut gw = Gateway::new(
        MockNet::online(),
        MockAuthority::always(Ok(true)),
        MockRelay {
            fail: true,
            ..MockRelay::default()
        },
        DEBOUNCE_WINDOW_MS,
    );
    let mut link = MockLink::default();

    let outcome = block_on(gw.handle_frame(&uid("360046D804"), 0, &mut link));

    assert_eq!(outcome.verdict, Verdict::Accept);
    assert_eq!(outcome.relay, RelayStatus::Failed(NetError::ConnectFailed));
    assert_eq!(link.sent, vec![0x01]);
}

#[test]
fn test_link_failure_is_reported_not_fatal() {
    let mut gw = gateway(MockNet::online(), MockAuthority::always(Ok(true)));
    let mut link = MockLink {
        fail: true,
        ..MockLink::default()
    };

    let outcome = block_on(gw.handle_frame(&uid("360046D804"), 0, &mut link));
    assert!(outcome.result_sent.is_err());
    assert_eq!(outcome.relay, RelayStatus::Triggered);
}

#[test]
fn test_byte_stream_to_result_bytes() {
    let mut gw = gateway(MockNet::online(), MockAuthority::always(Ok(true)));
    let mut parser = FrameParser::new();
    let mut link = MockLink::default();

    // gültig, ungültig, gültig (Cache-Treffer)
    let stream = b"\x02360046D804\x03\x0236Z046D804\x03\x02360046d804\x03";
    let uids: Vec<Uid> = parser.feed(stream).collect();
    for (i, tag) in uids.iter().enumerate() {
        block_on(gw.handle_frame(tag, i as u64 * 100, &mut link));
    }

    // Fehlerhafter Frame → kein Ergebnis-Byte
    assert_eq!(link.sent, vec![0x01, 0x01]);
    assert_eq!(gw.authority().call_count(), 1);
    assert_eq!(gw.relay().triggers, 2);
}
