#![cfg(all(feature = "metrics", not(loom)))]
//! Tests for `meshlink` metrics helpers.
//!
//! These tests verify that counters update as expected using
//! `metrics_util::debugging::DebuggingRecorder`.

use meshlink::{
    CanTransport,
    DropReason,
    NodeAddress,
    Transport,
    TransportConfig,
    VirtualBus,
    metrics::{self as link_metrics, Direction},
};
use metrics_util::debugging::{DebugValue, DebuggingRecorder, Snapshotter};
use rstest::rstest;

/// Creates a debugging recorder and snapshotter for metrics testing.
fn debugging_recorder_setup() -> (Snapshotter, DebuggingRecorder) {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    (snapshotter, recorder)
}

fn counter(snapshotter: &Snapshotter, name: &str, label: Option<(&str, &str)>) -> u64 {
    snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .filter(|(key, _, _, _)| {
            key.key().name() == name
                && label.is_none_or(|(k, v)| {
                    key.key().labels().any(|l| l.key() == k && l.value() == v)
                })
        })
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(count) => count,
            _ => 0,
        })
        .sum()
}

#[rstest]
#[case(Direction::Inbound, "inbound")]
#[case(Direction::Outbound, "outbound")]
fn frame_metric_is_labelled_by_direction(#[case] direction: Direction, #[case] label: &str) {
    let (snapshotter, recorder) = debugging_recorder_setup();
    metrics::with_local_recorder(&recorder, || link_metrics::inc_frames(direction));
    assert_eq!(
        counter(&snapshotter, link_metrics::FRAMES_TOTAL, Some(("direction", label))),
        1
    );
}

#[test]
fn drop_metric_is_labelled_by_reason() {
    let (snapshotter, recorder) = debugging_recorder_setup();
    metrics::with_local_recorder(&recorder, || {
        link_metrics::inc_drops(DropReason::Unmatched);
        link_metrics::inc_drops(DropReason::Unmatched);
        link_metrics::inc_drops(DropReason::Overflow);
    });
    assert_eq!(
        counter(&snapshotter, link_metrics::DROPS_TOTAL, Some(("reason", "unmatched"))),
        2
    );
    assert_eq!(
        counter(&snapshotter, link_metrics::DROPS_TOTAL, Some(("reason", "overflow"))),
        1
    );
}

#[test]
fn transfer_records_frames_and_messages() {
    let (snapshotter, recorder) = debugging_recorder_setup();
    metrics::with_local_recorder(&recorder, || {
        let bus = VirtualBus::new();
        let mut sender =
            CanTransport::new(bus.attach(), TransportConfig::new(NodeAddress::new(1)))
                .expect("valid");
        let mut receiver =
            CanTransport::new(bus.attach(), TransportConfig::new(NodeAddress::new(2)))
                .expect("valid");
        sender.init().expect("virtual bus starts");
        receiver.init().expect("virtual bus starts");
        sender
            .send(NodeAddress::new(2), &[1; 20], false)
            .expect("send succeeds");
        while receiver.bus().queued() > 0 {
            receiver.data_available();
        }
        let mut out = [0; 100];
        assert_eq!(receiver.receive(&mut out), Some(20));
    });

    assert_eq!(
        counter(&snapshotter, link_metrics::FRAMES_TOTAL, Some(("direction", "outbound"))),
        3
    );
    assert_eq!(
        counter(&snapshotter, link_metrics::FRAMES_TOTAL, Some(("direction", "inbound"))),
        3
    );
    assert_eq!(counter(&snapshotter, link_metrics::MESSAGES_TOTAL, None), 2);
}

#[test]
fn eviction_and_send_failure_counters_increment() {
    let (snapshotter, recorder) = debugging_recorder_setup();
    metrics::with_local_recorder(&recorder, || {
        link_metrics::inc_evictions();
        link_metrics::inc_send_failures();
        link_metrics::inc_rejects("length");
    });
    assert_eq!(counter(&snapshotter, link_metrics::EVICTIONS_TOTAL, None), 1);
    assert_eq!(counter(&snapshotter, link_metrics::SEND_FAILURES_TOTAL, None), 1);
    assert_eq!(
        counter(&snapshotter, link_metrics::REJECTS_TOTAL, Some(("reason", "length"))),
        1
    );
}
