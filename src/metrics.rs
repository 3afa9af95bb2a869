//! Metric helpers for `meshlink`.
//!
//! This module defines metric names and simple helper functions wrapping the
//! [`metrics`](https://docs.rs/metrics) crate. With the `metrics` feature
//! disabled the helpers compile to nothing.

use crate::fragment::DropReason;

/// Name of the counter tracking frames moved across the medium.
pub const FRAMES_TOTAL: &str = "meshlink_frames_total";
/// Name of the counter tracking whole messages sent or received.
pub const MESSAGES_TOTAL: &str = "meshlink_messages_total";
/// Name of the counter tracking discarded inbound fragments.
pub const DROPS_TOTAL: &str = "meshlink_fragment_drops_total";
/// Name of the counter tracking messages evicted from the reassembly pool.
pub const EVICTIONS_TOTAL: &str = "meshlink_slot_evictions_total";
/// Name of the counter tracking messages rejected by HAL validation.
pub const REJECTS_TOTAL: &str = "meshlink_hal_rejects_total";
/// Name of the counter tracking aborted sends.
pub const SEND_FAILURES_TOTAL: &str = "meshlink_send_failures_total";

/// Direction of traffic.
#[derive(Clone, Copy, Debug)]
pub enum Direction {
    /// Traffic received from the medium.
    Inbound,
    /// Traffic handed to the medium.
    Outbound,
}

impl Direction {
    #[cfg_attr(not(feature = "metrics"), expect(dead_code, reason = "only labels metrics"))]
    fn as_str(self) -> &'static str {
        match self {
            Direction::Inbound => "inbound",
            Direction::Outbound => "outbound",
        }
    }
}

/// Record one frame moved in `direction`.
pub fn inc_frames(direction: Direction) {
    #[cfg(feature = "metrics")]
    metrics::counter!(FRAMES_TOTAL, "direction" => direction.as_str()).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = direction;
}

/// Record one whole message moved in `direction`.
pub fn inc_messages(direction: Direction) {
    #[cfg(feature = "metrics")]
    metrics::counter!(MESSAGES_TOTAL, "direction" => direction.as_str()).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = direction;
}

/// Record a dropped inbound fragment.
pub fn inc_drops(reason: DropReason) {
    #[cfg(feature = "metrics")]
    metrics::counter!(DROPS_TOTAL, "reason" => reason.as_str()).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = reason;
}

/// Record a message evicted from the reassembly pool.
pub fn inc_evictions() {
    #[cfg(feature = "metrics")]
    metrics::counter!(EVICTIONS_TOTAL).increment(1);
}

/// Record a message rejected by HAL validation; `reason` is `"version"` or
/// `"length"`.
pub fn inc_rejects(reason: &'static str) {
    #[cfg(feature = "metrics")]
    metrics::counter!(REJECTS_TOTAL, "reason" => reason).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = reason;
}

/// Record an aborted send.
pub fn inc_send_failures() {
    #[cfg(feature = "metrics")]
    metrics::counter!(SEND_FAILURES_TOTAL).increment(1);
}
