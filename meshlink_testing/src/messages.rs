//! Builders for protocol messages and their fragment frames.

use std::num::NonZeroUsize;

use meshlink::{
    Fragmenter,
    MessageId,
    NodeAddress,
    can::CanFrame,
    hal::MessageHeader,
};

/// Build a message whose header declares `declared` payload bytes, followed
/// by `actual` payload bytes counting up from zero.
///
/// Passing `actual != declared` produces a message the HAL should reject
/// (or, for chunk padding, accept and truncate).
#[must_use]
pub fn protocol_message(
    sender: NodeAddress,
    destination: NodeAddress,
    declared: u8,
    actual: usize,
) -> Vec<u8> {
    let mut bytes = MessageHeader::new(sender, destination)
        .with_payload_len(declared)
        .encode()
        .to_vec();
    bytes.extend((0..actual).map(|i| (i % 251) as u8));
    bytes
}

/// Split `payload` into the CAN frames a sender would transmit, using
/// eight-byte chunks.
///
/// # Panics
///
/// Panics if `payload` cannot be fragmented; this is a test helper.
#[must_use]
pub fn fragment_frames(
    source: NodeAddress,
    destination: NodeAddress,
    message_id: MessageId,
    payload: &[u8],
) -> Vec<CanFrame> {
    let chunk = NonZeroUsize::new(8).expect("non-zero");
    let max = NonZeroUsize::new(payload.len().max(1)).expect("non-zero");
    Fragmenter::new(chunk, max)
        .fragments(message_id, destination, source, payload)
        .expect("payload fits fifteen fragments")
        .map(|fragment| {
            CanFrame::from_fragment(*fragment.header(), fragment.payload())
                .expect("eight-byte chunk fits a frame")
        })
        .collect()
}
