//! Tests for inbound reassembly.

use std::num::NonZeroUsize;

use rstest::{fixture, rstest};

use crate::{
    NodeAddress,
    TransportConfig,
    fragment::{
        DropReason,
        FragmentIndex,
        FrameHeader,
        MessageId,
        PushOutcome,
        Reassembler,
        SlotPool,
        SlotState,
    },
};

#[fixture]
fn reassembler() -> Reassembler {
    Reassembler::new(SlotPool::new(
        NonZeroUsize::new(2).expect("non-zero"),
        NonZeroUsize::new(24).expect("non-zero"),
    ))
}

fn header(source: u8, id: u8, index: u8, count: u8) -> FrameHeader {
    FrameHeader::new(
        MessageId::new(id),
        count,
        FragmentIndex::new(index),
        NodeAddress::new(9),
        NodeAddress::new(source),
    )
}

#[rstest]
fn single_fragment_completes_immediately(mut reassembler: Reassembler) {
    assert_eq!(
        reassembler.push(header(1, 1, 0, 1), b"ping"),
        PushOutcome::Complete { slot: 0 }
    );
    let message = reassembler.take_ready().expect("message ready");
    assert_eq!(message.source(), NodeAddress::new(1));
    assert_eq!(message.message_id(), MessageId::new(1));
    assert_eq!(message.payload(), b"ping");
    assert!(!reassembler.has_ready());
    assert_eq!(reassembler.pool().locked_len(), 0);
}

#[rstest]
fn ordered_fragments_are_concatenated(mut reassembler: Reassembler) {
    assert_eq!(
        reassembler.push(header(1, 2, 0, 3), &[1; 8]),
        PushOutcome::Pending { slot: 0 }
    );
    assert_eq!(
        reassembler.push(header(1, 2, 1, 3), &[2; 8]),
        PushOutcome::Pending { slot: 0 }
    );
    assert_eq!(
        reassembler.push(header(1, 2, 2, 3), &[3; 4]),
        PushOutcome::Complete { slot: 0 }
    );
    let mut out = [0; 24];
    assert_eq!(reassembler.receive(&mut out), Some(20));
    assert_eq!(&out[..8], &[1; 8]);
    assert_eq!(&out[16..20], &[3; 4]);
    assert_eq!(reassembler.stats().completed, 1);
}

#[rstest]
fn out_of_order_fragment_never_completes(mut reassembler: Reassembler) {
    reassembler.push(header(1, 3, 0, 3), &[1; 8]);
    assert_eq!(
        reassembler.push(header(1, 3, 2, 3), &[3; 4]),
        PushOutcome::Dropped(DropReason::Unmatched)
    );
    let slot = reassembler.pool().slot(0).expect("slot in range");
    assert_eq!(slot.state(), SlotState::Filling);
    assert_eq!(slot.next_index(), FragmentIndex::new(1));
    assert_eq!(slot.len(), 8);

    assert_eq!(
        reassembler.push(header(1, 3, 1, 3), &[2; 8]),
        PushOutcome::Pending { slot: 0 }
    );
    assert!(!reassembler.has_ready());
}

#[rstest]
fn continuation_without_a_start_is_dropped(mut reassembler: Reassembler) {
    assert_eq!(
        reassembler.push(header(4, 1, 1, 2), &[0; 8]),
        PushOutcome::Dropped(DropReason::Unmatched)
    );
    assert_eq!(reassembler.stats().dropped, 1);
    assert_eq!(reassembler.pool().locked_len(), 0);
}

#[rstest]
#[case(3, 3)]
#[case(5, 2)]
#[case(0, 0)]
fn index_outside_the_count_is_invalid(
    mut reassembler: Reassembler,
    #[case] index: u8,
    #[case] count: u8,
) {
    assert_eq!(
        reassembler.push(header(1, 1, index, count), &[0; 2]),
        PushOutcome::Dropped(DropReason::InvalidHeader)
    );
}

#[rstest]
fn interleaved_senders_reassemble_independently(mut reassembler: Reassembler) {
    reassembler.push(header(1, 5, 0, 2), b"aaaa");
    reassembler.push(header(2, 5, 0, 2), b"bbbb");
    reassembler.push(header(2, 5, 1, 2), b"BB");
    reassembler.push(header(1, 5, 1, 2), b"AA");

    let first = reassembler.take_ready().expect("message ready");
    let second = reassembler.take_ready().expect("message ready");
    assert_eq!(first.payload(), b"aaaaAA");
    assert_eq!(second.payload(), b"bbbbBB");
}

#[rstest]
fn new_message_evicts_the_oldest_partial(mut reassembler: Reassembler) {
    reassembler.push(header(1, 1, 0, 2), &[1; 8]);
    reassembler.push(header(2, 1, 0, 2), &[2; 8]);
    assert_eq!(
        reassembler.push(header(3, 1, 0, 2), &[3; 8]),
        PushOutcome::Pending { slot: 0 }
    );
    assert_eq!(reassembler.stats().evicted, 1);
    assert_eq!(
        reassembler.push(header(1, 1, 1, 2), &[1; 8]),
        PushOutcome::Dropped(DropReason::Unmatched)
    );
    assert_eq!(
        reassembler.push(header(2, 1, 1, 2), &[2; 8]),
        PushOutcome::Complete { slot: 1 }
    );
}

#[rstest]
fn eviction_prefers_the_stalled_message(mut reassembler: Reassembler) {
    reassembler.push(header(1, 1, 0, 3), &[1; 8]);
    reassembler.push(header(2, 1, 0, 3), &[2; 8]);
    assert_eq!(
        reassembler.push(header(1, 1, 1, 3), &[1; 8]),
        PushOutcome::Pending { slot: 0 }
    );
    let ages: Vec<_> = reassembler.pool().slots().map(|slot| slot.age()).collect();
    assert_eq!(ages, [0, 1]);

    assert_eq!(
        reassembler.push(header(3, 1, 0, 2), &[3; 8]),
        PushOutcome::Pending { slot: 1 }
    );
    assert_eq!(
        reassembler.push(header(1, 1, 2, 3), &[1; 4]),
        PushOutcome::Complete { slot: 0 }
    );
    assert_eq!(
        reassembler.push(header(2, 1, 1, 3), &[2; 8]),
        PushOutcome::Dropped(DropReason::Unmatched)
    );
}

#[test]
fn padded_maximum_message_fits_its_slot() {
    let config = TransportConfig::new(NodeAddress::new(9));
    let mut reassembler = Reassembler::from_config(&config);
    // 100 bytes arrive as 13 full chunks, the last one padded
    let count = 13;
    for index in 0..count - 1 {
        assert!(matches!(
            reassembler.push(header(4, 3, index, count), &[index; 8]),
            PushOutcome::Pending { .. }
        ));
    }
    assert!(matches!(
        reassembler.push(header(4, 3, count - 1, count), &[0xAA; 8]),
        PushOutcome::Complete { .. }
    ));
    let message = reassembler.take_ready().expect("message ready");
    assert_eq!(message.payload().len(), 104);
    assert_eq!(reassembler.stats().dropped, 0);
}

#[rstest]
fn overflow_discards_the_partial_message(mut reassembler: Reassembler) {
    for index in 0..3 {
        reassembler.push(header(7, 2, index, 4), &[0; 8]);
    }
    assert_eq!(
        reassembler.push(header(7, 2, 3, 4), &[0; 8]),
        PushOutcome::Dropped(DropReason::Overflow)
    );
    assert_eq!(reassembler.pool().locked_len(), 0);
}

#[rstest]
fn short_receive_buffer_truncates(mut reassembler: Reassembler) {
    reassembler.push(header(1, 1, 0, 1), b"abcdef");
    let mut out = [0; 4];
    assert_eq!(reassembler.receive(&mut out), Some(4));
    assert_eq!(&out, b"abcd");
    assert!(!reassembler.has_ready());
}

#[rstest]
fn clear_discards_everything(mut reassembler: Reassembler) {
    reassembler.push(header(1, 1, 0, 1), b"done");
    reassembler.push(header(2, 1, 0, 2), b"half");
    reassembler.clear();
    assert_eq!(reassembler.pool().locked_len(), 0);
    assert_eq!(reassembler.stats(), Default::default());
}
