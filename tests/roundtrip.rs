#![cfg(not(loom))]
//! Property tests for the header codec and the fragment pipeline.

use std::num::NonZeroUsize;

use meshlink::{
    Fragmenter,
    MessageId,
    NodeAddress,
    PushOutcome,
    Reassembler,
    SendContext,
    SlotPool,
    fragment::{decode, encode},
};
use proptest::prelude::*;

const MAX_MESSAGE_SIZE: usize = 100;

fn pipeline(chunk: usize) -> (Fragmenter, Reassembler) {
    let chunk = NonZeroUsize::new(chunk).expect("non-zero");
    let max = NonZeroUsize::new(MAX_MESSAGE_SIZE).expect("non-zero");
    let pool = SlotPool::new(NonZeroUsize::new(4).expect("non-zero"), max);
    (Fragmenter::new(chunk, max), Reassembler::new(pool))
}

proptest! {
    #[test]
    fn header_fields_survive_encoding(
        id in 0u8..8,
        count in 1u8..16,
        index_seed in any::<u8>(),
        dest in any::<u8>(),
        src in any::<u8>(),
    ) {
        let index = index_seed % count;
        let header = decode(encode(id, count, index, dest, src));
        prop_assert_eq!(header.message_id().get(), id);
        prop_assert_eq!(header.fragment_count(), count);
        prop_assert_eq!(header.fragment_index().get(), index);
        prop_assert_eq!(header.destination().get(), dest);
        prop_assert_eq!(header.source().get(), src);
    }

    #[test]
    fn any_message_up_to_the_limit_round_trips(
        payload in proptest::collection::vec(any::<u8>(), 1..=MAX_MESSAGE_SIZE),
        chunk in 7usize..=8,
    ) {
        let (fragmenter, mut reassembler) = pipeline(chunk);
        let context = SendContext::new();
        let mut last = None;
        fragmenter
            .send(&context, NodeAddress::new(2), NodeAddress::new(1), &payload, |fragment| {
                last = Some(reassembler.push(*fragment.header(), fragment.payload()));
                Ok::<(), ()>(())
            })
            .expect("payload within bounds");

        prop_assert!(matches!(last, Some(PushOutcome::Complete { .. })), "expected final push to complete the message");
        let message = reassembler.take_ready().expect("message ready");
        prop_assert_eq!(message.message_id(), MessageId::new(1));
        prop_assert_eq!(message.payload(), payload.as_slice());
    }
}
