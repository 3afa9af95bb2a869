//! Tests for the bit-packed frame header.

use rstest::rstest;

use crate::{
    NodeAddress,
    fragment::{
        FRAMING_BITS,
        FRAMING_MASK,
        FragmentIndex,
        FrameHeader,
        IDENTIFIER_MASK,
        MessageId,
        decode,
        encode,
    },
};

#[test]
fn header_places_fields_least_significant_first() {
    let word = encode(3, 4, 2, 0x12, 0x34);
    assert_eq!(word & 0xFF, 0x34);
    assert_eq!((word >> 8) & 0xFF, 0x12);
    assert_eq!((word >> 16) & 0x0F, 2);
    assert_eq!((word >> 20) & 0x0F, 4);
    assert_eq!((word >> 24) & 0x07, 3);
    assert_eq!(word & FRAMING_MASK, FRAMING_BITS);
}

#[test]
fn header_masks_message_id_to_three_bits() {
    let header = decode(encode(9, 2, 0, 5, 6));
    assert_eq!(header.message_id(), MessageId::new(1));
    assert_eq!(header.fragment_count(), 2);
    assert_eq!(header.destination(), NodeAddress::new(5));
    assert_eq!(header.source(), NodeAddress::new(6));
}

#[rstest]
#[case(0, 1, 0, 0, 0)]
#[case(7, 15, 14, 255, 255)]
#[case(5, 3, 2, 0, 200)]
#[case(1, 15, 0, 255, 1)]
fn header_round_trips_in_range_fields(
    #[case] id: u8,
    #[case] count: u8,
    #[case] index: u8,
    #[case] dest: u8,
    #[case] src: u8,
) {
    let header = decode(encode(id, count, index, dest, src));
    assert_eq!(header.message_id().get(), id);
    assert_eq!(header.fragment_count(), count);
    assert_eq!(header.fragment_index().get(), index);
    assert_eq!(header.destination().get(), dest);
    assert_eq!(header.source().get(), src);
}

#[test]
fn out_of_range_count_and_index_are_masked() {
    let header = decode(encode(0, 0x1F, 0x13, 1, 2));
    assert_eq!(header.fragment_count(), 0x0F);
    assert_eq!(header.fragment_index(), FragmentIndex::new(3));
}

#[test]
fn decode_ignores_framing_bits() {
    let word = encode(2, 3, 1, 9, 8);
    assert_eq!(decode(word & IDENTIFIER_MASK), decode(word));
}

#[test]
fn identifier_fits_an_extended_can_id() {
    let header = FrameHeader::new(
        MessageId::new(7),
        15,
        FragmentIndex::new(14),
        NodeAddress::BROADCAST,
        NodeAddress::BROADCAST,
    )
    .with_ack_request(true);
    assert!(header.identifier() < 1 << 29);
    assert!(decode(header.encode()).ack_requested());
    assert!(!header.is_ack());
}

#[rstest]
#[case(0, 1, true)]
#[case(0, 3, false)]
#[case(2, 3, true)]
fn last_fragment_is_index_count_minus_one(
    #[case] index: u8,
    #[case] count: u8,
    #[case] last: bool,
) {
    let header = FrameHeader::new(
        MessageId::new(1),
        count,
        FragmentIndex::new(index),
        NodeAddress::new(1),
        NodeAddress::new(2),
    );
    assert_eq!(header.is_last_fragment(), last);
}
