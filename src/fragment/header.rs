//! Bit-packed frame header carried by every fragment.
//!
//! The header occupies one 32-bit word, least significant bits first:
//!
//! ```text
//! 31..29  28   27   26..24  23..20  19..16  15..8  7..0
//! framing ack  req  msg id  count   index   dest   source
//! ```
//!
//! Encoding masks every field to its width and never fails. Decoding accepts
//! any word; whether the result makes sense is for the reassembler to judge.

use super::{FragmentIndex, MessageId};
use crate::NodeAddress;

/// Constant framing bits marking an extended data frame for the controller.
pub const FRAMING_BITS: u32 = 0b100 << 29;

/// Mask selecting the framing bits of a header word.
pub const FRAMING_MASK: u32 = 0b111 << 29;

/// Mask selecting the bits that travel in a 29-bit extended identifier.
pub const IDENTIFIER_MASK: u32 = !FRAMING_MASK;

const SOURCE_SHIFT: u32 = 0;
const DESTINATION_SHIFT: u32 = 8;
const INDEX_SHIFT: u32 = 16;
const COUNT_SHIFT: u32 = 20;
const MESSAGE_ID_SHIFT: u32 = 24;
const ACK_REQUEST_BIT: u32 = 1 << 27;
const IS_ACK_BIT: u32 = 1 << 28;
const COUNT_MASK: u8 = 0x0F;

/// Decoded form of the per-fragment header.
///
/// # Examples
///
/// ```
/// use meshlink::{
///     NodeAddress,
///     fragment::{FragmentIndex, FrameHeader, MessageId},
/// };
/// let header = FrameHeader::new(
///     MessageId::new(3),
///     2,
///     FragmentIndex::new(1),
///     NodeAddress::new(0),
///     NodeAddress::new(7),
/// );
/// let word = header.encode();
/// assert_eq!(FrameHeader::decode(word), header);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHeader {
    source: NodeAddress,
    destination: NodeAddress,
    fragment_index: FragmentIndex,
    fragment_count: u8,
    message_id: MessageId,
    ack_requested: bool,
    is_ack: bool,
}

impl FrameHeader {
    /// Create a header; `fragment_count` is masked to four bits.
    #[must_use]
    pub const fn new(
        message_id: MessageId,
        fragment_count: u8,
        fragment_index: FragmentIndex,
        destination: NodeAddress,
        source: NodeAddress,
    ) -> Self {
        Self {
            source,
            destination,
            fragment_index,
            fragment_count: fragment_count & COUNT_MASK,
            message_id,
            ack_requested: false,
            is_ack: false,
        }
    }

    /// Set the reserved ack-request flag.
    #[must_use]
    pub const fn with_ack_request(mut self, requested: bool) -> Self {
        self.ack_requested = requested;
        self
    }

    /// Originating node.
    #[must_use]
    pub const fn source(&self) -> NodeAddress { self.source }

    /// Target node, or [`NodeAddress::BROADCAST`].
    #[must_use]
    pub const fn destination(&self) -> NodeAddress { self.destination }

    /// Position of this fragment within the message.
    #[must_use]
    pub const fn fragment_index(&self) -> FragmentIndex { self.fragment_index }

    /// Total number of fragments in the message.
    #[must_use]
    pub const fn fragment_count(&self) -> u8 { self.fragment_count }

    /// Sequence number shared by all fragments of the message.
    #[must_use]
    pub const fn message_id(&self) -> MessageId { self.message_id }

    /// Reserved ack-request flag.
    #[must_use]
    pub const fn ack_requested(&self) -> bool { self.ack_requested }

    /// Reserved is-ack flag.
    #[must_use]
    pub const fn is_ack(&self) -> bool { self.is_ack }

    /// Report whether this fragment completes its message.
    #[must_use]
    pub const fn is_last_fragment(&self) -> bool {
        self.fragment_index.get() + 1 == self.fragment_count
    }

    /// Pack the header into its wire word, framing bits included.
    #[must_use]
    pub const fn encode(&self) -> u32 {
        let mut word = FRAMING_BITS;
        word |= (self.source.get() as u32) << SOURCE_SHIFT;
        word |= (self.destination.get() as u32) << DESTINATION_SHIFT;
        word |= (self.fragment_index.get() as u32) << INDEX_SHIFT;
        word |= ((self.fragment_count & COUNT_MASK) as u32) << COUNT_SHIFT;
        word |= (self.message_id.get() as u32) << MESSAGE_ID_SHIFT;
        if self.ack_requested {
            word |= ACK_REQUEST_BIT;
        }
        if self.is_ack {
            word |= IS_ACK_BIT;
        }
        word
    }

    /// Unpack a wire word. The framing bits are ignored.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "every field is masked to at most eight bits before narrowing"
    )]
    pub const fn decode(word: u32) -> Self {
        Self {
            source: NodeAddress::new((word >> SOURCE_SHIFT) as u8),
            destination: NodeAddress::new((word >> DESTINATION_SHIFT) as u8),
            fragment_index: FragmentIndex::new((word >> INDEX_SHIFT) as u8),
            fragment_count: ((word >> COUNT_SHIFT) as u8) & COUNT_MASK,
            message_id: MessageId::new((word >> MESSAGE_ID_SHIFT) as u8),
            ack_requested: word & ACK_REQUEST_BIT != 0,
            is_ack: word & IS_ACK_BIT != 0,
        }
    }

    /// The 29 low bits of the encoded word, as carried in an extended CAN id.
    #[must_use]
    pub const fn identifier(&self) -> u32 { self.encode() & IDENTIFIER_MASK }
}

/// Pack raw header fields into a wire word, masking each to its width.
///
/// ```
/// let word = meshlink::fragment::encode(9, 3, 1, 0, 5);
/// let header = meshlink::fragment::decode(word);
/// assert_eq!(header.message_id().get(), 1);
/// ```
#[must_use]
pub const fn encode(
    message_id: u8,
    fragment_count: u8,
    fragment_index: u8,
    destination: u8,
    source: u8,
) -> u32 {
    FrameHeader::new(
        MessageId::new(message_id),
        fragment_count,
        FragmentIndex::new(fragment_index),
        NodeAddress::new(destination),
        NodeAddress::new(source),
    )
    .encode()
}

/// Unpack a wire word into its header fields.
#[must_use]
pub const fn decode(word: u32) -> FrameHeader { FrameHeader::decode(word) }
