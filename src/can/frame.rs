//! CAN data frames carrying one fragment each.

use embedded_can::{ExtendedId, Frame, Id};

use crate::fragment::{FRAMING_BITS, FrameHeader, IDENTIFIER_MASK};

/// Payload bytes in a classic CAN data frame.
pub const MAX_PAYLOAD: usize = 8;

/// Extended-id CAN data frame.
///
/// The identifier holds the 29 low bits of the fragment's [`FrameHeader`];
/// the framing bits are implied by the frame being an extended data frame.
///
/// # Examples
///
/// ```
/// use embedded_can::Frame;
/// use meshlink::{
///     NodeAddress,
///     can::CanFrame,
///     fragment::{FragmentIndex, FrameHeader, MessageId},
/// };
///
/// let header = FrameHeader::new(
///     MessageId::new(2),
///     1,
///     FragmentIndex::zero(),
///     NodeAddress::new(0),
///     NodeAddress::new(9),
/// );
/// let frame = CanFrame::from_fragment(header, &[1, 2, 3]).expect("fits in one frame");
/// assert_eq!(frame.header(), header);
/// assert_eq!(frame.data(), &[1, 2, 3]);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CanFrame {
    id: ExtendedId,
    data: [u8; MAX_PAYLOAD],
    len: usize,
}

impl CanFrame {
    /// Build the frame for one fragment. Returns `None` if `payload` exceeds
    /// [`MAX_PAYLOAD`].
    #[must_use]
    pub fn from_fragment(header: FrameHeader, payload: &[u8]) -> Option<Self> {
        let id = ExtendedId::new(header.identifier())?;
        Self::with_id(id, payload)
    }

    /// Decode the fragment header from the identifier.
    #[must_use]
    pub fn header(&self) -> FrameHeader {
        FrameHeader::decode((self.id.as_raw() & IDENTIFIER_MASK) | FRAMING_BITS)
    }

    /// The raw extended identifier.
    #[must_use]
    pub fn extended_id(&self) -> ExtendedId { self.id }

    fn with_id(id: ExtendedId, payload: &[u8]) -> Option<Self> {
        let mut data = [0; MAX_PAYLOAD];
        data.get_mut(..payload.len())?.copy_from_slice(payload);
        Some(Self {
            id,
            data,
            len: payload.len(),
        })
    }
}

impl Frame for CanFrame {
    fn new(id: impl Into<Id>, data: &[u8]) -> Option<Self> {
        match id.into() {
            Id::Extended(id) => Self::with_id(id, data),
            Id::Standard(_) => None,
        }
    }

    fn new_remote(_id: impl Into<Id>, _dlc: usize) -> Option<Self> { None }

    fn is_extended(&self) -> bool { true }

    fn is_remote_frame(&self) -> bool { false }

    fn id(&self) -> Id { Id::Extended(self.id) }

    fn dlc(&self) -> usize { self.len }

    fn data(&self) -> &[u8] { self.data.get(..self.len).unwrap_or_default() }
}
