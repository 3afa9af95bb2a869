use derive_more::{Display, Into};

/// Three-bit sequence number shared by the fragments of one message.
///
/// Identifiers wrap modulo eight, so they only disambiguate messages that are
/// in flight from the same source at the same time.
///
/// # Examples
///
/// ```
/// use meshlink::fragment::MessageId;
/// let id = MessageId::new(7);
/// assert_eq!(id.wrapping_next().get(), 0);
/// assert_eq!(MessageId::new(9).get(), 1);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, Into)]
#[display("{_0}")]
pub struct MessageId(u8);

impl MessageId {
    /// Bits available for the identifier on the wire.
    pub const MASK: u8 = 0x07;

    /// Create an identifier, discarding bits beyond the field width.
    #[must_use]
    pub const fn new(value: u8) -> Self { Self(value & Self::MASK) }

    /// Return the numeric identifier.
    #[must_use]
    pub const fn get(self) -> u8 { self.0 }

    /// Return the identifier that follows this one, wrapping after seven.
    #[must_use]
    pub const fn wrapping_next(self) -> Self { Self::new(self.0.wrapping_add(1)) }
}

impl From<u8> for MessageId {
    fn from(value: u8) -> Self { Self::new(value) }
}
