//! Zero-based fragment positioning within a message.
//!
//! Provides [`FragmentIndex`], a wrapper around the four-bit index field of
//! the frame header with checked increments that refuse to leave the field.

use derive_more::{Display, Into};

/// Zero-based position of a fragment within its message.
///
/// # Examples
///
/// ```
/// use meshlink::fragment::FragmentIndex;
/// let index = FragmentIndex::new(3);
/// assert_eq!(index.get(), 3);
/// assert_eq!(FragmentIndex::new(15).checked_increment(), None);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Into)]
#[display("{_0}")]
pub struct FragmentIndex(u8);

impl FragmentIndex {
    /// Bits available for the index on the wire.
    pub const MASK: u8 = 0x0F;

    /// Construct an index, discarding bits beyond the field width.
    #[must_use]
    pub const fn new(value: u8) -> Self { Self(value & Self::MASK) }

    /// Return the first fragment index.
    #[must_use]
    pub const fn zero() -> Self { Self(0) }

    /// Return the underlying numeric value.
    #[must_use]
    pub const fn get(self) -> u8 { self.0 }

    /// Report whether this is the first fragment of a message.
    #[must_use]
    pub const fn is_first(self) -> bool { self.0 == 0 }

    /// Increment the index, returning `None` once the field is exhausted.
    #[must_use]
    pub const fn checked_increment(self) -> Option<Self> {
        if self.0 >= Self::MASK {
            None
        } else {
            Some(Self(self.0 + 1))
        }
    }
}

impl From<u8> for FragmentIndex {
    fn from(value: u8) -> Self { Self::new(value) }
}

impl TryFrom<usize> for FragmentIndex {
    type Error = usize;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        match u8::try_from(value) {
            Ok(raw) if raw <= Self::MASK => Ok(Self(raw)),
            _ => Err(value),
        }
    }
}
