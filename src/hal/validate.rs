//! Version and length checks applied to every reassembled message.

use std::num::NonZeroUsize;

use super::{HEADER_SIZE, HalError, MessageHeader, PROTOCOL_VERSION};
use crate::config::padded_len;

/// Check a reassembled length against the size the header declares.
///
/// Returns the number of bytes to keep. An exact match keeps everything. A
/// length equal to `expected` rounded up to a whole number of chunks means
/// the final fragment was padded by the medium; the padding is cut off.
///
/// # Errors
///
/// Returns [`HalError::Length`] for any other length.
///
/// # Examples
///
/// ```
/// use std::num::NonZeroUsize;
///
/// use meshlink::hal::validate_length;
///
/// let chunk = NonZeroUsize::new(8).expect("non-zero");
/// assert_eq!(validate_length(24, 20, chunk), Ok(20));
/// assert!(validate_length(21, 20, chunk).is_err());
/// ```
pub const fn validate_length(
    actual: usize,
    expected: usize,
    chunk_size: NonZeroUsize,
) -> Result<usize, HalError> {
    if actual == expected {
        return Ok(actual);
    }
    let padded = padded_len(expected, chunk_size);
    if actual == padded {
        return Ok(expected);
    }
    Err(HalError::Length { actual, expected })
}

/// Validate `bytes` as a complete message and return its header together
/// with the accepted length.
///
/// The version is checked before the length. A buffer too short to hold a
/// header fails the length check.
///
/// # Errors
///
/// Returns [`HalError::Version`] or [`HalError::Length`].
pub fn validate_message(
    bytes: &[u8],
    chunk_size: NonZeroUsize,
    max_message_size: usize,
) -> Result<(MessageHeader, usize), HalError> {
    let header = MessageHeader::parse(bytes).ok_or(HalError::Length {
        actual: bytes.len(),
        expected: HEADER_SIZE,
    })?;
    if !header.is_version_valid() {
        return Err(HalError::Version {
            found: header.version(),
            expected: PROTOCOL_VERSION,
        });
    }
    let expected = header.expected_message_size(max_message_size);
    let len = validate_length(bytes.len(), expected, chunk_size)?;
    Ok((header, len))
}
