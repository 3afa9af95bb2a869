//! Receive-side validation failures.

use thiserror::Error;

/// Why the HAL discarded a reassembled message.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum HalError {
    /// The message carries a protocol version other than the supported one.
    #[error("protocol version mismatch: found {found}, expected {expected}")]
    Version { found: u8, expected: u8 },
    /// The reassembled length matches neither the declared size nor its
    /// chunk-padded size.
    #[error("message length mismatch: received {actual} bytes, header declares {expected}")]
    Length { actual: usize, expected: usize },
}

impl HalError {
    /// Short label used for metrics and log fields.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Version { .. } => "version",
            Self::Length { .. } => "length",
        }
    }
}
