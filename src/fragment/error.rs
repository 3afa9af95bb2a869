//! Error and status types emitted by the fragmentation layer.
//!
//! Outbound failures are hard errors returned to the caller. Inbound problems
//! are never errors: the offending frame or partial message is dropped and the
//! reason reported as a [`DropReason`].

use derive_more::Display;
use thiserror::Error;

use super::{FragmentIndex, MessageId};

/// Errors that abort a single outbound message.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum SendError {
    /// There is nothing to send.
    #[error("message is empty")]
    EmptyMessage,
    /// The message exceeds the configured maximum size.
    #[error("message of {len} bytes exceeds the limit of {limit}")]
    MessageTooLarge { len: usize, limit: usize },
    /// The message would need more fragments than the header can count.
    #[error("message needs {count} fragments, limit is {limit}")]
    TooManyFragments { count: usize, limit: usize },
    /// Another send on the same context has not finished.
    #[error("a send is already in progress")]
    Busy,
    /// The transport has not been initialised.
    #[error("transport is not initialised")]
    NotInitialized,
    /// The medium rejected a fragment; the rest of the message was abandoned.
    #[error("medium rejected fragment {fragment} of message {message_id}")]
    Bus {
        message_id: MessageId,
        fragment: FragmentIndex,
    },
}

/// Why an inbound fragment, or the partial message it belonged to, was
/// discarded.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
pub enum DropReason {
    /// No slot expects this continuation fragment: it is out of order, its
    /// predecessor was lost, or its message was evicted.
    #[display("unmatched")]
    Unmatched,
    /// The header describes an impossible position (index not below count).
    #[display("invalid_header")]
    InvalidHeader,
    /// Appending the fragment would overflow the slot buffer; the partial
    /// message was discarded with it.
    #[display("overflow")]
    Overflow,
}

impl DropReason {
    /// Stable label used for logs and metrics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unmatched => "unmatched",
            Self::InvalidHeader => "invalid_header",
            Self::Overflow => "overflow",
        }
    }
}
