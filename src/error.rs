//! Configuration and driver-level error types.
//!
//! Outbound failures live in [`SendError`](crate::fragment::SendError) and
//! receive-side validation failures in [`HalError`](crate::hal::HalError);
//! this module covers what is left: rejected configuration and driver
//! lifecycle problems.

use thiserror::Error;

use crate::NodeAddress;

/// A [`TransportConfig`](crate::TransportConfig) that cannot be honoured.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A maximum-size message would need more fragments than the header counts.
    #[error(
        "max message size {max_message_size} needs {fragments} fragments of {chunk_size} bytes, \
         limit is {limit}"
    )]
    TooManyFragments {
        max_message_size: usize,
        chunk_size: usize,
        fragments: usize,
        limit: usize,
    },
    /// The chunk size exceeds what one frame of the medium can carry.
    #[error("chunk size {chunk_size} exceeds the medium frame payload of {limit} bytes")]
    ChunkTooLarge { chunk_size: usize, limit: usize },
}

/// Failures reported by a transport driver outside the send path.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The medium controller did not come up.
    #[error("medium controller failed to initialise: {0}")]
    Init(String),
    /// The acceptance filters could not be programmed.
    #[error("failed to program acceptance filters for node {address}: {reason}")]
    Filters { address: NodeAddress, reason: String },
    /// The operation requires [`Transport::init`](crate::Transport::init) first.
    #[error("transport is not initialised")]
    NotInitialized,
    /// The medium does not support the requested operation.
    #[error("operation not supported by this medium")]
    Unsupported,
}
