//! Transport configuration.
//!
//! [`TransportConfig`] carries the handful of parameters the link layer needs:
//! the node's own address, the medium's chunk size, and the bounds on the
//! reassembly pool. Values are injected at construction; the crate never
//! reads configuration from the environment itself.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::{NodeAddress, error::ConfigError};

const fn non_zero(value: usize) -> NonZeroUsize {
    match NonZeroUsize::new(value) {
        Some(value) => value,
        None => panic!("configuration constant must be non-zero"),
    }
}

/// Native payload of a single CAN data frame.
pub const CAN_FRAME_PAYLOAD: usize = 8;

/// Largest fragment count representable in the four-bit header field.
pub const MAX_FRAGMENTS: usize = 15;

/// Default number of payload bytes carried by one fragment.
pub const DEFAULT_CHUNK_SIZE: NonZeroUsize = non_zero(CAN_FRAME_PAYLOAD);

/// Default number of concurrent reassembly slots.
pub const DEFAULT_POOL_CAPACITY: NonZeroUsize = non_zero(8);

/// Default upper bound on a reassembled message.
pub const DEFAULT_MAX_MESSAGE_SIZE: NonZeroUsize = non_zero(100);

/// `len` rounded up to a whole number of `chunk_size` chunks.
#[must_use]
pub const fn padded_len(len: usize, chunk_size: NonZeroUsize) -> usize {
    len.div_ceil(chunk_size.get()) * chunk_size.get()
}

/// Parameters fixed for the lifetime of one transport instance.
///
/// # Examples
///
/// ```
/// use std::num::NonZeroUsize;
///
/// use meshlink::{NodeAddress, TransportConfig};
///
/// let config = TransportConfig::new(NodeAddress::new(4))
///     .with_pool_capacity(NonZeroUsize::new(2).expect("non-zero"));
/// assert!(config.validate().is_ok());
/// assert_eq!(config.pool_capacity.get(), 2);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Address of this node on the medium.
    pub node_address: NodeAddress,
    /// Payload bytes per fragment; the medium's native frame payload.
    pub chunk_size: NonZeroUsize,
    /// Number of messages that may be reassembled concurrently.
    pub pool_capacity: NonZeroUsize,
    /// Hard cap on a single message, and the capacity of each slot buffer.
    pub max_message_size: NonZeroUsize,
}

impl TransportConfig {
    /// Create a configuration with default bounds for `node_address`.
    #[must_use]
    pub const fn new(node_address: NodeAddress) -> Self {
        Self {
            node_address,
            chunk_size: DEFAULT_CHUNK_SIZE,
            pool_capacity: DEFAULT_POOL_CAPACITY,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
        }
    }

    /// Override the chunk size.
    #[must_use]
    pub const fn with_chunk_size(mut self, chunk_size: NonZeroUsize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Override the number of reassembly slots.
    #[must_use]
    pub const fn with_pool_capacity(mut self, pool_capacity: NonZeroUsize) -> Self {
        self.pool_capacity = pool_capacity;
        self
    }

    /// Override the maximum message size.
    #[must_use]
    pub const fn with_max_message_size(mut self, max_message_size: NonZeroUsize) -> Self {
        self.max_message_size = max_message_size;
        self
    }

    /// Number of fragments needed for a message of `len` bytes.
    #[must_use]
    pub const fn fragments_for(&self, len: usize) -> usize { len.div_ceil(self.chunk_size.get()) }

    /// Bytes a reassembly slot holds: the maximum message size rounded up to
    /// whole chunks, so a maximum-size message with a padded final fragment
    /// still fits.
    #[must_use]
    pub fn slot_capacity(&self) -> NonZeroUsize {
        NonZeroUsize::new(padded_len(self.max_message_size.get(), self.chunk_size))
            .unwrap_or(self.max_message_size)
    }

    /// Check that the bounds can be expressed on the wire.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TooManyFragments`] when a maximum-size message
    /// would need more fragments than the header can count.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fragments = self.fragments_for(self.max_message_size.get());
        if fragments > MAX_FRAGMENTS {
            return Err(ConfigError::TooManyFragments {
                max_message_size: self.max_message_size.get(),
                chunk_size: self.chunk_size.get(),
                fragments,
                limit: MAX_FRAGMENTS,
            });
        }
        Ok(())
    }
}

impl Default for TransportConfig {
    fn default() -> Self { Self::new(NodeAddress::GATEWAY) }
}
