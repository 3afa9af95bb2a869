//! Outbound helper that splits messages into chunk-sized fragments.
//!
//! [`Fragmenter`] validates a payload against the configured bounds, tags
//! each chunk with a [`FrameHeader`], and hands the fragments to a raw send
//! primitive one at a time. The first rejected fragment aborts the message.

use std::{fmt, iter::Enumerate, num::NonZeroUsize, slice::Chunks};

use log::{trace, warn};

use super::{FragmentIndex, FrameHeader, MessageId, SendContext, SendError};
use crate::{NodeAddress, TransportConfig, config::MAX_FRAGMENTS};

/// Splits messages into fragments of at most `chunk_size` bytes.
#[derive(Clone, Copy, Debug)]
pub struct Fragmenter {
    chunk_size: NonZeroUsize,
    max_message_size: NonZeroUsize,
}

impl Fragmenter {
    /// Create a fragmenter for the given chunk size and message cap.
    #[must_use]
    pub const fn new(chunk_size: NonZeroUsize, max_message_size: NonZeroUsize) -> Self {
        Self {
            chunk_size,
            max_message_size,
        }
    }

    /// Create a fragmenter using the bounds from `config`.
    #[must_use]
    pub const fn from_config(config: &TransportConfig) -> Self {
        Self::new(config.chunk_size, config.max_message_size)
    }

    /// Payload bytes carried by each fragment.
    #[must_use]
    pub const fn chunk_size(&self) -> NonZeroUsize { self.chunk_size }

    /// Largest message this fragmenter accepts.
    #[must_use]
    pub const fn max_message_size(&self) -> NonZeroUsize { self.max_message_size }

    /// Number of fragments needed for `len` bytes.
    #[must_use]
    pub const fn fragment_count(&self, len: usize) -> usize { len.div_ceil(self.chunk_size.get()) }

    /// Split `payload` into fragments tagged with `message_id`.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::EmptyMessage`] for an empty payload,
    /// [`SendError::MessageTooLarge`] when it exceeds the configured maximum,
    /// and [`SendError::TooManyFragments`] when the header cannot count the
    /// fragments required.
    pub fn fragments<'a>(
        &self,
        message_id: MessageId,
        destination: NodeAddress,
        source: NodeAddress,
        payload: &'a [u8],
    ) -> Result<Fragments<'a>, SendError> {
        let count = self.checked_count(payload.len())?;
        Ok(Fragments {
            message_id,
            destination,
            source,
            count,
            chunks: payload.chunks(self.chunk_size.get()).enumerate(),
        })
    }

    /// Fragment `payload` and pass each fragment to `transmit` in order.
    ///
    /// A message id is allocated from `context` only once the payload has
    /// been validated. The context stays claimed until the last fragment is
    /// accepted or one is rejected, so overlapping sends on one context fail
    /// with [`SendError::Busy`].
    ///
    /// Returns the identifier the message was sent under.
    ///
    /// # Errors
    ///
    /// Returns the validation errors of [`Fragmenter::fragments`],
    /// [`SendError::Busy`] when the context is held by another send, and
    /// [`SendError::Bus`] for the first fragment `transmit` rejects. Fragments
    /// already on the wire are abandoned.
    pub fn send<F, E>(
        &self,
        context: &SendContext,
        destination: NodeAddress,
        source: NodeAddress,
        payload: &[u8],
        mut transmit: F,
    ) -> Result<MessageId, SendError>
    where
        F: FnMut(&FragmentFrame<'_>) -> Result<(), E>,
        E: fmt::Debug,
    {
        self.checked_count(payload.len())?;
        let permit = context.begin()?;
        let message_id = permit.next_message_id();
        let fragments = self.fragments(message_id, destination, source, payload)?;
        trace!(
            "sending message: id={message_id}, to={destination}, len={}, fragments={}",
            payload.len(),
            fragments.count
        );

        for fragment in fragments {
            let index = fragment.header().fragment_index();
            if let Err(err) = transmit(&fragment) {
                warn!(
                    "fragment rejected by medium: id={message_id}, fragment={index}, error={err:?}"
                );
                return Err(SendError::Bus {
                    message_id,
                    fragment: index,
                });
            }
            trace!("fragment sent: id={message_id}, fragment={index}");
        }

        drop(permit);
        Ok(message_id)
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "count is bounded by MAX_FRAGMENTS before narrowing"
    )]
    fn checked_count(&self, len: usize) -> Result<u8, SendError> {
        if len == 0 {
            return Err(SendError::EmptyMessage);
        }
        if len > self.max_message_size.get() {
            return Err(SendError::MessageTooLarge {
                len,
                limit: self.max_message_size.get(),
            });
        }
        let count = self.fragment_count(len);
        if count > MAX_FRAGMENTS {
            return Err(SendError::TooManyFragments {
                count,
                limit: MAX_FRAGMENTS,
            });
        }
        Ok(count as u8)
    }
}

/// Header and payload slice of a single outbound fragment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FragmentFrame<'a> {
    header: FrameHeader,
    payload: &'a [u8],
}

impl<'a> FragmentFrame<'a> {
    /// Construct a fragment frame.
    #[must_use]
    pub const fn new(header: FrameHeader, payload: &'a [u8]) -> Self { Self { header, payload } }

    /// Return the fragment header.
    #[must_use]
    pub const fn header(&self) -> &FrameHeader { &self.header }

    /// Return the fragment payload bytes.
    #[must_use]
    pub const fn payload(&self) -> &'a [u8] { self.payload }
}

/// Iterator over the fragments of one message, in index order.
#[derive(Clone, Debug)]
pub struct Fragments<'a> {
    message_id: MessageId,
    destination: NodeAddress,
    source: NodeAddress,
    count: u8,
    chunks: Enumerate<Chunks<'a, u8>>,
}

impl Fragments<'_> {
    /// Identifier shared by every fragment.
    #[must_use]
    pub const fn message_id(&self) -> MessageId { self.message_id }

    /// Total number of fragments in the message.
    #[must_use]
    pub const fn fragment_count(&self) -> u8 { self.count }
}

impl<'a> Iterator for Fragments<'a> {
    type Item = FragmentFrame<'a>;

    #[expect(
        clippy::cast_possible_truncation,
        reason = "indices stay below the fragment count, which fits in four bits"
    )]
    fn next(&mut self) -> Option<Self::Item> {
        let (index, chunk) = self.chunks.next()?;
        let header = FrameHeader::new(
            self.message_id,
            self.count,
            FragmentIndex::new(index as u8),
            self.destination,
            self.source,
        );
        Some(FragmentFrame::new(header, chunk))
    }

    fn size_hint(&self) -> (usize, Option<usize>) { self.chunks.size_hint() }
}

impl ExactSizeIterator for Fragments<'_> {}
