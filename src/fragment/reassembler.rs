//! Inbound engine that stitches fragments back into complete messages.
//!
//! [`Reassembler`] owns a [`SlotPool`]. A first fragment claims a slot
//! (evicting the least recently advanced one if the pool is full); each
//! continuation must carry exactly the index its slot expects or it is
//! dropped. Fragments are never buffered
//! out of order, so one lost or reordered fragment stalls its message until
//! the slot is evicted. There is no fragment-level acknowledgement at this
//! layer; recovery is left to the protocol above.

use log::{debug, trace, warn};

use super::{DropReason, FrameHeader, MessageId, SlotPool};
use crate::{NodeAddress, TransportConfig, metrics};

/// Result of feeding one fragment to the [`Reassembler`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PushOutcome {
    /// The fragment was stored; the message needs more fragments.
    Pending { slot: usize },
    /// The fragment completed the message held in `slot`.
    Complete { slot: usize },
    /// The fragment was discarded.
    Dropped(DropReason),
}

/// Running totals kept by the [`Reassembler`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReassemblyStats {
    /// Messages completed.
    pub completed: u64,
    /// Partial or undrained messages discarded to free a slot.
    pub evicted: u64,
    /// Fragments discarded, for any [`DropReason`].
    pub dropped: u64,
}

/// A complete message drained from the pool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReassembledMessage {
    source: NodeAddress,
    message_id: MessageId,
    payload: Vec<u8>,
}

impl ReassembledMessage {
    /// Node the message came from.
    #[must_use]
    pub const fn source(&self) -> NodeAddress { self.source }

    /// Identifier shared by the fragments that formed this message.
    #[must_use]
    pub const fn message_id(&self) -> MessageId { self.message_id }

    /// Borrow the reassembled payload.
    #[must_use]
    pub fn payload(&self) -> &[u8] { self.payload.as_slice() }

    /// Consume the message, returning the owned payload bytes.
    #[must_use]
    pub fn into_payload(self) -> Vec<u8> { self.payload }
}

/// Slot-pool backed fragment reassembler.
#[derive(Clone, Debug)]
pub struct Reassembler {
    pool: SlotPool,
    stats: ReassemblyStats,
}

impl Reassembler {
    /// Create a reassembler over `pool`.
    #[must_use]
    pub const fn new(pool: SlotPool) -> Self {
        Self {
            pool,
            stats: ReassemblyStats {
                completed: 0,
                evicted: 0,
                dropped: 0,
            },
        }
    }

    /// Create a reassembler with a pool sized by `config`.
    ///
    /// Slots hold [`TransportConfig::slot_capacity`] bytes, leaving room for
    /// chunk padding on a maximum-size message.
    #[must_use]
    pub fn from_config(config: &TransportConfig) -> Self {
        Self::new(SlotPool::new(config.pool_capacity, config.slot_capacity()))
    }

    /// Borrow the underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &SlotPool { &self.pool }

    /// Running totals since construction or the last [`Reassembler::clear`].
    #[must_use]
    pub const fn stats(&self) -> ReassemblyStats { self.stats }

    /// Report whether a complete message is waiting to be drained.
    #[must_use]
    pub fn has_ready(&self) -> bool { self.pool.has_ready() }

    /// Process one inbound fragment.
    pub fn push(&mut self, header: FrameHeader, payload: &[u8]) -> PushOutcome {
        let index = header.fragment_index();
        let source = header.source();
        let message_id = header.message_id();

        if index.get() >= header.fragment_count() {
            return self.drop_fragment(header, DropReason::InvalidHeader);
        }

        let slot_index = if index.is_first() {
            let allocation = self.pool.allocate();
            if let Some(evicted) = allocation.evicted {
                self.stats.evicted += 1;
                metrics::inc_evictions();
                warn!(
                    "reassembly pool full, message dropped: slot={}, from={}, id={}, len={}, \
                     ready={}",
                    evicted.slot, evicted.source, evicted.message_id, evicted.len, evicted.was_ready
                );
            }
            if let Some(slot) = self.pool.slot_mut(allocation.slot) {
                slot.start(source, message_id, header.fragment_count());
            }
            allocation.slot
        } else {
            let Some(slot_index) = self.pool.find_continuation(source, message_id, index) else {
                return self.drop_fragment(header, DropReason::Unmatched);
            };
            slot_index
        };
        self.pool.touch(slot_index);

        let Some(slot) = self.pool.slot_mut(slot_index) else {
            return self.drop_fragment(header, DropReason::Unmatched);
        };
        if !slot.append(payload) {
            slot.reset();
            return self.drop_fragment(header, DropReason::Overflow);
        }
        trace!(
            "fragment stored: slot={slot_index}, from={source}, id={message_id}, part={}",
            slot.next_index()
        );

        if slot.is_ready() {
            self.stats.completed += 1;
            debug!(
                "message complete: slot={slot_index}, from={source}, id={message_id}, len={}",
                slot.len()
            );
            PushOutcome::Complete { slot: slot_index }
        } else {
            PushOutcome::Pending { slot: slot_index }
        }
    }

    /// Drain the first complete message, freeing its slot.
    ///
    /// Returns `None` when nothing is ready; that is the normal idle result.
    pub fn take_ready(&mut self) -> Option<ReassembledMessage> {
        let index = self.pool.first_ready()?;
        let slot = self.pool.slot_mut(index)?;
        let message = ReassembledMessage {
            source: slot.source(),
            message_id: slot.message_id(),
            payload: slot.payload().to_vec(),
        };
        slot.reset();
        Some(message)
    }

    /// Copy the first complete message into `out`, freeing its slot.
    ///
    /// Returns the number of bytes copied, or `None` when nothing is ready.
    /// `out` should hold at least the slot capacity; a shorter buffer
    /// receives a truncated copy.
    pub fn receive(&mut self, out: &mut [u8]) -> Option<usize> {
        let index = self.pool.first_ready()?;
        let slot = self.pool.slot_mut(index)?;
        let payload = slot.payload();
        let copied = payload.len().min(out.len());
        if copied < payload.len() {
            warn!(
                "receive buffer too small, message truncated: len={}, buffer={}",
                payload.len(),
                out.len()
            );
        }
        if let (Some(target), Some(source)) = (out.get_mut(..copied), payload.get(..copied)) {
            target.copy_from_slice(source);
        }
        slot.reset();
        Some(copied)
    }

    /// Discard every partial and complete message and reset the totals.
    pub fn clear(&mut self) {
        self.pool.clear();
        self.stats = ReassemblyStats::default();
    }

    fn drop_fragment(&mut self, header: FrameHeader, reason: DropReason) -> PushOutcome {
        self.stats.dropped += 1;
        metrics::inc_drops(reason);
        match reason {
            DropReason::Overflow => warn!(
                "partial message overflowed its slot: from={}, id={}, part={}",
                header.source(),
                header.message_id(),
                header.fragment_index()
            ),
            DropReason::Unmatched | DropReason::InvalidHeader => debug!(
                "fragment dropped: reason={reason}, from={}, id={}, part={}, total={}",
                header.source(),
                header.message_id(),
                header.fragment_index(),
                header.fragment_count()
            ),
        }
        PushOutcome::Dropped(reason)
    }
}
