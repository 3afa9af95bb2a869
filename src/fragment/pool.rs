//! Fixed-capacity arena of reassembly slots.
//!
//! The pool never grows. When every slot is locked and a new message starts,
//! the slot that has gone longest without advancing is evicted and its
//! partial data discarded.

use std::num::NonZeroUsize;

use super::{FragmentIndex, MessageId, Slot};
use crate::NodeAddress;

/// Summary of a message discarded to make room for a new one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EvictedMessage {
    /// Slot the message occupied.
    pub slot: usize,
    /// Source of the discarded message.
    pub source: NodeAddress,
    /// Identifier of the discarded message.
    pub message_id: MessageId,
    /// Bytes that had been accumulated.
    pub len: usize,
    /// Whether the message was already complete but not yet drained.
    pub was_ready: bool,
}

/// Result of [`SlotPool::allocate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Allocation {
    /// Index of the slot handed out.
    pub slot: usize,
    /// Message discarded to free the slot, if the pool was full.
    pub evicted: Option<EvictedMessage>,
}

/// Bounded set of reassembly slots addressed by index.
///
/// # Examples
///
/// ```
/// use std::num::NonZeroUsize;
///
/// use meshlink::fragment::SlotPool;
///
/// let mut pool = SlotPool::new(
///     NonZeroUsize::new(2).expect("non-zero"),
///     NonZeroUsize::new(32).expect("non-zero"),
/// );
/// assert_eq!(pool.allocate().slot, 0);
/// ```
#[derive(Clone, Debug)]
pub struct SlotPool {
    slots: Box<[Slot]>,
}

impl SlotPool {
    /// Create `capacity` free slots, each able to hold `slot_capacity` bytes.
    #[must_use]
    pub fn new(capacity: NonZeroUsize, slot_capacity: NonZeroUsize) -> Self {
        Self {
            slots: (0..capacity.get()).map(|_| Slot::new(slot_capacity)).collect(),
        }
    }

    /// Number of slots.
    #[must_use]
    pub fn capacity(&self) -> usize { self.slots.len() }

    /// Borrow the slot at `index`.
    #[must_use]
    pub fn slot(&self, index: usize) -> Option<&Slot> { self.slots.get(index) }

    /// Iterate over all slots in index order.
    pub fn slots(&self) -> impl Iterator<Item = &Slot> { self.slots.iter() }

    /// Number of slots holding a message.
    #[must_use]
    pub fn locked_len(&self) -> usize { self.slots.iter().filter(|slot| slot.is_locked()).count() }

    /// Report whether any slot holds a complete message.
    #[must_use]
    pub fn has_ready(&self) -> bool { self.slots.iter().any(Slot::is_ready) }

    /// Hand out a slot for a new message.
    ///
    /// The first free slot is returned; if none is free, the oldest locked
    /// slot (lowest index on ties) is reset and returned along with a summary
    /// of what it held. Ages are left alone; see [`SlotPool::touch`].
    ///
    /// The returned slot is reset but still free; the caller claims it.
    pub fn allocate(&mut self) -> Allocation {
        let free = self.slots.iter().position(|slot| !slot.is_locked());
        if let Some(slot) = free {
            return Allocation {
                slot,
                evicted: None,
            };
        }

        let mut oldest = 0;
        let mut oldest_age = 0;
        for (index, slot) in self.slots.iter().enumerate() {
            if index == 0 || slot.age() > oldest_age {
                oldest = index;
                oldest_age = slot.age();
            }
        }
        let evicted = self.slots.get_mut(oldest).map(|slot| {
            let summary = EvictedMessage {
                slot: oldest,
                source: slot.source(),
                message_id: slot.message_id(),
                len: slot.len(),
                was_ready: slot.is_ready(),
            };
            slot.reset();
            summary
        });
        Allocation {
            slot: oldest,
            evicted,
        }
    }

    /// Find the filling slot that expects fragment `index` of
    /// `(source, message_id)`.
    ///
    /// Should a retransmitted first fragment have opened a second slot for
    /// the same message, the youngest candidate wins.
    #[must_use]
    pub fn find_continuation(
        &self,
        source: NodeAddress,
        message_id: MessageId,
        index: FragmentIndex,
    ) -> Option<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.matches(source, message_id, index))
            .min_by_key(|(_, slot)| slot.age())
            .map(|(position, _)| position)
    }

    /// Record that `selected` advanced this round.
    ///
    /// Its age drops back to zero and every other locked slot ages by one, so
    /// the highest age always marks the least recently advanced slot.
    pub fn touch(&mut self, selected: usize) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if index == selected {
                slot.rejuvenate();
            } else if slot.is_locked() {
                slot.grow_older();
            }
        }
    }

    /// Index of the first slot holding a complete message.
    #[must_use]
    pub fn first_ready(&self) -> Option<usize> { self.slots.iter().position(Slot::is_ready) }

    /// Return every slot to the free state.
    pub fn clear(&mut self) { self.slots.iter_mut().for_each(Slot::reset); }

    pub(crate) fn slot_mut(&mut self, index: usize) -> Option<&mut Slot> {
        self.slots.get_mut(index)
    }
}
