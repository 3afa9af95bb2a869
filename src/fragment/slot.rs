//! A single reassembly slot and its fixed-capacity buffer.

use std::num::NonZeroUsize;

use super::{FragmentIndex, MessageId};
use crate::NodeAddress;

/// Lifecycle of a slot.
///
/// `Free → Filling` when a first fragment claims the slot, `Filling → Ready`
/// when the last fragment lands, `Ready → Free` when the message is drained.
/// Eviction and overflow return a `Filling` slot straight to `Free`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SlotState {
    /// Available for a new message.
    #[default]
    Free,
    /// Accumulating fragments of a message.
    Filling,
    /// Holding a complete message awaiting `receive`.
    Ready,
}

/// Byte buffer that never grows past the capacity it was created with.
#[derive(Clone, Debug)]
pub(crate) struct SlotBuffer {
    bytes: Box<[u8]>,
    len: usize,
}

impl SlotBuffer {
    pub(crate) fn with_capacity(capacity: NonZeroUsize) -> Self {
        Self {
            bytes: vec![0; capacity.get()].into_boxed_slice(),
            len: 0,
        }
    }

    pub(crate) fn clear(&mut self) { self.len = 0; }

    pub(crate) fn len(&self) -> usize { self.len }

    pub(crate) fn capacity(&self) -> usize { self.bytes.len() }

    pub(crate) fn as_slice(&self) -> &[u8] { self.bytes.get(..self.len).unwrap_or_default() }

    /// Append `data`, or leave the buffer untouched and return `false` if it
    /// would not fit.
    pub(crate) fn extend(&mut self, data: &[u8]) -> bool {
        let Some(end) = self.len.checked_add(data.len()) else {
            return false;
        };
        let Some(target) = self.bytes.get_mut(self.len..end) else {
            return false;
        };
        target.copy_from_slice(data);
        self.len = end;
        true
    }
}

/// One entry of the [`SlotPool`](super::SlotPool).
#[derive(Clone, Debug)]
pub struct Slot {
    state: SlotState,
    source: NodeAddress,
    message_id: MessageId,
    next_index: FragmentIndex,
    fragment_count: u8,
    age: u32,
    buffer: SlotBuffer,
}

impl Slot {
    pub(crate) fn new(capacity: NonZeroUsize) -> Self {
        Self {
            state: SlotState::Free,
            source: NodeAddress::GATEWAY,
            message_id: MessageId::default(),
            next_index: FragmentIndex::zero(),
            fragment_count: 0,
            age: 0,
            buffer: SlotBuffer::with_capacity(capacity),
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> SlotState { self.state }

    /// Report whether the slot holds a message, complete or not.
    #[must_use]
    pub const fn is_locked(&self) -> bool { !matches!(self.state, SlotState::Free) }

    /// Report whether the slot holds a complete message.
    #[must_use]
    pub const fn is_ready(&self) -> bool { matches!(self.state, SlotState::Ready) }

    /// Source of the message held by the slot.
    #[must_use]
    pub const fn source(&self) -> NodeAddress { self.source }

    /// Identifier of the message held by the slot.
    #[must_use]
    pub const fn message_id(&self) -> MessageId { self.message_id }

    /// Index the next continuation fragment must carry.
    #[must_use]
    pub const fn next_index(&self) -> FragmentIndex { self.next_index }

    /// Fragment count announced by the first fragment.
    #[must_use]
    pub const fn fragment_count(&self) -> u8 { self.fragment_count }

    /// Rounds this slot sat locked without advancing.
    #[must_use]
    pub const fn age(&self) -> u32 { self.age }

    /// Bytes accumulated so far.
    #[must_use]
    pub fn len(&self) -> usize { self.buffer.len() }

    /// Report whether no bytes have been accumulated.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.buffer.len() == 0 }

    /// Maximum number of bytes the slot can hold.
    #[must_use]
    pub fn capacity(&self) -> usize { self.buffer.capacity() }

    /// Accumulated payload bytes.
    #[must_use]
    pub fn payload(&self) -> &[u8] { self.buffer.as_slice() }

    pub(crate) fn matches(
        &self,
        source: NodeAddress,
        message_id: MessageId,
        index: FragmentIndex,
    ) -> bool {
        self.state == SlotState::Filling
            && self.source == source
            && self.message_id == message_id
            && self.next_index == index
    }

    pub(crate) fn start(&mut self, source: NodeAddress, message_id: MessageId, fragment_count: u8) {
        self.reset();
        self.state = SlotState::Filling;
        self.source = source;
        self.message_id = message_id;
        self.fragment_count = fragment_count;
    }

    /// Append a fragment and advance the expected index. Returns `false`
    /// without changing the slot if the data would not fit.
    pub(crate) fn append(&mut self, data: &[u8]) -> bool {
        let Some(next) = self.next_index.checked_increment() else {
            return false;
        };
        if !self.buffer.extend(data) {
            return false;
        }
        self.next_index = next;
        if self.next_index.get() == self.fragment_count {
            self.state = SlotState::Ready;
        }
        true
    }

    pub(crate) fn grow_older(&mut self) { self.age = self.age.saturating_add(1); }

    pub(crate) fn rejuvenate(&mut self) { self.age = 0; }

    pub(crate) fn reset(&mut self) {
        self.state = SlotState::Free;
        self.source = NodeAddress::GATEWAY;
        self.message_id = MessageId::default();
        self.next_index = FragmentIndex::zero();
        self.fragment_count = 0;
        self.age = 0;
        self.buffer.clear();
    }
}
