//! Per-node outbound state: the message-id counter and the send guard.

#[cfg(not(loom))]
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

#[cfg(loom)]
use loom::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use super::{MessageId, SendError};

/// Outbound state shared by every message a node sends.
///
/// The context owns the three-bit message-id counter and a busy flag. Only
/// one send may hold the context at a time; a second caller receives
/// [`SendError::Busy`] rather than interleaving its fragments with the first.
/// The context is `Sync`, so several transports of one node can share it
/// behind an `Arc`.
///
/// # Examples
///
/// ```
/// use meshlink::fragment::{SendContext, SendError};
/// let context = SendContext::new();
/// let permit = context.begin().expect("context is idle");
/// assert_eq!(context.begin().err(), Some(SendError::Busy));
/// assert_eq!(permit.next_message_id().get(), 1);
/// drop(permit);
/// assert!(context.begin().is_ok());
/// ```
#[derive(Debug)]
pub struct SendContext {
    last_message_id: AtomicU8,
    busy: AtomicBool,
}

impl SendContext {
    /// Create an idle context whose first message uses id 1.
    #[must_use]
    pub fn new() -> Self { Self::starting_after(MessageId::new(0)) }

    /// Create an idle context whose first message follows `last`.
    #[must_use]
    pub fn starting_after(last: MessageId) -> Self {
        Self {
            last_message_id: AtomicU8::new(last.get()),
            busy: AtomicBool::new(false),
        }
    }

    /// Claim the context for one outbound message.
    ///
    /// # Errors
    ///
    /// Returns [`SendError::Busy`] while another [`SendPermit`] is alive.
    pub fn begin(&self) -> Result<SendPermit<'_>, SendError> {
        self.busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .map_err(|_| SendError::Busy)?;
        Ok(SendPermit { context: self })
    }

    /// Report whether a send currently holds the context.
    #[must_use]
    pub fn is_busy(&self) -> bool { self.busy.load(Ordering::Acquire) }

    /// Identifier assigned to the most recent message.
    #[must_use]
    pub fn last_message_id(&self) -> MessageId {
        MessageId::new(self.last_message_id.load(Ordering::Relaxed))
    }
}

impl Default for SendContext {
    fn default() -> Self { Self::new() }
}

/// Exclusive claim on a [`SendContext`] for the duration of one message.
///
/// Dropping the permit releases the context.
#[derive(Debug)]
pub struct SendPermit<'a> {
    context: &'a SendContext,
}

impl SendPermit<'_> {
    /// Advance the counter and return the identifier for this message.
    #[must_use]
    pub fn next_message_id(&self) -> MessageId {
        // u8 wraps at a multiple of eight, so masking keeps the sequence intact.
        let previous = self.context.last_message_id.fetch_add(1, Ordering::Relaxed);
        MessageId::new(previous.wrapping_add(1))
    }
}

impl Drop for SendPermit<'_> {
    fn drop(&mut self) { self.context.busy.store(false, Ordering::Release); }
}
