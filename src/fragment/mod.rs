//! Message fragmentation and reassembly.
//!
//! This module collects the pieces that carry messages larger than one
//! medium frame: the bit-packed [`FrameHeader`], the outbound
//! [`Fragmenter`] with its per-node [`SendContext`], and the inbound
//! [`Reassembler`] built on a fixed [`SlotPool`]. Each sub-module focuses on
//! a single concept; the types are re-exported here and at the crate root.

pub mod context;
pub mod error;
pub mod fragmenter;
pub mod header;
pub mod id;
pub mod index;
pub mod pool;
pub mod reassembler;
pub mod slot;

pub use context::{SendContext, SendPermit};
pub use error::{DropReason, SendError};
pub use fragmenter::{FragmentFrame, Fragmenter, Fragments};
pub use header::{FRAMING_BITS, FRAMING_MASK, FrameHeader, IDENTIFIER_MASK, decode, encode};
pub use id::MessageId;
pub use index::FragmentIndex;
pub use pool::{Allocation, EvictedMessage, SlotPool};
pub use reassembler::{PushOutcome, ReassembledMessage, ReassemblyStats, Reassembler};
pub use slot::{Slot, SlotState};
