#![doc(html_root_url = "https://docs.rs/meshlink/latest")]
//! Public API for the `meshlink` library.
//!
//! This crate provides the link layer of a sensor mesh network over a shared
//! frame medium: a bit-packed fragment header, fragmentation of outbound
//! messages, in-order reassembly into a bounded slot pool, a CAN transport,
//! and the validating HAL consumed by the routing layer.

pub mod address;
pub mod can;
pub mod config;
pub mod error;
pub mod fragment;
pub mod hal;
pub mod metrics;
pub mod transport;

pub use address::NodeAddress;
pub use can::{CanBus, CanFrame, CanTransport, VirtualBus};
pub use config::{
    DEFAULT_CHUNK_SIZE,
    DEFAULT_MAX_MESSAGE_SIZE,
    DEFAULT_POOL_CAPACITY,
    MAX_FRAGMENTS,
    TransportConfig,
};
pub use error::{ConfigError, TransportError};
pub use fragment::{
    DropReason,
    FragmentIndex,
    FrameHeader,
    Fragmenter,
    MessageId,
    PushOutcome,
    Reassembler,
    SendContext,
    SendError,
    SlotPool,
};
pub use hal::{HalError, Indication, InboundMessage, MessageHeader, TransportHal};
pub use metrics::Direction;
pub use transport::{INVALID_RSSI, INVALID_SNR, Transport};
