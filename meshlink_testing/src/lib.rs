//! Test utilities for driving `meshlink` transports without hardware.
//!
//! [`ScriptedBus`] stands in for a CAN controller: inbound frames are queued
//! by the test, transmitted frames are captured, and failures can be
//! injected at a chosen point. The [`messages`] helpers build protocol
//! messages and their fragment frames.
//!
//! ```rust
//! use meshlink::{CanTransport, NodeAddress, Transport, TransportConfig};
//! use meshlink_testing::ScriptedBus;
//!
//! let bus = ScriptedBus::new().fail_transmit_at(1);
//! let mut transport =
//!     CanTransport::new(bus, TransportConfig::new(NodeAddress::new(1))).expect("valid config");
//! transport.init().expect("scripted bus starts");
//! assert!(transport.send(NodeAddress::new(2), &[0; 20], false).is_err());
//! assert_eq!(transport.bus().transmitted().len(), 1);
//! ```

pub mod bus;
pub mod logging;
pub mod messages;

pub use bus::{ScriptedBus, ScriptedBusError};
pub use logging::{LoggerHandle, logger};
pub use messages::{fragment_frames, protocol_message};
