//! CAN bus medium.
//!
//! [`CanTransport`] implements the [`Transport`](crate::Transport) capability
//! on top of any controller exposing the [`CanBus`] primitives. Each fragment
//! travels in one extended data frame: the 29-bit identifier carries the
//! fragment header, the data field up to eight payload bytes. [`VirtualBus`]
//! provides an in-memory medium for running several nodes in one process.

pub mod bus;
pub mod frame;
pub mod transport;
pub mod virtual_bus;

pub use bus::{AcceptanceFilter, CanBus};
pub use frame::{CanFrame, MAX_PAYLOAD};
pub use transport::CanTransport;
pub use virtual_bus::{BusPort, VirtualBus, VirtualBusError};

#[cfg(test)]
mod tests;
