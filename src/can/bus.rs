//! Raw CAN controller capability driven by [`CanTransport`](super::CanTransport).

use std::fmt;

use super::CanFrame;
use crate::NodeAddress;

/// Destination filter programmed into the controller.
///
/// Frames are accepted when their destination equals the node's own address
/// or the broadcast address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AcceptanceFilter {
    node: NodeAddress,
}

impl AcceptanceFilter {
    /// Accept frames for `node` and broadcast frames.
    #[must_use]
    pub const fn for_node(node: NodeAddress) -> Self { Self { node } }

    /// The node address this filter admits.
    #[must_use]
    pub const fn node(&self) -> NodeAddress { self.node }

    /// Report whether a frame addressed to `destination` passes the filter.
    #[must_use]
    pub const fn accepts(&self, destination: NodeAddress) -> bool {
        destination.get() == self.node.get() || destination.is_broadcast()
    }

    /// Report whether `frame` passes the filter.
    #[must_use]
    pub fn accepts_frame(&self, frame: &CanFrame) -> bool {
        self.accepts(frame.header().destination())
    }
}

/// Frame-level primitives of a CAN controller.
///
/// Implementations wrap a hardware controller (or a simulated medium). None
/// of the methods may block waiting for traffic.
pub trait CanBus {
    /// Controller-specific failure.
    type Error: fmt::Debug;

    /// Start the controller.
    ///
    /// # Errors
    ///
    /// Returns the controller error if it does not come up.
    fn begin(&mut self) -> Result<(), Self::Error>;

    /// Program the acceptance filter.
    ///
    /// # Errors
    ///
    /// Returns the controller error if the filter cannot be applied.
    fn configure_filters(&mut self, filter: AcceptanceFilter) -> Result<(), Self::Error>;

    /// Report whether a received frame is waiting.
    fn frame_pending(&mut self) -> bool;

    /// Take the oldest received frame.
    fn read_frame(&mut self) -> Option<CanFrame>;

    /// Queue `frame` for transmission, returning once the controller has
    /// accepted it.
    ///
    /// # Errors
    ///
    /// Returns the controller error if the frame was not sent.
    fn transmit(&mut self, frame: &CanFrame) -> Result<(), Self::Error>;
}
