//! The transport driver capability.
//!
//! One [`Transport`] implementation exists per physical medium. It moves whole
//! messages (fragmenting and reassembling as the medium requires) and exposes
//! the medium's power and signal-quality controls. The
//! [`TransportHal`](crate::hal::TransportHal) layers validation on top.

use std::num::NonZeroUsize;

use crate::{NodeAddress, error::TransportError, fragment::SendError};

/// Legacy integer sentinel for an unavailable RSSI reading.
pub const INVALID_RSSI: i16 = -256;

/// Legacy integer sentinel for an unavailable SNR reading.
pub const INVALID_SNR: i16 = -256;

/// Message-level operations of a medium driver.
///
/// Power and signal-quality methods default to "not available" so wired
/// media only implement what they support.
pub trait Transport {
    /// Bring up the medium controller.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if the controller or its filters fail.
    fn init(&mut self) -> Result<(), TransportError>;

    /// Address this node answers to.
    fn address(&self) -> NodeAddress;

    /// Change the address this node answers to.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if the medium cannot be re-targeted.
    fn set_address(&mut self, address: NodeAddress) -> Result<(), TransportError>;

    /// Non-blocking poll. Returns `true` when a complete message can be
    /// received.
    fn data_available(&mut self) -> bool;

    /// Send `payload` to `destination`, blocking until every fragment is on
    /// the medium or one is rejected. `no_ack` is reserved.
    ///
    /// # Errors
    ///
    /// Returns [`SendError`] when the payload is unsendable or the medium
    /// rejects a fragment.
    fn send(
        &mut self,
        destination: NodeAddress,
        payload: &[u8],
        no_ack: bool,
    ) -> Result<(), SendError>;

    /// Copy the next complete message into `out`, returning its length, or
    /// `None` when nothing is ready.
    fn receive(&mut self, out: &mut [u8]) -> Option<usize>;

    /// Payload bytes carried per medium frame.
    fn chunk_size(&self) -> NonZeroUsize;

    /// Largest message the transport can carry.
    fn max_message_size(&self) -> NonZeroUsize;

    /// Report whether the medium appears healthy.
    fn sanity_check(&mut self) -> bool { true }

    /// Switch the medium off.
    fn power_down(&mut self) {}

    /// Switch the medium back on.
    fn power_up(&mut self) {}

    /// Put the medium into its lowest-power listening state.
    fn sleep(&mut self) {}

    /// Put the medium into standby.
    fn stand_by(&mut self) {}

    /// Signal strength seen by the peer for our last transmission.
    fn sending_rssi(&self) -> Option<i16> { None }

    /// Signal strength of the last received frame.
    fn receiving_rssi(&self) -> Option<i16> { None }

    /// Signal-to-noise ratio seen by the peer for our last transmission.
    fn sending_snr(&self) -> Option<i16> { None }

    /// Signal-to-noise ratio of the last received frame.
    fn receiving_snr(&self) -> Option<i16> { None }

    /// Transmit power as a percentage of the maximum.
    fn tx_power_percent(&self) -> Option<i16> { None }

    /// Transmit power level in medium-specific units.
    fn tx_power_level(&self) -> Option<i16> { None }

    /// Adjust transmit power.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Unsupported`] unless the medium overrides it.
    fn set_tx_power_percent(&mut self, percent: u8) -> Result<(), TransportError> {
        let _ = percent;
        Err(TransportError::Unsupported)
    }
}
