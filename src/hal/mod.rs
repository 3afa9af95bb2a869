//! Transport HAL: the validated message surface handed to the routing layer.
//!
//! [`TransportHal`] wraps any [`Transport`] and checks every reassembled
//! message before it leaves the link layer. The protocol version must match
//! [`PROTOCOL_VERSION`] and the length must match what the
//! [`MessageHeader`] declares, allowing for a final fragment padded to a full
//! chunk. Rejected messages are discarded and reported as indications.
//! Everything else is forwarded to the transport unchanged.

mod error;
mod indication;
mod message;
mod validate;

use std::{fmt, num::NonZeroUsize};

pub use error::HalError;
pub use indication::{Indication, IndicationCounters, IndicationHook};
use log::{debug, warn};
pub use message::{HEADER_SIZE, MessageHeader, PROTOCOL_VERSION};
pub use validate::{validate_length, validate_message};

use crate::{
    NodeAddress,
    Transport,
    config::padded_len,
    error::TransportError,
    fragment::SendError,
    metrics,
};

/// A message that passed validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InboundMessage {
    header: MessageHeader,
    bytes: Vec<u8>,
}

impl InboundMessage {
    /// Parsed protocol header.
    #[must_use]
    pub const fn header(&self) -> &MessageHeader { &self.header }

    /// The whole message, header included.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] { &self.bytes }

    /// Bytes following the header.
    #[must_use]
    pub fn payload(&self) -> &[u8] { self.bytes.get(HEADER_SIZE..).unwrap_or_default() }

    /// Length of the whole message.
    #[must_use]
    pub fn len(&self) -> usize { self.bytes.len() }

    /// Whether the message is empty. Validated messages never are.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.bytes.is_empty() }

    /// Consume the message, returning its bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> { self.bytes }
}

/// Validation layer over a [`Transport`].
///
/// # Examples
///
/// ```
/// use meshlink::{
///     CanTransport,
///     NodeAddress,
///     TransportConfig,
///     can::VirtualBus,
///     hal::{MessageHeader, TransportHal},
/// };
///
/// let bus = VirtualBus::new();
/// let node = |addr| {
///     let config = TransportConfig::new(NodeAddress::new(addr));
///     let transport = CanTransport::new(bus.attach(), config).expect("valid config");
///     TransportHal::new(transport)
/// };
/// let mut sender = node(1);
/// let mut receiver = node(2);
/// sender.init().expect("virtual bus starts");
/// receiver.init().expect("virtual bus starts");
///
/// let mut message = MessageHeader::new(NodeAddress::new(1), NodeAddress::new(2))
///     .with_payload_len(3)
///     .encode()
///     .to_vec();
/// message.extend_from_slice(b"abc");
/// sender.send(NodeAddress::new(2), &message, false).expect("send succeeds");
///
/// while !receiver.data_available() {}
/// let inbound = receiver.receive().expect("valid").expect("message ready");
/// assert_eq!(inbound.payload(), b"abc");
/// ```
pub struct TransportHal<T> {
    transport: T,
    counters: IndicationCounters,
    hook: Option<IndicationHook>,
    buffer: Box<[u8]>,
}

impl<T: Transport> TransportHal<T> {
    /// Wrap `transport`.
    ///
    /// The receive buffer holds a maximum-size message padded to whole chunks.
    pub fn new(transport: T) -> Self {
        let capacity = padded_len(transport.max_message_size().get(), transport.chunk_size());
        let buffer = vec![0; capacity].into_boxed_slice();
        Self {
            transport,
            counters: IndicationCounters::default(),
            hook: None,
            buffer,
        }
    }

    /// Install a sink called for every indication.
    #[must_use]
    pub fn on_indication<F>(mut self, hook: F) -> Self
    where
        F: FnMut(Indication) + Send + 'static,
    {
        self.hook = Some(Box::new(hook));
        self
    }

    /// Borrow the wrapped transport.
    #[must_use]
    pub const fn transport(&self) -> &T { &self.transport }

    /// Mutably borrow the wrapped transport.
    pub const fn transport_mut(&mut self) -> &mut T { &mut self.transport }

    /// Unwrap the transport.
    pub fn into_inner(self) -> T { self.transport }

    /// Indications raised so far.
    #[must_use]
    pub const fn counters(&self) -> &IndicationCounters { &self.counters }

    /// Bring up the transport.
    ///
    /// # Errors
    ///
    /// Propagates the transport's [`TransportError`].
    pub fn init(&mut self) -> Result<(), TransportError> { self.transport.init() }

    /// Address of this node.
    pub fn address(&self) -> NodeAddress { self.transport.address() }

    /// Change the address of this node.
    ///
    /// # Errors
    ///
    /// Propagates the transport's [`TransportError`].
    pub fn set_address(&mut self, address: NodeAddress) -> Result<(), TransportError> {
        self.transport.set_address(address)
    }

    /// Non-blocking poll for a complete message.
    pub fn data_available(&mut self) -> bool { self.transport.data_available() }

    /// Send a whole message.
    ///
    /// # Errors
    ///
    /// Propagates the transport's [`SendError`]. Failures raise
    /// [`Indication::ErrTx`].
    pub fn send(
        &mut self,
        destination: NodeAddress,
        message: &[u8],
        no_ack: bool,
    ) -> Result<(), SendError> {
        self.indicate(Indication::Tx);
        let result = self.transport.send(destination, message, no_ack);
        if result.is_err() {
            self.indicate(Indication::ErrTx);
        }
        result
    }

    /// Take the next complete message and validate it.
    ///
    /// Returns `Ok(None)` when nothing is ready. A message that fails
    /// validation is discarded; the next call moves on to the following one.
    ///
    /// # Errors
    ///
    /// Returns [`HalError`] when the message is rejected.
    pub fn receive(&mut self) -> Result<Option<InboundMessage>, HalError> {
        let Some(received) = self.transport.receive(&mut self.buffer) else {
            return Ok(None);
        };
        let bytes = self.buffer.get(..received).unwrap_or_default();
        let chunk_size = self.transport.chunk_size();
        let max_message_size = self.transport.max_message_size().get();
        match validate_message(bytes, chunk_size, max_message_size) {
            Ok((header, len)) => {
                if len < received {
                    debug!("chunk padding removed: received={received}, len={len}");
                }
                let message = InboundMessage {
                    header,
                    bytes: bytes.get(..len).unwrap_or_default().to_vec(),
                };
                self.indicate(Indication::Rx);
                Ok(Some(message))
            }
            Err(err) => {
                warn!("message rejected: reason={}, error={err}", err.as_str());
                metrics::inc_rejects(err.as_str());
                self.indicate(match err {
                    HalError::Version { .. } => Indication::ErrVersion,
                    HalError::Length { .. } => Indication::ErrLength,
                });
                Err(err)
            }
        }
    }

    /// Payload bytes per medium frame.
    pub fn chunk_size(&self) -> NonZeroUsize { self.transport.chunk_size() }

    /// Largest message the transport carries.
    pub fn max_message_size(&self) -> NonZeroUsize { self.transport.max_message_size() }

    /// Report whether the medium appears healthy.
    pub fn sanity_check(&mut self) -> bool { self.transport.sanity_check() }

    /// Switch the medium off.
    pub fn power_down(&mut self) { self.transport.power_down(); }

    /// Switch the medium on.
    pub fn power_up(&mut self) { self.transport.power_up(); }

    /// Put the medium to sleep.
    pub fn sleep(&mut self) { self.transport.sleep(); }

    /// Put the medium into standby.
    pub fn stand_by(&mut self) { self.transport.stand_by(); }

    /// See [`Transport::sending_rssi`].
    pub fn sending_rssi(&self) -> Option<i16> { self.transport.sending_rssi() }

    /// See [`Transport::receiving_rssi`].
    pub fn receiving_rssi(&self) -> Option<i16> { self.transport.receiving_rssi() }

    /// See [`Transport::sending_snr`].
    pub fn sending_snr(&self) -> Option<i16> { self.transport.sending_snr() }

    /// See [`Transport::receiving_snr`].
    pub fn receiving_snr(&self) -> Option<i16> { self.transport.receiving_snr() }

    /// See [`Transport::tx_power_percent`].
    pub fn tx_power_percent(&self) -> Option<i16> { self.transport.tx_power_percent() }

    /// See [`Transport::tx_power_level`].
    pub fn tx_power_level(&self) -> Option<i16> { self.transport.tx_power_level() }

    /// See [`Transport::set_tx_power_percent`].
    ///
    /// # Errors
    ///
    /// Propagates the transport's [`TransportError`].
    pub fn set_tx_power_percent(&mut self, percent: u8) -> Result<(), TransportError> {
        self.transport.set_tx_power_percent(percent)
    }

    fn indicate(&mut self, indication: Indication) {
        self.counters.record(indication);
        if let Some(hook) = &mut self.hook {
            hook(indication);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for TransportHal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportHal")
            .field("transport", &self.transport)
            .field("counters", &self.counters)
            .field("hook", &self.hook.is_some())
            .finish_non_exhaustive()
    }
}
