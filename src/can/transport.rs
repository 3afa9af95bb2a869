//! Message transport over a CAN controller.

use std::{num::NonZeroUsize, sync::Arc};

use embedded_can::Frame;
use log::{debug, trace, warn};

use super::{AcceptanceFilter, CanBus, CanFrame, frame::MAX_PAYLOAD};
use crate::{
    NodeAddress,
    Transport,
    TransportConfig,
    error::{ConfigError, TransportError},
    fragment::{Fragmenter, PushOutcome, Reassembler, SendContext, SendError},
    metrics::{self, Direction},
};

/// [`Transport`] implementation for a CAN bus.
///
/// Outbound messages are split into eight-byte fragments with the header in
/// the extended identifier. Inbound frames are read one per
/// [`data_available`](Transport::data_available) call and fed to the
/// reassembler; the controller's acceptance filter admits only frames for
/// this node or broadcast.
#[derive(Debug)]
pub struct CanTransport<B> {
    bus: B,
    address: NodeAddress,
    initialized: bool,
    fragmenter: Fragmenter,
    reassembler: Reassembler,
    context: Arc<SendContext>,
}

impl<B: CanBus> CanTransport<B> {
    /// Create a transport with its own send context.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `config` fails validation or its chunk size
    /// exceeds a CAN frame.
    pub fn new(bus: B, config: TransportConfig) -> Result<Self, ConfigError> {
        Self::with_context(bus, config, Arc::new(SendContext::new()))
    }

    /// Create a transport sharing `context` with other transports of the
    /// same node.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `config` fails validation or its chunk size
    /// exceeds a CAN frame.
    pub fn with_context(
        bus: B,
        config: TransportConfig,
        context: Arc<SendContext>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if config.chunk_size.get() > MAX_PAYLOAD {
            return Err(ConfigError::ChunkTooLarge {
                chunk_size: config.chunk_size.get(),
                limit: MAX_PAYLOAD,
            });
        }
        Ok(Self {
            bus,
            address: config.node_address,
            initialized: false,
            fragmenter: Fragmenter::from_config(&config),
            reassembler: Reassembler::from_config(&config),
            context,
        })
    }

    /// Borrow the controller.
    #[must_use]
    pub const fn bus(&self) -> &B { &self.bus }

    /// Mutably borrow the controller.
    pub const fn bus_mut(&mut self) -> &mut B { &mut self.bus }

    /// Borrow the reassembler, for inspecting slot state.
    #[must_use]
    pub const fn reassembler(&self) -> &Reassembler { &self.reassembler }

    /// The send context used for outbound messages.
    #[must_use]
    pub fn context(&self) -> &Arc<SendContext> { &self.context }

    /// Report whether [`Transport::init`] has succeeded.
    #[must_use]
    pub const fn is_initialized(&self) -> bool { self.initialized }

    fn program_filters(&mut self) -> Result<(), TransportError> {
        let filter = AcceptanceFilter::for_node(self.address);
        self.bus
            .configure_filters(filter)
            .map_err(|err| TransportError::Filters {
                address: self.address,
                reason: format!("{err:?}"),
            })?;
        debug!("acceptance filters programmed: node={}", self.address);
        Ok(())
    }

    /// Read and process at most one pending frame.
    fn poll_frame(&mut self) -> bool {
        if !self.bus.frame_pending() {
            return false;
        }
        let Some(frame) = self.bus.read_frame() else {
            return false;
        };
        metrics::inc_frames(Direction::Inbound);
        let header = frame.header();
        trace!(
            "frame received: id={:#010x}, from={}, to={}, part={}/{}, msg={}",
            header.encode(),
            header.source(),
            header.destination(),
            header.fragment_index(),
            header.fragment_count(),
            header.message_id()
        );
        matches!(
            self.reassembler.push(header, frame.data()),
            PushOutcome::Complete { .. }
        )
    }
}

impl<B: CanBus> Transport for CanTransport<B> {
    fn init(&mut self) -> Result<(), TransportError> {
        debug!("initialising CAN transport: node={}", self.address);
        self.initialized = false;
        self.bus
            .begin()
            .map_err(|err| TransportError::Init(format!("{err:?}")))?;
        self.reassembler.clear();
        self.program_filters()?;
        self.initialized = true;
        Ok(())
    }

    fn address(&self) -> NodeAddress { self.address }

    fn set_address(&mut self, address: NodeAddress) -> Result<(), TransportError> {
        self.address = address;
        if self.initialized {
            self.program_filters()?;
        }
        Ok(())
    }

    fn data_available(&mut self) -> bool { self.poll_frame() || self.reassembler.has_ready() }

    fn send(
        &mut self,
        destination: NodeAddress,
        payload: &[u8],
        _no_ack: bool,
    ) -> Result<(), SendError> {
        if !self.initialized {
            return Err(SendError::NotInitialized);
        }
        let bus = &mut self.bus;
        let result = self.fragmenter.send(
            &self.context,
            destination,
            self.address,
            payload,
            |fragment| {
                let frame = CanFrame::from_fragment(*fragment.header(), fragment.payload())
                    .ok_or_else(|| String::from("fragment does not fit a CAN frame"))?;
                bus.transmit(&frame).map_err(|err| format!("{err:?}"))?;
                metrics::inc_frames(Direction::Outbound);
                Ok::<(), String>(())
            },
        );
        match result {
            Ok(message_id) => {
                metrics::inc_messages(Direction::Outbound);
                debug!(
                    "message sent: id={message_id}, to={destination}, len={}",
                    payload.len()
                );
                Ok(())
            }
            Err(err) => {
                metrics::inc_send_failures();
                warn!("send failed: to={destination}, len={}, error={err}", payload.len());
                Err(err)
            }
        }
    }

    fn receive(&mut self, out: &mut [u8]) -> Option<usize> {
        let len = self.reassembler.receive(out)?;
        metrics::inc_messages(Direction::Inbound);
        Some(len)
    }

    fn chunk_size(&self) -> NonZeroUsize { self.fragmenter.chunk_size() }

    fn max_message_size(&self) -> NonZeroUsize { self.fragmenter.max_message_size() }

    fn sanity_check(&mut self) -> bool { self.initialized }

    fn tx_power_percent(&self) -> Option<i16> { Some(100) }

    fn tx_power_level(&self) -> Option<i16> { Some(100) }
}
