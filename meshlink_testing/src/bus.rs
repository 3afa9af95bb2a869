//! Scripted CAN controller.

use std::collections::VecDeque;

use meshlink::can::{AcceptanceFilter, CanBus, CanFrame};
use thiserror::Error;

/// Failures a [`ScriptedBus`] can be told to produce.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ScriptedBusError {
    /// `begin` was scripted to fail.
    #[error("controller failed to start")]
    StartFailed,
    /// The controller was used before `begin`.
    #[error("controller not started")]
    NotStarted,
    /// A transmit attempt was scripted to fail.
    #[error("transmit attempt {0} rejected")]
    Rejected(usize),
}

/// In-memory controller driven entirely by the test.
///
/// Frames queued with [`ScriptedBus::queue_frame`] are handed out in order;
/// every transmitted frame is captured. No acceptance filtering is applied
/// to queued frames; the programmed filter is only recorded.
#[derive(Debug, Default)]
pub struct ScriptedBus {
    started: bool,
    fail_begin: bool,
    fail_transmit_at: Option<usize>,
    attempts: usize,
    filter: Option<AcceptanceFilter>,
    inbound: VecDeque<CanFrame>,
    transmitted: Vec<CanFrame>,
}

impl ScriptedBus {
    /// Create a controller that starts and transmits successfully.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Make `begin` fail.
    #[must_use]
    pub fn failing_begin(mut self) -> Self {
        self.fail_begin = true;
        self
    }

    /// Reject the transmit attempt with zero-based position `attempt`.
    #[must_use]
    pub fn fail_transmit_at(mut self, attempt: usize) -> Self {
        self.fail_transmit_at = Some(attempt);
        self
    }

    /// Queue a frame for the transport to read.
    pub fn queue_frame(&mut self, frame: CanFrame) { self.inbound.push_back(frame); }

    /// Queue several frames in order.
    pub fn queue_frames(&mut self, frames: impl IntoIterator<Item = CanFrame>) {
        self.inbound.extend(frames);
    }

    /// Frames successfully transmitted so far.
    #[must_use]
    pub fn transmitted(&self) -> &[CanFrame] { &self.transmitted }

    /// Number of transmit attempts, including rejected ones.
    #[must_use]
    pub fn attempts(&self) -> usize { self.attempts }

    /// Filter most recently programmed by the transport.
    #[must_use]
    pub fn filter(&self) -> Option<AcceptanceFilter> { self.filter }

    /// Frames still waiting to be read.
    #[must_use]
    pub fn pending(&self) -> usize { self.inbound.len() }
}

impl CanBus for ScriptedBus {
    type Error = ScriptedBusError;

    fn begin(&mut self) -> Result<(), Self::Error> {
        if self.fail_begin {
            return Err(ScriptedBusError::StartFailed);
        }
        self.started = true;
        Ok(())
    }

    fn configure_filters(&mut self, filter: AcceptanceFilter) -> Result<(), Self::Error> {
        if !self.started {
            return Err(ScriptedBusError::NotStarted);
        }
        self.filter = Some(filter);
        Ok(())
    }

    fn frame_pending(&mut self) -> bool { !self.inbound.is_empty() }

    fn read_frame(&mut self) -> Option<CanFrame> { self.inbound.pop_front() }

    fn transmit(&mut self, frame: &CanFrame) -> Result<(), Self::Error> {
        if !self.started {
            return Err(ScriptedBusError::NotStarted);
        }
        let attempt = self.attempts;
        self.attempts += 1;
        if self.fail_transmit_at == Some(attempt) {
            return Err(ScriptedBusError::Rejected(attempt));
        }
        self.transmitted.push(*frame);
        Ok(())
    }
}
