//! In-memory CAN medium for demos and tests.
//!
//! A [`VirtualBus`] connects any number of [`BusPort`]s. A transmitted frame
//! is queued on every other started port whose acceptance filter admits it;
//! a port without a filter admits everything, like a controller before its
//! filters are programmed.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use thiserror::Error;

use super::{AcceptanceFilter, CanBus, CanFrame};

/// Failures reported by a [`BusPort`].
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum VirtualBusError {
    /// The port has not been started with [`CanBus::begin`].
    #[error("port {0} is not started")]
    NotStarted(usize),
}

#[derive(Debug, Default)]
struct PortState {
    started: bool,
    filter: Option<AcceptanceFilter>,
    inbox: VecDeque<CanFrame>,
}

#[derive(Debug, Default)]
struct Medium {
    ports: Vec<PortState>,
    frames_carried: usize,
}

/// Shared in-memory medium.
///
/// # Examples
///
/// ```
/// use meshlink::can::{CanBus, VirtualBus};
///
/// let bus = VirtualBus::new();
/// let mut port = bus.attach();
/// port.begin().expect("virtual ports always start");
/// assert!(!port.frame_pending());
/// ```
#[derive(Clone, Debug, Default)]
pub struct VirtualBus {
    medium: Arc<Mutex<Medium>>,
}

impl VirtualBus {
    /// Create an empty medium.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Connect a new port to the medium.
    #[must_use]
    pub fn attach(&self) -> BusPort {
        let mut medium = self.lock();
        medium.ports.push(PortState::default());
        BusPort {
            medium: Arc::clone(&self.medium),
            index: medium.ports.len() - 1,
        }
    }

    /// Number of frames transmitted on the medium so far.
    #[must_use]
    pub fn frames_carried(&self) -> usize { self.lock().frames_carried }

    fn lock(&self) -> MutexGuard<'_, Medium> {
        self.medium.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// One node's connection to a [`VirtualBus`].
#[derive(Debug)]
pub struct BusPort {
    medium: Arc<Mutex<Medium>>,
    index: usize,
}

impl BusPort {
    /// Position of this port on the medium.
    #[must_use]
    pub const fn index(&self) -> usize { self.index }

    /// Number of frames waiting in this port's receive queue.
    #[must_use]
    pub fn queued(&self) -> usize { self.with_state(|port| port.inbox.len()).unwrap_or_default() }

    fn lock(&self) -> MutexGuard<'_, Medium> {
        self.medium.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut PortState) -> T) -> Option<T> {
        self.lock().ports.get_mut(self.index).map(f)
    }
}

impl CanBus for BusPort {
    type Error = VirtualBusError;

    fn begin(&mut self) -> Result<(), Self::Error> {
        self.with_state(|port| {
            port.started = true;
            port.inbox.clear();
        })
        .ok_or(VirtualBusError::NotStarted(self.index))
    }

    fn configure_filters(&mut self, filter: AcceptanceFilter) -> Result<(), Self::Error> {
        let index = self.index;
        self.with_state(|port| {
            if port.started {
                port.filter = Some(filter);
                Ok(())
            } else {
                Err(VirtualBusError::NotStarted(index))
            }
        })
        .unwrap_or(Err(VirtualBusError::NotStarted(index)))
    }

    fn frame_pending(&mut self) -> bool {
        self.with_state(|port| !port.inbox.is_empty())
            .unwrap_or_default()
    }

    fn read_frame(&mut self) -> Option<CanFrame> {
        self.with_state(|port| port.inbox.pop_front()).flatten()
    }

    fn transmit(&mut self, frame: &CanFrame) -> Result<(), Self::Error> {
        let mut medium = self.lock();
        let started = medium
            .ports
            .get(self.index)
            .is_some_and(|port| port.started);
        if !started {
            return Err(VirtualBusError::NotStarted(self.index));
        }
        medium.frames_carried += 1;
        for (index, port) in medium.ports.iter_mut().enumerate() {
            let admitted = port
                .filter
                .is_none_or(|filter| filter.accepts_frame(frame));
            if index != self.index && port.started && admitted {
                port.inbox.push_back(*frame);
            }
        }
        Ok(())
    }
}
