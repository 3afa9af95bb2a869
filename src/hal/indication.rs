//! Indications raised by the HAL.
//!
//! An indication is a coarse event signal for status LEDs and counters.
//! [`IndicationCounters`] tallies every event; an optional sink installed
//! with [`TransportHal::on_indication`](super::TransportHal::on_indication)
//! receives each one as it happens.

use derive_more::Display;

/// Event reported by the HAL.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
pub enum Indication {
    /// A message was handed to the transport.
    #[display("tx")]
    Tx,
    /// A validated message was delivered upward.
    #[display("rx")]
    Rx,
    /// The transport failed to send a message.
    #[display("err-tx")]
    ErrTx,
    /// A received message carried the wrong protocol version.
    #[display("err-version")]
    ErrVersion,
    /// A received message had an unacceptable length.
    #[display("err-length")]
    ErrLength,
}

/// Callback invoked for every [`Indication`].
pub type IndicationHook = Box<dyn FnMut(Indication) + Send + 'static>;

/// Running totals of raised indications.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IndicationCounters {
    tx: u64,
    rx: u64,
    err_tx: u64,
    err_version: u64,
    err_length: u64,
}

impl IndicationCounters {
    /// Count one occurrence of `indication`.
    pub const fn record(&mut self, indication: Indication) {
        let counter = match indication {
            Indication::Tx => &mut self.tx,
            Indication::Rx => &mut self.rx,
            Indication::ErrTx => &mut self.err_tx,
            Indication::ErrVersion => &mut self.err_version,
            Indication::ErrLength => &mut self.err_length,
        };
        *counter = counter.saturating_add(1);
    }

    /// Number of times `indication` has been raised.
    #[must_use]
    pub const fn get(&self, indication: Indication) -> u64 {
        match indication {
            Indication::Tx => self.tx,
            Indication::Rx => self.rx,
            Indication::ErrTx => self.err_tx,
            Indication::ErrVersion => self.err_version,
            Indication::ErrLength => self.err_length,
        }
    }

    /// Total validation rejects.
    #[must_use]
    pub const fn rejected(&self) -> u64 { self.err_version + self.err_length }
}
