//! Retry transport over the shared bus.
//!
//! The bus is noisy and shared, so a single transaction proves nothing. The
//! transport sends the same command frame back to back until a reply passes
//! the complement check and carries a non-zero status, or until the attempt
//! budget runs out.
//!
//! # Attempt accounting
//!
//! Every bus transaction costs one attempt, whatever its outcome:
//! - the bus reports an error (no acknowledge, adapter failure)
//! - the reply fails the complement check
//! - the reply is the zero-status sentinel
//!
//! None of these are surfaced individually. Only the exhausted budget is.
//!
//! # Example
//!
//! ```
//! use statuslink_core::BusAddress;
//! use statuslink_hardware::mock::ScriptedBus;
//! use statuslink_host::RetryTransport;
//!
//! let mut bus = ScriptedBus::with_fallback([0x82, 0x7D]);
//! bus.push_replies([[0x00, 0xFF], [0x82, 0x00]]);
//!
//! let mut transport = RetryTransport::new(bus);
//! assert_eq!(transport.send(BusAddress::INDICATOR, 0x1, 0x0).unwrap(), 0x82);
//! assert_eq!(transport.bus().transaction_count(), 3);
//! ```

use statuslink_core::BusAddress;
use statuslink_core::constants::STATUS_NONE;
use statuslink_hardware::Bus;
use statuslink_protocol::{CommandFrame, FrameError, ResponseFrame};
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::config::TransportConfig;

/// Errors surfaced by the retry transport and the clients built on it.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Command or data does not fit its bit field. Nothing was sent.
    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] FrameError),

    /// The requested device setting is not one the device accepts, such as
    /// a lever status outside 1-3. Nothing was sent.
    ///
    /// Together with [`TransportError::InvalidArgument`] this covers every
    /// argument rejected before the bus is touched: `InvalidArgument` for
    /// values that do not fit their bit field, `InvalidSetting` for values
    /// that fit but have no meaning on the device.
    #[error("Invalid setting: {0}")]
    InvalidSetting(#[source] statuslink_core::Error),

    /// No valid reply within the attempt budget.
    #[error("No valid reply from {address} after {attempts} attempts")]
    Exhausted { address: BusAddress, attempts: u8 },
}

impl TransportError {
    /// True when the peripheral did not answer, as opposed to the caller
    /// asking for something invalid.
    #[must_use]
    pub fn is_unreachable(&self) -> bool {
        matches!(self, TransportError::Exhausted { .. })
    }
}

pub type Result<T> = std::result::Result<T, TransportError>;

/// Bounded retry loop on top of a [`Bus`].
#[derive(Debug)]
pub struct RetryTransport<B> {
    bus: B,
    max_attempts: u8,
}

impl<B: Bus> RetryTransport<B> {
    /// Create a transport with the default attempt budget.
    pub fn new(bus: B) -> Self {
        Self::with_config(bus, &TransportConfig::default())
    }

    /// Create a transport from configuration. A zero budget is raised to 1.
    pub fn with_config(bus: B, config: &TransportConfig) -> Self {
        Self {
            bus,
            max_attempts: config.max_attempts.max(1),
        }
    }

    #[must_use]
    pub fn max_attempts(&self) -> u8 {
        self.max_attempts
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    pub fn into_inner(self) -> B {
        self.bus
    }

    /// Encode `command`/`data` and send it to `address`.
    ///
    /// # Errors
    ///
    /// - [`TransportError::InvalidArgument`] if `command` exceeds 3 bits or
    ///   `data` exceeds 4 bits. The bus is not touched.
    /// - [`TransportError::Exhausted`] if no attempt produced a valid,
    ///   non-zero status.
    pub fn send(&mut self, address: BusAddress, command: u8, data: u8) -> Result<u8> {
        let frame = CommandFrame::new(command, data)?;
        self.send_frame(address, frame)
    }

    /// Send an already-built frame to `address`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Exhausted`] if no attempt produced a valid,
    /// non-zero status.
    pub fn send_frame(&mut self, address: BusAddress, frame: CommandFrame) -> Result<u8> {
        let byte = frame.to_byte();

        for attempt in 1..=self.max_attempts {
            let bytes = match self.bus.write_read_word(address, byte) {
                Ok(bytes) => bytes,
                Err(e) => {
                    trace!("{} attempt {}: bus error: {}", address, attempt, e);
                    continue;
                }
            };

            match ResponseFrame::from_bytes(bytes).validate() {
                Ok(STATUS_NONE) => {
                    trace!("{} attempt {}: zero status", address, attempt);
                }
                Ok(status) => {
                    debug!(
                        "{} <- {} answered 0x{:02X} after {} attempt(s)",
                        address, frame, status, attempt
                    );
                    return Ok(status);
                }
                Err(e) => {
                    trace!("{} attempt {}: {}", address, attempt, e);
                }
            }
        }

        warn!(
            "Giving up on {} to {} after {} attempts",
            frame, address, self.max_attempts
        );
        Err(TransportError::Exhausted {
            address,
            attempts: self.max_attempts,
        })
    }
}
