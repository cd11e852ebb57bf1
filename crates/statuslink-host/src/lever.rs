//! Host client for the lever switch and the change monitor built on it.

use statuslink_core::{BusAddress, LeverPosition, LeverStatus};
use statuslink_hardware::Bus;
use statuslink_protocol::LeverCommand;
use tracing::{debug, info};

use crate::events::HostEvent;
use crate::transport::{Result, RetryTransport, TransportError};

/// Typed access to the lever at one bus address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeverClient {
    address: BusAddress,
}

impl LeverClient {
    #[must_use]
    pub fn new(address: BusAddress) -> Self {
        Self { address }
    }

    #[must_use]
    pub fn address(&self) -> BusAddress {
        self.address
    }

    /// Release the lever's attention line.
    ///
    /// # Errors
    /// Returns `TransportError::Exhausted` if the lever never answers.
    pub fn reset<B: Bus>(&self, transport: &mut RetryTransport<B>) -> Result<()> {
        transport.send_frame(self.address, LeverCommand::Reset.to_frame()?)?;
        Ok(())
    }

    /// Read and decode the committed status.
    ///
    /// # Errors
    /// Returns `TransportError::Exhausted` if the lever never answers.
    pub fn get_status<B: Bus>(&self, transport: &mut RetryTransport<B>) -> Result<LeverPosition> {
        let status = transport.send_frame(self.address, LeverCommand::GetStatus.to_frame()?)?;
        Ok(LeverPosition::from_status(status))
    }

    /// Overwrite the committed status on the device.
    ///
    /// # Errors
    /// - `TransportError::InvalidSetting` for codes outside 1-3. Nothing is
    ///   sent.
    /// - `TransportError::Exhausted` if the lever never answers. The lever
    ///   also answers an invalid code with the zero status, so a bad code
    ///   that slipped past validation ends here too.
    pub fn set_status<B: Bus>(
        &self,
        transport: &mut RetryTransport<B>,
        code: u8,
    ) -> Result<LeverStatus> {
        let status = LeverStatus::from_code(code).map_err(TransportError::InvalidSetting)?;
        let frame = LeverCommand::SetStatus(status.code()).to_frame()?;
        transport.send_frame(self.address, frame)?;
        Ok(status)
    }
}

/// Polls the lever and reports position changes.
///
/// The first successful poll only records a baseline. Later polls report a
/// [`HostEvent::LeverChanged`] whenever either decoded input flag differs
/// from the previous poll. Each poll ends with a reset so the lever's
/// attention line is released for the next change.
///
/// # Examples
///
/// ```
/// use statuslink_core::BusAddress;
/// use statuslink_hardware::mock::ScriptedBus;
/// use statuslink_host::{LeverMonitor, RetryTransport};
///
/// let mut bus = ScriptedBus::with_fallback([0x01, 0xFE]);
/// bus.push_replies([[0x01, 0xFE], [0x01, 0xFE], [0x02, 0xFD]]);
/// let mut transport = RetryTransport::new(bus);
/// let mut monitor = LeverMonitor::new(BusAddress::LEVER);
///
/// assert!(monitor.poll(&mut transport).unwrap().is_none()); // baseline: closed
/// let event = monitor.poll(&mut transport).unwrap().unwrap();
/// assert_eq!(event.to_string(), "lever open");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeverMonitor {
    client: LeverClient,
    last: Option<LeverPosition>,
}

impl LeverMonitor {
    #[must_use]
    pub fn new(address: BusAddress) -> Self {
        Self {
            client: LeverClient::new(address),
            last: None,
        }
    }

    #[must_use]
    pub fn client(&self) -> LeverClient {
        self.client
    }

    /// Last position read, if any poll has succeeded yet.
    #[must_use]
    pub fn last_position(&self) -> Option<LeverPosition> {
        self.last
    }

    /// Poll once.
    ///
    /// # Errors
    /// Returns `TransportError::Exhausted` when the lever does not answer.
    /// The last known position is kept.
    pub fn poll<B: Bus>(&mut self, transport: &mut RetryTransport<B>) -> Result<Option<HostEvent>> {
        let position = self.client.get_status(transport);

        if let Err(e) = self.client.reset(transport) {
            debug!("Lever reset after poll failed: {}", e);
        }

        let position = position?;
        let event = match self.last {
            None => {
                info!("Lever initially {}", position.describe());
                None
            }
            Some(last) if last != position => {
                info!("Lever has been switched to {}", position.describe());
                Some(HostEvent::lever_changed(position))
            }
            Some(_) => None,
        };

        self.last = Some(position);
        Ok(event)
    }
}
