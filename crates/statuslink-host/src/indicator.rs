//! Host client for the tri-color indicator.

use statuslink_core::constants::STATUS_MARKER;
use statuslink_core::{BusAddress, IndicatorSetting};
use statuslink_hardware::Bus;
use statuslink_protocol::IndicatorCommand;
use tracing::info;

use crate::events::HostEvent;
use crate::transport::{Result, RetryTransport};

/// Typed access to the indicator at one bus address.
///
/// # Examples
///
/// ```
/// use statuslink_core::{BusAddress, Color, IndicatorSetting};
/// use statuslink_hardware::mock::ScriptedBus;
/// use statuslink_host::{IndicatorClient, RetryTransport};
///
/// let mut transport = RetryTransport::new(ScriptedBus::with_fallback([0x01, 0xFE]));
/// let indicator = IndicatorClient::new(BusAddress::INDICATOR);
///
/// let event = indicator
///     .set_setting(&mut transport, IndicatorSetting::new(Color::Green, false))
///     .unwrap();
/// assert_eq!(event.to_string(), "indicator set to green");
/// assert_eq!(transport.bus().transactions()[0].command, 0x22);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorClient {
    address: BusAddress,
}

impl IndicatorClient {
    #[must_use]
    pub fn new(address: BusAddress) -> Self {
        Self { address }
    }

    #[must_use]
    pub fn address(&self) -> BusAddress {
        self.address
    }

    /// Put the indicator outputs into listening mode.
    ///
    /// # Errors
    /// Returns `TransportError::Exhausted` if the indicator never answers.
    pub fn reset<B: Bus>(&self, transport: &mut RetryTransport<B>) -> Result<()> {
        transport.send_frame(self.address, IndicatorCommand::Reset.to_frame())?;
        Ok(())
    }

    /// Read back the stored setting.
    ///
    /// # Errors
    /// Returns `TransportError::Exhausted` if the indicator never answers.
    pub fn get_setting<B: Bus>(
        &self,
        transport: &mut RetryTransport<B>,
    ) -> Result<IndicatorSetting> {
        let status = transport.send_frame(self.address, IndicatorCommand::GetState.to_frame())?;
        Ok(IndicatorSetting::from_data(status & !STATUS_MARKER))
    }

    /// Store a new setting.
    ///
    /// # Errors
    /// Returns `TransportError::Exhausted` if the indicator never answers.
    pub fn set_setting<B: Bus>(
        &self,
        transport: &mut RetryTransport<B>,
        setting: IndicatorSetting,
    ) -> Result<HostEvent> {
        transport.send_frame(self.address, IndicatorCommand::SetState(setting).to_frame())?;
        info!("Indicator set to {}", setting);
        Ok(HostEvent::ColorChanged(setting))
    }

    /// Apply a textual command such as `"red blink"`. Unknown text switches
    /// the indicator off.
    ///
    /// # Errors
    /// Returns `TransportError::Exhausted` if the indicator never answers.
    pub fn apply_command<B: Bus>(
        &self,
        transport: &mut RetryTransport<B>,
        command: &str,
    ) -> Result<HostEvent> {
        let setting = command.parse::<IndicatorSetting>().unwrap_or_default();
        self.set_setting(transport, setting)
    }
}
