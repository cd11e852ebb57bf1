//! Host controller: one transport shared by both peripheral clients.
//!
//! ```text
//! command source ──> Host::apply_command ──> IndicatorClient ─┐
//!                                                             ├─> RetryTransport ──> Bus
//! poll timer ──────> Host::poll_lever ────> LeverMonitor ─────┘
//!                         │
//!                         └──> HostEvent ──> event sink
//! ```
//!
//! Calls are synchronous and never overlap, so at most one command is in
//! flight on the bus at a time.

use statuslink_core::IndicatorSetting;
use statuslink_hardware::Bus;
use tracing::info;

use crate::config::HostConfig;
use crate::events::HostEvent;
use crate::indicator::IndicatorClient;
use crate::lever::LeverMonitor;
use crate::transport::{Result, RetryTransport};

#[derive(Debug)]
pub struct Host<B> {
    transport: RetryTransport<B>,
    indicator: IndicatorClient,
    lever: LeverMonitor,
}

impl<B: Bus> Host<B> {
    pub fn new(bus: B, config: &HostConfig) -> Self {
        info!(
            "Host starting: indicator at {}, lever at {}, {} attempts per command",
            config.indicator_address, config.lever_address, config.transport.max_attempts
        );
        Self {
            transport: RetryTransport::with_config(bus, &config.transport),
            indicator: IndicatorClient::new(config.indicator_address),
            lever: LeverMonitor::new(config.lever_address),
        }
    }

    /// Apply a textual indicator command (`"red"`, `"green blink"`, ...).
    ///
    /// # Errors
    /// Returns `TransportError::Exhausted` if the indicator never answers.
    pub fn apply_command(&mut self, command: &str) -> Result<HostEvent> {
        self.indicator.apply_command(&mut self.transport, command)
    }

    /// # Errors
    /// Returns `TransportError::Exhausted` if the indicator never answers.
    pub fn set_indicator(&mut self, setting: IndicatorSetting) -> Result<HostEvent> {
        self.indicator.set_setting(&mut self.transport, setting)
    }

    /// # Errors
    /// Returns `TransportError::Exhausted` if the indicator never answers.
    pub fn indicator_setting(&mut self) -> Result<IndicatorSetting> {
        self.indicator.get_setting(&mut self.transport)
    }

    /// Poll the lever once. See [`LeverMonitor::poll`].
    ///
    /// # Errors
    /// Returns `TransportError::Exhausted` if the lever never answers.
    pub fn poll_lever(&mut self) -> Result<Option<HostEvent>> {
        self.lever.poll(&mut self.transport)
    }

    #[must_use]
    pub fn lever(&self) -> &LeverMonitor {
        &self.lever
    }

    #[must_use]
    pub fn transport(&self) -> &RetryTransport<B> {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut RetryTransport<B> {
        &mut self.transport
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use statuslink_core::{BusAddress, Color};
    use statuslink_hardware::mock::ScriptedBus;

    #[test]
    fn test_uses_configured_addresses() {
        let config = HostConfig {
            indicator_address: BusAddress::new(0x30).unwrap(),
            ..HostConfig::default()
        };
        let mut host = Host::new(ScriptedBus::with_fallback([0x01, 0xFE]), &config);

        host.set_indicator(IndicatorSetting::new(Color::Red, false)).unwrap();
        host.poll_lever().unwrap();

        let addresses: Vec<u8> = host
            .transport()
            .bus()
            .transactions()
            .iter()
            .map(|t| t.address.as_u8())
            .collect();
        assert_eq!(addresses, vec![0x30, 0x24, 0x24]);
    }

    #[test]
    fn test_attempt_budget_from_config() {
        let config =
            HostConfig::from_json_str(r#"{ "transport": { "max_attempts": 4 } }"#).unwrap();
        let mut host = Host::new(ScriptedBus::new(), &config);

        assert!(host.indicator_setting().is_err());
        assert_eq!(host.transport().bus().transaction_count(), 4);
    }
}
