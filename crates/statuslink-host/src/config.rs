//! Host configuration.
//!
//! ```
//! use statuslink_host::HostConfig;
//!
//! let config = HostConfig::from_json_str(r#"{
//!     "lever_address": 36,
//!     "poll_interval_ms": 500,
//!     "transport": { "max_attempts": 5 }
//! }"#).unwrap();
//!
//! assert_eq!(config.indicator_address.as_u8(), 0x20);
//! assert_eq!(config.transport.max_attempts, 5);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use statuslink_core::constants::{DEFAULT_MAX_ATTEMPTS, DEFAULT_POLL_INTERVAL_MS};
use statuslink_core::{BusAddress, Error, Result};

/// Retry transport settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Bus transactions per command before giving up.
    pub max_attempts: u8,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl TransportConfig {
    /// # Errors
    /// Returns `Error::Config` if `max_attempts` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(Error::Config("max_attempts must be at least 1".into()));
        }
        Ok(())
    }

    /// # Errors
    /// Returns `Error::Json` or `Error::Config`.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

/// Everything the host polling loop needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    pub indicator_address: BusAddress,
    pub lever_address: BusAddress,

    /// Delay between lever polls in milliseconds.
    pub poll_interval_ms: u64,

    pub transport: TransportConfig,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            indicator_address: BusAddress::INDICATOR,
            lever_address: BusAddress::LEVER,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            transport: TransportConfig::default(),
        }
    }
}

impl HostConfig {
    /// # Errors
    /// Returns `Error::Config` for a zero poll interval, a zero attempt
    /// budget, or both peripherals on the same address.
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_ms == 0 {
            return Err(Error::Config("poll_interval_ms must be at least 1".into()));
        }
        if self.indicator_address == self.lever_address {
            return Err(Error::Config(format!(
                "indicator and lever share address {}",
                self.lever_address
            )));
        }
        self.transport.validate()
    }

    /// Parse and validate a JSON document. Missing fields take their defaults.
    ///
    /// # Errors
    /// Returns `Error::Json` for malformed input (including addresses above
    /// 0x7F) and `Error::Config` for invalid values.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
