//! Timing configuration for the emulated peripherals.
//!
//! On the physical boards these numbers were baked in as timer overflow
//! counts. Here they are explicit, with defaults matching the firmware
//! behavior and loadable from JSON.
//!
//! ```
//! use statuslink_emulator::config::LeverConfig;
//!
//! let config = LeverConfig::from_json_str(r#"{ "debounce_threshold": 8 }"#).unwrap();
//! assert_eq!(config.debounce_threshold, 8);
//! assert_eq!(config.tick_period_ms, 2);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use statuslink_core::constants::{
    DEFAULT_BLINK_THRESHOLD, DEFAULT_DEBOUNCE_THRESHOLD, DEFAULT_INDICATOR_TICK_MS,
    DEFAULT_LEVER_TICK_MS,
};
use statuslink_core::{Error, Result};

/// Indicator timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    /// Ticks per blink phase; a full on/off cycle takes twice this.
    pub blink_threshold: u16,

    /// Tick period in milliseconds.
    pub tick_period_ms: u64,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            blink_threshold: DEFAULT_BLINK_THRESHOLD,
            tick_period_ms: DEFAULT_INDICATOR_TICK_MS,
        }
    }
}

impl IndicatorConfig {
    /// # Errors
    /// Returns `Error::Config` if a threshold or period is zero.
    pub fn validate(&self) -> Result<()> {
        if self.blink_threshold == 0 {
            return Err(Error::Config("blink_threshold must be at least 1".into()));
        }
        if self.tick_period_ms == 0 {
            return Err(Error::Config("tick_period_ms must be at least 1".into()));
        }
        Ok(())
    }

    /// Parse and validate a JSON document.
    ///
    /// # Errors
    /// Returns `Error::Json` for malformed input and `Error::Config` for
    /// out-of-range values.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }
}

/// Lever timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeverConfig {
    /// Consecutive identical samples required before a new input pattern is
    /// accepted.
    pub debounce_threshold: u8,

    /// Tick period in milliseconds.
    pub tick_period_ms: u64,
}

impl Default for LeverConfig {
    fn default() -> Self {
        Self {
            debounce_threshold: DEFAULT_DEBOUNCE_THRESHOLD,
            tick_period_ms: DEFAULT_LEVER_TICK_MS,
        }
    }
}

impl LeverConfig {
    /// # Errors
    /// Returns `Error::Config` if a threshold or period is zero.
    pub fn validate(&self) -> Result<()> {
        if self.debounce_threshold == 0 {
            return Err(Error::Config("debounce_threshold must be at least 1".into()));
        }
        if self.tick_period_ms == 0 {
            return Err(Error::Config("tick_period_ms must be at least 1".into()));
        }
        Ok(())
    }

    /// Parse and validate a JSON document.
    ///
    /// # Errors
    /// Returns `Error::Json` for malformed input and `Error::Config` for
    /// out-of-range values.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let indicator = IndicatorConfig::default();
        assert_eq!(indicator.blink_threshold, 50);
        assert_eq!(indicator.tick_period(), Duration::from_millis(10));
        assert!(indicator.validate().is_ok());

        let lever = LeverConfig::default();
        assert_eq!(lever.debounce_threshold, 50);
        assert!(lever.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = IndicatorConfig::from_json_str(r#"{ "tick_period_ms": 20 }"#).unwrap();
        assert_eq!(config.blink_threshold, 50);
        assert_eq!(config.tick_period_ms, 20);
    }

    #[test]
    fn test_zero_threshold_rejected() {
        let result = LeverConfig::from_json_str(r#"{ "debounce_threshold": 0 }"#);
        assert!(matches!(result, Err(Error::Config(_))));

        let result = IndicatorConfig::from_json_str(r#"{ "blink_threshold": 0 }"#);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let result = LeverConfig::from_json_str("{ debounce_threshold: }");
        assert!(matches!(result, Err(Error::Json(_))));
    }
}
