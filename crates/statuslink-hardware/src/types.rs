//! Pin-level types shared by the emulated peripherals.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Electrical level of a digital pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    High,
    Low,
}

impl Level {
    /// Interpret the level of an active-low input.
    ///
    /// The lever contacts pull their pin to ground when closed, so `Low`
    /// means the input is asserted.
    #[must_use]
    pub fn is_active_low_asserted(&self) -> bool {
        matches!(self, Level::Low)
    }
}

/// Drive mode of a side-band signal line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineMode {
    /// Pin configured as input without pull-up (high impedance, listening).
    #[default]
    Released,

    /// Pin configured as output and driven low.
    Asserted,
}

/// Attention line a peripheral uses to flag an internal state change
/// independently of the bus.
///
/// The line idles released; an external pull-up makes it read high. The
/// peripheral asserts it by driving it low and releases it again when the
/// host sends a reset.
///
/// # Examples
///
/// ```
/// use statuslink_hardware::types::{Level, SignalLine};
///
/// let mut line = SignalLine::new();
/// assert_eq!(line.level(), Level::High);
///
/// line.assert_low();
/// assert_eq!(line.level(), Level::Low);
///
/// line.release();
/// assert!(!line.is_asserted());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SignalLine {
    mode: LineMode,
}

impl SignalLine {
    /// Create a released line.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch to high impedance.
    pub fn release(&mut self) {
        self.mode = LineMode::Released;
    }

    /// Drive the line low.
    pub fn assert_low(&mut self) {
        self.mode = LineMode::Asserted;
    }

    #[must_use]
    pub fn mode(&self) -> LineMode {
        self.mode
    }

    #[must_use]
    pub fn is_asserted(&self) -> bool {
        self.mode == LineMode::Asserted
    }

    /// Level an observer reads, assuming an external pull-up.
    #[must_use]
    pub fn level(&self) -> Level {
        match self.mode {
            LineMode::Released => Level::High,
            LineMode::Asserted => Level::Low,
        }
    }
}

impl fmt::Display for SignalLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            LineMode::Released => write!(f, "released"),
            LineMode::Asserted => write!(f, "asserted"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_line_starts_released() {
        let line = SignalLine::new();
        assert_eq!(line.mode(), LineMode::Released);
        assert_eq!(line.level(), Level::High);
        assert_eq!(line.to_string(), "released");
    }

    #[test]
    fn test_signal_line_assert_and_release() {
        let mut line = SignalLine::new();
        line.assert_low();
        assert!(line.is_asserted());
        assert_eq!(line.level(), Level::Low);

        line.assert_low();
        assert!(line.is_asserted());

        line.release();
        assert_eq!(line.mode(), LineMode::Released);
    }

    #[test]
    fn test_active_low_levels() {
        assert!(Level::Low.is_active_low_asserted());
        assert!(!Level::High.is_active_low_asserted());
    }

    #[test]
    fn test_level_serialization() {
        let json = serde_json::to_string(&Level::Low).unwrap();
        assert_eq!(json, "\"low\"");
        let level: Level = serde_json::from_str(&json).unwrap();
        assert_eq!(level, Level::Low);
    }
}
