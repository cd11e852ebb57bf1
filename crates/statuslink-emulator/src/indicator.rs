//! Tri-color indicator firmware.
//!
//! The indicator stores a color and a blink flag. Commands only change that
//! stored setting; the lamps themselves are recomputed by the periodic tick,
//! so a new setting becomes visible on the next tick after it was received.
//!
//! # Blinking
//!
//! Each tick advances a counter. When the counter reaches the configured
//! threshold it restarts and the blink phase toggles, giving an on/off cycle
//! of exactly `2 × threshold` ticks. While blinking, the off phase shows
//! nothing; otherwise the stored color is shown.
//!
//! # Examples
//!
//! ```
//! use statuslink_core::{Color, IndicatorSetting};
//! use statuslink_emulator::{Indicator, IndicatorConfig, LampOutput};
//!
//! let mut indicator = Indicator::new(&IndicatorConfig::default());
//! indicator.set_state(IndicatorSetting::new(Color::Red, false));
//! assert_eq!(indicator.output(), LampOutput::dark());
//!
//! indicator.on_tick();
//! assert_eq!(indicator.output(), LampOutput::RED);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use statuslink_core::constants::{STATUS_ACK, STATUS_MARKER};
use statuslink_core::{Color, ColorCode, IndicatorSetting};
use statuslink_hardware::{LineMode, SignalLine};
use statuslink_protocol::{CommandFrame, FrameError, IndicatorCommand};
use tracing::{debug, info};

use crate::config::IndicatorConfig;
use crate::events::DeviceEvent;
use crate::firmware::Firmware;
use crate::driver::Tick;

/// State of the two lamp outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LampOutput {
    pub red: bool,
    pub green: bool,
}

impl LampOutput {
    pub const RED: LampOutput = LampOutput {
        red: true,
        green: false,
    };

    pub const GREEN: LampOutput = LampOutput {
        red: false,
        green: true,
    };

    #[must_use]
    pub fn dark() -> Self {
        Self::default()
    }

    /// Lamps lit for a color code. Codes without a named color light nothing.
    #[must_use]
    pub fn for_color(color: ColorCode) -> Self {
        match color.color() {
            Some(Color::Red) => Self::RED,
            Some(Color::Green) => Self::GREEN,
            Some(Color::None) | None => Self::dark(),
        }
    }

    #[must_use]
    pub fn is_dark(&self) -> bool {
        !self.red && !self.green
    }
}

impl fmt::Display for LampOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.red, self.green) {
            (false, false) => write!(f, "off"),
            (true, false) => write!(f, "red"),
            (false, true) => write!(f, "green"),
            (true, true) => write!(f, "red+green"),
        }
    }
}

/// Indicator device state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indicator {
    setting: IndicatorSetting,
    threshold: u16,
    counter: u16,
    phase_on: bool,
    lamp_lines: LineMode,
    attention: SignalLine,
    output: LampOutput,
}

impl Indicator {
    /// Power-on state: no color, not blinking, lamps dark and driven.
    #[must_use]
    pub fn new(config: &IndicatorConfig) -> Self {
        Self {
            setting: IndicatorSetting::off(),
            threshold: config.blink_threshold.max(1),
            counter: 0,
            phase_on: true,
            lamp_lines: LineMode::Asserted,
            attention: SignalLine::new(),
            output: LampOutput::dark(),
        }
    }

    /// Release the lamp output group to high impedance (listening mode).
    ///
    /// The stored setting is kept; the lamps stay dark until the next
    /// `set_state` drives the outputs again.
    pub fn reset(&mut self) {
        self.lamp_lines = LineMode::Released;
        self.attention.release();
    }

    /// Reply status for a get-state command: marker bit, blink bit, color.
    #[must_use]
    pub fn get_state(&self) -> u8 {
        STATUS_MARKER | self.setting.to_data()
    }

    /// Store a new setting. The lamps follow on the next tick.
    pub fn set_state(&mut self, setting: IndicatorSetting) {
        if setting != self.setting {
            info!("indicator: setting {} -> {}", self.setting, setting);
        }
        self.setting = setting;
        self.lamp_lines = LineMode::Asserted;
    }

    /// Advance the blink timer and recompute the lamp outputs.
    pub fn on_tick(&mut self) {
        self.counter += 1;
        if self.counter >= self.threshold {
            self.counter = 0;
            self.phase_on = !self.phase_on;
        }

        self.output = if self.lamp_lines == LineMode::Released
            || (self.setting.blink && !self.phase_on)
        {
            LampOutput::dark()
        } else {
            LampOutput::for_color(self.setting.color)
        };
    }

    #[must_use]
    pub fn setting(&self) -> IndicatorSetting {
        self.setting
    }

    /// Lamp state as of the last tick.
    #[must_use]
    pub fn output(&self) -> LampOutput {
        self.output
    }

    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.lamp_lines == LineMode::Released
    }

    #[must_use]
    pub fn attention(&self) -> SignalLine {
        self.attention
    }
}

impl Default for Indicator {
    fn default() -> Self {
        Self::new(&IndicatorConfig::default())
    }
}

impl Firmware for Indicator {
    const NAME: &'static str = "indicator";

    fn execute(&mut self, frame: CommandFrame) -> Result<u8, FrameError> {
        let status = match IndicatorCommand::from_frame(frame)? {
            IndicatorCommand::Reset => {
                debug!("indicator: reset to listening");
                self.reset();
                STATUS_ACK
            }
            IndicatorCommand::GetState => self.get_state(),
            IndicatorCommand::SetState(setting) => {
                self.set_state(setting);
                STATUS_ACK
            }
        };
        Ok(status)
    }
}

impl Tick for Indicator {
    type Input = ();

    fn tick(&mut self, _input: ()) -> Option<DeviceEvent> {
        self.on_tick();
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::firmware::dispatch;
    use rstest::rstest;
    use statuslink_protocol::encode;

    fn indicator(threshold: u16) -> Indicator {
        Indicator::new(&IndicatorConfig {
            blink_threshold: threshold,
            ..IndicatorConfig::default()
        })
    }

    /// Tick indices at which the lamp output changed.
    fn edges(indicator: &mut Indicator, ticks: usize) -> Vec<usize> {
        let mut previous = indicator.output();
        let mut edges = Vec::new();
        for tick in 0..ticks {
            indicator.on_tick();
            if indicator.output() != previous {
                edges.push(tick);
                previous = indicator.output();
            }
        }
        edges
    }

    #[test]
    fn test_power_on_state() {
        let indicator = indicator(50);
        assert_eq!(indicator.setting(), IndicatorSetting::off());
        assert_eq!(indicator.get_state(), 0x80);
        assert!(indicator.output().is_dark());
        assert!(!indicator.is_listening());
    }

    #[rstest]
    #[case(1)]
    #[case(3)]
    #[case(50)]
    fn test_blink_period_is_twice_threshold(#[case] threshold: u16) {
        let mut indicator = indicator(threshold);
        indicator.set_state(IndicatorSetting::new(Color::Red, true));

        let threshold = usize::from(threshold);
        let edges = edges(&mut indicator, threshold * 10);
        assert!(edges.len() >= 8);

        // Each phase lasts `threshold` ticks, a full cycle twice that.
        for pair in edges[1..].windows(2) {
            assert_eq!(pair[1] - pair[0], threshold);
        }
        for pair in edges[1..].windows(3) {
            assert_eq!(pair[2] - pair[0], 2 * threshold);
        }
    }

    #[test]
    fn test_blink_alternates_red_and_off() {
        let mut indicator = indicator(2);
        indicator.set_state(IndicatorSetting::new(Color::Red, true));

        let mut seen = Vec::new();
        for _ in 0..8 {
            indicator.on_tick();
            seen.push(indicator.output());
        }
        assert!(seen.iter().all(|o| *o == LampOutput::RED || o.is_dark()));
        assert!(seen.contains(&LampOutput::RED));
        assert!(seen.iter().any(LampOutput::is_dark));
    }

    #[test]
    fn test_blink_off_is_steady_from_next_tick() {
        let mut indicator = indicator(3);
        indicator.set_state(IndicatorSetting::new(Color::Red, true));
        for _ in 0..4 {
            indicator.on_tick();
        }
        // Phase is "off" here.
        assert!(indicator.output().is_dark());

        indicator.set_state(IndicatorSetting::new(Color::Red, false));
        assert!(indicator.output().is_dark());

        for _ in 0..100 {
            indicator.on_tick();
            assert_eq!(indicator.output(), LampOutput::RED);
        }
    }

    #[rstest]
    #[case(3)]
    #[case(7)]
    fn test_unnamed_color_codes_accepted_and_dark(#[case] code: u8) {
        let mut indicator = indicator(1);
        let reply = dispatch(&mut indicator, encode(0x2, code).unwrap());
        assert_eq!(reply.status, STATUS_ACK);
        assert_eq!(indicator.get_state(), 0x80 | code);

        indicator.on_tick();
        assert!(indicator.output().is_dark());
    }

    #[test]
    fn test_reset_releases_lamps_until_next_set() {
        let mut indicator = indicator(5);
        indicator.set_state(IndicatorSetting::new(Color::Green, false));
        indicator.on_tick();
        assert_eq!(indicator.output(), LampOutput::GREEN);

        assert_eq!(dispatch(&mut indicator, encode(0x0, 0).unwrap()).status, STATUS_ACK);
        assert!(indicator.is_listening());
        indicator.on_tick();
        assert!(indicator.output().is_dark());
        assert_eq!(indicator.get_state(), 0x82);

        indicator.set_state(IndicatorSetting::new(Color::Green, false));
        indicator.on_tick();
        assert_eq!(indicator.output(), LampOutput::GREEN);
    }

    #[test]
    fn test_get_state_reply_never_zero() {
        let mut indicator = indicator(5);
        for data in 0..=0xF {
            indicator.set_state(IndicatorSetting::from_data(data));
            let reply = dispatch(&mut indicator, encode(0x1, 0).unwrap());
            assert_ne!(reply.status, 0);
            assert_eq!(reply.status & 0x0F, data);
            assert_eq!(reply.check, !reply.status);
        }
    }

    #[test]
    fn test_lamp_output_display() {
        assert_eq!(LampOutput::RED.to_string(), "red");
        assert_eq!(LampOutput::dark().to_string(), "off");
    }
}
