//! Lever switch firmware.
//!
//! Two contacts report the lever position: one closes when the lever is in
//! the "open" position, the other in the "closed" position. Each tick the
//! contacts are sampled into a 2-bit pattern (`closed << 1 | open`) and fed
//! through a [`Debouncer`]. A stable pattern with exactly one contact
//! asserted commits the matching status. Both or neither contact asserted
//! is never committed; the last committed status stays in place.
//!
//! A commit that changes the status pulls the attention line low so the
//! host can notice the change without polling. The host releases the line
//! again with a reset command.

use serde::{Deserialize, Serialize};
use statuslink_core::constants::{STATUS_ACK, STATUS_NONE};
use statuslink_core::{LeverStatus, Result};
use statuslink_hardware::{Level, SignalLine};
use statuslink_protocol::{CommandFrame, FrameError, LeverCommand};
use tracing::{debug, info};

use crate::config::LeverConfig;
use crate::debounce::Debouncer;
use crate::driver::Tick;
use crate::events::DeviceEvent;
use crate::firmware::Firmware;

const PATTERN_OPEN: u8 = 0b01;
const PATTERN_CLOSED: u8 = 0b10;

/// Contact inputs, normalized to active-high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LeverInputs {
    pub open: bool,
    pub closed: bool,
}

impl LeverInputs {
    #[must_use]
    pub fn new(open: bool, closed: bool) -> Self {
        Self { open, closed }
    }

    /// Normalize raw pin levels. The contacts pull their pins low when made.
    ///
    /// ```
    /// use statuslink_emulator::LeverInputs;
    /// use statuslink_hardware::Level;
    ///
    /// let inputs = LeverInputs::from_levels(Level::High, Level::Low);
    /// assert_eq!(inputs, LeverInputs::new(false, true));
    /// ```
    #[must_use]
    pub fn from_levels(open: Level, closed: Level) -> Self {
        Self {
            open: open.is_active_low_asserted(),
            closed: closed.is_active_low_asserted(),
        }
    }

    /// Pack as `closed << 1 | open`.
    #[must_use]
    pub fn pattern(&self) -> u8 {
        (u8::from(self.closed) << 1) | u8::from(self.open)
    }

    #[must_use]
    pub fn from_pattern(pattern: u8) -> Self {
        Self {
            open: pattern & PATTERN_OPEN != 0,
            closed: pattern & PATTERN_CLOSED != 0,
        }
    }
}

/// Lever device state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lever {
    status: LeverStatus,
    debouncer: Debouncer,
    attention: SignalLine,
}

impl Lever {
    /// Power-on state: status unknown, attention line released.
    #[must_use]
    pub fn new(config: &LeverConfig) -> Self {
        Self {
            status: LeverStatus::Unknown,
            debouncer: Debouncer::new(config.debounce_threshold),
            attention: SignalLine::new(),
        }
    }

    /// Release the attention line.
    pub fn reset(&mut self) {
        self.attention.release();
    }

    /// Reply status for a get-status command. Always 1-3.
    #[must_use]
    pub fn get_status(&self) -> u8 {
        self.status.code()
    }

    /// Overwrite the committed status.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidLeverStatus` for codes outside 1-3; the status
    /// is left untouched.
    pub fn set_status(&mut self, code: u8) -> Result<LeverStatus> {
        let status = LeverStatus::from_code(code)?;
        if status != self.status {
            info!("lever: status set {} -> {}", self.status, status);
        }
        self.status = status;
        Ok(status)
    }

    /// Run one debounce step.
    ///
    /// Returns the new status when a commit changed it.
    pub fn on_tick(&mut self, inputs: LeverInputs) -> Option<LeverStatus> {
        let committed = match self.debouncer.sample(inputs.pattern())? {
            PATTERN_CLOSED => LeverStatus::Closed,
            PATTERN_OPEN => LeverStatus::Open,
            pattern => {
                debug!(
                    "lever: stable ambiguous inputs {:?}, keeping {}",
                    LeverInputs::from_pattern(pattern),
                    self.status
                );
                return None;
            }
        };

        if committed == self.status {
            return None;
        }

        info!("lever: {} -> {}", self.status, committed);
        self.status = committed;
        self.attention.assert_low();
        Some(committed)
    }

    #[must_use]
    pub fn status(&self) -> LeverStatus {
        self.status
    }

    /// Last input pattern the debounce accepted.
    #[must_use]
    pub fn inputs(&self) -> LeverInputs {
        LeverInputs::from_pattern(self.debouncer.accepted())
    }

    #[must_use]
    pub fn attention(&self) -> SignalLine {
        self.attention
    }
}

impl Default for Lever {
    fn default() -> Self {
        Self::new(&LeverConfig::default())
    }
}

impl Firmware for Lever {
    const NAME: &'static str = "lever";

    fn execute(&mut self, frame: CommandFrame) -> std::result::Result<u8, FrameError> {
        let status = match LeverCommand::from_frame(frame)? {
            LeverCommand::Reset => {
                self.reset();
                STATUS_ACK
            }
            LeverCommand::GetStatus => self.get_status(),
            LeverCommand::SetStatus(code) => match self.set_status(code) {
                Ok(_) => STATUS_ACK,
                Err(e) => {
                    debug!("lever: {}", e);
                    STATUS_NONE
                }
            },
        };
        Ok(status)
    }
}

impl Tick for Lever {
    type Input = LeverInputs;

    fn tick(&mut self, inputs: LeverInputs) -> Option<DeviceEvent> {
        self.on_tick(inputs)
            .map(|status| DeviceEvent::LeverCommitted { status })
    }
}
