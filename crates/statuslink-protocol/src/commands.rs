//! Typed commands for the two peripherals.
//!
//! Both peripherals share the same three command codes but give the data
//! nibble different meanings:
//!
//! | Code | Indicator | Lever |
//! |------|-----------|-------|
//! | `0x0` | reset to listening | reset attention line |
//! | `0x1` | get setting | get committed status |
//! | `0x2` | set setting (bit 3 blink, bits 2-0 color) | set status (1-3) |
//!
//! # Usage Examples
//!
//! ```
//! use statuslink_core::{Color, IndicatorSetting};
//! use statuslink_protocol::IndicatorCommand;
//!
//! let command = IndicatorCommand::SetState(IndicatorSetting::new(Color::Green, true));
//! let frame = command.to_frame();
//! assert_eq!((frame.command(), frame.data()), (0x2, 0xA));
//!
//! assert_eq!(IndicatorCommand::from_frame(frame).unwrap(), command);
//! ```

use statuslink_core::IndicatorSetting;
use statuslink_core::constants::{CMD_GET_STATE, CMD_RESET, CMD_SET_STATE};

use crate::frame::{CommandFrame, FrameError, Result};

/// Command addressed to the tri-color indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorCommand {
    /// Return the output lines to listening mode.
    Reset,

    /// Report the current color and blink flag.
    GetState,

    /// Store a new color and blink flag.
    SetState(IndicatorSetting),
}

impl IndicatorCommand {
    /// The 3-bit command code.
    #[must_use]
    pub fn code(&self) -> u8 {
        match self {
            Self::Reset => CMD_RESET,
            Self::GetState => CMD_GET_STATE,
            Self::SetState(_) => CMD_SET_STATE,
        }
    }

    /// The 4-bit data nibble.
    #[must_use]
    pub fn data(&self) -> u8 {
        match self {
            Self::SetState(setting) => setting.to_data(),
            Self::Reset | Self::GetState => 0,
        }
    }

    #[must_use]
    pub fn to_frame(&self) -> CommandFrame {
        CommandFrame::new_unchecked(self.code(), self.data())
    }

    /// Interpret a decoded frame as an indicator command.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::UnknownCommand`] for codes 3-7.
    pub fn from_frame(frame: CommandFrame) -> Result<Self> {
        match frame.command() {
            CMD_RESET => Ok(Self::Reset),
            CMD_GET_STATE => Ok(Self::GetState),
            CMD_SET_STATE => Ok(Self::SetState(IndicatorSetting::from_data(frame.data()))),
            code => Err(FrameError::UnknownCommand { code }),
        }
    }
}

/// Command addressed to the lever switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeverCommand {
    /// Release the attention line.
    Reset,

    /// Report the committed status.
    GetStatus,

    /// Overwrite the committed status.
    ///
    /// Carries the raw data value. Values above 15 do not fit a frame and
    /// the device accepts only 1-3.
    SetStatus(u8),
}

impl LeverCommand {
    #[must_use]
    pub fn code(&self) -> u8 {
        match self {
            Self::Reset => CMD_RESET,
            Self::GetStatus => CMD_GET_STATE,
            Self::SetStatus(_) => CMD_SET_STATE,
        }
    }

    #[must_use]
    pub fn data(&self) -> u8 {
        match self {
            Self::SetStatus(value) => *value,
            Self::Reset | Self::GetStatus => 0,
        }
    }

    /// Build the command frame.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::FieldOutOfRange`] if a set-status value does
    /// not fit the data nibble.
    pub fn to_frame(&self) -> Result<CommandFrame> {
        CommandFrame::new(self.code(), self.data())
    }

    /// Interpret a decoded frame as a lever command.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::UnknownCommand`] for codes 3-7.
    pub fn from_frame(frame: CommandFrame) -> Result<Self> {
        match frame.command() {
            CMD_RESET => Ok(Self::Reset),
            CMD_GET_STATE => Ok(Self::GetStatus),
            CMD_SET_STATE => Ok(Self::SetStatus(frame.data())),
            code => Err(FrameError::UnknownCommand { code }),
        }
    }
}
