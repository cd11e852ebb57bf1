//! Device-side frame handling.
//!
//! Every received command byte goes through the same path: check parity,
//! interpret the command for the concrete device, execute it and pack the
//! status into the two-byte reply. Frames that fail any of these steps are
//! not executed and are answered with the zero-status sentinel, which the
//! host treats as "no valid reply".

use statuslink_core::constants::STATUS_NONE;
use statuslink_protocol::{CommandFrame, FrameError, ResponseFrame, decode, pack_response};
use tracing::{debug, trace};

/// Command execution for one emulated device.
pub trait Firmware {
    /// Device name used in log output.
    const NAME: &'static str;

    /// Execute a parity-checked frame and return the reply status.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::UnknownCommand`] for command codes the device
    /// does not implement. Nothing is executed in that case.
    fn execute(&mut self, frame: CommandFrame) -> Result<u8, FrameError>;
}

/// Decode `byte`, run it against `device`, and build the reply.
///
/// # Examples
///
/// ```
/// use statuslink_emulator::{Indicator, IndicatorConfig, dispatch};
///
/// let mut indicator = Indicator::new(&IndicatorConfig::default());
/// assert_eq!(dispatch(&mut indicator, 0x22).to_bytes(), [0x01, 0xFE]);
/// assert_eq!(dispatch(&mut indicator, 0x90).to_bytes(), [0x82, 0x7D]);
///
/// // bad parity: not executed, zero sentinel
/// assert_eq!(dispatch(&mut indicator, 0xA2).to_bytes(), [0x00, 0xFF]);
/// ```
pub fn dispatch<F: Firmware>(device: &mut F, byte: u8) -> ResponseFrame {
    let status = decode(byte).and_then(|frame| {
        trace!("{}: executing {}", F::NAME, frame);
        device.execute(frame)
    });

    match status {
        Ok(status) => pack_response(status),
        Err(e) => {
            debug!("{}: rejected frame 0x{:02X}: {}", F::NAME, byte, e);
            pack_response(STATUS_NONE)
        }
    }
}
