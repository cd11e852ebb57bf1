//! Bus trait definitions.
//!
//! The whole host transport sits on one primitive: write a command byte to an
//! address and read back two bytes in the same transaction. [`Bus`] is that
//! primitive; [`BusTarget`] is the peripheral end of it, used by simulated
//! buses to reach emulated devices.
//!
//! Both traits are synchronous. Each transaction is atomic from the caller's
//! point of view and completes in bounded time, so there is nothing to await.

use statuslink_core::BusAddress;
use statuslink_core::constants::RESPONSE_LEN;

use crate::error::Result;

/// Host side of the two-wire bus.
///
/// # Examples
///
/// ```
/// use statuslink_core::BusAddress;
/// use statuslink_hardware::mock::ScriptedBus;
/// use statuslink_hardware::traits::Bus;
///
/// let mut bus = ScriptedBus::with_fallback([0x81, 0x7E]);
/// let reply = bus.write_read_word(BusAddress::INDICATOR, 0x90).unwrap();
/// assert_eq!(reply, [0x81, 0x7E]);
/// ```
pub trait Bus: Send {
    /// Write `command` to the peripheral at `address` and read two bytes back.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No peripheral acknowledges the address
    /// - The adapter reports an I/O failure or timeout
    fn write_read_word(&mut self, address: BusAddress, command: u8) -> Result<[u8; RESPONSE_LEN]>;
}

impl<B: Bus + ?Sized> Bus for &mut B {
    fn write_read_word(&mut self, address: BusAddress, command: u8) -> Result<[u8; RESPONSE_LEN]> {
        (**self).write_read_word(address, command)
    }
}

impl<B: Bus + ?Sized> Bus for Box<B> {
    fn write_read_word(&mut self, address: BusAddress, command: u8) -> Result<[u8; RESPONSE_LEN]> {
        (**self).write_read_word(address, command)
    }
}

/// Peripheral side of the bus.
///
/// A target receives the raw command byte exactly as it arrived on the wire
/// (parity guard included) and always produces a two-byte reply. Frames the
/// target refuses to execute are answered with the zero-status sentinel.
pub trait BusTarget: Send {
    fn respond(&mut self, command: u8) -> [u8; RESPONSE_LEN];
}

/// Adapter turning a closure into a [`BusTarget`].
///
/// ```
/// use statuslink_hardware::traits::{BusTarget, FnTarget};
///
/// let mut echo = FnTarget(|command: u8| [command, !command]);
/// assert_eq!(echo.respond(0x21), [0x21, 0xDE]);
/// ```
pub struct FnTarget<F>(pub F);

impl<F> BusTarget for FnTarget<F>
where
    F: FnMut(u8) -> [u8; RESPONSE_LEN] + Send,
{
    fn respond(&mut self, command: u8) -> [u8; RESPONSE_LEN] {
        (self.0)(command)
    }
}
