//! Protocol-level constants shared by the host and the emulated peripherals.
//!
//! # Frame Layout
//!
//! Every command travels as a single byte:
//!
//! ```text
//!  bit  7   6   5   4   3   2   1   0
//!      +---+-----------+---------------+
//!      | P |  command  |     data      |
//!      +---+-----------+---------------+
//! ```
//!
//! - `P` - parity guard, set so the low 7 bits plus `P` have even weight
//! - `command` - 3-bit command code
//! - `data` - 4-bit payload
//!
//! Every reply is two bytes: a status byte followed by its bitwise
//! complement. A status of `0x00` never carries a genuine answer; it is the
//! "no valid reply" sentinel.
//!
//! # Usage
//!
//! ```
//! use statuslink_core::constants::*;
//!
//! assert_eq!(INDICATOR_ADDRESS, 0x20);
//! assert_eq!(MAX_COMMAND_CODE, 0x07);
//! assert_eq!(MAX_DATA_VALUE, 0x0F);
//! ```

// ============================================================================
// Bus Addresses
// ============================================================================

/// Bus address of the tri-color indicator peripheral.
pub const INDICATOR_ADDRESS: u8 = 0x20;

/// Bus address of the lever switch peripheral.
pub const LEVER_ADDRESS: u8 = 0x24;

/// Highest address a 7-bit bus can carry.
pub const MAX_BUS_ADDRESS: u8 = 0x7F;

// ============================================================================
// Command Frame
// ============================================================================

/// Bit position of the parity guard in a command byte.
pub const PARITY_SHIFT: u8 = 7;

/// Mask selecting the parity guard of a command byte.
pub const PARITY_MASK: u8 = 1 << PARITY_SHIFT;

/// Mask selecting the seven payload bits covered by the parity guard.
pub const PAYLOAD_MASK: u8 = 0x7F;

/// Bit position of the command code in a command byte.
pub const COMMAND_SHIFT: u8 = 4;

/// Mask selecting the command code after shifting.
pub const COMMAND_MASK: u8 = 0x07;

/// Mask selecting the data nibble of a command byte.
pub const DATA_MASK: u8 = 0x0F;

/// Largest command code that fits the 3-bit field.
pub const MAX_COMMAND_CODE: u8 = COMMAND_MASK;

/// Largest data value that fits the 4-bit field.
pub const MAX_DATA_VALUE: u8 = DATA_MASK;

// ============================================================================
// Command Codes
// ============================================================================

/// Release the attention line and return to listening mode.
pub const CMD_RESET: u8 = 0x00;

/// Read the current state (indicator setting or lever status).
pub const CMD_GET_STATE: u8 = 0x01;

/// Write a new state (indicator setting or lever status).
pub const CMD_SET_STATE: u8 = 0x02;

// ============================================================================
// Indicator Data Field
// ============================================================================

/// Blink flag inside the indicator data nibble.
pub const BLINK_BIT: u8 = 0x08;

/// Bit position of the blink flag.
pub const BLINK_SHIFT: u8 = 3;

/// Color code mask inside the indicator data nibble.
pub const COLOR_MASK: u8 = 0x07;

// ============================================================================
// Response Frame
// ============================================================================

/// Status reserved as the "no valid reply" sentinel.
pub const STATUS_NONE: u8 = 0x00;

/// Status used to acknowledge reset and set commands.
pub const STATUS_ACK: u8 = 0x01;

/// Marker bit the indicator sets on every state reply so it is never zero.
pub const STATUS_MARKER: u8 = 0x80;

/// Length of a reply on the wire.
pub const RESPONSE_LEN: usize = 2;

// ============================================================================
// Timing Defaults
// ============================================================================

/// Default number of bus transactions per transport call.
///
/// The host daemon gave each command twenty tries before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u8 = 20;

/// Default number of ticks between indicator blink phase changes.
pub const DEFAULT_BLINK_THRESHOLD: u16 = 50;

/// Default indicator tick period in milliseconds.
pub const DEFAULT_INDICATOR_TICK_MS: u64 = 10;

/// Default number of consecutive stable samples before a lever transition commits.
pub const DEFAULT_DEBOUNCE_THRESHOLD: u8 = 50;

/// Default lever tick period in milliseconds.
pub const DEFAULT_LEVER_TICK_MS: u64 = 2;

/// Default interval between host polls of the lever, in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;
