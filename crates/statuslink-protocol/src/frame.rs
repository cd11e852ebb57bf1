//! Byte-level frame codec.
//!
//! A command is one byte carrying a parity guard, a 3-bit command code and a
//! 4-bit data nibble. A reply is two bytes: the status and its bitwise
//! complement.
//!
//! # Wire Format
//!
//! ```text
//! command (host -> device)      reply (device -> host)
//! +---+-------+---------+       +--------+--------+
//! | P |  CCC  |  DDDD   |       | status | !status|
//! +---+-------+---------+       +--------+--------+
//!  b7  b6..b4   b3..b0           byte 0   byte 1
//! ```
//!
//! The parity bit is the low bit of the population count of `CCC:DDDD`,
//! so every well-formed command byte has even weight overall.
//!
//! # Basic Usage
//!
//! ```
//! use statuslink_protocol::frame::{decode, encode, pack_response, unpack_response};
//!
//! // Set-state, red, blinking
//! let byte = encode(0x2, 0x9).unwrap();
//! assert_eq!(byte, 0xA9);
//!
//! let frame = decode(byte).unwrap();
//! assert_eq!((frame.command(), frame.data()), (0x2, 0x9));
//!
//! let reply = pack_response(0x81);
//! assert_eq!(reply.to_bytes(), [0x81, 0x7E]);
//! assert_eq!(unpack_response(0x81, 0x7E).unwrap(), 0x81);
//! ```

use std::fmt;
use thiserror::Error;

use statuslink_core::constants::{
    COMMAND_MASK, COMMAND_SHIFT, DATA_MASK, MAX_COMMAND_CODE, MAX_DATA_VALUE, PARITY_MASK,
    PARITY_SHIFT, PAYLOAD_MASK, RESPONSE_LEN,
};

/// Errors raised while building or checking frames.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    /// The parity guard of a command byte disagrees with its payload.
    #[error("Parity mismatch in command frame 0x{frame:02X}")]
    Parity { frame: u8 },

    /// The check byte of a reply is not the complement of its status.
    #[error("Integrity check failed: status 0x{status:02X}, check 0x{check:02X}")]
    Integrity { status: u8, check: u8 },

    /// A command field does not fit its bit width.
    #[error("{field} value {value} exceeds maximum {max}")]
    FieldOutOfRange {
        field: &'static str,
        value: u8,
        max: u8,
    },

    /// The command code is not known to the receiving peripheral.
    #[error("Unknown command code {code}")]
    UnknownCommand { code: u8 },
}

pub type Result<T> = std::result::Result<T, FrameError>;

/// Parity of the seven payload bits of a command byte.
///
/// Returns `1` when the number of set bits is odd, `0` otherwise. Bit 7 of
/// the input is ignored.
#[inline]
#[must_use]
pub fn parity(bits: u8) -> u8 {
    ((bits & PAYLOAD_MASK).count_ones() & 1) as u8
}

/// A validated command frame.
///
/// Built by the sender, consumed once by the receiver, never mutated. The
/// parity guard is not stored; it is derived from the payload whenever the
/// frame is serialized, so a `CommandFrame` value is always well-formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandFrame {
    command: u8,
    data: u8,
}

impl CommandFrame {
    /// Create a frame from a command code and data nibble.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::FieldOutOfRange`] if `command` does not fit 3 bits
    /// or `data` does not fit 4 bits.
    pub fn new(command: u8, data: u8) -> Result<Self> {
        if command > MAX_COMMAND_CODE {
            return Err(FrameError::FieldOutOfRange {
                field: "command",
                value: command,
                max: MAX_COMMAND_CODE,
            });
        }
        if data > MAX_DATA_VALUE {
            return Err(FrameError::FieldOutOfRange {
                field: "data",
                value: data,
                max: MAX_DATA_VALUE,
            });
        }
        Ok(Self { command, data })
    }

    /// Create a frame without range checks (for internal use).
    ///
    /// Caller must ensure `command <= 7` and `data <= 15`.
    pub(crate) fn new_unchecked(command: u8, data: u8) -> Self {
        debug_assert!(command <= MAX_COMMAND_CODE, "command must fit 3 bits");
        debug_assert!(data <= MAX_DATA_VALUE, "data must fit 4 bits");
        Self { command, data }
    }

    #[must_use]
    pub fn command(&self) -> u8 {
        self.command
    }

    #[must_use]
    pub fn data(&self) -> u8 {
        self.data
    }

    /// The seven payload bits, `command << 4 | data`.
    #[must_use]
    pub fn payload(&self) -> u8 {
        (self.command << COMMAND_SHIFT) | self.data
    }

    /// The parity guard for this frame.
    #[must_use]
    pub fn parity(&self) -> u8 {
        parity(self.payload())
    }

    /// Serialize to the wire byte with the parity guard in bit 7.
    #[must_use]
    pub fn to_byte(&self) -> u8 {
        (self.parity() << PARITY_SHIFT) | self.payload()
    }

    /// Parse a wire byte, checking the parity guard.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::Parity`] if bit 7 disagrees with the payload.
    pub fn from_byte(byte: u8) -> Result<Self> {
        let received = (byte & PARITY_MASK) >> PARITY_SHIFT;
        if received != parity(byte) {
            return Err(FrameError::Parity { frame: byte });
        }
        Ok(Self {
            command: (byte >> COMMAND_SHIFT) & COMMAND_MASK,
            data: byte & DATA_MASK,
        })
    }
}

impl fmt::Display for CommandFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "0x{:02X} [cmd={} data={} p={}]",
            self.to_byte(),
            self.command,
            self.data,
            self.parity()
        )
    }
}

/// Encode a command and data nibble into a wire byte.
///
/// # Errors
///
/// Returns [`FrameError::FieldOutOfRange`] for values that do not fit
/// their fields.
pub fn encode(command: u8, data: u8) -> Result<u8> {
    CommandFrame::new(command, data).map(|frame| frame.to_byte())
}

/// Decode a wire byte into a command frame.
///
/// # Errors
///
/// Returns [`FrameError::Parity`] when the parity guard does not match. The
/// receiver must not execute such a frame.
pub fn decode(byte: u8) -> Result<CommandFrame> {
    CommandFrame::from_byte(byte)
}

/// Two-byte reply: status followed by its complement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResponseFrame {
    pub status: u8,
    pub check: u8,
}

impl ResponseFrame {
    /// Build a well-formed reply for `status`.
    #[must_use]
    pub fn new(status: u8) -> Self {
        Self {
            status,
            check: !status,
        }
    }

    /// Take a reply as read off the bus, without checking it.
    #[must_use]
    pub fn from_bytes(bytes: [u8; RESPONSE_LEN]) -> Self {
        Self {
            status: bytes[0],
            check: bytes[1],
        }
    }

    #[must_use]
    pub fn to_bytes(&self) -> [u8; RESPONSE_LEN] {
        [self.status, self.check]
    }

    /// Check the complement relation and return the status.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::Integrity`] when `check != !status`.
    pub fn validate(&self) -> Result<u8> {
        if self.check != !self.status {
            return Err(FrameError::Integrity {
                status: self.status,
                check: self.check,
            });
        }
        Ok(self.status)
    }
}

impl fmt::Display for ResponseFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[0x{:02X} 0x{:02X}]", self.status, self.check)
    }
}

/// Build the reply pair for `status`.
#[must_use]
pub fn pack_response(status: u8) -> ResponseFrame {
    ResponseFrame::new(status)
}

/// Validate a reply pair and extract its status.
///
/// # Errors
///
/// Returns [`FrameError::Integrity`] when `check_byte` is not the bitwise
/// complement of `status_byte`.
pub fn unpack_response(status_byte: u8, check_byte: u8) -> Result<u8> {
    ResponseFrame {
        status: status_byte,
        check: check_byte,
    }
    .validate()
}
