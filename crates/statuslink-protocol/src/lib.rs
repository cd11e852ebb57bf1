//! Frame codec for the peripheral command protocol.
//!
//! - [`frame`]: parity-guarded command byte and complement-checked reply pair
//! - [`commands`]: typed indicator and lever commands over those frames

pub mod commands;
pub mod frame;

pub use commands::{IndicatorCommand, LeverCommand};
pub use frame::{
    CommandFrame, FrameError, ResponseFrame, decode, encode, pack_response, parity,
    unpack_response,
};
