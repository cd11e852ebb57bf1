//! Bus abstraction layer for the status peripherals.
//!
//! This crate provides the single bus primitive the host transport is built
//! on, the peripheral-side counterpart used by emulated devices, and the
//! pin-level types those devices expose.
//!
//! # Bus Primitive
//!
//! The [`Bus`] trait performs one write-then-read transaction: a command byte
//! goes out to an address and two reply bytes come back.
//!
//! ```
//! use statuslink_core::BusAddress;
//! use statuslink_hardware::{Bus, Result};
//!
//! fn query<B: Bus>(bus: &mut B) -> Result<[u8; 2]> {
//!     bus.write_read_word(BusAddress::LEVER, 0x90)
//! }
//! ```
//!
//! # Simulation
//!
//! The [`mock`] module provides a scripted bus, an address-routing simulated
//! bus that hosts [`BusTarget`] implementations, and a deterministic noise
//! wrapper.
//!
//! # Error Handling
//!
//! All bus operations return [`Result<T>`][error::Result] using
//! [`BusError`]. A bus error only ever describes one transaction.

pub mod error;
pub mod mock;
pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{BusError, Result};
pub use traits::{Bus, BusTarget, FnTarget};
pub use types::{Level, LineMode, SignalLine};
