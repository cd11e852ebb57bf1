//! Mock and simulated buses for testing and development.
//!
//! These buses stand in for the real two-wire adapter so the transport and
//! the emulated peripherals can be exercised without hardware.

pub mod noisy;
pub mod scripted;
pub mod simulated;

// Re-export commonly used types
pub use noisy::NoisyBus;
pub use scripted::{ScriptedBus, ScriptedReply, Transaction};
pub use simulated::SimulatedBus;
