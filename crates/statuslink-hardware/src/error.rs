//! Error types for bus operations.
//!
//! A bus error means a single transaction produced no usable reply. The
//! retry transport treats it like a corrupted reply and tries again.

use statuslink_core::BusAddress;

/// Result type alias for bus operations.
pub type Result<T> = std::result::Result<T, BusError>;

/// Errors that can occur during a bus transaction.
#[derive(Debug, thiserror::Error)]
pub enum BusError {
    /// No peripheral acknowledged the address.
    #[error("No acknowledge from {address}")]
    Nack { address: BusAddress },

    /// The bus adapter is gone.
    #[error("Bus disconnected: {device}")]
    Disconnected { device: String },

    /// Transaction did not complete in time.
    #[error("Bus timeout after {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// Generic I/O error from the bus adapter.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with custom message.
    #[error("{0}")]
    Other(String),
}

impl BusError {
    /// Create a new no-acknowledge error.
    pub fn nack(address: BusAddress) -> Self {
        Self::Nack { address }
    }

    /// Create a new disconnected error.
    pub fn disconnected(device: impl Into<String>) -> Self {
        Self::Disconnected {
            device: device.into(),
        }
    }

    /// Create a new timeout error.
    pub fn timeout(duration_ms: u64) -> Self {
        Self::Timeout { duration_ms }
    }

    /// Create a generic error with custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}
