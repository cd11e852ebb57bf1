use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Value errors
    #[error("Invalid bus address: 0x{0:02X} does not fit 7 bits")]
    InvalidAddress(u8),

    #[error("Invalid color code: {0}")]
    InvalidColorCode(u8),

    #[error("Invalid lever status: {0} (expected 1-3)")]
    InvalidLeverStatus(u8),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
