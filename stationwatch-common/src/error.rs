use thiserror::Error;

/// Common error type for StationWatch components.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration: {0}")]
    Config(String),

    #[error("Hub request failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Malformed statistics payload: {0}")]
    MalformedStats(String),

    #[error("IO: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using StationWatch's Error.
pub type Result<T> = std::result::Result<T, Error>;
