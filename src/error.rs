//! Bridge Error Types
//!
//! Errors surfaced while loading configuration and building clients.

use thiserror::Error;

/// Main error type for bridge operations
#[derive(Debug, Error)]
pub enum BridgeError {
    /// No usable credentials: the default connection is absent, no connection
    /// matched the rotation group, or the resolved connection has no API key
    #[error(
        "No OpenAI credentials resolved for the default connection or rotation group. Check `default` and `api_key` in openai.json"
    )]
    ConfigMissing,

    /// Configuration errors (invalid JSON, missing fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A configured value cannot be used as an HTTP header
    #[error("Invalid header value for '{0}'")]
    InvalidHeader(String),

    /// The underlying HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Filesystem failure outside of the rotation counter
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BridgeError {
    /// Whether this error means no credentials are configured
    pub fn is_config_missing(&self) -> bool {
        matches!(self, BridgeError::ConfigMissing)
    }
}

/// Result type alias for bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;
