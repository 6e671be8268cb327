//! Error types for the Pairchat client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server could not be reached
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// An established connection was closed or broke
    #[error("Connection lost")]
    ConnectionLost,

    #[error("Failed to encode event: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Failed to reconnect after {0} attempts")]
    ReconnectExhausted(u32),
}
