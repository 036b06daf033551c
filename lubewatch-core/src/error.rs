//! Core error types for `LubeWatch`.

use thiserror::Error;

/// Core error type for `LubeWatch` operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid data from API response.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration file I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
