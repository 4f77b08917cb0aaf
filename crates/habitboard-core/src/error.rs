//! Core error types for habitboard-core.
//!
//! This module defines the error hierarchy using thiserror. Every remote
//! fetch failure is fail-fast: there is no retry layer anywhere.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for habitboard-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Non-success HTTP status from a remote API.
    #[error("HTTP {status} from {endpoint}")]
    Transport { endpoint: String, status: u16 },

    /// Connection-level failure before any status was received.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Expected JSON fields absent or unparseable in a remote response.
    #[error("Malformed response ({context}): {message}")]
    MalformedResponse { context: String, message: String },

    /// Serialized report exceeds the webhook byte budget.
    #[error("Report payload is {size} bytes, limit is {limit}")]
    PayloadTooLarge { size: usize, limit: usize },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// URL construction errors
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// IO errors (cache store, runtime construction)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Missing required configuration key
    #[error("Missing required configuration key: {0}")]
    MissingKey(String),

    /// Failed to parse the configuration file
    #[error("Failed to parse configuration at {path}: {message}")]
    ParseFailed { path: PathBuf, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
