//! Domain-specific error types for health-compass

use thiserror::Error;

/// Main error type for the symptom assessment pipeline.
///
/// The three failure classes of the assessment contract map directly onto
/// variants: a missing credential is `Config`, a transport/provider failure or
/// empty payload is `Service`, and a payload that cannot be parsed into the
/// expected shape is `Schema`. All of them collapse into one generic
/// user-facing message at the shell boundary; the detail here is for logs.
#[derive(Error, Debug)]
pub enum CompassError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Assessment service error: {message}")]
    Service { message: String },

    #[error("Schema violation: {message}")]
    Schema { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<reqwest::Error> for CompassError {
    fn from(err: reqwest::Error) -> Self {
        CompassError::Service {
            message: format!("HTTP request failed: {}", err),
        }
    }
}

impl From<serde_json::Error> for CompassError {
    fn from(err: serde_json::Error) -> Self {
        CompassError::Schema {
            message: err.to_string(),
        }
    }
}

impl From<anyhow::Error> for CompassError {
    fn from(err: anyhow::Error) -> Self {
        CompassError::Internal {
            message: err.to_string(),
        }
    }
}

/// Result type alias for health-compass operations
pub type Result<T> = std::result::Result<T, CompassError>;
