//! Application error types for the TVS client.
//!
//! Provides a unified error type shared by the tracker client, the progress
//! reconciler and configuration loading.

use thiserror::Error;
use tvs_protocol::ProtocolError;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Client misconfiguration, detected before any request is sent
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Configuration loading/parsing errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// The request could not be completed
    #[error("Transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success status
    #[error("Remote service returned {status}: {body}")]
    RemoteService { status: u16, body: String },

    /// Response body did not match the expected payload schema
    #[error("Decode error: {0}")]
    Decode(String),

    /// Decoded tracking data lacks fields the reconciliation needs
    #[error("Unexpected data shape: {0}")]
    DataShape(String),
}

impl From<ProtocolError> for AppError {
    fn from(e: ProtocolError) -> Self {
        AppError::Decode(e.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Transport(e.to_string())
    }
}

/// Result type alias used across the crate
pub type Result<T> = std::result::Result<T, AppError>;
