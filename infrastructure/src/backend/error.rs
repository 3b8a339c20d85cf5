//! Error types for the HTTP chat backend adapter

use super::decoder::DecodeError;
use casematch_application::GatewayError;
use thiserror::Error;

/// Result type alias for backend adapter operations
pub type Result<T> = std::result::Result<T, BackendError>;

/// Errors raised inside the HTTP adapter before they cross the port boundary
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

impl From<BackendError> for GatewayError {
    fn from(error: BackendError) -> Self {
        match error {
            BackendError::Decode(e) => GatewayError::Decode(e.to_string()),
            BackendError::Serialization(e) => GatewayError::Decode(e.to_string()),
            BackendError::Http(e) => GatewayError::Connection(e.to_string()),
            BackendError::InvalidBaseUrl(url) => {
                GatewayError::Connection(format!("invalid base URL: {}", url))
            }
        }
    }
}
