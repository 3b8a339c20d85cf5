//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid session id: {0}")]
    InvalidSessionId(String),

    #[error("Invalid model spec: {0}")]
    InvalidModelSpec(String),

    #[error("Invalid trigger marker: {0}")]
    InvalidMarker(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}
