// src/error.rs
// Standardized error types for metacog

use thiserror::Error;

/// Main error type for the metacog library
#[derive(Error, Debug)]
pub enum MetacogError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("git error: {0}")]
    Git(#[from] git2::Error),

    #[error("timed out after {0}s")]
    Timeout(u64),

    #[error("unknown error: {0}")]
    Other(String),
}

/// Convenience type alias for Result using MetacogError
pub type Result<T> = std::result::Result<T, MetacogError>;

impl From<String> for MetacogError {
    fn from(s: String) -> Self {
        MetacogError::Other(s)
    }
}

impl From<tempfile::PersistError> for MetacogError {
    fn from(err: tempfile::PersistError) -> Self {
        MetacogError::Io(err.error)
    }
}
