//! Runtime error types

use thiserror::Error;

/// Runtime error
///
/// One variant per failure class of the scoring flow, so callers can tell a
/// fetch failure from a schema failure without looking at message text.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Missing or malformed request parameter
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Network / HTTP failure while retrieving the source data
    #[error("Failed to fetch dataset: {0}")]
    Fetch(String),

    /// Payload is not valid UTF-8 CSV
    #[error("Failed to parse dataset: {0}")]
    Parse(String),

    /// Label column absent from the uploaded data
    #[error("Label column '{0}' not found in dataset")]
    MissingLabel(String),

    /// Feature columns or values don't fit the scaler / classifier
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Snapshot unreadable or unwritable
    #[error("Snapshot error: {0}")]
    Persistence(String),

    /// Model artifact could not be loaded or is inconsistent
    #[error("Model error: {0}")]
    Model(String),
}

/// Failure class of a `RuntimeError`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidRequest,
    Fetch,
    Parse,
    MissingLabel,
    SchemaMismatch,
    Persistence,
    Model,
}

impl RuntimeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RuntimeError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            RuntimeError::Fetch(_) => ErrorKind::Fetch,
            RuntimeError::Parse(_) => ErrorKind::Parse,
            RuntimeError::MissingLabel(_) => ErrorKind::MissingLabel,
            RuntimeError::SchemaMismatch(_) => ErrorKind::SchemaMismatch,
            RuntimeError::Persistence(_) => ErrorKind::Persistence,
            RuntimeError::Model(_) => ErrorKind::Model,
        }
    }
}

/// Result type for runtime operations
pub type Result<T> = std::result::Result<T, RuntimeError>;
