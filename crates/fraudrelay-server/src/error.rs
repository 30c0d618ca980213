//! Server error types
//!
//! Only startup can fail; once serving, the webhook reports every problem in
//! its fulfillment text instead.

use fraudrelay_runtime::RuntimeError;
use thiserror::Error;

/// Server error type
#[derive(Error, Debug)]
pub enum ServerError {
    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Model artifacts could not be loaded, or the HTTP client could not be built
    #[error("Initialization error: {0}")]
    Init(#[from] RuntimeError),

    /// Socket / filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
