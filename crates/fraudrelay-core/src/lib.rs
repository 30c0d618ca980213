//! FraudRelay Core - Dataset and value types shared across the workspace
//!
//! This crate provides the fundamental types used by the scoring runtime
//! and the webhook server:
//! - `Value` cells inferred from CSV text
//! - `Dataset` and `ScoredDataset` tables
//! - Error types

pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{CoreError, Result};
pub use types::{Dataset, ScoredDataset, Value};
