//! FraudRelay Runtime - Batch scoring of uploaded transaction datasets
//!
//! This crate provides the pieces the webhook server wires together:
//! - `DatasetLoader`: fetch a CSV over HTTP(S) and parse it
//! - `ScoringModel`: feature scaler plus classifier, loaded once at startup
//! - `ResultsStore`: the single on-disk snapshot of the latest scored dataset
//! - `ScoringPipeline`: fetch → parse → validate → scale → predict → persist

pub mod codec;
pub mod error;
pub mod loader;
pub mod model;
pub mod pipeline;
pub mod request;
pub mod store;

// Re-export main types
pub use error::{ErrorKind, Result, RuntimeError};
pub use loader::DatasetLoader;
pub use model::{Classifier, FeatureScaler, ScoringModel};
pub use pipeline::{ScoringPipeline, ScoringSummary};
pub use request::ScoringRequest;
pub use store::ResultsStore;
