//! Tabular data types
//!
//! This module contains:
//! - Value cells
//! - Datasets and scored datasets

pub mod dataset;
pub mod value;

pub use dataset::{Dataset, ScoredDataset};
pub use value::Value;
