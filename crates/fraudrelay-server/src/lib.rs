//! FraudRelay webhook server library
//!
//! Exposes the router, configuration and intent dispatch for the binary and
//! for tests.

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod intent;
