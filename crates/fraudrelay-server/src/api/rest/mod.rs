//! REST API implementation
//!
//! - types: webhook request/response payloads
//! - extractors: lenient webhook body extractor
//! - handlers: endpoint handlers
//! - router: router creation and configuration
//! - tests: unit tests for the payload types

mod extractors;
mod handlers;
mod router;
pub mod types;

// Re-export public API
pub use extractors::WebhookPayload;
pub use router::create_router;
pub use types::{
    AppState, HealthResponse, IntentInfo, QueryResult, WebhookRequest, WebhookResponse,
};
