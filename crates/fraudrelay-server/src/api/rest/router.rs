//! Router creation and configuration

use super::handlers::*;
use super::types::AppState;
use crate::intent::IntentRouter;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create REST API router
pub fn create_router(intents: IntentRouter) -> Router {
    let state = AppState { intents };

    Router::new()
        .route("/health", get(health))
        .route("/webhook", post(webhook))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
