//! API endpoint handlers

use super::extractors::WebhookPayload;
use super::types::*;
use axum::{extract::State, Json};

/// Health check endpoint
pub(super) async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Webhook fulfillment endpoint; always answers 200
#[axum::debug_handler]
pub(super) async fn webhook(
    State(state): State<AppState>,
    WebhookPayload(event): WebhookPayload,
) -> Json<WebhookResponse> {
    let reply = state.intents.handle(&event).await;
    Json(WebhookResponse::new(reply))
}
