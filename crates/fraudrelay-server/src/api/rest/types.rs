//! REST API type definitions
//!
//! Request and response types for the webhook and health endpoints. Field
//! names follow the chatbot platform's camelCase JSON.

use crate::intent::IntentRouter;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub intents: IntentRouter,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Webhook request body
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookRequest {
    #[serde(default)]
    pub query_result: Option<QueryResult>,
}

/// `queryResult` section of the webhook request
#[derive(Debug, Default, Deserialize)]
pub struct QueryResult {
    /// Classified intent
    #[serde(default)]
    pub intent: Option<IntentInfo>,

    /// Free-form intent parameters
    #[serde(default)]
    pub parameters: Option<HashMap<String, serde_json::Value>>,
}

/// `queryResult.intent` section
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentInfo {
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Webhook response body
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WebhookResponse {
    pub fulfillment_text: String,
}

impl WebhookResponse {
    pub fn new(fulfillment_text: impl Into<String>) -> Self {
        Self {
            fulfillment_text: fulfillment_text.into(),
        }
    }
}
