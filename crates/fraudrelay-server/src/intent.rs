//! Intent dispatch
//!
//! Maps a webhook event to one of the known intents and produces the
//! fulfillment text. `IntentRouter::handle` never fails: every handler error
//! is turned into reply text here, at the handler boundary.

use crate::api::rest::types::WebhookRequest;
use fraudrelay_runtime::{RuntimeError, ScoringPipeline, ScoringRequest};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use tracing::{info, warn};

pub const UPLOAD_CSV_INTENT: &str = "Upload CSV Intent";
pub const RESULTS_QUERY_INTENT: &str = "Results Query Intent";
pub const HELP_INTENT: &str = "Help Intent";

pub const HELP_REPLY: &str = "You can upload a CSV file, and I will detect fraud in it.";
pub const FALLBACK_REPLY: &str = "Sorry, I don't understand that.";
pub const UPLOAD_SUCCESS_REPLY: &str = "Your file has been processed. Fraud predictions are ready!";

/// Known intents
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    UploadCsv,
    ResultsQuery,
    Help,
    /// Any other display name, or none at all
    Unrecognized(Option<String>),
}

impl Intent {
    /// Exact, case-sensitive match on the display name
    pub fn from_display_name(name: Option<&str>) -> Self {
        match name {
            Some(UPLOAD_CSV_INTENT) => Intent::UploadCsv,
            Some(RESULTS_QUERY_INTENT) => Intent::ResultsQuery,
            Some(HELP_INTENT) => Intent::Help,
            other => Intent::Unrecognized(other.map(str::to_string)),
        }
    }
}

/// Inbound event after boundary validation
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookEvent {
    pub intent: Intent,
    pub parameters: HashMap<String, JsonValue>,
}

impl WebhookEvent {
    pub fn new(intent: Intent, parameters: HashMap<String, JsonValue>) -> Self {
        Self { intent, parameters }
    }

    /// Event for a body that could not be understood at all
    pub fn unrecognized() -> Self {
        Self::new(Intent::Unrecognized(None), HashMap::new())
    }
}

impl From<WebhookRequest> for WebhookEvent {
    fn from(request: WebhookRequest) -> Self {
        let Some(query) = request.query_result else {
            return Self::unrecognized();
        };

        let name = query.intent.and_then(|i| i.display_name);
        Self::new(
            Intent::from_display_name(name.as_deref()),
            query.parameters.unwrap_or_default(),
        )
    }
}

/// Dispatches events to the upload / query / help handlers
#[derive(Debug, Clone)]
pub struct IntentRouter {
    pipeline: ScoringPipeline,
}

impl IntentRouter {
    pub fn new(pipeline: ScoringPipeline) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &ScoringPipeline {
        &self.pipeline
    }

    /// Produce the fulfillment text for `event`
    pub async fn handle(&self, event: &WebhookEvent) -> String {
        match &event.intent {
            Intent::UploadCsv => {
                info!(intent = UPLOAD_CSV_INTENT, "Dispatching intent");
                self.handle_upload(&event.parameters).await
            }
            Intent::ResultsQuery => {
                info!(intent = RESULTS_QUERY_INTENT, "Dispatching intent");
                self.handle_results_query().await
            }
            Intent::Help => {
                info!(intent = HELP_INTENT, "Dispatching intent");
                HELP_REPLY.to_string()
            }
            Intent::Unrecognized(name) => {
                info!(intent = ?name, "Unrecognized intent");
                FALLBACK_REPLY.to_string()
            }
        }
    }

    async fn handle_upload(&self, parameters: &HashMap<String, JsonValue>) -> String {
        match self.run_upload(parameters).await {
            Ok(()) => UPLOAD_SUCCESS_REPLY.to_string(),
            Err(e) => {
                warn!(kind = ?e.kind(), error = %e, "Upload failed");
                format!("An error occurred: {}", e)
            }
        }
    }

    async fn run_upload(
        &self,
        parameters: &HashMap<String, JsonValue>,
    ) -> Result<(), RuntimeError> {
        let request = ScoringRequest::from_parameters(parameters)?;
        self.pipeline.run(&request).await?;
        Ok(())
    }

    async fn handle_results_query(&self) -> String {
        match self.pipeline.summarize().await {
            Ok(summary) => format!(
                "I found {} fraudulent transactions out of {} total transactions.",
                summary.flagged, summary.rows
            ),
            Err(e) => {
                warn!(kind = ?e.kind(), error = %e, "Results query failed");
                format!("Could not fetch results: {}", e)
            }
        }
    }
}
