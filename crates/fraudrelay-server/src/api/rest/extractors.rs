//! Custom extractors
//!
//! The chatbot platform expects conversational text back for every call, so
//! the webhook extractor never rejects: a body that cannot be read or
//! parsed becomes an unrecognized event and gets the fallback reply.

use super::types::WebhookRequest;
use crate::intent::WebhookEvent;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use std::convert::Infallible;
use tracing::warn;

/// Lenient webhook body extractor
pub struct WebhookPayload(pub WebhookEvent);

#[axum::async_trait]
impl<S> FromRequest<S> for WebhookPayload
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = match Bytes::from_request(req, state).await {
            Ok(body) => body,
            Err(rejection) => {
                warn!("Failed to read webhook body: {}", rejection);
                return Ok(Self(WebhookEvent::unrecognized()));
            }
        };

        match serde_json::from_slice::<WebhookRequest>(&body) {
            Ok(request) => Ok(Self(WebhookEvent::from(request))),
            Err(e) => {
                warn!("Malformed webhook body: {}", e);
                Ok(Self(WebhookEvent::unrecognized()))
            }
        }
    }
}
