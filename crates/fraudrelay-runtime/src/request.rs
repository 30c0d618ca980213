//! Upload request validation

use crate::error::{Result, RuntimeError};
use reqwest::Url;
use std::collections::HashMap;

/// Name of the webhook parameter carrying the dataset location
pub const FILE_URL_PARAM: &str = "file_url";

/// A validated request to score the CSV found at `source_url`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringRequest {
    source_url: Url,
}

impl ScoringRequest {
    /// Parse and validate a source URL (absolute, http or https)
    pub fn new(source_url: &str) -> Result<Self> {
        let url = Url::parse(source_url.trim()).map_err(|e| {
            RuntimeError::InvalidRequest(format!("'{}' is not a valid URL: {}", source_url, e))
        })?;

        match url.scheme() {
            "http" | "https" => Ok(Self { source_url: url }),
            other => Err(RuntimeError::InvalidRequest(format!(
                "unsupported URL scheme '{}', expected http or https",
                other
            ))),
        }
    }

    /// Build from webhook parameters, reading `file_url`
    pub fn from_parameters(parameters: &HashMap<String, serde_json::Value>) -> Result<Self> {
        match parameters.get(FILE_URL_PARAM) {
            Some(serde_json::Value::String(url)) => Self::new(url),
            Some(other) => Err(RuntimeError::InvalidRequest(format!(
                "parameter '{}' must be a string, got {}",
                FILE_URL_PARAM, other
            ))),
            None => Err(RuntimeError::InvalidRequest(format!(
                "missing parameter '{}'",
                FILE_URL_PARAM
            ))),
        }
    }

    pub fn source_url(&self) -> &Url {
        &self.source_url
    }
}
