//! Remote dataset loader
//!
//! Fetches the uploaded CSV over HTTP(S) and decodes it into a `Dataset`.
//! Every transport problem (connect failure, timeout, non-2xx status,
//! oversized body) is reported as `RuntimeError::Fetch`; decoding problems
//! are `RuntimeError::Parse`.

use crate::codec::decode_dataset;
use crate::error::{Result, RuntimeError};
use crate::request::ScoringRequest;
use fraudrelay_core::Dataset;
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::debug;

/// Default request timeout
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Default cap on downloaded payload size (50 MiB)
pub const DEFAULT_MAX_FETCH_BYTES: usize = 50 * 1024 * 1024;

/// HTTP dataset loader
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    client: Client,
    max_bytes: usize,
}

impl DatasetLoader {
    /// Create a loader with the given request timeout and payload cap
    pub fn new(timeout: Duration, max_bytes: usize) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RuntimeError::Fetch(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, max_bytes })
    }

    /// Create a loader with the default timeout and payload cap
    pub fn with_defaults() -> Result<Self> {
        Self::new(DEFAULT_FETCH_TIMEOUT, DEFAULT_MAX_FETCH_BYTES)
    }

    /// Fetch the raw body at `url`
    pub async fn fetch(&self, url: &Url) -> Result<Vec<u8>> {
        debug!(url = %url, "Fetching dataset");

        let mut response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| RuntimeError::Fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RuntimeError::Fetch(format!(
                "GET {} returned HTTP status {}",
                url, status
            )));
        }

        if let Some(len) = response.content_length() {
            if len > self.max_bytes as u64 {
                return Err(self.too_large(url));
            }
        }

        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| RuntimeError::Fetch(e.to_string()))?
        {
            if body.len() + chunk.len() > self.max_bytes {
                return Err(self.too_large(url));
            }
            body.extend_from_slice(&chunk);
        }

        debug!(url = %url, bytes = body.len(), "Dataset fetched");
        Ok(body)
    }

    /// Fetch and decode the dataset named by `request`
    pub async fn load(&self, request: &ScoringRequest) -> Result<Dataset> {
        let body = self.fetch(request.source_url()).await?;
        decode_dataset(&body)
    }

    fn too_large(&self, url: &Url) -> RuntimeError {
        RuntimeError::Fetch(format!(
            "response from {} exceeds the {} byte limit",
            url, self.max_bytes
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use mockito::Server;
    use std::io::Write;

    #[tokio::test]
    async fn test_load_success() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/tx.csv")
            .with_status(200)
            .with_header("content-type", "text/csv")
            .with_body("amount,is_fraud\n10,0\n20,1\n")
            .create_async()
            .await;

        let loader = DatasetLoader::with_defaults().unwrap();
        let request = ScoringRequest::new(&format!("{}/tx.csv", server.url())).unwrap();
        let ds = loader.load(&request).await.unwrap();

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.columns(), &["amount", "is_fraud"]);
    }

    #[tokio::test]
    async fn test_non_success_status_is_fetch_error() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/missing.csv")
            .with_status(404)
            .create_async()
            .await;

        let loader = DatasetLoader::with_defaults().unwrap();
        let request = ScoringRequest::new(&format!("{}/missing.csv", server.url())).unwrap();
        let err = loader.load(&request).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Fetch);
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn test_oversized_body_is_fetch_error() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/big.csv")
            .with_status(200)
            .with_body("a,b\n1,2\n3,4\n5,6\n")
            .create_async()
            .await;

        let loader = DatasetLoader::new(DEFAULT_FETCH_TIMEOUT, 8).unwrap();
        let request = ScoringRequest::new(&format!("{}/big.csv", server.url())).unwrap();
        let err = loader.load(&request).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Fetch);
        assert!(err.to_string().contains("byte limit"));
    }

    #[tokio::test]
    async fn test_connection_refused_is_fetch_error() {
        let loader = DatasetLoader::new(Duration::from_secs(2), DEFAULT_MAX_FETCH_BYTES).unwrap();
        // Port 9 (discard) is almost never listening on loopback.
        let request = ScoringRequest::new("http://127.0.0.1:9/tx.csv").unwrap();
        let err = loader.load(&request).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Fetch);
    }

    #[tokio::test]
    async fn test_stalled_body_times_out() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/slow.csv")
            .with_status(200)
            .with_chunked_body(|w| {
                std::thread::sleep(Duration::from_secs(2));
                w.write_all(b"amount,is_fraud\n10,0\n")
            })
            .create_async()
            .await;

        let loader = DatasetLoader::new(Duration::from_millis(200), DEFAULT_MAX_FETCH_BYTES).unwrap();
        let request = ScoringRequest::new(&format!("{}/slow.csv", server.url())).unwrap();

        let started = std::time::Instant::now();
        let err = loader.load(&request).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Fetch);
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
