//! Common test utilities for runtime integration tests

#![allow(dead_code)]

use fraudrelay_runtime::loader::DEFAULT_MAX_FETCH_BYTES;
use fraudrelay_runtime::store::DEFAULT_PREDICTION_COLUMN;
use fraudrelay_runtime::{
    Classifier, DatasetLoader, FeatureScaler, ResultsStore, ScoringModel, ScoringPipeline,
    ScoringRequest,
};
use mockito::{Mock, Server, ServerGuard};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// Ten transactions, three of them above the 500 amount cut-off
pub const TEN_ROWS_THREE_FLAGGED: &str = "\
amount,hour,is_fraud
12.5,9,0
900,3,1
48,14,0
610.25,2,1
75,18,0
5,11,0
1200,4,1
99.99,20,0
300,16,0
42,10,0
";

/// Model flagging rows with `amount > 500`
///
/// amount is scaled by 1/100; the fixture graph flags a first feature
/// above 5.0.
pub fn amount_model() -> ScoringModel {
    let scaler = FeatureScaler::new(
        vec!["amount".to_string(), "hour".to_string()],
        vec![0.0, 12.0],
        vec![100.0, 6.0],
    )
    .unwrap();
    let onnx = std::fs::read(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/amount_model.onnx"
    ))
    .unwrap();
    let classifier = Classifier::from_bytes(&onnx).unwrap();
    ScoringModel::new(scaler, classifier).unwrap()
}

/// Pipeline wired to a temp snapshot and a mock HTTP server
pub struct TestRelay {
    pub dir: TempDir,
    pub server: ServerGuard,
    pub model: Arc<ScoringModel>,
    pub pipeline: ScoringPipeline,
}

impl TestRelay {
    pub async fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let server = Server::new_async().await;
        let store = ResultsStore::new(dir.path().join("predictions.csv"), DEFAULT_PREDICTION_COLUMN);
        let model = Arc::new(amount_model());
        let pipeline = ScoringPipeline::new(
            DatasetLoader::with_defaults().unwrap(),
            Arc::clone(&model),
            store,
        );

        Self {
            dir,
            server,
            model,
            pipeline,
        }
    }

    /// Second pipeline over the same model and snapshot with a short fetch timeout
    pub fn pipeline_with_timeout(&self, timeout: Duration) -> ScoringPipeline {
        ScoringPipeline::new(
            DatasetLoader::new(timeout, DEFAULT_MAX_FETCH_BYTES).unwrap(),
            Arc::clone(&self.model),
            self.pipeline.store().clone(),
        )
    }

    /// Serve `body` at `path` with status 200
    pub async fn serve_csv(&mut self, path: &str, body: impl AsRef<[u8]>) -> Mock {
        self.server
            .mock("GET", path)
            .with_status(200)
            .with_header("content-type", "text/csv")
            .with_body(body)
            .create_async()
            .await
    }

    pub fn request(&self, path: &str) -> ScoringRequest {
        ScoringRequest::new(&format!("{}{}", self.server.url(), path)).unwrap()
    }

    pub async fn snapshot_bytes(&self) -> Option<Vec<u8>> {
        match tokio::fs::read(self.pipeline.store().path()).await {
            Ok(bytes) => Some(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => panic!("failed to read snapshot: {}", e),
        }
    }
}
