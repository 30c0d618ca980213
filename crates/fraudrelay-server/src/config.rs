//! Server configuration

use fraudrelay_runtime::loader::{DEFAULT_FETCH_TIMEOUT, DEFAULT_MAX_FETCH_BYTES};
use fraudrelay_runtime::pipeline::DEFAULT_LABEL_COLUMN;
use fraudrelay_runtime::store::{DEFAULT_PREDICTION_COLUMN, DEFAULT_SNAPSHOT_PATH};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Classifier artifact (ONNX)
    pub model_path: PathBuf,

    /// Feature scaler artifact (JSON)
    pub scaler_path: PathBuf,

    /// Where the latest scored dataset is kept
    pub snapshot_path: PathBuf,

    /// Label column expected in uploaded data
    pub label_column: String,

    /// Column appended to the snapshot
    pub prediction_column: String,

    /// Timeout for fetching uploaded files, in seconds
    pub fetch_timeout_secs: u64,

    /// Largest accepted upload, in bytes
    pub max_fetch_bytes: usize,

    /// Log level used when RUST_LOG is not set
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            model_path: PathBuf::from("fraud_model.onnx"),
            scaler_path: PathBuf::from("scaler.json"),
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
            label_column: DEFAULT_LABEL_COLUMN.to_string(),
            prediction_column: DEFAULT_PREDICTION_COLUMN.to_string(),
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT.as_secs(),
            max_fetch_bytes: DEFAULT_MAX_FETCH_BYTES,
            log_level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from `.env`, `config/server.*` and `FRAUDRELAY_*` variables
    pub fn load() -> anyhow::Result<Self> {
        // Load .env file if exists
        dotenvy::dotenv().ok();

        Self::load_with(config::File::with_name("config/server").required(false))
    }

    fn load_with<S>(file: S) -> anyhow::Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let cfg = config::Config::builder()
            .add_source(file)
            .add_source(config::Environment::with_prefix("FRAUDRELAY").try_parsing(true))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to read config: {}", e))?;

        cfg.try_deserialize()
            .map_err(|e| anyhow::anyhow!("Failed to deserialize config: {}", e))
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
