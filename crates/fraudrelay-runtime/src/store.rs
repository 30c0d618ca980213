//! File-backed results snapshot
//!
//! Holds exactly one scored dataset as a CSV file. Writes go to a uniquely
//! named temporary file in the same directory and are then renamed over the
//! snapshot path, so a reader sees either the previous snapshot or the new
//! one in full. Concurrent writers are last-writer-wins.

use crate::codec::{decode_dataset, encode_dataset};
use crate::error::{Result, RuntimeError};
use fraudrelay_core::ScoredDataset;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

/// Default snapshot location
pub const DEFAULT_SNAPSHOT_PATH: &str = "predictions.csv";

/// Default name of the appended prediction column
pub const DEFAULT_PREDICTION_COLUMN: &str = "Fraud_Prediction";

/// Snapshot store
#[derive(Debug, Clone)]
pub struct ResultsStore {
    path: PathBuf,
    prediction_column: String,
}

impl ResultsStore {
    pub fn new(path: impl Into<PathBuf>, prediction_column: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            prediction_column: prediction_column.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn prediction_column(&self) -> &str {
        &self.prediction_column
    }

    /// Replace the snapshot with `scored`
    pub async fn write(&self, scored: &ScoredDataset) -> Result<()> {
        let bytes = encode_dataset(scored.dataset())?;

        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| {
                RuntimeError::Persistence(format!(
                    "snapshot path {} has no file name",
                    self.path.display()
                ))
            })?
            .to_string_lossy()
            .into_owned();
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };

        fs::create_dir_all(&dir)
            .await
            .map_err(|e| self.io_error("create directory for", e))?;

        let tmp_path = dir.join(format!(".{}.{}.tmp", file_name, Uuid::new_v4()));
        if let Err(e) = write_synced(&tmp_path, &bytes).await {
            discard(&tmp_path).await;
            return Err(self.io_error("write", e));
        }
        if let Err(e) = fs::rename(&tmp_path, &self.path).await {
            discard(&tmp_path).await;
            return Err(self.io_error("replace", e));
        }

        debug!(
            path = %self.path.display(),
            rows = scored.len(),
            bytes = bytes.len(),
            "Snapshot written"
        );
        Ok(())
    }

    /// Read the whole snapshot
    pub async fn read(&self) -> Result<ScoredDataset> {
        let bytes = fs::read(&self.path)
            .await
            .map_err(|e| self.io_error("read", e))?;

        let dataset = decode_dataset(&bytes).map_err(|e| {
            RuntimeError::Persistence(format!("{} is corrupt: {}", self.path.display(), e))
        })?;

        ScoredDataset::from_dataset(dataset, &self.prediction_column).map_err(|e| {
            RuntimeError::Persistence(format!("{}: {}", self.path.display(), e))
        })
    }

    fn io_error(&self, action: &str, e: std::io::Error) -> RuntimeError {
        RuntimeError::Persistence(format!(
            "failed to {} {}: {}",
            action,
            self.path.display(),
            e
        ))
    }
}

async fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path).await?;
    file.write_all(bytes).await?;
    file.sync_all().await
}

async fn discard(path: &Path) {
    if let Err(e) = fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %path.display(), error = %e, "Failed to remove temporary snapshot");
        }
    }
}
