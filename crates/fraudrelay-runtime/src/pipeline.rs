//! Batch scoring pipeline
//!
//! fetch → parse → separate label → scale → predict → persist
//!
//! Every stage returns `Result`; the first failure aborts the run before the
//! snapshot is touched, so a failed upload never replaces a good snapshot.

use crate::error::{Result, RuntimeError};
use crate::loader::DatasetLoader;
use crate::model::ScoringModel;
use crate::request::ScoringRequest;
use crate::store::ResultsStore;
use fraudrelay_core::{CoreError, Dataset, ScoredDataset};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Default name of the label column carried by uploaded data
pub const DEFAULT_LABEL_COLUMN: &str = "is_fraud";

/// Counts describing a scored dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringSummary {
    /// Total rows
    pub rows: usize,
    /// Rows predicted fraudulent
    pub flagged: usize,
}

impl From<&ScoredDataset> for ScoringSummary {
    fn from(scored: &ScoredDataset) -> Self {
        Self {
            rows: scored.len(),
            flagged: scored.flagged_count(),
        }
    }
}

/// Scoring pipeline
#[derive(Debug, Clone)]
pub struct ScoringPipeline {
    loader: DatasetLoader,
    model: Arc<ScoringModel>,
    store: ResultsStore,
    label_column: String,
}

impl ScoringPipeline {
    pub fn new(loader: DatasetLoader, model: Arc<ScoringModel>, store: ResultsStore) -> Self {
        Self {
            loader,
            model,
            store,
            label_column: DEFAULT_LABEL_COLUMN.to_string(),
        }
    }

    /// Override the label column name
    pub fn with_label_column(mut self, label_column: impl Into<String>) -> Self {
        self.label_column = label_column.into();
        self
    }

    pub fn label_column(&self) -> &str {
        &self.label_column
    }

    pub fn model(&self) -> &ScoringModel {
        &self.model
    }

    pub fn store(&self) -> &ResultsStore {
        &self.store
    }

    /// Score a parsed dataset without persisting it
    ///
    /// The label column must be present; it is excluded from the features but
    /// kept in the returned dataset, which gains the prediction column last.
    pub fn score_dataset(&self, dataset: Dataset) -> Result<ScoredDataset> {
        let features = dataset.without_column(&self.label_column).map_err(|e| match e {
            CoreError::ColumnNotFound(name) => RuntimeError::MissingLabel(name),
            other => RuntimeError::SchemaMismatch(other.to_string()),
        })?;
        debug!(
            rows = features.len(),
            features = features.columns().len(),
            "Separated label column"
        );

        let predictions = self.model.score(&features)?;
        debug!(rows = predictions.len(), "Predictions computed");

        ScoredDataset::new(dataset, self.store.prediction_column(), &predictions)
            .map_err(|e| RuntimeError::SchemaMismatch(e.to_string()))
    }

    /// Run the full upload flow for `request`
    pub async fn run(&self, request: &ScoringRequest) -> Result<ScoringSummary> {
        let started = Instant::now();

        let dataset = self.loader.load(request).await?;
        debug!(
            url = %request.source_url(),
            rows = dataset.len(),
            columns = dataset.columns().len(),
            "Dataset parsed"
        );

        let scored = self.score_dataset(dataset)?;
        self.store.write(&scored).await?;

        let summary = ScoringSummary::from(&scored);
        info!(
            url = %request.source_url(),
            rows = summary.rows,
            flagged = summary.flagged,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Scoring run completed"
        );
        Ok(summary)
    }

    /// Summarize the current snapshot
    pub async fn summarize(&self) -> Result<ScoringSummary> {
        let scored = self.store.read().await?;
        Ok(ScoringSummary::from(&scored))
    }
}
