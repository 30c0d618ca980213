//! Intent router initialization
//!
//! Builds the scoring pipeline from server configuration: HTTP loader,
//! model artifacts (loaded once, shared via `Arc`) and the snapshot store.

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::intent::IntentRouter;
use fraudrelay_runtime::{DatasetLoader, ResultsStore, ScoringModel, ScoringPipeline};
use std::sync::Arc;
use tracing::info;

/// Initialize the intent router and everything behind it
pub async fn init_intent_router(config: &ServerConfig) -> Result<IntentRouter, ServerError> {
    validate(config)?;

    let model = ScoringModel::load(&config.model_path, &config.scaler_path).await?;
    let loader = DatasetLoader::new(config.fetch_timeout(), config.max_fetch_bytes)?;
    let store = ResultsStore::new(config.snapshot_path.clone(), config.prediction_column.clone());

    info!(
        snapshot = %store.path().display(),
        label_column = %config.label_column,
        fetch_timeout_secs = config.fetch_timeout_secs,
        "Scoring pipeline configured"
    );

    let pipeline = ScoringPipeline::new(loader, Arc::new(model), store)
        .with_label_column(config.label_column.clone());

    Ok(IntentRouter::new(pipeline))
}

fn validate(config: &ServerConfig) -> Result<(), ServerError> {
    if config.label_column.is_empty() {
        return Err(ServerError::Config("label_column must not be empty".to_string()));
    }
    if config.prediction_column.is_empty() {
        return Err(ServerError::Config(
            "prediction_column must not be empty".to_string(),
        ));
    }
    if config.label_column == config.prediction_column {
        return Err(ServerError::Config(
            "label_column and prediction_column must differ".to_string(),
        ));
    }
    if config.fetch_timeout_secs == 0 {
        return Err(ServerError::Config(
            "fetch_timeout_secs must be positive".to_string(),
        ));
    }
    Ok(())
}
