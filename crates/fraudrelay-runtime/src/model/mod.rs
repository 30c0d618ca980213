//! Scoring model: fitted scaler plus ONNX classifier
//!
//! Loaded once at startup and shared read-only (`Arc<ScoringModel>`) by all
//! requests.

pub mod classifier;
pub mod scaler;

pub use classifier::Classifier;
pub use scaler::FeatureScaler;

use crate::error::{Result, RuntimeError};
use fraudrelay_core::Dataset;
use std::path::Path;
use tokio::fs;
use tracing::info;

/// Scaler and classifier pair
#[derive(Debug)]
pub struct ScoringModel {
    scaler: FeatureScaler,
    classifier: Classifier,
}

impl ScoringModel {
    /// Pair a scaler with a classifier
    ///
    /// One all-zero row is run through the classifier so a graph that does
    /// not accept the scaler's width is rejected here, not on first upload.
    pub fn new(scaler: FeatureScaler, classifier: Classifier) -> Result<Self> {
        let width = scaler.n_features();
        classifier
            .predict(vec![0.0; width], 1, width)
            .map_err(|e| {
                RuntimeError::Model(format!(
                    "classifier does not accept {} scaled features: {}",
                    width, e
                ))
            })?;
        Ok(Self { scaler, classifier })
    }

    /// Load the ONNX classifier and the JSON scaler
    pub async fn load(model_path: impl AsRef<Path>, scaler_path: impl AsRef<Path>) -> Result<Self> {
        let model_path = model_path.as_ref();
        let scaler_path = scaler_path.as_ref();

        let scaler_json = fs::read_to_string(scaler_path)
            .await
            .map_err(|e| read_error(scaler_path, e))?;
        let scaler = FeatureScaler::from_json(&scaler_json)?;

        let model_bytes = fs::read(model_path)
            .await
            .map_err(|e| read_error(model_path, e))?;
        let classifier = Classifier::from_bytes(&model_bytes)?;

        let model = Self::new(scaler, classifier)?;

        info!(
            model = %model_path.display(),
            scaler = %scaler_path.display(),
            features = model.scaler.n_features(),
            "Scoring model loaded"
        );

        Ok(model)
    }

    /// Feature columns the model was fit on, in order
    pub fn feature_names(&self) -> &[String] {
        self.scaler.feature_names()
    }

    /// Label every row of an already-scaled matrix, preserving order
    pub fn predict(&self, scaled: &[Vec<f64>]) -> Result<Vec<u8>> {
        let width = self.scaler.n_features();
        let mut matrix = Vec::with_capacity(scaled.len() * width);
        for (i, row) in scaled.iter().enumerate() {
            if row.len() != width {
                return Err(RuntimeError::SchemaMismatch(format!(
                    "row {} has {} features, model expects {}",
                    i + 1,
                    row.len(),
                    width
                )));
            }
            // ONNX classifiers take float32 input
            matrix.extend(row.iter().map(|&x| x as f32));
        }

        self.classifier.predict(matrix, scaled.len(), width)
    }

    /// Scale then label a feature dataset
    pub fn score(&self, features: &Dataset) -> Result<Vec<u8>> {
        let scaled = self.scaler.transform(features)?;
        self.predict(&scaled)
    }
}

fn read_error(path: &Path, e: std::io::Error) -> RuntimeError {
    RuntimeError::Model(format!("failed to read {}: {}", path.display(), e))
}
