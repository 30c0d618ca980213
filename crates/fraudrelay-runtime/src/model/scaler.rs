//! Standard feature scaler
//!
//! Mirrors a fitted standard scaler exported from the training side:
//! every feature column `j` is transformed as `(x - mean[j]) / scale[j]`.
//! The column names it was fit on are part of the artifact and define the
//! only feature schema the model accepts.

use crate::error::{Result, RuntimeError};
use fraudrelay_core::Dataset;
use serde::Deserialize;

/// Serialized scaler artifact
#[derive(Debug, Clone, Deserialize)]
struct ScalerArtifact {
    feature_names: Vec<String>,
    mean: Vec<f64>,
    scale: Vec<f64>,
}

/// Fitted standard scaler
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "ScalerArtifact")]
pub struct FeatureScaler {
    feature_names: Vec<String>,
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl TryFrom<ScalerArtifact> for FeatureScaler {
    type Error = RuntimeError;

    fn try_from(artifact: ScalerArtifact) -> Result<Self> {
        FeatureScaler::new(artifact.feature_names, artifact.mean, artifact.scale)
    }
}

impl FeatureScaler {
    /// Create a scaler, validating that all vectors line up
    pub fn new(feature_names: Vec<String>, mean: Vec<f64>, scale: Vec<f64>) -> Result<Self> {
        if feature_names.is_empty() {
            return Err(RuntimeError::Model("scaler has no features".to_string()));
        }
        if mean.len() != feature_names.len() || scale.len() != feature_names.len() {
            return Err(RuntimeError::Model(format!(
                "scaler has {} feature names but {} means and {} scales",
                feature_names.len(),
                mean.len(),
                scale.len()
            )));
        }
        if mean.iter().chain(scale.iter()).any(|v| !v.is_finite()) {
            return Err(RuntimeError::Model(
                "scaler parameters must be finite".to_string(),
            ));
        }

        // A constant feature is fit with scale 0; it is passed through unscaled.
        let scale = scale
            .into_iter()
            .map(|s| if s == 0.0 { 1.0 } else { s })
            .collect();

        Ok(Self {
            feature_names,
            mean,
            scale,
        })
    }

    /// Parse a JSON scaler artifact
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| RuntimeError::Model(format!("invalid scaler artifact: {}", e)))
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Check that `columns` are exactly the fitted feature columns, in order
    pub fn check_schema(&self, columns: &[String]) -> Result<()> {
        if columns.len() != self.feature_names.len() {
            return Err(RuntimeError::SchemaMismatch(format!(
                "expected {} feature columns [{}], got {} [{}]",
                self.feature_names.len(),
                self.feature_names.join(", "),
                columns.len(),
                columns.join(", ")
            )));
        }

        for (i, (got, expected)) in columns.iter().zip(&self.feature_names).enumerate() {
            if got != expected {
                return Err(RuntimeError::SchemaMismatch(format!(
                    "feature column {} is '{}', expected '{}'",
                    i, got, expected
                )));
            }
        }

        Ok(())
    }

    /// Scale a feature dataset into a row-major matrix
    ///
    /// Row `i` of the result corresponds to row `i` of `features`.
    pub fn transform(&self, features: &Dataset) -> Result<Vec<Vec<f64>>> {
        self.check_schema(features.columns())?;

        features
            .rows()
            .iter()
            .enumerate()
            .map(|(r, row)| {
                row.iter()
                    .enumerate()
                    .map(|(j, value)| {
                        let x = value.as_f64().ok_or_else(|| {
                            RuntimeError::SchemaMismatch(format!(
                                "column '{}' row {}: expected a numeric value, found {} '{}'",
                                self.feature_names[j],
                                r + 1,
                                value.type_name(),
                                value
                            ))
                        })?;
                        Ok((x - self.mean[j]) / self.scale[j])
                    })
                    .collect::<Result<Vec<f64>>>()
            })
            .collect()
    }
}
