//! ONNX classifier session
//!
//! Runs a binary fraud classifier exported to ONNX (for example with
//! skl2onnx). The graph takes one `[batch, n_features]` float tensor. When
//! the graph exposes a `label` output its int64 labels are used as is, which
//! matches the estimator's own `predict`. Otherwise the first float output
//! is read as class probabilities and a row is labelled `1` when the fraud
//! probability is above 0.5.

use crate::error::{Result, RuntimeError};
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;
use std::fmt;
use std::sync::Mutex;
use tracing::debug;

/// Output read for class labels when present
pub const LABEL_OUTPUT: &str = "label";

/// Which graph output the predictions come from
#[derive(Debug, Clone, PartialEq, Eq)]
enum Prediction {
    Labels(String),
    Probabilities(String),
}

/// Loaded ONNX classifier
pub struct Classifier {
    // `Session::run` needs `&mut`; requests share the model through an `Arc`.
    session: Mutex<Session>,
    input_name: String,
    prediction: Prediction,
}

impl fmt::Debug for Classifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Classifier")
            .field("input_name", &self.input_name)
            .field("prediction", &self.prediction)
            .finish_non_exhaustive()
    }
}

impl Classifier {
    /// Build a session from serialized ONNX bytes
    pub fn from_bytes(model: &[u8]) -> Result<Self> {
        let session = Session::builder()
            .map_err(model_error)?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(model_error)?
            .with_intra_threads(1)
            .map_err(model_error)?
            .commit_from_memory(model)
            .map_err(model_error)?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .ok_or_else(|| RuntimeError::Model("ONNX graph has no inputs".to_string()))?;

        let prediction = if session.outputs.iter().any(|o| o.name == LABEL_OUTPUT) {
            Prediction::Labels(LABEL_OUTPUT.to_string())
        } else {
            let name = session
                .outputs
                .iter()
                .find(|o| o.name.contains("prob"))
                .or_else(|| session.outputs.first())
                .map(|o| o.name.clone())
                .ok_or_else(|| RuntimeError::Model("ONNX graph has no outputs".to_string()))?;
            Prediction::Probabilities(name)
        };

        debug!(input = %input_name, prediction = ?prediction, "ONNX session ready");

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            prediction,
        })
    }

    /// Label every row of a row-major `[rows, width]` matrix
    pub fn predict(&self, matrix: Vec<f32>, rows: usize, width: usize) -> Result<Vec<u8>> {
        if rows == 0 {
            return Ok(Vec::new());
        }

        let shape = vec![rows as i64, width as i64];
        let input = Tensor::from_array((shape, matrix)).map_err(model_error)?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| RuntimeError::Model(format!("session lock poisoned: {}", e)))?;
        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input])
            .map_err(model_error)?;

        let labels = match &self.prediction {
            Prediction::Labels(name) => {
                let output = outputs
                    .get(name.as_str())
                    .ok_or_else(|| missing_output(name))?;
                let (_, data) = output.try_extract_tensor::<i64>().map_err(model_error)?;
                data.iter()
                    .map(|&label| match label {
                        0 => Ok(0),
                        1 => Ok(1),
                        other => Err(RuntimeError::Model(format!(
                            "classifier produced label {}, expected 0 or 1",
                            other
                        ))),
                    })
                    .collect::<Result<Vec<u8>>>()?
            }
            Prediction::Probabilities(name) => {
                let output = outputs
                    .get(name.as_str())
                    .ok_or_else(|| missing_output(name))?;
                let (shape, data) = output.try_extract_tensor::<f32>().map_err(model_error)?;
                let dims: Vec<i64> = shape.iter().copied().collect();
                fraud_labels(&dims, data)?
            }
        };

        if labels.len() != rows {
            return Err(RuntimeError::Model(format!(
                "classifier returned {} predictions for {} rows",
                labels.len(),
                rows
            )));
        }
        Ok(labels)
    }
}

/// Threshold class-1 probabilities from a `[rows, classes]` or `[rows]` tensor
fn fraud_labels(dims: &[i64], data: &[f32]) -> Result<Vec<u8>> {
    let classes = match dims {
        [_] => 1,
        [_, c] if *c >= 1 => *c as usize,
        _ => {
            return Err(RuntimeError::Model(format!(
                "unsupported probability output shape {:?}",
                dims
            )))
        }
    };

    let fraud_index = if classes >= 2 { 1 } else { 0 };
    Ok(data
        .chunks(classes)
        .map(|probs| u8::from(probs[fraud_index] > 0.5))
        .collect())
}

fn missing_output(name: &str) -> RuntimeError {
    RuntimeError::Model(format!("ONNX output '{}' missing from results", name))
}

fn model_error(e: impl fmt::Display) -> RuntimeError {
    RuntimeError::Model(e.to_string())
}
