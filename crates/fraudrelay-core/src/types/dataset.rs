//! Tabular datasets
//!
//! A `Dataset` is an ordered header plus ordered rows of `Value` cells.
//! Row order is significant everywhere: predictions are aligned to rows by
//! position, so nothing in this module ever reorders rows.

use super::value::Value;
use crate::error::{CoreError, Result};
use std::collections::HashSet;

/// Ordered table of values
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Dataset {
    /// Create an empty dataset with the given header
    pub fn new(columns: Vec<String>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(columns.len());
        for name in &columns {
            if !seen.insert(name.as_str()) {
                return Err(CoreError::DuplicateColumn(name.clone()));
            }
        }

        Ok(Self {
            columns,
            rows: Vec::new(),
        })
    }

    /// Append a row; its width must match the header
    pub fn push_row(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(CoreError::RowWidth {
                row: self.rows.len(),
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Number of data rows (header excluded)
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Values of one column, in row order
    pub fn column(&self, name: &str) -> Result<Vec<&Value>> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| CoreError::ColumnNotFound(name.to_string()))?;
        Ok(self.rows.iter().map(|row| &row[idx]).collect())
    }

    /// Cell lookup by row position and column name
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// Copy of the dataset without the named column
    pub fn without_column(&self, name: &str) -> Result<Dataset> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| CoreError::ColumnNotFound(name.to_string()))?;

        let mut columns = self.columns.clone();
        columns.remove(idx);

        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut row = row.clone();
                row.remove(idx);
                row
            })
            .collect();

        Ok(Dataset { columns, rows })
    }

    /// Append a column, one value per existing row
    pub fn with_column(mut self, name: impl Into<String>, values: Vec<Value>) -> Result<Dataset> {
        let name = name.into();
        if self.has_column(&name) {
            return Err(CoreError::DuplicateColumn(name));
        }
        if values.len() != self.rows.len() {
            return Err(CoreError::LengthMismatch {
                expected: self.rows.len(),
                found: values.len(),
            });
        }

        self.columns.push(name);
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
        Ok(self)
    }
}

/// Dataset carrying a per-row fraud prediction column
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDataset {
    dataset: Dataset,
    prediction_column: String,
}

impl ScoredDataset {
    /// Append `predictions` to `dataset` as `prediction_column`
    ///
    /// `predictions[i]` belongs to row `i`; the count must equal the row count.
    pub fn new(
        dataset: Dataset,
        prediction_column: impl Into<String>,
        predictions: &[u8],
    ) -> Result<Self> {
        let prediction_column = prediction_column.into();
        let values = predictions.iter().map(|p| Value::from(*p)).collect();
        let dataset = dataset.with_column(prediction_column.clone(), values)?;
        Ok(Self {
            dataset,
            prediction_column,
        })
    }

    /// Wrap a dataset that already carries the prediction column
    pub fn from_dataset(dataset: Dataset, prediction_column: impl Into<String>) -> Result<Self> {
        let prediction_column = prediction_column.into();
        if !dataset.has_column(&prediction_column) {
            return Err(CoreError::ColumnNotFound(prediction_column));
        }
        Ok(Self {
            dataset,
            prediction_column,
        })
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn prediction_column(&self) -> &str {
        &self.prediction_column
    }

    pub fn len(&self) -> usize {
        self.dataset.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dataset.is_empty()
    }

    /// Number of rows whose prediction is truthy
    pub fn flagged_count(&self) -> usize {
        // Column presence is checked at construction.
        self.dataset
            .column(&self.prediction_column)
            .map(|values| values.into_iter().filter(|v| v.is_truthy()).count())
            .unwrap_or(0)
    }
}
