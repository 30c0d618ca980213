//! CSV encoding and decoding of datasets
//!
//! Both the upload path and the snapshot store go through these two
//! functions, so a snapshot written by `encode_dataset` always reads back
//! through `decode_dataset`.

use crate::error::{Result, RuntimeError};
use fraudrelay_core::{Dataset, Value};

/// Decode UTF-8 CSV bytes (header row required) into a dataset
pub fn decode_dataset(bytes: &[u8]) -> Result<Dataset> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| RuntimeError::Parse(format!("payload is not valid UTF-8: {}", e)))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| RuntimeError::Parse(e.to_string()))?
        .clone();
    if headers.is_empty() {
        return Err(RuntimeError::Parse("missing header row".to_string()));
    }

    let columns = headers.iter().map(str::to_string).collect();
    let mut dataset = Dataset::new(columns).map_err(|e| RuntimeError::Parse(e.to_string()))?;

    for record in reader.records() {
        let record = record.map_err(|e| RuntimeError::Parse(e.to_string()))?;
        let row = record.iter().map(Value::from_field).collect();
        dataset
            .push_row(row)
            .map_err(|e| RuntimeError::Parse(e.to_string()))?;
    }

    Ok(dataset)
}

/// Encode a dataset as CSV with a header row
pub fn encode_dataset(dataset: &Dataset) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(dataset.columns())
        .map_err(|e| RuntimeError::Persistence(e.to_string()))?;
    for row in dataset.rows() {
        writer
            .write_record(row.iter().map(|v| v.to_string()))
            .map_err(|e| RuntimeError::Persistence(e.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|e| RuntimeError::Persistence(e.to_string()))
}
