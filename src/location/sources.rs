//! File sources: the reference CSV behind the gazetteer and the JSON list
//! of labels to evaluate.
//!
//! A missing or unreadable reference file degrades to the empty gazetteer.
//! Label files are strict: every entry must be a string.

use super::gazetteer::{Gazetteer, GazetteerBuilder, RowDiagnostic};
use super::types::LocationError;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Default location of the reference dataset.
pub const DEFAULT_GAZETTEER_PATH: &str = "data/seoul_424dong.csv";

/// Default location of the label sample.
pub const DEFAULT_LABELS_PATH: &str = "data/sample/eval_names_sample.json";

/// Parse delimited reference text (`city,district,neighborhood,...` with a
/// header line). Malformed rows come back as diagnostics.
pub fn parse_gazetteer_csv(text: &str) -> (Gazetteer, Vec<RowDiagnostic>) {
    let mut builder = GazetteerBuilder::new();
    for (idx, line) in text.lines().enumerate().skip(1) {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        let columns: Vec<&str> = line.split(',').collect();
        builder.push_row(idx + 1, &columns);
    }
    builder.finish()
}

/// Load the reference dataset. Never fails: a missing file yields the empty
/// gazetteer, rejected rows are logged.
pub fn load_gazetteer(path: &Path) -> (Gazetteer, Vec<RowDiagnostic>) {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "reference dataset unavailable, continuing with an empty gazetteer"
            );
            return (Gazetteer::empty(), Vec::new());
        }
    };

    let (gazetteer, diagnostics) = parse_gazetteer_csv(&text);
    for d in &diagnostics {
        tracing::warn!(path = %path.display(), "reference row rejected: {}", d);
    }
    tracing::info!(
        districts = gazetteer.district_count(),
        neighborhoods = gazetteer.neighborhood_count(),
        rejected = diagnostics.len(),
        "gazetteer loaded"
    );
    (gazetteer, diagnostics)
}

/// Check that every entry is a string.
pub fn labels_from_values(values: &[Value]) -> Result<Vec<String>, LocationError> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| match value {
            Value::String(s) => Ok(s.clone()),
            other => Err(LocationError::InvalidInput {
                index,
                found: json_kind(other).to_string(),
            }),
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Load a JSON array of labels.
pub fn load_labels(path: &Path) -> Result<Vec<String>, LocationError> {
    let data = fs::read_to_string(path).map_err(|e| LocationError::io(path, e))?;
    let values: Vec<Value> = serde_json::from_str(&data)?;
    labels_from_values(&values)
}
