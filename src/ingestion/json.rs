//! JSON loading.
//!
//! Supported inputs for collections:
//! - A JSON array of objects: `[{"a":1}, {"a":2}]`
//! - A single object (a one-record collection)
//! - Newline-delimited JSON (NDJSON): `{"a":1}\n{"a":2}\n`
//!
//! Records are flat: every value must be a scalar.

use std::fs;
use std::path::Path;

use crate::error::{IngestionError, IngestionResult};
use crate::pipeline::ProcessRequest;
use crate::types::{Collection, Record};

/// Load a collection from a JSON or NDJSON file.
pub fn collection_from_json_path(path: impl AsRef<Path>) -> IngestionResult<Collection> {
    let text = fs::read_to_string(path)?;
    collection_from_json_str(&text)
}

/// Load a collection from an in-memory JSON or NDJSON string.
pub fn collection_from_json_str(input: &str) -> IngestionResult<Collection> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(IngestionError::ShapeMismatch {
            message: "json input is empty".to_string(),
        });
    }

    // First try parsing as a single JSON value (array or object).
    if let Ok(v) = serde_json::from_str::<serde_json::Value>(trimmed) {
        match v {
            serde_json::Value::Array(items) => records_from_values(&items),
            serde_json::Value::Object(_) => records_from_values(std::slice::from_ref(&v)),
            _ => Err(IngestionError::ShapeMismatch {
                message: "json must be an object, an array of objects, or NDJSON".to_string(),
            }),
        }
    } else {
        // Fall back to NDJSON.
        let mut values = Vec::new();
        for (i, line) in trimmed.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let v = serde_json::from_str::<serde_json::Value>(line).map_err(|e| {
                IngestionError::ShapeMismatch {
                    message: format!("invalid ndjson at line {}: {}", i + 1, e),
                }
            })?;
            values.push(v);
        }
        records_from_values(&values)
    }
}

/// Load a `{ data, condition }` request from a JSON file.
pub fn request_from_json_path(path: impl AsRef<Path>) -> IngestionResult<ProcessRequest> {
    let text = fs::read_to_string(path)?;
    request_from_json_str(&text)
}

/// Parse a `{ data, condition }` request.
///
/// Only JSON syntax errors fail here; shape problems degrade as described on
/// [`ProcessRequest::from_json`].
pub fn request_from_json_str(input: &str) -> IngestionResult<ProcessRequest> {
    Ok(ProcessRequest::from_json_str(input)?)
}

fn records_from_values(values: &[serde_json::Value]) -> IngestionResult<Collection> {
    values
        .iter()
        .enumerate()
        .map(|(idx0, v)| {
            let row_num = idx0 + 1;
            if !v.is_object() {
                return Err(IngestionError::ShapeMismatch {
                    message: format!("row {row_num} is not a json object"),
                });
            }
            Record::from_json(v).ok_or_else(|| IngestionError::ShapeMismatch {
                message: format!("row {row_num} has a nested (non-scalar) value"),
            })
        })
        .collect()
}
