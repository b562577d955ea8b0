//! Unified loading entrypoint.
//!
//! Most callers should use [`load_collection`], which loads a file into an in-memory
//! [`crate::types::Collection`]. If [`LoadOptions::format`] is `None`, the format is inferred
//! from the file extension.

use std::path::Path;

use crate::error::{IngestionError, IngestionResult};
use crate::types::Collection;

use super::{csv, json};

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadFormat {
    /// Comma-separated values with a header row.
    Csv,
    /// JSON array-of-objects or NDJSON.
    Json,
}

impl LoadFormat {
    /// Parse a format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" | "ndjson" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Options controlling [`load_collection`].
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// If `None`, auto-detect format from file extension.
    pub format: Option<LoadFormat>,
}

/// Load a collection from `path`.
///
/// ```no_run
/// use rule_pipeline::ingestion::{LoadOptions, load_collection};
/// use rule_pipeline::pipeline::{DataProcessor, ProcessRequest};
/// use rule_pipeline::types::ConditionSpec;
/// use serde_json::json;
///
/// # fn main() -> Result<(), rule_pipeline::IngestionError> {
/// let data = load_collection("users.csv", &LoadOptions::default())?;
/// let request = ProcessRequest::new(data)
///     .with_condition(ConditionSpec::new().with("sort_by", json!(["rating"])));
/// let response = DataProcessor::new().process(&request);
/// println!("rows={}", response.result.len());
/// # Ok(())
/// # }
/// ```
pub fn load_collection(
    path: impl AsRef<Path>,
    options: &LoadOptions,
) -> IngestionResult<Collection> {
    let path = path.as_ref();
    let fmt = match options.format {
        Some(f) => f,
        None => infer_format_from_path(path)?,
    };

    match fmt {
        LoadFormat::Csv => csv::collection_from_csv_path(path),
        LoadFormat::Json => json::collection_from_json_path(path),
    }
}

fn infer_format_from_path(path: &Path) -> IngestionResult<LoadFormat> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| IngestionError::ShapeMismatch {
            message: format!(
                "cannot infer format: path has no extension ({})",
                path.display()
            ),
        })?;

    LoadFormat::from_extension(ext).ok_or_else(|| IngestionError::ShapeMismatch {
        message: format!(
            "cannot infer format from extension '{ext}' for path ({})",
            path.display()
        ),
    })
}
