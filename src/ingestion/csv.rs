//! CSV loading.

use std::path::Path;

use crate::error::IngestionResult;
use crate::types::{Collection, Record, Value};

/// Load a CSV file into a collection.
///
/// Rules:
///
/// - CSV must have headers; header names become field names.
/// - Each cell's type is inferred (see [`infer_value`]).
/// - Short rows are allowed; their missing trailing cells are absent fields.
pub fn collection_from_csv_path(path: impl AsRef<Path>) -> IngestionResult<Collection> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    collection_from_csv_reader(&mut rdr)
}

/// Load CSV data from an in-memory string.
pub fn collection_from_csv_str(input: &str) -> IngestionResult<Collection> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input.as_bytes());
    collection_from_csv_reader(&mut rdr)
}

/// Load CSV data from an existing CSV reader.
pub fn collection_from_csv_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
) -> IngestionResult<Collection> {
    let headers = rdr.headers()?.clone();

    let mut out = Collection::new();
    for result in rdr.records() {
        let row = result?;
        let record: Record = headers
            .iter()
            .zip(row.iter())
            .map(|(name, raw)| (name, infer_value(raw)))
            .collect();
        out.push(record);
    }
    Ok(out)
}

/// Infer a typed value from a raw CSV cell.
///
/// Empty -> `Null`; `true`/`false` (any case) -> `Bool`; integer -> `Int64`; other numbers ->
/// `Float64`; everything else is kept as trimmed `Utf8`.
pub fn infer_value(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    if trimmed.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if let Ok(v) = trimmed.parse::<i64>() {
        return Value::Int64(v);
    }
    // `f64::from_str` also accepts "inf"/"nan"; keep those as text.
    if trimmed.chars().any(|c| c.is_ascii_digit()) {
        if let Ok(v) = trimmed.parse::<f64>() {
            return Value::Float64(v);
        }
    }
    Value::Utf8(trimmed.to_owned())
}
