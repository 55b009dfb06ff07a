use std::io::Read;
use std::path::Path;

use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{RawRecord, RawValue};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failures at the tabular-decode boundary. Anything that invalidates the
/// whole input batch surfaces here; per-cell oddities never do (they become
/// typed raw values and degrade to null later, during normalization).
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("malformed input: {0}")]
    Malformed(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Decode a tabular file into raw records. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – header row with column names, one record per line
/// * `.json` – `[{ "Week": "WK07", "TAT": 4.5, ... }, ...]`
pub fn decode_file(path: &Path) -> Result<Vec<RawRecord>, DecodeError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => decode_csv(std::fs::File::open(path)?),
        "json" => decode_json(std::fs::File::open(path)?),
        other => Err(DecodeError::UnsupportedExtension(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// CSV decoder
// ---------------------------------------------------------------------------

/// Decode CSV from any reader. Headers are whitespace-trimmed; each cell is
/// type-guessed (integer → float → bool → text, empty → null).
pub fn decode_csv<R: Read>(reader: R) -> Result<Vec<RawRecord>, DecodeError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        let mut row = RawRecord::new();
        for (idx, cell) in record.iter().enumerate() {
            if let Some(header) = headers.get(idx) {
                row.insert(header.clone(), guess_raw_type(cell));
            }
        }
        rows.push(row);
    }
    Ok(rows)
}

fn guess_raw_type(s: &str) -> RawValue {
    let t = s.trim();
    if t.is_empty() {
        return RawValue::Null;
    }
    if let Ok(i) = t.parse::<i64>() {
        return RawValue::Integer(i);
    }
    if let Ok(f) = t.parse::<f64>() {
        return RawValue::Float(f);
    }
    if t == "true" || t == "false" {
        return RawValue::Bool(t == "true");
    }
    RawValue::Text(s.to_string())
}

// ---------------------------------------------------------------------------
// JSON decoder
// ---------------------------------------------------------------------------

/// Decode a records-oriented JSON document: a top-level array of flat
/// objects. Any other shape is a [`DecodeError::Malformed`].
pub fn decode_json<R: Read>(reader: R) -> Result<Vec<RawRecord>, DecodeError> {
    let root: JsonValue = serde_json::from_reader(reader)?;

    let records = root
        .as_array()
        .ok_or_else(|| DecodeError::Malformed("expected a top-level JSON array".into()))?;

    let mut rows = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| DecodeError::Malformed(format!("row {i} is not a JSON object")))?;

        let mut row = RawRecord::new();
        for (key, val) in obj {
            row.insert(key.trim().to_string(), json_to_raw(val));
        }
        rows.push(row);
    }
    Ok(rows)
}

fn json_to_raw(val: &JsonValue) -> RawValue {
    match val {
        JsonValue::String(s) => RawValue::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                RawValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                RawValue::Float(f)
            } else {
                RawValue::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => RawValue::Bool(*b),
        JsonValue::Null => RawValue::Null,
        other => RawValue::Text(other.to_string()),
    }
}
