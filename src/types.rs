//! Common types used throughout offload
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use base64::Engine as _;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type. serde_json's map is ordered by key, which keeps
/// encoded records reproducible.
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// Output File Format
// ============================================================================

/// Serialization format for exported data files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    /// Newline-delimited JSON objects
    #[default]
    Json,
    /// CSV under a resolved dialect
    Csv,
}

impl FileFormat {
    /// MIME type reported to the upload collaborator
    pub fn mime_type(self) -> &'static str {
        match self {
            FileFormat::Json => "application/json",
            FileFormat::Csv => "application/csv",
        }
    }

    /// Lowercase format name
    pub fn as_str(self) -> &'static str {
        match self {
            FileFormat::Json => "json",
            FileFormat::Csv => "csv",
        }
    }
}

impl std::fmt::Display for FileFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Row Cells
// ============================================================================

/// A single value in a result row.
///
/// Source drivers hand back heterogeneous per-column values; this tagged
/// union is produced at the query boundary and consumed uniformly by the
/// type converter and the record encoders.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// SQL NULL
    Null,
    /// Boolean
    Bool(bool),
    /// Any integer-family value
    Integer(i64),
    /// Floating point value
    Float(f64),
    /// Arbitrary-precision decimal, carried as the driver's text form
    Decimal(String),
    /// Text value
    Text(String),
    /// Binary value
    Bytes(Vec<u8>),
    /// Calendar date without a time component
    Date(NaiveDate),
    /// Naive wall-clock datetime (no timezone attached by the source)
    DateTime(NaiveDateTime),
}

impl Cell {
    /// Check for SQL NULL
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Convert to a JSON value.
    ///
    /// Dates and datetimes render as ISO strings here; the type converter
    /// normally rewrites them to epoch seconds before encoding.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Cell::Null => JsonValue::Null,
            Cell::Bool(b) => JsonValue::Bool(*b),
            Cell::Integer(i) => JsonValue::Number((*i).into()),
            Cell::Float(f) => {
                serde_json::Number::from_f64(*f).map_or(JsonValue::Null, JsonValue::Number)
            }
            Cell::Decimal(d) => d
                .parse::<f64>()
                .ok()
                .and_then(serde_json::Number::from_f64)
                .map_or_else(|| JsonValue::String(d.clone()), JsonValue::Number),
            Cell::Text(s) => JsonValue::String(s.clone()),
            Cell::Bytes(b) => {
                JsonValue::String(base64::engine::general_purpose::STANDARD.encode(b))
            }
            Cell::Date(d) => JsonValue::String(d.format("%Y-%m-%d").to_string()),
            Cell::DateTime(dt) => JsonValue::String(dt.format("%Y-%m-%d %H:%M:%S").to_string()),
        }
    }

    /// Render as a CSV field. NULL becomes the empty field.
    pub fn to_csv_field(&self) -> String {
        match self {
            Cell::Null => String::new(),
            Cell::Bool(b) => b.to_string(),
            Cell::Integer(i) => i.to_string(),
            Cell::Float(f) => f.to_string(),
            Cell::Decimal(d) => d.clone(),
            Cell::Text(s) => s.clone(),
            Cell::Bytes(b) => base64::engine::general_purpose::STANDARD.encode(b),
            Cell::Date(d) => d.format("%Y-%m-%d").to_string(),
            Cell::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

impl From<i64> for Cell {
    fn from(v: i64) -> Self {
        Cell::Integer(v)
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Cell::Float(v)
    }
}

impl From<bool> for Cell {
    fn from(v: bool) -> Self {
        Cell::Bool(v)
    }
}

impl From<&str> for Cell {
    fn from(v: &str) -> Self {
        Cell::Text(v.to_string())
    }
}

impl From<String> for Cell {
    fn from(v: String) -> Self {
        Cell::Text(v)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(v: Option<T>) -> Self {
        v.map_or(Cell::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_file_format_serde() {
        let format: FileFormat = serde_json::from_str("\"csv\"").unwrap();
        assert_eq!(format, FileFormat::Csv);

        let json = serde_json::to_string(&FileFormat::Json).unwrap();
        assert_eq!(json, "\"json\"");
    }

    #[test]
    fn test_file_format_mime() {
        assert_eq!(FileFormat::Json.mime_type(), "application/json");
        assert_eq!(FileFormat::Csv.mime_type(), "application/csv");
    }

    #[test]
    fn test_cell_to_json() {
        assert_eq!(Cell::Null.to_json(), JsonValue::Null);
        assert_eq!(Cell::Integer(42).to_json(), json!(42));
        assert_eq!(Cell::Text("hi".into()).to_json(), json!("hi"));
        assert_eq!(Cell::Bool(true).to_json(), json!(true));
        assert_eq!(Cell::Decimal("1.25".into()).to_json(), json!(1.25));
    }

    #[test]
    fn test_cell_to_csv_field() {
        assert_eq!(Cell::Null.to_csv_field(), "");
        assert_eq!(Cell::Integer(-3).to_csv_field(), "-3");
        assert_eq!(Cell::Decimal("10.50".into()).to_csv_field(), "10.50");
        assert_eq!(Cell::Bool(false).to_csv_field(), "false");
    }

    #[test]
    fn test_cell_from_option() {
        assert_eq!(Cell::from(None::<i64>), Cell::Null);
        assert_eq!(Cell::from(Some(7i64)), Cell::Integer(7));
    }
}
