//! Record encoding
//!
//! Turns converted rows into the bytes that land in export files. JSON
//! output is one object per line with keys sorted by column name; CSV
//! output follows a resolved [`CsvDialect`].

mod dialect;


pub use dialect::{CsvDialect, LineTerminator, Quoting};

use crate::config::ExportFormat;
use crate::error::{Error, Result};
use crate::types::{Cell, FileFormat, JsonObject};

/// Encodes rows into file bytes for one export
#[derive(Debug, Clone)]
pub enum RowEncoder {
    /// Newline-delimited JSON objects
    Json,
    /// CSV rows under a resolved dialect
    Csv {
        dialect: CsvDialect,
        include_header: bool,
    },
}

impl RowEncoder {
    /// Build the encoder for an export format, resolving the CSV dialect
    pub fn from_format(format: &ExportFormat) -> Result<Self> {
        match format.file_format {
            FileFormat::Json => Ok(RowEncoder::Json),
            FileFormat::Csv => Ok(RowEncoder::Csv {
                dialect: CsvDialect::from_format(format)?,
                include_header: format.csv_include_header,
            }),
        }
    }

    /// Header bytes to emit at the start of every file, if any
    pub fn header(&self, columns: &[String]) -> Result<Option<Vec<u8>>> {
        match self {
            RowEncoder::Json => Ok(None),
            RowEncoder::Csv {
                include_header: false,
                ..
            } => Ok(None),
            RowEncoder::Csv { dialect, .. } => {
                let fields: Vec<&str> = columns.iter().map(String::as_str).collect();
                encode_csv_record(dialect, &fields).map(Some)
            }
        }
    }

    /// Encode one row, terminator included
    pub fn encode_row(&self, columns: &[String], row: &[Cell]) -> Result<Vec<u8>> {
        match self {
            RowEncoder::Json => {
                let mut object = JsonObject::new();
                for (name, cell) in columns.iter().zip(row) {
                    object.insert(name.clone(), cell.to_json());
                }
                let mut bytes = serde_json::to_vec(&object)?;
                bytes.push(b'\n');
                Ok(bytes)
            }
            RowEncoder::Csv { dialect, .. } => {
                let fields: Vec<String> = row.iter().map(Cell::to_csv_field).collect();
                let fields: Vec<&str> = fields.iter().map(String::as_str).collect();
                encode_csv_record(dialect, &fields)
            }
        }
    }
}

/// Encode one CSV record through the dialect's writer.
///
/// The csv crate silently writes broken output under `QuoteStyle::Never`,
/// so unquoted fields are escaped or rejected here before they reach it.
fn encode_csv_record(dialect: &CsvDialect, fields: &[&str]) -> Result<Vec<u8>> {
    if dialect.quoting == Quoting::None {
        return encode_unquoted_record(dialect, fields);
    }

    let mut writer = dialect.writer_builder().from_writer(Vec::new());
    writer
        .write_record(fields)
        .map_err(|e| Error::encoding(format!("csv write failed: {e}")))?;
    writer
        .into_inner()
        .map_err(|e| Error::encoding(format!("csv flush failed: {e}")))
}

/// Quoting disabled: fields are written raw, with special characters either
/// escaped with the configured escape character or rejected.
fn encode_unquoted_record(dialect: &CsvDialect, fields: &[&str]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let terminator = dialect.lineterminator.as_bytes();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(dialect.delimiter);
        }
        for &byte in field.as_bytes() {
            let special = byte == dialect.delimiter
                || byte == dialect.quotechar
                || terminator.contains(&byte)
                || Some(byte) == dialect.escapechar;
            if special {
                match dialect.escapechar {
                    Some(escape) => out.push(escape),
                    None => {
                        return Err(Error::encoding(format!(
                            "field {field:?} needs quoting but quoting is disabled \
                             and no escape character is set"
                        )))
                    }
                }
            }
            out.push(byte);
        }
    }
    out.extend_from_slice(terminator);
    Ok(out)
}
