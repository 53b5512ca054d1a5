//! CSV dialect resolution
//!
//! A dialect is a bundle of CSV formatting rules: delimiter, quoting,
//! escaping and line terminator. Dialects come either from a named preset
//! or from the csv_* fields of the export format, and are resolved exactly
//! once per export.

use crate::config::ExportFormat;
use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// When the CSV encoder should generate quotes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quoting {
    /// Quote every field
    All,
    /// Quote only fields containing special characters
    #[default]
    Minimal,
    /// Quote all non-numeric fields
    NonNumeric,
    /// Never quote; special characters require an escape character
    None,
}

/// CSV line terminator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTerminator {
    /// `\r\n`
    Crlf,
    /// Any single byte
    Byte(u8),
}

impl LineTerminator {
    /// Parse a terminator from its configured string form
    pub fn parse(s: &str) -> Result<Self> {
        if s == "\r\n" {
            return Ok(LineTerminator::Crlf);
        }
        match s.as_bytes() {
            [b] => Ok(LineTerminator::Byte(*b)),
            _ => Err(Error::config(format!(
                "csv_lineterminator must be \"\\r\\n\" or a single byte, got {s:?}"
            ))),
        }
    }

    /// The terminator bytes
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            LineTerminator::Crlf => b"\r\n",
            LineTerminator::Byte(b) => std::slice::from_ref(b),
        }
    }
}

/// A resolved CSV dialect
#[derive(Debug, Clone, PartialEq)]
pub struct CsvDialect {
    /// Field separator
    pub delimiter: u8,
    /// Represent a quote inside a quoted field as two quote characters
    pub doublequote: bool,
    /// Escape character, used when doublequote is off or quoting is never
    pub escapechar: Option<u8>,
    /// Row terminator
    pub lineterminator: LineTerminator,
    /// Quote character
    pub quotechar: u8,
    /// Quoting policy
    pub quoting: Quoting,
}

impl Default for CsvDialect {
    fn default() -> Self {
        Self {
            delimiter: b',',
            doublequote: true,
            escapechar: None,
            lineterminator: LineTerminator::Crlf,
            quotechar: b'"',
            quoting: Quoting::Minimal,
        }
    }
}

/// Preset dialects addressable by name from the configuration surface
static PRESETS: Lazy<HashMap<&'static str, CsvDialect>> = Lazy::new(|| {
    let mut presets = HashMap::new();
    presets.insert("excel", CsvDialect::default());
    presets.insert(
        "excel-tab",
        CsvDialect {
            delimiter: b'\t',
            ..CsvDialect::default()
        },
    );
    presets.insert(
        "unix",
        CsvDialect {
            lineterminator: LineTerminator::Byte(b'\n'),
            quoting: Quoting::All,
            ..CsvDialect::default()
        },
    );
    presets
});

impl CsvDialect {
    /// Look up a named preset dialect
    pub fn preset(name: &str) -> Result<Self> {
        PRESETS
            .get(name)
            .cloned()
            .ok_or_else(|| Error::config(format!("unknown csv dialect: {name}")))
    }

    /// Resolve the dialect for an export format.
    ///
    /// A named preset, when present, overrides every other csv_* field.
    pub fn from_format(format: &ExportFormat) -> Result<Self> {
        if let Some(name) = &format.csv_dialect {
            return Self::preset(name);
        }

        Ok(Self {
            delimiter: single_byte(&format.csv_delimiter, "csv_delimiter")?,
            doublequote: format.csv_doublequote,
            escapechar: format
                .csv_escapechar
                .as_deref()
                .map(|s| single_byte(s, "csv_escapechar"))
                .transpose()?,
            lineterminator: LineTerminator::parse(&format.csv_lineterminator)?,
            quotechar: single_byte(&format.csv_quotechar, "csv_quotechar")?,
            quoting: format.csv_quoting,
        })
    }

    /// Build a csv writer configured for this dialect
    pub fn writer_builder(&self) -> csv::WriterBuilder {
        let mut builder = csv::WriterBuilder::new();
        builder
            .delimiter(self.delimiter)
            .quote(self.quotechar)
            .double_quote(self.doublequote)
            .quote_style(match self.quoting {
                Quoting::All => csv::QuoteStyle::Always,
                Quoting::Minimal => csv::QuoteStyle::Necessary,
                Quoting::NonNumeric => csv::QuoteStyle::NonNumeric,
                Quoting::None => csv::QuoteStyle::Never,
            })
            .terminator(match self.lineterminator {
                LineTerminator::Crlf => csv::Terminator::CRLF,
                LineTerminator::Byte(b) => csv::Terminator::Any(b),
            });
        if let Some(escape) = self.escapechar {
            builder.escape(escape);
        }
        builder
    }
}

fn single_byte(s: &str, field: &str) -> Result<u8> {
    match s.as_bytes() {
        [b] => Ok(*b),
        _ => Err(Error::config(format!(
            "{field} must be a one-character string, got {s:?}"
        ))),
    }
}
