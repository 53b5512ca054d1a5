//! Export job configuration
//!
//! Jobs are described in YAML: the query to run, how to name and format the
//! output files, the source database and the destination URL.

use crate::error::{Error, Result};
use crate::schema::SchemaSpec;
use crate::types::FileFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::encode::Quoting;

/// Default size threshold before rolling to a new output file
fn default_max_file_size() -> u64 {
    1_900_000_000
}

fn default_batch_size() -> usize {
    10_000
}

fn default_kind() -> String {
    "export".to_string()
}

fn default_delimiter() -> String {
    ",".to_string()
}

fn default_doublequote() -> bool {
    true
}

fn default_lineterminator() -> String {
    "\r\n".to_string()
}

fn default_quotechar() -> String {
    "\"".to_string()
}

/// Output format settings for one export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportFormat {
    /// File format for data files
    #[serde(default)]
    pub file_format: FileFormat,
    /// Named CSV dialect preset; overrides the csv_* fields below
    #[serde(default)]
    pub csv_dialect: Option<String>,
    /// Field separator, one character
    #[serde(default = "default_delimiter")]
    pub csv_delimiter: String,
    /// Double embedded quote characters instead of escaping them
    #[serde(default = "default_doublequote")]
    pub csv_doublequote: bool,
    /// Escape character, one character
    #[serde(default)]
    pub csv_escapechar: Option<String>,
    /// Row terminator, `"\r\n"` or one character
    #[serde(default = "default_lineterminator")]
    pub csv_lineterminator: String,
    /// Quote character, one character
    #[serde(default = "default_quotechar")]
    pub csv_quotechar: String,
    /// Quoting policy
    #[serde(default)]
    pub csv_quoting: Quoting,
    /// Emit a header row at the start of every CSV file
    #[serde(default)]
    pub csv_include_header: bool,
}

impl Default for ExportFormat {
    fn default() -> Self {
        Self {
            file_format: FileFormat::default(),
            csv_dialect: None,
            csv_delimiter: default_delimiter(),
            csv_doublequote: true,
            csv_escapechar: None,
            csv_lineterminator: default_lineterminator(),
            csv_quotechar: default_quotechar(),
            csv_quoting: Quoting::default(),
            csv_include_header: false,
        }
    }
}

/// One export: a query and how its results become files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportJob {
    /// Query to execute against the source
    pub sql: String,
    /// Data filename template, must contain `{}` for the file index
    pub filename: String,
    /// Optional object name for the inferred schema file
    #[serde(default)]
    pub schema_filename: Option<String>,
    /// Size threshold before rolling to a new file
    #[serde(default = "default_max_file_size")]
    pub approx_max_file_size_bytes: u64,
    /// Explicit schema, bypassing inference
    #[serde(default)]
    pub schema: Option<SchemaSpec>,
    /// Output format settings
    #[serde(default)]
    pub export_format: ExportFormat,
}

/// Source database engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceEngine {
    Postgres,
    Mysql,
    Sqlite,
    Duckdb,
}

impl std::fmt::Display for SourceEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SourceEngine::Postgres => "postgres",
            SourceEngine::Mysql => "mysql",
            SourceEngine::Sqlite => "sqlite",
            SourceEngine::Duckdb => "duckdb",
        };
        write!(f, "{name}")
    }
}

/// Source database connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Database engine
    pub engine: SourceEngine,
    /// Full connection string; overrides the component fields
    #[serde(default)]
    pub connection_string: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    /// Database name, or file path for sqlite/duckdb
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Rows fetched per batch while streaming results
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

/// A complete job file: source, destination and the export itself
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportJobFile {
    /// Job kind marker, currently always "export"
    #[serde(default = "default_kind")]
    pub kind: String,
    /// Source database
    pub source: SourceConfig,
    /// Destination URL (s3://, r2://, gs://, az://, or a local path)
    pub destination: String,
    #[serde(flatten)]
    pub job: ExportJob,
}

/// Load a job file from disk
pub fn load_job(path: &Path) -> Result<ExportJobFile> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::config(format!("Failed to read {}: {e}", path.display())))?;
    load_job_from_str(&content)
}

/// Parse a job file from YAML
pub fn load_job_from_str(content: &str) -> Result<ExportJobFile> {
    let file: ExportJobFile = serde_yaml::from_str(content)?;
    if file.kind != "export" {
        return Err(Error::config(format!(
            "Unsupported job kind: {}",
            file.kind
        )));
    }
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn minimal_job_gets_defaults() {
        let job = load_job_from_str(
            r#"
source:
  engine: duckdb
  database: ":memory:"
destination: /tmp/out
sql: SELECT 1 AS one
filename: out_{}.json
"#,
        )
        .unwrap();

        assert_eq!(job.kind, "export");
        assert_eq!(job.job.approx_max_file_size_bytes, 1_900_000_000);
        assert_eq!(job.job.schema_filename, None);
        assert_eq!(job.job.export_format, ExportFormat::default());
        assert_eq!(job.source.batch_size, 10_000);
    }

    #[test]
    fn csv_format_fields_parse() {
        let job = load_job_from_str(
            r#"
source:
  engine: postgres
  host: db.internal
  database: orders
  user: exporter
  password: secret
destination: gs://bucket/exports
sql: SELECT * FROM source_db.public.orders
filename: orders_{}.csv
export_format:
  file_format: csv
  csv_delimiter: "|"
  csv_quoting: all
  csv_include_header: true
"#,
        )
        .unwrap();

        let format = &job.job.export_format;
        assert_eq!(format.file_format, FileFormat::Csv);
        assert_eq!(format.csv_delimiter, "|");
        assert_eq!(format.csv_quoting, Quoting::All);
        assert!(format.csv_include_header);
        // Untouched fields keep their defaults
        assert_eq!(format.csv_lineterminator, "\r\n");
        assert!(format.csv_doublequote);
    }

    #[test]
    fn explicit_schema_list_parses() {
        let job = load_job_from_str(
            r#"
source:
  engine: duckdb
  database: ":memory:"
destination: /tmp/out
sql: SELECT 1 AS id
filename: out_{}.json
schema_filename: schema.json
schema:
  - name: id
    type: INTEGER
    mode: REQUIRED
"#,
        )
        .unwrap();

        match job.job.schema {
            Some(SchemaSpec::Fields(ref fields)) => {
                assert_eq!(fields.len(), 1);
                assert_eq!(fields[0].name, "id");
            }
            other => panic!("expected field list, got {other:?}"),
        }
    }

    #[test]
    fn unknown_kind_rejected() {
        let err = load_job_from_str(
            r#"
kind: import
source:
  engine: duckdb
  database: ":memory:"
destination: /tmp/out
sql: SELECT 1
filename: out_{}.json
"#,
        )
        .unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn unknown_format_field_rejected() {
        let result = load_job_from_str(
            r#"
source:
  engine: duckdb
  database: ":memory:"
destination: /tmp/out
sql: SELECT 1
filename: out_{}.json
export_format:
  csv_headers: true
"#,
        );
        assert!(result.is_err());
    }
}
