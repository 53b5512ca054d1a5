//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::{load_job, ExportJobFile};
use crate::encode::RowEncoder;
use crate::error::{Error, Result};
use crate::export::Exporter;
use crate::output::{CloudDestination, FileNaming};
use crate::query::{DuckDbSource, QuerySource};
use crate::schema::{self, SchemaContent};
use serde_json::json;
use serde_json::Value;
use std::time::Instant;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Export {
                destination,
                no_upload,
            } => self.export(destination.as_deref(), *no_upload).await,
            Commands::Check => self.check(),
            Commands::Schema => self.schema(),
            Commands::Validate => self.validate(),
        }
    }

    /// Load the export job file
    fn load_job(&self) -> Result<ExportJobFile> {
        let path = self
            .cli
            .job
            .as_ref()
            .ok_or_else(|| Error::config("Job file not specified (use -j flag)"))?;
        load_job(path)
    }

    /// Run the export end to end
    async fn export(&self, destination: Option<&str>, no_upload: bool) -> Result<()> {
        let job_file = self.load_job()?;
        let destination = destination.unwrap_or(&job_file.destination);
        let started = Instant::now();

        let mut source = DuckDbSource::connect(&job_file.source)?;
        let exporter = Exporter::new(job_file.job.clone());
        let report = exporter.run(&mut source)?;

        let mut uploaded = false;
        if !no_upload {
            let dest = CloudDestination::parse(destination)?;
            exporter.upload(&report.files, &dest).await?;
            uploaded = true;
        }

        let files: Vec<Value> = report
            .files
            .iter()
            .map(|f| json!({"name": f.object_name, "bytes": f.bytes}))
            .collect();

        self.output_message(&json!({
            "type": "EXPORT_SUMMARY",
            "summary": {
                "status": "SUCCEEDED",
                "total_records": report.rows,
                "total_files": files.len(),
                "files": files,
                "format": job_file.job.export_format.file_format.as_str(),
                "destination": if uploaded { Some(destination) } else { None },
                "duration_seconds": started.elapsed().as_secs_f64(),
            }
        }));

        Ok(())
    }

    /// Test source database connection
    fn check(&self) -> Result<()> {
        let job_file = self.load_job()?;

        match DuckDbSource::connect(&job_file.source) {
            Ok(mut source) => match source.check() {
                Ok(()) => {
                    self.output_message(&json!({
                        "type": "CONNECTION_STATUS",
                        "connectionStatus": {
                            "status": "SUCCEEDED",
                            "message": format!("Connection successful: {}", source.connection_info())
                        }
                    }));
                }
                Err(e) => {
                    self.output_message(&json!({
                        "type": "CONNECTION_STATUS",
                        "connectionStatus": {
                            "status": "FAILED",
                            "message": format!("Connection check failed: {e}")
                        }
                    }));
                }
            },
            Err(e) => {
                self.output_message(&json!({
                    "type": "CONNECTION_STATUS",
                    "connectionStatus": {
                        "status": "FAILED",
                        "message": format!("Failed to connect: {e}")
                    }
                }));
            }
        }

        Ok(())
    }

    /// Print the schema the export would produce
    fn schema(&self) -> Result<()> {
        let job_file = self.load_job()?;

        let mut source = DuckDbSource::connect(&job_file.source)?;
        let cursor = source.execute(&job_file.job.sql)?;
        let columns = cursor.columns().to_vec();
        drop(cursor);

        let content = schema::infer(&columns, job_file.job.schema.as_ref());
        let fields: Value = match content {
            SchemaContent::Fields(fields) => serde_json::to_value(fields)?,
            SchemaContent::Verbatim(raw) => {
                // Explicit schemas are not necessarily JSON, pass through as-is
                serde_json::from_str(&raw).unwrap_or(Value::String(raw))
            }
        };

        self.output_message(&json!({
            "type": "SCHEMA",
            "schema": fields
        }));

        Ok(())
    }

    /// Validate the job file without connecting anywhere
    fn validate(&self) -> Result<()> {
        let job_file = self.load_job()?;

        FileNaming::Template(job_file.job.filename.clone()).validate()?;
        RowEncoder::from_format(&job_file.job.export_format)?;

        self.output_message(&json!({
            "type": "VALIDATION",
            "validation": {
                "status": "SUCCEEDED",
                "sql": job_file.job.sql,
                "filename": job_file.job.filename,
                "format": job_file.job.export_format.file_format.as_str(),
            }
        }));

        Ok(())
    }

    /// Output a message in the requested format
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}
