//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Streaming relational export CLI
#[derive(Parser, Debug)]
#[command(name = "offload")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Export job file (YAML)
    #[arg(short, long, global = true)]
    pub job: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the export and upload the resulting files
    Export {
        /// Destination override (local path or cloud URL)
        /// Supports: /path, s3://bucket/path, r2://bucket/path, gs://bucket/path, az://container/path
        #[arg(short, long)]
        destination: Option<String>,

        /// Spool files locally but skip the upload
        #[arg(long)]
        no_upload: bool,
    },

    /// Test the source database connection
    Check,

    /// Print the schema the export would produce, without exporting data
    Schema,

    /// Validate the job file
    Validate,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}
