//! CLI module
//!
//! Command-line interface for running export jobs.
//!
//! # Commands
//!
//! - `export` - Run the export and upload the resulting files
//! - `check` - Test the source database connection
//! - `schema` - Print the schema the export would produce
//! - `validate` - Validate the job file

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
