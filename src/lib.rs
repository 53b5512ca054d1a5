//! # Offload
//!
//! A streaming exporter that dumps relational query results into
//! warehouse-ready JSON or CSV files.
//!
//! ## Features
//!
//! - **Any SQL Source**: PostgreSQL, MySQL, SQLite and DuckDB via DuckDB extensions
//! - **Warehouse-Safe Values**: dates to epoch seconds, decimals to floats
//! - **Split Files**: output rolls over at a size threshold, ready for parallel loads
//! - **Schema Files**: field types and modes inferred from query metadata
//! - **Cloud Upload**: S3, R2, GCS, Azure or local filesystem destinations
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use offload::{load_job, CloudDestination, DuckDbSource, Exporter, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let job_file = load_job("jobs/orders.yaml".as_ref())?;
//!
//!     let mut source = DuckDbSource::connect(&job_file.source)?;
//!     let exporter = Exporter::new(job_file.job);
//!     let report = exporter.run(&mut source)?;
//!
//!     let dest = CloudDestination::parse(&job_file.destination)?;
//!     exporter.upload(&report.files, &dest).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                       Export Job                           │
//! │  sql    filename template    format    schema    dest URL  │
//! └────────────────────────────────────────────────────────────┘
//!                              │
//! ┌──────────┬──────────┬──────┴──────┬───────────┬────────────┐
//! │  Query   │ Convert  │   Encode    │  Output   │   Upload   │
//! ├──────────┼──────────┼─────────────┼───────────┼────────────┤
//! │ Postgres │ Epochs   │ JSON lines  │ Spool     │ S3 / R2    │
//! │ MySQL    │ Floats   │ CSV dialect │ Rollover  │ GCS        │
//! │ SQLite   │ Base64   │ Headers     │ Schema    │ Azure      │
//! │ DuckDB   │          │             │ file      │ Local      │
//! └──────────┴──────────┴─────────────┴───────────┴────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Type code mapping and value conversion
pub mod convert;

/// Schema inference from query metadata
pub mod schema;

/// Row encoding (JSON lines, CSV dialects)
pub mod encode;

/// Split spool files and destination uploads
pub mod output;

/// Query sources
pub mod query;

/// Export orchestration
pub mod export;

/// Job configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::{load_job, load_job_from_str, ExportFormat, ExportJob, ExportJobFile};
pub use export::{Exporter, ExportReport};
pub use output::{CloudDestination, ObjectUploader};
pub use query::{DuckDbSource, MemorySource, QuerySource};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
