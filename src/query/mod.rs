//! Query sources
//!
//! A [`QuerySource`] runs SQL against a relational database and hands back a
//! forward-only [`RowCursor`] over the results. The DuckDB-backed source
//! covers PostgreSQL, MySQL, SQLite and DuckDB itself; [`MemorySource`]
//! exists for tests and examples.

pub mod duckdb;
pub mod memory;

pub use self::duckdb::DuckDbSource;
pub use self::memory::MemorySource;

use crate::error::Result;
use crate::types::Cell;

/// Metadata for one result column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMeta {
    /// Column name as returned by the query
    pub name: String,
    /// Driver type code, MySQL wire-protocol numbering
    pub type_code: u32,
    /// Whether the column can hold NULL
    pub nullable: bool,
}

impl ColumnMeta {
    pub fn new(name: impl Into<String>, type_code: u32, nullable: bool) -> Self {
        Self {
            name: name.into(),
            type_code,
            nullable,
        }
    }
}

/// A connected database that can execute export queries
pub trait QuerySource {
    /// Probe the connection without running the export query
    fn check(&mut self) -> Result<()>;

    /// Execute a query and return a cursor over its rows
    fn execute(&mut self, sql: &str) -> Result<Box<dyn RowCursor + '_>>;
}

/// Forward-only iteration over query results
pub trait RowCursor {
    /// Column metadata, fixed for the life of the cursor
    fn columns(&self) -> &[ColumnMeta];

    /// Fetch the next row, or `None` when the result set is exhausted
    fn next_row(&mut self) -> Result<Option<Vec<Cell>>>;
}
