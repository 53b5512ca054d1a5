//! In-memory query source for tests and examples

use super::{ColumnMeta, QuerySource, RowCursor};
use crate::error::Result;
use crate::types::Cell;

/// A query source backed by a fixed set of rows.
///
/// The SQL passed to `execute` is ignored; every call replays the same rows.
#[derive(Debug, Clone)]
pub struct MemorySource {
    columns: Vec<ColumnMeta>,
    rows: Vec<Vec<Cell>>,
}

impl MemorySource {
    pub fn new(columns: Vec<ColumnMeta>, rows: Vec<Vec<Cell>>) -> Self {
        Self { columns, rows }
    }
}

impl QuerySource for MemorySource {
    fn check(&mut self) -> Result<()> {
        Ok(())
    }

    fn execute(&mut self, _sql: &str) -> Result<Box<dyn RowCursor + '_>> {
        Ok(Box::new(MemoryCursor {
            columns: &self.columns,
            rows: self.rows.clone().into_iter(),
        }))
    }
}

struct MemoryCursor<'a> {
    columns: &'a [ColumnMeta],
    rows: std::vec::IntoIter<Vec<Cell>>,
}

impl RowCursor for MemoryCursor<'_> {
    fn columns(&self) -> &[ColumnMeta] {
        self.columns
    }

    fn next_row(&mut self) -> Result<Option<Vec<Cell>>> {
        Ok(self.rows.next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::type_code;

    #[test]
    fn replays_rows_in_order() {
        let mut source = MemorySource::new(
            vec![
                ColumnMeta::new("id", type_code::LONG, false),
                ColumnMeta::new("name", type_code::VAR_STRING, true),
            ],
            vec![
                vec![Cell::Integer(1), Cell::Text("a".into())],
                vec![Cell::Integer(2), Cell::Null],
            ],
        );

        let mut cursor = source.execute("SELECT 1").unwrap();
        assert_eq!(cursor.columns().len(), 2);
        assert_eq!(
            cursor.next_row().unwrap(),
            Some(vec![Cell::Integer(1), Cell::Text("a".into())])
        );
        assert_eq!(
            cursor.next_row().unwrap(),
            Some(vec![Cell::Integer(2), Cell::Null])
        );
        assert_eq!(cursor.next_row().unwrap(), None);
    }
}
