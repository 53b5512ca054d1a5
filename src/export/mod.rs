//! Export orchestration
//!
//! Runs a configured export end to end: execute the query, convert and
//! encode each row, spool the output across size-limited files, write the
//! schema file when asked, and upload the whole file set.


use crate::config::ExportJob;
use crate::encode::RowEncoder;
use crate::error::{Error, Result};
use crate::output::{FileNaming, FileSet, ObjectUploader, SplitWriter};
use crate::query::QuerySource;
use crate::schema;

/// Summary of a finished export
#[derive(Debug)]
pub struct ExportReport {
    /// Rows written across all data files
    pub rows: usize,
    /// Data files plus the schema file, in creation order
    pub files: FileSet,
    /// MIME type shared by every file in the set
    pub mime_type: &'static str,
}

/// Runs one export job
pub struct Exporter {
    job: ExportJob,
}

impl Exporter {
    pub fn new(job: ExportJob) -> Self {
        Self { job }
    }

    /// Execute the query and spool results into local files.
    ///
    /// The returned report owns the spool files; they are deleted when it
    /// is dropped, so upload before letting it go.
    pub fn run(&self, source: &mut dyn QuerySource) -> Result<ExportReport> {
        // Resolve format problems before touching the database
        let encoder = RowEncoder::from_format(&self.job.export_format)?;
        let naming = FileNaming::Template(self.job.filename.clone());
        naming.validate()?;

        tracing::info!(sql = %self.job.sql, "executing export query");
        let mut cursor = source.execute(&self.job.sql)?;
        let columns = cursor.columns().to_vec();
        let names: Vec<String> = columns.iter().map(|c| c.name.clone()).collect();

        let header = encoder.header(&names)?;
        let mut writer =
            SplitWriter::create(naming, self.job.approx_max_file_size_bytes, header)?;

        let mut rows = 0usize;
        while let Some(row) = cursor.next_row()? {
            if row.len() != columns.len() {
                return Err(Error::query(format!(
                    "row {rows} has {} values, expected {}",
                    row.len(),
                    columns.len()
                )));
            }
            let converted: Vec<_> = row
                .into_iter()
                .zip(&columns)
                .map(|(cell, column)| crate::convert::convert(cell, column.type_code))
                .collect();
            writer.write(&encoder.encode_row(&names, &converted)?)?;
            writer.roll_if_needed()?;
            rows += 1;
        }
        drop(cursor);

        let mut files = writer.finalize()?;
        tracing::info!(rows, files = files.len(), "export query spooled");

        if let Some(schema_name) = &self.job.schema_filename {
            let content = schema::infer(&columns, self.job.schema.as_ref());
            let mut schema_writer =
                SplitWriter::create(FileNaming::Fixed(schema_name.clone()), u64::MAX, None)?;
            schema_writer.write(&content.to_bytes()?)?;
            files.extend(schema_writer.finalize()?);
        }

        Ok(ExportReport {
            rows,
            files,
            mime_type: self.mime_type(),
        })
    }

    /// Upload every spooled file to the destination, in order
    pub async fn upload(&self, files: &FileSet, uploader: &dyn ObjectUploader) -> Result<()> {
        let mime_type = self.mime_type();
        for file in files {
            uploader
                .upload(&file.object_name, file.path(), mime_type)
                .await?;
        }
        Ok(())
    }

    /// All files of one export share the data format's MIME type, the
    /// schema file included.
    fn mime_type(&self) -> &'static str {
        self.job.export_format.file_format.mime_type()
    }
}
