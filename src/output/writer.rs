//! Split-file spool writer
//!
//! Export output is written into local spool files first and uploaded
//! afterwards. The writer rolls over to a fresh file whenever the current
//! one crosses the configured size threshold, so a file may exceed the
//! threshold by at most one record.

use crate::error::{Error, Result};
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// How sealed files are named in the destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileNaming {
    /// A template containing `{}`, replaced with the file index
    Template(String),
    /// A single fixed name; the writer must never roll over
    Fixed(String),
}

impl FileNaming {
    /// Reject templates that cannot produce distinct names
    pub fn validate(&self) -> Result<()> {
        match self {
            FileNaming::Template(template) if !template.contains("{}") => Err(Error::config(
                format!("filename template must contain {{}}, got {template:?}"),
            )),
            _ => Ok(()),
        }
    }

    fn object_name(&self, index: usize) -> String {
        match self {
            FileNaming::Template(template) => template.replacen("{}", &index.to_string(), 1),
            FileNaming::Fixed(name) => name.clone(),
        }
    }
}

/// A sealed spool file awaiting upload
#[derive(Debug)]
pub struct SpoolFile {
    /// Destination object name
    pub object_name: String,
    /// Bytes written to the file
    pub bytes: u64,
    file: NamedTempFile,
}

impl SpoolFile {
    /// Local path of the spool file
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// The ordered files produced by one export
pub type FileSet = Vec<SpoolFile>;

/// Writes a byte stream across size-limited spool files
#[derive(Debug)]
pub struct SplitWriter {
    naming: FileNaming,
    max_bytes: u64,
    header: Option<Vec<u8>>,
    current: BufWriter<NamedTempFile>,
    current_name: String,
    current_bytes: u64,
    sealed: Vec<SpoolFile>,
    next_index: usize,
}

impl SplitWriter {
    /// Open the writer with file index 0 active.
    ///
    /// The header, when present, is written at the start of every file
    /// including files created by rollover.
    pub fn create(naming: FileNaming, max_bytes: u64, header: Option<Vec<u8>>) -> Result<Self> {
        naming.validate()?;
        let current_name = naming.object_name(0);
        let mut writer = Self {
            naming,
            max_bytes,
            header,
            current: BufWriter::new(NamedTempFile::new()?),
            current_name,
            current_bytes: 0,
            sealed: Vec::new(),
            next_index: 1,
        };
        writer.write_header()?;
        Ok(writer)
    }

    fn write_header(&mut self) -> Result<()> {
        if let Some(header) = self.header.clone() {
            self.current.write_all(&header)?;
            self.current_bytes += header.len() as u64;
        }
        Ok(())
    }

    /// Append bytes to the current file
    pub fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.current.write_all(bytes)?;
        self.current_bytes += bytes.len() as u64;
        Ok(())
    }

    /// Bytes written to the current file so far
    pub fn current_size(&self) -> u64 {
        self.current_bytes
    }

    /// Roll over when the current file has reached the size threshold.
    ///
    /// Called after each record is written, so the record that crossed the
    /// threshold stays in the file it was written to.
    pub fn roll_if_needed(&mut self) -> Result<()> {
        if self.current_bytes >= self.max_bytes {
            self.roll()?;
        }
        Ok(())
    }

    fn roll(&mut self) -> Result<()> {
        let next_name = self.naming.object_name(self.next_index);
        let finished = std::mem::replace(
            &mut self.current,
            BufWriter::new(NamedTempFile::new()?),
        );
        let file = finished
            .into_inner()
            .map_err(|e| Error::Io(e.into_error()))?;

        let sealed_name = std::mem::replace(&mut self.current_name, next_name);
        tracing::debug!(
            file = %sealed_name,
            bytes = self.current_bytes,
            "rolling over to next output file"
        );
        self.sealed.push(SpoolFile {
            object_name: sealed_name,
            bytes: self.current_bytes,
            file,
        });

        self.current_bytes = 0;
        self.next_index += 1;
        self.write_header()
    }

    /// Seal the current file and return all files in creation order.
    ///
    /// The final file is always part of the set, even when empty, so an
    /// export that yields no rows still produces one output file.
    pub fn finalize(mut self) -> Result<FileSet> {
        let file = self
            .current
            .into_inner()
            .map_err(|e| Error::Io(e.into_error()))?;
        self.sealed.push(SpoolFile {
            object_name: self.current_name,
            bytes: self.current_bytes,
            file,
        });
        Ok(self.sealed)
    }
}
