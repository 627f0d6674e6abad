//! File appender implementation

use crate::core::{Appender, LoggerError, Result};
use std::fs::{File, OpenOptions};
use std::io::{LineWriter, Write};
use std::path::{Path, PathBuf};

/// Appends encoded records to a file.
///
/// The file is opened in append mode, so several backends sharing a path
/// each add whole lines.
pub struct FileAppender {
    path: PathBuf,
    writer: LineWriter<File>,
}

impl FileAppender {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| LoggerError::output_open(path.display().to_string(), e))?;

        Ok(Self {
            path,
            writer: LineWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Appender for FileAppender {
    fn append(&mut self, record: &str) -> Result<()> {
        self.writer.write_all(record.as_bytes())?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileAppender {
    fn drop(&mut self) {
        // Nowhere to report a failed final flush
        let _ = self.writer.flush();
    }
}
