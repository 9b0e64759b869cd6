//! Record persistence
//!
//! Rows are appended to a CSV file; the header row is written only when the
//! file is new or empty, so it appears exactly once.

use std::fs::{File, OpenOptions};
use std::path::PathBuf;

use tracing::{debug, instrument};

use crate::models::Record;

/// Destination for the records collected in one run
pub trait RecordSink {
    /// Append all rows in one operation
    fn append(&mut self, rows: &[Record]) -> crate::Result<()>;

    /// Human-readable name of the destination
    fn describe(&self) -> String;
}

/// Append-only CSV writer
#[derive(Debug, Clone)]
pub struct CsvRecordWriter {
    path: PathBuf,
}

impl CsvRecordWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read every record currently stored in the file
    pub fn read_all(&self) -> crate::Result<Vec<Record>> {
        let mut reader = csv::Reader::from_path(&self.path)?;
        let records = reader.deserialize().collect::<Result<Vec<Record>, _>>()?;
        Ok(records)
    }

    fn needs_header(&self) -> crate::Result<bool> {
        match std::fs::metadata(&self.path) {
            Ok(metadata) => Ok(metadata.len() == 0),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(true),
            Err(e) => Err(e.into()),
        }
    }

    fn open(&self) -> crate::Result<File> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        Ok(file)
    }
}

impl RecordSink for CsvRecordWriter {
    #[instrument(skip(self, rows), fields(path = %self.path.display(), rows = rows.len()))]
    fn append(&mut self, rows: &[Record]) -> crate::Result<()> {
        let write_header = self.needs_header()?;
        let file = self.open()?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(write_header)
            .from_writer(file);

        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;

        debug!(
            "Appended {} rows{}",
            rows.len(),
            if write_header { " with header" } else { "" }
        );
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
