//! Error ledger: verbatim copies of records that were not fully processed.
//!
//! Every entry is flushed as soon as it is written so the ledger survives a
//! crash mid-run.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use csv::StringRecord;

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("creating ledger {}: {source}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("writing ledger entry: {0}")]
    Write(#[from] csv::Error),
    #[error("flushing ledger: {0}")]
    Flush(#[from] io::Error),
}

/// Append-only CSV sink for failed records.
pub struct Ledger<W: io::Write> {
    writer: csv::Writer<W>,
    entries: u64,
}

impl Ledger<File> {
    /// Creates (truncating) the ledger file, creating missing parent directories.
    pub fn create(path: &Path) -> Result<Self, LedgerError> {
        let create_err = |source| LedgerError::Create {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(create_err)?;
        }
        let file = File::create(path).map_err(create_err)?;
        Ok(Self::from_writer(file))
    }
}

impl<W: io::Write> Ledger<W> {
    pub fn from_writer(w: W) -> Self {
        let writer = csv::WriterBuilder::new().flexible(true).from_writer(w);
        Self { writer, entries: 0 }
    }

    /// Writes the manifest's header row. Not counted as an entry.
    pub fn write_header(&mut self, header: &StringRecord) -> Result<(), LedgerError> {
        self.writer.write_record(header)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Appends one record and flushes.
    pub fn append(&mut self, record: &StringRecord) -> Result<(), LedgerError> {
        self.writer.write_record(record)?;
        self.writer.flush()?;
        self.entries += 1;
        Ok(())
    }

    /// Number of entries appended so far.
    pub fn entries(&self) -> u64 {
        self.entries
    }

    pub fn flush(&mut self) -> Result<(), LedgerError> {
        self.writer.flush()?;
        Ok(())
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(self) -> Result<W, LedgerError> {
        self.writer
            .into_inner()
            .map_err(|e| LedgerError::Flush(e.into_error()))
    }
}
