//! Manifest ingestion: CSV records carrying an asset id and two locators.
//!
//! Rows must all have the same number of fields; a row with too few fields
//! to hold the configured columns is rejected. Both are fatal for a run.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use csv::StringRecord;
use serde::{Deserialize, Serialize};

/// Zero-based column positions of the fields the pipeline reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestColumns {
    pub asset_id: usize,
    /// Marketplace image locator.
    pub primary: usize,
    /// Canonical/original image locator.
    pub canonical: usize,
}

impl Default for ManifestColumns {
    fn default() -> Self {
        Self {
            asset_id: 1,
            primary: 13,
            canonical: 15,
        }
    }
}

impl ManifestColumns {
    /// Minimum field count a row needs to contain every configured column.
    pub fn min_fields(&self) -> usize {
        self.asset_id.max(self.primary).max(self.canonical) + 1
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("opening manifest {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("reading manifest: {0}")]
    Read(#[from] csv::Error),
    #[error("manifest row at line {line} has {found} fields, need at least {needed}")]
    TooFewFields {
        line: u64,
        found: usize,
        needed: usize,
    },
}

/// One manifest row. The raw fields are kept verbatim for the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    fields: StringRecord,
    columns: ManifestColumns,
}

impl Record {
    /// Builds a record, checking that every configured column is present.
    pub fn new(fields: StringRecord, columns: ManifestColumns) -> Result<Self, ManifestError> {
        if fields.len() < columns.min_fields() {
            return Err(ManifestError::TooFewFields {
                line: fields.position().map(|p| p.line()).unwrap_or(0),
                found: fields.len(),
                needed: columns.min_fields(),
            });
        }
        Ok(Self { fields, columns })
    }

    pub fn fields(&self) -> &StringRecord {
        &self.fields
    }

    fn field(&self, index: usize) -> &str {
        self.fields.get(index).unwrap_or("")
    }

    pub fn asset_id(&self) -> &str {
        self.field(self.columns.asset_id)
    }

    pub fn primary_locator(&self) -> &str {
        self.field(self.columns.primary)
    }

    pub fn canonical_locator(&self) -> &str {
        self.field(self.columns.canonical)
    }

    /// True when either locator is empty; such records are never fetched.
    pub fn is_missing_locator(&self) -> bool {
        self.primary_locator().is_empty() || self.canonical_locator().is_empty()
    }
}

/// Sequential reader over manifest rows.
pub struct ManifestReader<R> {
    reader: csv::Reader<R>,
    columns: ManifestColumns,
    has_headers: bool,
}

impl ManifestReader<File> {
    pub fn open(
        path: &Path,
        has_headers: bool,
        columns: ManifestColumns,
    ) -> Result<Self, ManifestError> {
        let file = File::open(path).map_err(|source| ManifestError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_reader(file, has_headers, columns))
    }
}

impl<R: io::Read> ManifestReader<R> {
    pub fn from_reader(rdr: R, has_headers: bool, columns: ManifestColumns) -> Self {
        let reader = csv::ReaderBuilder::new()
            .has_headers(has_headers)
            .from_reader(rdr);
        Self {
            reader,
            columns,
            has_headers,
        }
    }

    /// Header row, if the manifest is configured to have one.
    pub fn headers(&mut self) -> Result<Option<StringRecord>, ManifestError> {
        if !self.has_headers {
            return Ok(None);
        }
        Ok(Some(self.reader.headers()?.clone()))
    }

    /// Next record in file order, or `None` at end of input.
    pub fn next_record(&mut self) -> Result<Option<Record>, ManifestError> {
        let mut fields = StringRecord::new();
        if !self.reader.read_record(&mut fields)? {
            return Ok(None);
        }
        Record::new(fields, self.columns).map(Some)
    }
}
