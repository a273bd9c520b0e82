//! Easy2 handler that streams one response body into the target file.
//!
//! The target file is opened on the first body chunk, once the response
//! headers (and so the declared media type) are known. The extension is
//! inferred at that point; the file is closed when the handler is dropped.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str;

use crate::url_model::infer_extension;

use super::error::FetchError;

pub(crate) struct FetchHandler {
    address: String,
    target_base: PathBuf,
    /// `Content-Type` of the most recent response (reset on each status line, so redirects don't leak).
    pub(super) content_type: Option<String>,
    file: Option<BufWriter<File>>,
    saved_path: Option<PathBuf>,
    storage_error: Option<FetchError>,
    pub(super) bytes_written: u64,
}

impl FetchHandler {
    pub(crate) fn new(address: &str, target_base: &Path) -> Self {
        Self {
            address: address.to_string(),
            target_base: target_base.to_path_buf(),
            content_type: None,
            file: None,
            saved_path: None,
            storage_error: None,
            bytes_written: 0,
        }
    }

    /// Target path: `target_base` with the inferred extension appended.
    fn target_path(&self) -> PathBuf {
        let ext = infer_extension(&self.address, self.content_type.as_deref());
        let mut name: OsString = self.target_base.clone().into_os_string();
        name.push(ext);
        PathBuf::from(name)
    }

    /// Creates missing parent directories, then creates (truncating) the target file.
    fn open_target(&mut self) -> Result<(), FetchError> {
        let path = self.target_path();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| FetchError::Storage {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let file = File::create(&path).map_err(|source| FetchError::Storage {
            path: path.clone(),
            source,
        })?;
        self.file = Some(BufWriter::new(file));
        self.saved_path = Some(path);
        Ok(())
    }

    /// Storage failure raised inside a callback (the transfer was aborted because of it).
    pub(crate) fn take_storage_error(&mut self) -> Option<FetchError> {
        self.storage_error.take()
    }

    /// Flushes and closes the target file and returns its path.
    /// Creates an empty file when the response had no body.
    pub(crate) fn finish(&mut self) -> Result<PathBuf, FetchError> {
        if self.file.is_none() {
            self.open_target()?;
        }
        let path = self.saved_path.clone().unwrap_or_else(|| self.target_path());
        if let Some(mut file) = self.file.take() {
            file.flush().map_err(|source| FetchError::Storage {
                path: path.clone(),
                source,
            })?;
        }
        Ok(path)
    }
}

impl curl::easy::Handler for FetchHandler {
    fn header(&mut self, data: &[u8]) -> bool {
        if let Ok(s) = str::from_utf8(data) {
            let line = s.trim_end();
            if line.starts_with("HTTP/") {
                self.content_type = None;
            } else if let Some((name, value)) = line.split_once(':') {
                if name.trim().eq_ignore_ascii_case("content-type") {
                    let value = value.trim();
                    self.content_type = (!value.is_empty()).then(|| value.to_string());
                }
            }
        }
        true
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, curl::easy::WriteError> {
        if self.file.is_none() {
            if let Err(e) = self.open_target() {
                self.storage_error = Some(e);
                return Ok(0); // abort transfer
            }
        }
        let Some(file) = self.file.as_mut() else {
            return Ok(0);
        };
        match file.write_all(data) {
            Ok(()) => {
                self.bytes_written += data.len() as u64;
                Ok(data.len())
            }
            Err(source) => {
                self.storage_error = Some(FetchError::Storage {
                    path: self.saved_path.clone().unwrap_or_default(),
                    source,
                });
                Ok(0)
            }
        }
    }
}
