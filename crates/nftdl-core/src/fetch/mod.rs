//! Single-attempt HTTP fetch of one candidate address into a target file.
//!
//! Uses the curl crate (libcurl) with a total per-attempt timeout. HTTP status
//! codes are not interpreted: whatever body the server returns is saved.

mod error;
mod handler;

pub use error::FetchError;

use std::path::{Path, PathBuf};
use std::time::Duration;

use curl::easy::Easy2;

use handler::FetchHandler;

/// Per-attempt time budget when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Fetches one address into `target_base` + inferred extension.
///
/// `ordinal` is the record counter, used only for the status line.
pub trait Fetch {
    fn fetch(&self, address: &str, target_base: &Path, ordinal: u64)
        -> Result<PathBuf, FetchError>;
}

/// Transfer options applied to every attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOptions {
    /// Total time budget per attempt, measured from request start.
    pub timeout: Duration,
    pub connect_timeout: Option<Duration>,
    pub user_agent: Option<String>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: None,
            user_agent: None,
        }
    }
}

/// Blocking libcurl fetcher. Runs in the current thread.
#[derive(Debug, Clone, Default)]
pub struct CurlFetcher {
    opts: FetchOptions,
}

impl CurlFetcher {
    pub fn new(opts: FetchOptions) -> Self {
        Self { opts }
    }

    fn configure(&self, easy: &mut Easy2<FetchHandler>, address: &str) -> Result<(), curl::Error> {
        easy.url(address)?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.timeout(self.opts.timeout)?;
        if let Some(ct) = self.opts.connect_timeout {
            easy.connect_timeout(ct)?;
        }
        if let Some(ua) = &self.opts.user_agent {
            easy.useragent(ua)?;
        }
        Ok(())
    }
}

impl Fetch for CurlFetcher {
    fn fetch(
        &self,
        address: &str,
        target_base: &Path,
        ordinal: u64,
    ) -> Result<PathBuf, FetchError> {
        let mut easy = Easy2::new(FetchHandler::new(address, target_base));
        self.configure(&mut easy, address)
            .map_err(|e| FetchError::from_curl(address, e))?;

        let performed = easy.perform();
        // A storage failure aborts the transfer from inside the write callback;
        // report it rather than curl's generic write error.
        if let Some(e) = easy.get_mut().take_storage_error() {
            return Err(e);
        }
        performed.map_err(|e| FetchError::from_curl(address, e))?;

        let code = easy.response_code().unwrap_or(0);
        if code != 0 && !(200..300).contains(&code) {
            tracing::warn!(url = %address, status = code, "non-success HTTP status, saving body anyway");
        }

        let path = easy.get_mut().finish()?;
        tracing::debug!(
            url = %address,
            bytes = easy.get_ref().bytes_written,
            "fetch complete"
        );
        tracing::info!("Successfully saved image {}: {}", ordinal, path.display());
        Ok(path)
    }
}
