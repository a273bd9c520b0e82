//! Fetch error taxonomy.

use std::io;
use std::path::PathBuf;

/// Failure of a single fetch attempt against one candidate address.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The per-attempt time budget ran out.
    #[error("timed out fetching {url}")]
    Timeout { url: String },
    /// DNS, connect, TLS, malformed URL or any other transfer failure.
    #[error("fetching {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: curl::Error,
    },
    /// Creating the target directory or file, or writing the body, failed.
    #[error("storing {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FetchError {
    /// Classifies a curl error: operation timeouts become `Timeout`, everything else `Transport`.
    pub(crate) fn from_curl(url: &str, e: curl::Error) -> Self {
        if e.is_operation_timedout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else {
            FetchError::Transport {
                url: url.to_string(),
                source: e,
            }
        }
    }

    /// Short label for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Timeout { .. } => "timeout",
            FetchError::Transport { .. } => "transport",
            FetchError::Storage { .. } => "storage",
        }
    }
}
