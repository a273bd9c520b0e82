//! Gateway fallback: try each candidate address in order until one succeeds.

use std::path::{Path, PathBuf};

use crate::fetch::{Fetch, FetchError};
use crate::resolver::GatewayResolver;

/// Resolves `locator` and fetches the candidates in priority order into `target_base`.
///
/// Returns the saved path of the first successful attempt. When every
/// candidate fails, the error of the *last* attempt is returned; earlier
/// failures are only logged.
pub fn fetch_with_fallback<F>(
    fetcher: &F,
    resolver: &GatewayResolver,
    locator: &str,
    target_base: &Path,
    ordinal: u64,
) -> Result<PathBuf, FetchError>
where
    F: Fetch + ?Sized,
{
    let candidates = resolver.resolve(locator);
    let Some((last, earlier)) = candidates.as_slice().split_last() else {
        return fetcher.fetch(locator, target_base, ordinal);
    };
    for address in earlier {
        match fetcher.fetch(address, target_base, ordinal) {
            Ok(path) => return Ok(path),
            Err(e) => {
                tracing::warn!(
                    url = %address,
                    kind = e.kind(),
                    "candidate failed, trying next gateway: {}",
                    e
                );
            }
        }
    }
    fetcher.fetch(last, target_base, ordinal)
}
