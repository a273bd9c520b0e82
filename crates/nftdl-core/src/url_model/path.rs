//! Extension extraction from a URL path.

/// Returns the extension (with leading dot) of the last path segment of `url`.
///
/// Only the path is inspected, never the host, query or fragment. Returns
/// `None` when the URL cannot be parsed, the last segment has no `.`, or
/// nothing follows the final `.`.
pub fn extension_from_url_path(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed.path().rsplit('/').next()?;
    let dot = segment.rfind('.')?;
    let ext = &segment[dot..];
    if ext.len() < 2 {
        return None;
    }
    Some(ext.to_string())
}
