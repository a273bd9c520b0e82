//! Path-safe asset identifiers.

/// Makes an asset identifier safe to embed in a single file name.
///
/// - Replaces NUL, `/`, `\`, and control characters with `_`
/// - Maps an empty identifier to `_`
///
/// Unlike a general filename sanitizer this never trims or collapses
/// characters, so distinct identifiers stay distinct on disk.
pub fn sanitize_asset_id(asset_id: &str) -> String {
    if asset_id.is_empty() {
        return "_".to_string();
    }
    asset_id
        .chars()
        .map(|c| {
            if c == '\0' || c == '/' || c == '\\' || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect()
}
