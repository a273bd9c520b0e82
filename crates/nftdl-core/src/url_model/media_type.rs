//! Media type to file extension mapping.

/// Maps a declared `Content-Type` to an extension (with leading dot).
///
/// Parameters such as `; charset=binary` are ignored and matching is
/// case-insensitive. When the table lists several extensions for a type the
/// first one is used.
pub fn extension_for_media_type(content_type: &str) -> Option<String> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    if essence.is_empty() {
        return None;
    }
    let exts = mime_guess::get_mime_extensions_str(&essence)?;
    exts.first().map(|ext| format!(".{ext}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_image_types() {
        assert_eq!(extension_for_media_type("image/png").as_deref(), Some(".png"));
        assert_eq!(extension_for_media_type("image/gif").as_deref(), Some(".gif"));
    }

    #[test]
    fn parameters_and_case_ignored() {
        assert_eq!(
            extension_for_media_type("IMAGE/PNG; charset=binary").as_deref(),
            Some(".png")
        );
    }

    #[test]
    fn unknown_or_empty() {
        assert_eq!(extension_for_media_type("application/x-made-up"), None);
        assert_eq!(extension_for_media_type(""), None);
        assert_eq!(extension_for_media_type(" ; q=1"), None);
    }
}
