//! Output naming: file extension inference and path-safe asset identifiers.
//!
//! The extension is taken from the fetch address path when it has one,
//! otherwise from the response's declared media type, otherwise `.png`.

mod media_type;
mod path;
mod sanitize;

pub use media_type::extension_for_media_type;
pub use path::extension_from_url_path;
pub use sanitize::sanitize_asset_id;

/// Extension used when neither the address nor the media type yields one.
pub const DEFAULT_EXTENSION: &str = ".png";

/// Infers the output file extension (with leading dot) for a fetch.
///
/// # Examples
///
/// - `infer_extension("https://x.io/a/foo.jpg", Some("image/png"))` → `".jpg"`
/// - `infer_extension("https://ipfs.io/ipfs/Qm1", Some("image/gif"))` → `".gif"`
/// - `infer_extension("https://ipfs.io/ipfs/Qm1", None)` → `".png"`
pub fn infer_extension(address: &str, media_type: Option<&str>) -> String {
    extension_from_url_path(address)
        .or_else(|| media_type.and_then(extension_for_media_type))
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}
