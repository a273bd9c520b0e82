//! Deterministic output locations for fetched assets.

use std::path::PathBuf;

use crate::url_model::sanitize_asset_id;

/// Which of a record's two locators is being fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocatorKind {
    /// Marketplace-hosted image (manifest "primary" locator).
    Marketplace,
    /// Canonical/original image the token metadata points to.
    Canonical,
}

impl LocatorKind {
    /// Subdirectory under the output root, also used as the file name suffix.
    pub fn dir_name(self) -> &'static str {
        match self {
            LocatorKind::Marketplace => "opensea",
            LocatorKind::Canonical => "original",
        }
    }
}

/// Output root; every file lands in `<root>/<kind>/<asset>_<kind><ext>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Target path without extension; the fetcher appends the inferred one.
    pub fn target_base(&self, kind: LocatorKind, asset_id: &str) -> PathBuf {
        let dir = kind.dir_name();
        self.root
            .join(dir)
            .join(format!("{}_{}", sanitize_asset_id(asset_id), dir))
    }
}
