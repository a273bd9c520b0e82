//! Locator resolution: turn a raw manifest locator into candidate fetch URLs.
//!
//! Classification is lexical only. Content-addressed locators (`ipfs://<hash>`
//! or any URL carrying a `/ipfs/` path segment) are rewritten against the
//! local gateway first and the public gateway second; everything else is
//! fetched as-is.

const IPFS_SCHEME: &str = "ipfs://";
const IPFS_PATH: &str = "/ipfs/";

/// Address form of a locator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocatorForm<'a> {
    /// `ipfs://<hash>`; holds the hash (everything after the scheme).
    IpfsScheme(&'a str),
    /// URL with an embedded `/ipfs/...` segment; holds the suffix starting at `/ipfs/`.
    IpfsPath(&'a str),
    /// Any other URL.
    Conventional,
}

impl<'a> LocatorForm<'a> {
    pub fn classify(locator: &'a str) -> Self {
        if let Some(hash) = locator.strip_prefix(IPFS_SCHEME) {
            LocatorForm::IpfsScheme(hash)
        } else if let Some(pos) = locator.find(IPFS_PATH) {
            LocatorForm::IpfsPath(&locator[pos..])
        } else {
            LocatorForm::Conventional
        }
    }
}

/// Ordered fetch addresses for one locator, highest priority first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateList(Vec<String>);

impl CandidateList {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }
}

impl IntoIterator for CandidateList {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Resolves locators against a local (private) gateway and a public fallback gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayResolver {
    local: String,
    public: String,
}

impl GatewayResolver {
    /// Gateway bases are stored without a trailing `/`.
    pub fn new(local: impl Into<String>, public: impl Into<String>) -> Self {
        Self {
            local: trim_base(local.into()),
            public: trim_base(public.into()),
        }
    }

    /// Candidate addresses for `locator`, local gateway before public gateway.
    pub fn resolve(&self, locator: &str) -> CandidateList {
        let candidates = match LocatorForm::classify(locator) {
            LocatorForm::IpfsScheme(hash) => vec![
                format!("{}{}{}", self.local, IPFS_PATH, hash),
                format!("{}{}{}", self.public, IPFS_PATH, hash),
            ],
            LocatorForm::IpfsPath(suffix) => vec![
                format!("{}{}", self.local, suffix),
                format!("{}{}", self.public, suffix),
            ],
            LocatorForm::Conventional => vec![locator.to_string()],
        };
        CandidateList(candidates)
    }
}

fn trim_base(mut base: String) -> String {
    while base.ends_with('/') {
        base.pop();
    }
    base
}
