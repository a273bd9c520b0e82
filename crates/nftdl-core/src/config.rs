use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::fetch::FetchOptions;
use crate::manifest::ManifestColumns;
use crate::resolver::GatewayResolver;

/// IPFS gateway base URLs, tried in this order for content-addressed locators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Private/local gateway (e.g. a sidecar IPFS node).
    pub local: String,
    /// Public fallback gateway.
    pub public: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            local: "http://ipfs:8080".to_string(),
            public: "https://ipfs.io".to_string(),
        }
    }
}

/// Input and output locations for a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    pub manifest: PathBuf,
    /// Error ledger CSV; recreated on every run.
    pub ledger: PathBuf,
    /// Root under which `opensea/` and `original/` are created.
    pub output_dir: PathBuf,
    /// Run log receiving a copy of every status line.
    pub run_log: PathBuf,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            manifest: PathBuf::from("/data/nft.csv"),
            ledger: PathBuf::from("/data/error_file.csv"),
            output_dir: PathBuf::from("/data"),
            run_log: PathBuf::from("/data/output.txt"),
        }
    }
}

/// Per-attempt transfer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Total time budget per candidate address, in seconds.
    pub timeout_secs: u64,
    pub connect_timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 60,
            connect_timeout_secs: None,
            user_agent: None,
        }
    }
}

impl FetchConfig {
    pub fn to_options(&self) -> FetchOptions {
        FetchOptions {
            timeout: Duration::from_secs(self.timeout_secs),
            connect_timeout: self.connect_timeout_secs.map(Duration::from_secs),
            user_agent: self.user_agent.clone(),
        }
    }
}

/// Manifest layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestConfig {
    /// Treat the first row as a header (copied to the ledger, never fetched).
    pub has_headers: bool,
    #[serde(flatten)]
    pub columns: ManifestColumns,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            has_headers: false,
            columns: ManifestColumns::default(),
        }
    }
}

/// Global configuration loaded from `~/.config/nftdl/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NftdlConfig {
    /// Records processed concurrently. 1 = strictly sequential.
    pub jobs: usize,
    pub gateways: GatewayConfig,
    pub paths: PathConfig,
    pub fetch: FetchConfig,
    pub manifest: ManifestConfig,
}

impl Default for NftdlConfig {
    fn default() -> Self {
        Self {
            jobs: 1,
            gateways: GatewayConfig::default(),
            paths: PathConfig::default(),
            fetch: FetchConfig::default(),
            manifest: ManifestConfig::default(),
        }
    }
}

impl NftdlConfig {
    pub fn resolver(&self) -> GatewayResolver {
        GatewayResolver::new(&self.gateways.local, &self.gateways.public)
    }

    /// Rejects values that would disable a bound: zero jobs, or a zero
    /// timeout (libcurl reads 0 as "no timeout").
    pub fn validate(&self) -> Result<()> {
        if self.jobs == 0 {
            anyhow::bail!("jobs must be at least 1");
        }
        if self.fetch.timeout_secs == 0 {
            anyhow::bail!("fetch.timeout_secs must be at least 1");
        }
        Ok(())
    }
}

/// Location of the default config file. Nothing is created on disk.
pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("nftdl")?;
    Ok(xdg_dirs.get_config_file("config.toml"))
}

/// Load configuration from disk, creating a default file if none exists.
///
/// Returns the path of the file when it was just created, so the caller can
/// report it once logging is up.
pub fn load_or_init() -> Result<(NftdlConfig, Option<PathBuf>)> {
    init_at(&config_path()?)
}

/// Load configuration from disk, or use defaults without writing anything.
pub fn load_or_default() -> Result<NftdlConfig> {
    load_or_default_from(&config_path()?)
}

fn init_at(path: &Path) -> Result<(NftdlConfig, Option<PathBuf>)> {
    if path.exists() {
        return Ok((load_from_path(path)?, None));
    }
    let default_cfg = NftdlConfig::default();
    let toml = toml::to_string_pretty(&default_cfg)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating config dir {}", parent.display()))?;
    }
    fs::write(path, toml).with_context(|| format!("writing config {}", path.display()))?;
    Ok((default_cfg, Some(path.to_path_buf())))
}

fn load_or_default_from(path: &Path) -> Result<NftdlConfig> {
    if path.exists() {
        load_from_path(path)
    } else {
        Ok(NftdlConfig::default())
    }
}

/// Load configuration from an explicit file. The file must exist.
pub fn load_from_path(path: &Path) -> Result<NftdlConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let cfg: NftdlConfig =
        toml::from_str(&data).with_context(|| format!("parsing config {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}
