//! `nftdl config` – show where the config lives and what it resolves to.

use anyhow::Result;
use nftdl_core::config::NftdlConfig;
use std::path::Path;

pub fn run_config(cfg: &NftdlConfig, path: &Path) -> Result<()> {
    println!("# {}", path.display());
    print!("{}", toml::to_string_pretty(cfg)?);
    Ok(())
}
