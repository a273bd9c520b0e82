//! `nftdl resolve` – show the candidate addresses for a locator.

use nftdl_core::config::NftdlConfig;

pub fn run_resolve(cfg: &NftdlConfig, locator: &str) {
    for address in cfg.resolver().resolve(locator) {
        println!("{}", address);
    }
}
