//! CLI for nftdl.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use nftdl_core::config::{self, NftdlConfig};
use nftdl_core::logging;
use std::path::{Path, PathBuf};

use commands::{init_run_logging, run_batch, run_config, run_resolve, RunArgs};

/// Top-level CLI for nftdl.
#[derive(Debug, Parser)]
#[command(name = "nftdl")]
#[command(about = "nftdl: download NFT images listed in a CSV manifest, with IPFS gateway fallback", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.config/nftdl/config.toml (must exist).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Process every manifest record and write the error ledger.
    Run(RunArgs),

    /// Print the candidate addresses a locator resolves to, without fetching.
    Resolve {
        /// Raw locator as it appears in the manifest.
        locator: String,
    },

    /// Print the config file path and the effective configuration.
    Config,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Run(args) => {
                let (mut cfg, created) = match cli.config.as_deref() {
                    Some(path) => (config::load_from_path(path)?, None),
                    None => config::load_or_init()?,
                };
                args.apply(&mut cfg)?;
                init_run_logging(&cfg)?;
                if let Some(path) = created {
                    tracing::info!("created default config at {}", path.display());
                }
                tracing::debug!("effective config: {:?}", cfg);
                run_batch(&cfg).await?;
            }
            CliCommand::Resolve { locator } => {
                logging::init_logging_stderr();
                let cfg = load_config_readonly(cli.config.as_deref())?;
                run_resolve(&cfg, &locator);
            }
            CliCommand::Config => {
                logging::init_logging_stderr();
                let cfg = load_config_readonly(cli.config.as_deref())?;
                let path = match cli.config {
                    Some(p) => p,
                    None => config::config_path()?,
                };
                run_config(&cfg, &path)?;
            }
        }

        Ok(())
    }
}

/// Config for commands that only inspect it: never writes a default file.
fn load_config_readonly(explicit: Option<&Path>) -> Result<NftdlConfig> {
    match explicit {
        Some(path) => config::load_from_path(path),
        None => config::load_or_default(),
    }
}

#[cfg(test)]
mod tests;
