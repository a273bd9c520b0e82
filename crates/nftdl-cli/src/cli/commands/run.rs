//! `nftdl run` – process the manifest.

use anyhow::{Context, Result};
use clap::Args;
use nftdl_core::config::NftdlConfig;
use nftdl_core::{logging, pipeline};
use std::path::PathBuf;

/// Per-run overrides; anything omitted comes from the config file.
#[derive(Debug, Default, Args)]
pub struct RunArgs {
    /// Manifest CSV to read.
    #[arg(long, value_name = "PATH")]
    pub manifest: Option<PathBuf>,
    /// Error ledger CSV to (re)create.
    #[arg(long, value_name = "PATH")]
    pub ledger: Option<PathBuf>,
    /// Root directory for `opensea/` and `original/`.
    #[arg(long, value_name = "PATH")]
    pub output_dir: Option<PathBuf>,
    /// Run log that receives a copy of every status line.
    #[arg(long, value_name = "PATH")]
    pub run_log: Option<PathBuf>,
    #[arg(long, value_name = "URL")]
    pub local_gateway: Option<String>,
    #[arg(long, value_name = "URL")]
    pub public_gateway: Option<String>,
    /// Time budget per candidate address, in seconds.
    #[arg(long, value_name = "N")]
    pub timeout_secs: Option<u64>,
    /// Process up to N records concurrently. The ledger is identical to a sequential run.
    #[arg(long, value_name = "N")]
    pub jobs: Option<usize>,
    /// Treat the first manifest row as a header.
    #[arg(long)]
    pub has_headers: bool,
}

impl RunArgs {
    /// Applies the overrides on top of the loaded configuration.
    pub fn apply(&self, cfg: &mut NftdlConfig) -> Result<()> {
        if let Some(p) = &self.manifest {
            cfg.paths.manifest = p.clone();
        }
        if let Some(p) = &self.ledger {
            cfg.paths.ledger = p.clone();
        }
        if let Some(p) = &self.output_dir {
            cfg.paths.output_dir = p.clone();
        }
        if let Some(p) = &self.run_log {
            cfg.paths.run_log = p.clone();
        }
        if let Some(url) = &self.local_gateway {
            cfg.gateways.local = url.clone();
        }
        if let Some(url) = &self.public_gateway {
            cfg.gateways.public = url.clone();
        }
        if let Some(secs) = self.timeout_secs {
            cfg.fetch.timeout_secs = secs;
        }
        if let Some(jobs) = self.jobs {
            cfg.jobs = jobs;
        }
        if self.has_headers {
            cfg.manifest.has_headers = true;
        }
        cfg.validate()
    }
}

/// Status sink for a run: stdout plus the run log. A run log that cannot be
/// opened is fatal; the run never starts without it.
pub fn init_run_logging(cfg: &NftdlConfig) -> Result<()> {
    logging::init_logging(&cfg.paths.run_log).context("initializing status sink")
}

pub async fn run_batch(cfg: &NftdlConfig) -> Result<()> {
    let summary = pipeline::run_from_config(cfg).await?;
    if summary.ledger_entries > 0 {
        tracing::info!(
            "{} ledger entr{} written to {}",
            summary.ledger_entries,
            if summary.ledger_entries == 1 { "y" } else { "ies" },
            cfg.paths.ledger.display()
        );
    }
    tracing::info!("Program completed successfully!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_overrides_only_given_fields() {
        let mut cfg = NftdlConfig::default();
        let args = RunArgs {
            manifest: Some(PathBuf::from("in.csv")),
            local_gateway: Some("http://127.0.0.1:8080".to_string()),
            timeout_secs: Some(15),
            jobs: Some(8),
            has_headers: true,
            ..RunArgs::default()
        };
        args.apply(&mut cfg).unwrap();
        assert_eq!(cfg.paths.manifest, PathBuf::from("in.csv"));
        assert_eq!(cfg.paths.ledger, PathBuf::from("/data/error_file.csv"));
        assert_eq!(cfg.gateways.local, "http://127.0.0.1:8080");
        assert_eq!(cfg.gateways.public, "https://ipfs.io");
        assert_eq!(cfg.fetch.timeout_secs, 15);
        assert_eq!(cfg.jobs, 8);
        assert!(cfg.manifest.has_headers);
    }

    #[test]
    fn apply_without_overrides_keeps_config() {
        let mut cfg = NftdlConfig::default();
        cfg.manifest.has_headers = true;
        RunArgs::default().apply(&mut cfg).unwrap();
        let mut expected = NftdlConfig::default();
        expected.manifest.has_headers = true;
        assert_eq!(cfg, expected);
    }

    #[test]
    fn apply_rejects_zero_jobs() {
        let mut cfg = NftdlConfig::default();
        let args = RunArgs {
            jobs: Some(0),
            ..RunArgs::default()
        };
        let err = args.apply(&mut cfg).unwrap_err();
        assert!(err.to_string().contains("jobs must be at least 1"));
    }

    #[test]
    fn apply_rejects_zero_timeout() {
        let mut cfg = NftdlConfig::default();
        let args = RunArgs {
            timeout_secs: Some(0),
            ..RunArgs::default()
        };
        let err = args.apply(&mut cfg).unwrap_err();
        assert!(err.to_string().contains("timeout_secs must be at least 1"));
    }

    #[test]
    fn unopenable_run_log_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"regular file").unwrap();
        let mut cfg = NftdlConfig::default();
        cfg.paths.run_log = blocker.join("output.txt");

        let err = init_run_logging(&cfg).unwrap_err();

        let msg = format!("{:#}", err);
        assert!(msg.contains("initializing status sink"), "{}", msg);
        assert!(msg.contains("run log"), "{}", msg);
    }
}
