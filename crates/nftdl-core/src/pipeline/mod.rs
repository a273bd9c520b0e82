//! Batch driver: walk the manifest, fetch both locators of every record,
//! and divert skipped or failed records to the error ledger.
//!
//! Records are processed in manifest order. A record with an empty locator is
//! copied to the ledger without being fetched and does not consume an
//! ordinal. Each locator that exhausts its candidates adds one ledger entry,
//! so a record can appear twice.

mod parallel;

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::NftdlConfig;
use crate::fallback::fetch_with_fallback;
use crate::fetch::{CurlFetcher, Fetch, FetchError};
use crate::layout::{LocatorKind, OutputLayout};
use crate::ledger::{Ledger, LedgerError};
use crate::manifest::{ManifestError, ManifestReader, Record};
use crate::resolver::GatewayResolver;

/// Fatal run errors. Per-locator fetch failures never surface here.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("record worker failed: {0}")]
    Worker(String),
}

/// Counts reported when a run finishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Manifest records read (header excluded).
    pub records: u64,
    /// Records diverted because a locator was empty.
    pub skipped: u64,
    /// Records given a fetch attempt (the final ordinal counter).
    pub attempted: u64,
    /// Locators fetched successfully.
    pub saved: u64,
    /// Locators that exhausted every candidate.
    pub failed: u64,
    pub ledger_entries: u64,
}

/// Drives records through resolution, fallback and fetch.
pub struct BatchDriver<F> {
    fetcher: Arc<F>,
    resolver: GatewayResolver,
    layout: OutputLayout,
}

impl<F> Clone for BatchDriver<F> {
    fn clone(&self) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
            resolver: self.resolver.clone(),
            layout: self.layout.clone(),
        }
    }
}

impl BatchDriver<CurlFetcher> {
    /// Driver wired to libcurl with the configured gateways, output root and timeouts.
    pub fn from_config(cfg: &NftdlConfig) -> Self {
        Self::new(
            CurlFetcher::new(cfg.fetch.to_options()),
            cfg.resolver(),
            OutputLayout::new(&cfg.paths.output_dir),
        )
    }
}

impl<F: Fetch> BatchDriver<F> {
    pub fn new(fetcher: F, resolver: GatewayResolver, layout: OutputLayout) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            resolver,
            layout,
        }
    }

    /// Fetches one locator of `record` with gateway fallback. Returns the saved path.
    pub fn fetch_locator(
        &self,
        record: &Record,
        kind: LocatorKind,
        ordinal: u64,
    ) -> Result<PathBuf, FetchError> {
        let locator = match kind {
            LocatorKind::Marketplace => record.primary_locator(),
            LocatorKind::Canonical => record.canonical_locator(),
        };
        let target = self.layout.target_base(kind, record.asset_id());
        fetch_with_fallback(self.fetcher.as_ref(), &self.resolver, locator, &target, ordinal)
    }

    /// Like `fetch_locator` but logs the failure; returns whether the locator was saved.
    fn fetch_and_log(&self, record: &Record, kind: LocatorKind, ordinal: u64) -> bool {
        match self.fetch_locator(record, kind, ordinal) {
            Ok(_) => true,
            Err(e) => {
                tracing::error!(
                    asset_id = record.asset_id(),
                    kind = e.kind(),
                    "Error downloading {} image: {}",
                    kind.dir_name(),
                    e
                );
                false
            }
        }
    }

    /// Processes every record sequentially, one record end-to-end before the next.
    pub fn run<R: io::Read, W: io::Write>(
        &self,
        manifest: &mut ManifestReader<R>,
        ledger: &mut Ledger<W>,
    ) -> Result<RunSummary, PipelineError> {
        copy_header(manifest, ledger)?;

        let mut summary = RunSummary::default();
        let mut counter: u64 = 0;
        while let Some(record) = manifest.next_record()? {
            summary.records += 1;
            if record.is_missing_locator() {
                tracing::info!("Skipping empty URL for record {}", counter);
                ledger.append(record.fields())?;
                summary.skipped += 1;
                continue;
            }
            for kind in [LocatorKind::Marketplace, LocatorKind::Canonical] {
                if self.fetch_and_log(&record, kind, counter) {
                    summary.saved += 1;
                } else {
                    ledger.append(record.fields())?;
                    summary.failed += 1;
                }
            }
            counter += 1;
        }

        finish(ledger, &mut summary, counter)?;
        Ok(summary)
    }
}

fn copy_header<R: io::Read, W: io::Write>(
    manifest: &mut ManifestReader<R>,
    ledger: &mut Ledger<W>,
) -> Result<(), PipelineError> {
    if let Some(header) = manifest.headers()? {
        if !header.is_empty() {
            ledger.write_header(&header)?;
        }
    }
    Ok(())
}

fn finish<W: io::Write>(
    ledger: &mut Ledger<W>,
    summary: &mut RunSummary,
    counter: u64,
) -> Result<(), PipelineError> {
    ledger.flush()?;
    summary.attempted = counter;
    summary.ledger_entries = ledger.entries();
    tracing::info!(
        records = summary.records,
        skipped = summary.skipped,
        saved = summary.saved,
        failed = summary.failed,
        ledger_entries = summary.ledger_entries,
        "run complete"
    );
    Ok(())
}

/// Opens the configured manifest and (re)creates the ledger, then runs to completion.
///
/// `cfg.jobs == 1` runs the sequential driver on a blocking thread; larger
/// values use the bounded parallel mode. Both produce the same ledger.
pub async fn run_from_config(cfg: &NftdlConfig) -> Result<RunSummary, PipelineError> {
    let mut manifest: ManifestReader<File> = ManifestReader::open(
        &cfg.paths.manifest,
        cfg.manifest.has_headers,
        cfg.manifest.columns,
    )?;
    let mut ledger = Ledger::create(&cfg.paths.ledger)?;
    let driver = BatchDriver::from_config(cfg);
    tracing::info!(
        manifest = %cfg.paths.manifest.display(),
        ledger = %cfg.paths.ledger.display(),
        output_dir = %cfg.paths.output_dir.display(),
        jobs = cfg.jobs,
        "starting run"
    );

    if cfg.jobs > 1 {
        driver.run_parallel(&mut manifest, &mut ledger, cfg.jobs).await
    } else {
        tokio::task::spawn_blocking(move || driver.run(&mut manifest, &mut ledger))
            .await
            .map_err(|e| PipelineError::Worker(e.to_string()))?
    }
}
