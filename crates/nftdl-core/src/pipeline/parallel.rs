//! Bounded parallel mode: up to `jobs` records in flight on blocking workers.
//!
//! The driver task is the only ledger writer. Worker results are committed in
//! manifest order through a reorder buffer, so the ledger matches a sequential
//! run entry for entry. Ordinals are assigned at dispatch exactly as the
//! sequential counter would assign them.
//!
//! Two records that map to the same output files are never in flight at the
//! same time: a record whose (sanitized) asset id is still being fetched is
//! held back, and dispatch pauses until that fetch returns.

use std::collections::{BTreeMap, HashSet};
use std::io;

use tokio::task::JoinSet;

use crate::fetch::Fetch;
use crate::layout::LocatorKind;
use crate::ledger::Ledger;
use crate::manifest::{ManifestReader, Record};
use crate::url_model::sanitize_asset_id;

use super::{copy_header, finish, BatchDriver, PipelineError, RunSummary};

/// Result of one record, waiting for its turn to be committed.
enum Outcome {
    /// Empty locator; one ledger entry, nothing fetched.
    Skipped(Record),
    /// Fetched; `saved[i]` is the result for marketplace (0) and canonical (1).
    Fetched { record: Record, saved: [bool; 2] },
}

impl<F: Fetch + Send + Sync + 'static> BatchDriver<F> {
    /// Processes records with at most `jobs` in flight. `jobs <= 1` still works
    /// but offers no concurrency.
    pub async fn run_parallel<R: io::Read, W: io::Write>(
        &self,
        manifest: &mut ManifestReader<R>,
        ledger: &mut Ledger<W>,
        jobs: usize,
    ) -> Result<RunSummary, PipelineError> {
        let jobs = jobs.max(1);
        copy_header(manifest, ledger)?;

        let mut summary = RunSummary::default();
        let mut join_set: JoinSet<(u64, String, Outcome)> = JoinSet::new();
        let mut pending: BTreeMap<u64, Outcome> = BTreeMap::new();
        let mut next_seq: u64 = 0;
        let mut next_commit: u64 = 0;
        let mut counter: u64 = 0;
        let mut exhausted = false;
        let mut in_flight: HashSet<String> = HashSet::new();
        let mut held: Option<Record> = None;

        loop {
            while !exhausted && join_set.len() < jobs && pending.len() < jobs * 4 {
                let record = match held.take() {
                    Some(record) => record,
                    None => match manifest.next_record()? {
                        Some(record) => {
                            summary.records += 1;
                            record
                        }
                        None => {
                            exhausted = true;
                            break;
                        }
                    },
                };
                if record.is_missing_locator() {
                    tracing::info!("Skipping empty URL for record {}", counter);
                    pending.insert(next_seq, Outcome::Skipped(record));
                    next_seq += 1;
                    continue;
                }
                let output_key = sanitize_asset_id(record.asset_id());
                if in_flight.contains(&output_key) {
                    held = Some(record);
                    break;
                }
                let seq = next_seq;
                next_seq += 1;
                let ordinal = counter;
                counter += 1;
                in_flight.insert(output_key.clone());
                let driver = self.clone();
                join_set.spawn_blocking(move || {
                    let saved = [LocatorKind::Marketplace, LocatorKind::Canonical]
                        .map(|kind| driver.fetch_and_log(&record, kind, ordinal));
                    (seq, output_key, Outcome::Fetched { record, saved })
                });
            }

            commit_ready(&mut pending, &mut next_commit, ledger, &mut summary)?;

            if join_set.is_empty() {
                if exhausted {
                    break;
                }
                continue;
            }
            let Some(joined) = join_set.join_next().await else {
                break;
            };
            let (seq, output_key, outcome) =
                joined.map_err(|e| PipelineError::Worker(e.to_string()))?;
            in_flight.remove(&output_key);
            pending.insert(seq, outcome);
        }

        commit_ready(&mut pending, &mut next_commit, ledger, &mut summary)?;
        finish(ledger, &mut summary, counter)?;
        Ok(summary)
    }
}

/// Commits consecutive outcomes starting at `next_commit`.
fn commit_ready<W: io::Write>(
    pending: &mut BTreeMap<u64, Outcome>,
    next_commit: &mut u64,
    ledger: &mut Ledger<W>,
    summary: &mut RunSummary,
) -> Result<(), PipelineError> {
    while let Some(outcome) = pending.remove(next_commit) {
        match outcome {
            Outcome::Skipped(record) => {
                ledger.append(record.fields())?;
                summary.skipped += 1;
            }
            Outcome::Fetched { record, saved } => {
                for ok in saved {
                    if ok {
                        summary.saved += 1;
                    } else {
                        ledger.append(record.fields())?;
                        summary.failed += 1;
                    }
                }
            }
        }
        *next_commit += 1;
    }
    Ok(())
}
