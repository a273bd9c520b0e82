//! CLI command handlers, one per file.

mod config;
mod resolve;
mod run;

pub use config::run_config;
pub use resolve::run_resolve;
pub use run::{init_run_logging, run_batch, RunArgs};
