mod cli;

use crate::cli::CliCommand;

#[tokio::main]
async fn main() {
    // Parse CLI and dispatch. Logging is initialized once the config (and so
    // the run log location) is known.
    if let Err(err) = CliCommand::run_from_args().await {
        eprintln!("nftdl error: {:#}", err);
        std::process::exit(1);
    }
}
