//! LMIS harness - contract and UI acceptance test runner
//!
//! Runs HTTP contract cases against the LMIS REST API and YAML scenarios
//! against the Android client through its instrumentation server.

use clap::Parser;
use lmis_harness::commands::{Commands, GlobalArgs};
use lmis_harness::{cli, common::logging};

#[derive(Parser)]
#[command(name = "lmis-harness", about = "Contract and UI acceptance test harness for LMIS")]
#[command(version, long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match &cli.global.log_file {
        Some(path) => {
            if let Some(file) = logging::init_with_file(path, cli.global.verbose) {
                tracing::debug!(path = %file.display(), "logging to file");
            }
        }
        None => logging::init_cli(cli.global.verbose),
    }

    match cli::dispatch(cli.command, &cli.global).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
    }
}
