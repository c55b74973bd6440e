//! CLI command definitions
//!
//! Defines the clap commands for the harness CLI.

use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Options accepted by every command
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Configuration file (default: ~/.config/lmis-harness/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Target environment; "dev" logs in as the superuser fixture account
    #[arg(long = "env", global = true)]
    pub environment: Option<String>,

    /// Verbose output (setup and fixture script output, debug logging)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Also write logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP contract cases against the dev and UAT servers
    Contract {
        /// Run only this case (login, programs, requisition, stock-cards);
        /// can be given several times
        #[arg(long = "case")]
        cases: Vec<String>,
    },

    /// Run UI scenarios defined in YAML files
    Run {
        /// Scenario files, run in the order given
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Only check that every phrase resolves to a registered step
        #[arg(long)]
        dry_run: bool,

        /// Use the 300-product bulk data path
        #[arg(long)]
        stress_test: bool,

        /// Skip value checks the target build cannot satisfy
        #[arg(long)]
        skip_validation: bool,
    },

    /// List the registered step patterns
    Steps,
}
