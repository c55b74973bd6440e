//! Scenario runner
//!
//! Reads YAML scenarios and drives their step phrases through the step
//! registry against a live or mocked application.

mod config;
mod runner;

pub use config::*;
pub use runner::{check_scenario, execute_scenario, load_scenario, run_scenario, TestResult};
