//! CLI command handling
//!
//! Builds clients, drivers and bridges from configuration and runs the
//! requested suite.

use std::path::PathBuf;

use colored::Colorize;
use tracing::debug;

use crate::api::{self, ContractCase, ContractTargets};
use crate::commands::{Commands, GlobalArgs};
use crate::common::config::Config;
use crate::common::Result;
use crate::steps::{StepContext, StepRegistry};
use crate::testing::{self, TestResult};
use crate::ui::InstrumentationDriver;

/// Dispatch a CLI command
///
/// Returns whether everything that ran passed.
pub async fn dispatch(command: Commands, global: &GlobalArgs) -> Result<bool> {
    let mut config = Config::load(global.config.as_deref())?;
    if let Some(env) = &global.environment {
        config.environment.0 = env.clone();
    }
    debug!(environment = %config.environment.0, "configuration loaded");

    match command {
        Commands::Contract { cases } => run_contract(&config, &cases).await,

        Commands::Run {
            paths,
            dry_run,
            stress_test,
            skip_validation,
        } => {
            config.scenario.stress_test |= stress_test;
            config.scenario.skip_validation |= skip_validation;
            let registry = StepRegistry::standard()?;
            if dry_run {
                check_scenarios(&paths, &registry)
            } else {
                run_scenarios(&config, &paths, &registry, global.verbose).await
            }
        }

        Commands::Steps => {
            let registry = StepRegistry::standard()?;
            for pattern in registry.patterns() {
                println!("{}", pattern);
            }
            Ok(true)
        }
    }
}

async fn run_contract(config: &Config, case_ids: &[String]) -> Result<bool> {
    let cases = if case_ids.is_empty() {
        ContractCase::ALL.to_vec()
    } else {
        case_ids
            .iter()
            .map(|id| ContractCase::from_id(id))
            .collect::<Result<Vec<_>>>()?
    };

    let targets = ContractTargets::from_config(config)?;

    let results = api::contract::run_suite(&targets, &cases).await;
    Ok(results.iter().all(|r| r.passed))
}

fn check_scenarios(paths: &[PathBuf], registry: &StepRegistry) -> Result<bool> {
    let mut results = Vec::with_capacity(paths.len());
    for path in paths {
        let scenario = testing::load_scenario(path)?;
        results.push(testing::check_scenario(&scenario, registry));
    }
    Ok(summarize(&results))
}

async fn run_scenarios(
    config: &Config,
    paths: &[PathBuf],
    registry: &StepRegistry,
    verbose: bool,
) -> Result<bool> {
    let mut results = Vec::with_capacity(paths.len());
    for path in paths {
        // Fresh driver session per scenario
        let driver = InstrumentationDriver::new(
            &config.ui.server_url,
            config.api.request_timeout(),
        )?;
        let ctx = StepContext::new(Box::new(driver), config, verbose);
        results.push(testing::run_scenario(path, registry, &ctx, verbose).await?);
    }
    Ok(summarize(&results))
}

/// Print the per-scenario summary; true when every scenario passed
fn summarize(results: &[TestResult]) -> bool {
    if results.len() > 1 {
        println!("\n{}", "Summary:".cyan());
        for result in results {
            if result.passed {
                println!("  {} {}", "✓".green(), result.name);
            } else {
                println!(
                    "  {} {} ({}/{} steps)",
                    "✗".red(),
                    result.name,
                    result.steps_run,
                    result.steps_total
                );
            }
        }
    }

    for result in results.iter().filter(|r| !r.passed) {
        if let Some(error) = &result.error {
            eprintln!("{} {}: {}", "Failed:".red().bold(), result.name, error);
        }
    }

    results.iter().all(|r| r.passed)
}
