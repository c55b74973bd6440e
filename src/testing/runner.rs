//! Scenario runner implementation
//!
//! Runs setup commands, then each step phrase through the registry, then
//! the teardown phrases. The first failing step ends the scenario.

use std::path::Path;
use std::process::Stdio;

use colored::Colorize;
use tokio::process::Command as TokioCommand;
use tracing::{info, warn};

use crate::common::{Error, Result};
use crate::steps::{StepContext, StepRegistry};

use super::config::{SetupStep, TestScenario};

/// Result of a scenario run
#[derive(Debug)]
pub struct TestResult {
    pub name: String,
    pub passed: bool,
    pub steps_run: usize,
    pub steps_total: usize,
    pub error: Option<String>,
}

impl TestResult {
    fn failed(scenario: &TestScenario, steps_run: usize, error: impl ToString) -> Self {
        Self {
            name: scenario.name.clone(),
            passed: false,
            steps_run,
            steps_total: scenario.steps.len(),
            error: Some(error.to_string()),
        }
    }
}

/// Load and parse a scenario file
pub fn load_scenario(path: &Path) -> Result<TestScenario> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!(
            "Failed to read scenario '{}': {}",
            path.display(),
            e
        ))
    })?;

    serde_yaml::from_str(&content).map_err(|e| {
        Error::Config(format!(
            "Failed to parse scenario '{}': {}",
            path.display(),
            e
        ))
    })
}

/// Resolve every step and teardown phrase without running anything
pub fn check_scenario(scenario: &TestScenario, registry: &StepRegistry) -> TestResult {
    println!(
        "\n{} {}",
        "Checking:".blue().bold(),
        scenario.name.white().bold()
    );

    let mut first_error = None;
    let phrases = scenario.steps.iter().chain(&scenario.teardown);
    for (i, phrase) in phrases.enumerate() {
        match registry.resolve(phrase) {
            Ok(step) => println!("  {} {} {}", "✓".green(), phrase, step.pattern.dimmed()),
            Err(e) => {
                println!("  {} Step {}: {}", "✗".red(), i + 1, e);
                if first_error.is_none() {
                    first_error = Some(e.to_string());
                }
            }
        }
    }

    TestResult {
        name: scenario.name.clone(),
        passed: first_error.is_none(),
        steps_run: 0,
        steps_total: scenario.steps.len(),
        error: first_error,
    }
}

async fn run_setup(step: &SetupStep, dir: &Path, verbose: bool) -> Result<Option<i32>> {
    if verbose {
        println!("  $ {}", step.shell.dimmed());
    }

    let status = TokioCommand::new("sh")
        .arg("-c")
        .arg(&step.shell)
        .current_dir(dir)
        .stdin(Stdio::null())
        .stdout(if verbose {
            Stdio::inherit()
        } else {
            Stdio::null()
        })
        .stderr(if verbose {
            Stdio::inherit()
        } else {
            Stdio::null()
        })
        .status()
        .await
        .map_err(|e| Error::spawn("sh", &e))?;

    if status.success() {
        Ok(None)
    } else {
        Ok(Some(status.code().unwrap_or(-1)))
    }
}

async fn run_teardown(scenario: &TestScenario, registry: &StepRegistry, ctx: &StepContext) {
    if scenario.teardown.is_empty() {
        return;
    }

    println!("\n{}", "Teardown:".cyan());
    for phrase in &scenario.teardown {
        match registry.dispatch(ctx, phrase).await {
            Ok(()) => println!("  {} {}", "✓".green(), phrase),
            Err(e) => {
                warn!(phrase = phrase.as_str(), error = %e, "teardown step failed");
                println!("  {} {}: {}", "✗".red(), phrase, e);
            }
        }
    }
}

/// Execute a parsed scenario; setup commands run in `base_dir`
pub async fn execute_scenario(
    scenario: &TestScenario,
    base_dir: &Path,
    registry: &StepRegistry,
    ctx: &StepContext,
    verbose: bool,
) -> Result<TestResult> {
    let steps_total = scenario.steps.len();

    println!(
        "\n{} {}",
        "Running Scenario:".blue().bold(),
        scenario.name.white().bold()
    );

    if let Some(desc) = &scenario.description {
        println!("  {}", desc.dimmed());
    }

    if let Some(setup_steps) = &scenario.setup {
        println!("\n{}", "Setup:".cyan());
        for step in setup_steps {
            if let Some(code) = run_setup(step, base_dir, verbose).await? {
                println!("  {} {}", "✗".red(), step.shell);
                return Ok(TestResult::failed(
                    scenario,
                    0,
                    format!(
                        "Setup command '{}' failed with exit code {}",
                        step.shell, code
                    ),
                ));
            }
            println!("  {} {}", "✓".green(), step.shell.dimmed());
        }
    }

    if let Err(e) = ctx.driver().ready().await {
        println!("  {} {}", "✗".red(), e);
        return Ok(TestResult::failed(scenario, 0, e));
    }

    println!("\n{}", "Steps:".cyan());
    let mut failure = None;
    for (i, phrase) in scenario.steps.iter().enumerate() {
        let step_num = i + 1;
        info!(step = step_num, phrase = phrase.as_str(), "running step");

        match registry.dispatch(ctx, phrase).await {
            Ok(()) => println!("  {} Step {}: {}", "✓".green(), step_num, phrase),
            Err(e) => {
                println!("  {} Step {}: {}", "✗".red(), step_num, phrase);
                println!("      {}", e.to_string().red());
                failure = Some((step_num, e));
                break;
            }
        }
    }

    run_teardown(scenario, registry, ctx).await;

    if let Some((step_num, e)) = failure {
        return Ok(TestResult::failed(scenario, step_num, e));
    }

    println!(
        "\n{} {}\n",
        "✓".green().bold(),
        "Scenario Passed".green().bold()
    );

    Ok(TestResult {
        name: scenario.name.clone(),
        passed: true,
        steps_run: steps_total,
        steps_total,
        error: None,
    })
}

/// Run a scenario from a YAML file
pub async fn run_scenario(
    path: &Path,
    registry: &StepRegistry,
    ctx: &StepContext,
    verbose: bool,
) -> Result<TestResult> {
    let scenario = load_scenario(path)?;
    let scenario_dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    execute_scenario(&scenario, scenario_dir, registry, ctx, verbose).await
}
