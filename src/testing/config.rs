//! Scenario file types
//!
//! Defines the data structures for deserializing YAML scenarios.

use serde::Deserialize;

/// A scenario loaded from a YAML file
#[derive(Deserialize, Debug)]
pub struct TestScenario {
    /// Name of the scenario
    pub name: String,
    /// Optional description of what the scenario verifies
    pub description: Option<String>,
    /// Optional shell commands to run before the steps
    pub setup: Option<Vec<SetupStep>>,
    /// Step phrases, executed in order
    pub steps: Vec<String>,
    /// Step phrases run after the steps even when one of them failed
    #[serde(default)]
    pub teardown: Vec<String>,
}

/// A setup step that runs before the scenario
#[derive(Deserialize, Debug)]
pub struct SetupStep {
    /// Shell command to execute
    pub shell: String,
}
