//! Error types for the test harness
//!
//! Every failure carries enough context to be read straight out of a CI log:
//! the endpoint or selector involved and the expected vs. observed value.

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the harness
#[derive(Error, Debug)]
pub enum Error {
    // === HTTP / Contract Errors ===
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{endpoint}: expected HTTP {expected}, got {actual}. Body: {body}")]
    UnexpectedStatus {
        endpoint: String,
        expected: u16,
        actual: u16,
        body: String,
    },

    #[error("Contract violation: {0}")]
    Contract(String),

    // === UI Errors ===
    #[error("No element matches '{0}'")]
    ElementNotFound(String),

    #[error("Query '{selector}' matched {actual} element(s), expected {expected}")]
    ElementCount {
        selector: String,
        expected: usize,
        actual: usize,
    },

    #[error("Timed out after {secs:.1} seconds waiting for {what}")]
    WaitTimeout { what: String, secs: f64 },

    #[error("UI driver error: {0}")]
    UiDriver(String),

    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("Assertion failed: {0}")]
    Assertion(String),

    // === Step Errors ===
    #[error("Undefined step: '{0}'")]
    UndefinedStep(String),

    #[error("Ambiguous step '{phrase}' matches: {patterns}")]
    AmbiguousStep { phrase: String, patterns: String },

    #[error("Step pattern registered twice: {0}")]
    DuplicateStep(String),

    #[error("Invalid step pattern: {0}")]
    StepPattern(#[from] regex::Error),

    #[error("Step argument {index}: {reason}")]
    StepArgument { index: usize, reason: String },

    // === Process Errors ===
    #[error("Failed to start '{program}': {error}")]
    Spawn { program: String, error: String },

    #[error("Fixture script '{script}' exited with code {code:?}")]
    FixtureFailed { script: String, code: Option<i32> },

    #[error("Device command '{command}' exited with code {code:?}")]
    DeviceCommandFailed { command: String, code: Option<i32> },

    #[error("'{0}' not found in PATH")]
    ToolNotFound(String),

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },
}

impl Error {
    /// Create an unexpected status error
    pub fn unexpected_status(endpoint: &str, expected: u16, actual: u16, body: &str) -> Self {
        Self::UnexpectedStatus {
            endpoint: endpoint.to_string(),
            expected,
            actual,
            body: truncate(body, 200),
        }
    }

    /// Create a process start failure
    pub fn spawn(program: impl ToString, error: &io::Error) -> Self {
        Self::Spawn {
            program: program.to_string(),
            error: error.to_string(),
        }
    }

    /// Create an element count error
    pub fn element_count(selector: impl ToString, expected: usize, actual: usize) -> Self {
        Self::ElementCount {
            selector: selector.to_string(),
            expected,
            actual,
        }
    }

    /// Create a wait timeout error
    pub fn wait_timeout(what: impl Into<String>, timeout: std::time::Duration) -> Self {
        Self::WaitTimeout {
            what: what.into(),
            secs: timeout.as_secs_f64(),
        }
    }

    /// Create an invalid selector error
    pub fn invalid_selector(selector: &str, reason: &str) -> Self {
        Self::InvalidSelector {
            selector: selector.to_string(),
            reason: reason.to_string(),
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        format!("{}...", s.chars().take(max).collect::<String>())
    } else {
        s.to_string()
    }
}
