//! Configuration file handling

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::paths::config_path;
use super::Result;
use crate::api::Credentials;

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Target environment name ("dev" selects the superuser fixture account)
    #[serde(default)]
    pub environment: Environment,

    /// REST API endpoints
    #[serde(default)]
    pub api: ApiConfig,

    /// Instrumentation server and wait settings
    #[serde(default)]
    pub ui: UiConfig,

    /// Device bridge settings
    #[serde(default)]
    pub device: DeviceConfig,

    /// Server-side fixture script settings
    #[serde(default)]
    pub fixtures: FixtureConfig,

    /// Scenario-wide switches
    #[serde(default)]
    pub scenario: ScenarioSwitches,
}

/// Selected environment
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct Environment(pub String);

impl Default for Environment {
    fn default() -> Self {
        Self("dev".to_string())
    }
}

impl Environment {
    pub fn is_dev(&self) -> bool {
        self.0 == "dev"
    }

    /// Credentials the UI login steps use
    pub fn credentials(&self) -> Credentials {
        if self.is_dev() {
            Credentials::new("superuser", "password1")
        } else {
            Credentials::new("test_user", "testuser")
        }
    }
}

/// REST API endpoints
#[derive(Debug, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the development server (login, stock cards)
    #[serde(default = "default_dev_url")]
    pub dev_url: String,

    /// Base URL of the UAT server (requisitions; cleaned up regularly)
    #[serde(default = "default_uat_url")]
    pub uat_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            dev_url: default_dev_url(),
            uat_url: default_uat_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_dev_url() -> String {
    "http://localhost:9091".to_string()
}
fn default_uat_url() -> String {
    "http://localhost:9091".to_string()
}
fn default_request_timeout() -> u64 {
    30
}

/// Instrumentation server and wait settings
#[derive(Debug, Deserialize)]
pub struct UiConfig {
    /// Base URL of the on-device instrumentation server (forwarded port)
    #[serde(default = "default_ui_server")]
    pub server_url: String,

    /// Timeout for wait-for-text and wait-for-screen steps
    #[serde(default = "default_wait_timeout")]
    pub wait_timeout_secs: u64,

    /// Polling interval while waiting
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Pause after gestures that start screen transitions
    #[serde(default = "default_settle_delay")]
    pub settle_delay_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            server_url: default_ui_server(),
            wait_timeout_secs: default_wait_timeout(),
            poll_interval_ms: default_poll_interval(),
            settle_delay_ms: default_settle_delay(),
        }
    }
}

fn default_ui_server() -> String {
    "http://127.0.0.1:34777".to_string()
}
fn default_wait_timeout() -> u64 {
    10
}
fn default_poll_interval() -> u64 {
    250
}
fn default_settle_delay() -> u64 {
    1000
}

/// Device bridge settings
#[derive(Debug, Deserialize)]
pub struct DeviceConfig {
    /// adb executable; looked up in PATH when relative
    #[serde(default = "default_adb")]
    pub adb_path: PathBuf,

    /// Device serial passed as `-s`; falls back to `ADB_DEVICE_ARG`
    pub serial: Option<String>,

    /// Fail the step when adb exits non-zero
    #[serde(default = "default_true")]
    pub check_exit_status: bool,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            adb_path: default_adb(),
            serial: None,
            check_exit_status: true,
        }
    }
}

impl DeviceConfig {
    /// Serial from the file, else from the environment
    pub fn resolved_serial(&self) -> Option<String> {
        self.serial
            .clone()
            .or_else(|| std::env::var("ADB_DEVICE_ARG").ok())
            .filter(|s| !s.is_empty())
    }
}

fn default_adb() -> PathBuf {
    PathBuf::from("adb")
}

/// Server-side fixture script settings
#[derive(Debug, Deserialize)]
pub struct FixtureConfig {
    /// Checkout of the server repository the scripts run in
    #[serde(default = "default_server_dir")]
    pub server_dir: PathBuf,

    /// Script directory relative to `server_dir`
    #[serde(default = "default_scripts_dir")]
    pub scripts_dir: PathBuf,

    /// Fail the step when a script exits non-zero
    #[serde(default = "default_true")]
    pub check_exit_status: bool,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            server_dir: default_server_dir(),
            scripts_dir: default_scripts_dir(),
            check_exit_status: true,
        }
    }
}

fn default_server_dir() -> PathBuf {
    PathBuf::from("../lmis-moz")
}
fn default_scripts_dir() -> PathBuf {
    PathBuf::from("data/functional_tests")
}

/// Scenario-wide switches
#[derive(Debug, Deserialize, Default)]
pub struct ScenarioSwitches {
    /// Use the 300-product bulk data path instead of the single item path
    #[serde(default)]
    pub stress_test: bool,

    /// Skip value checks the target build cannot satisfy
    #[serde(default)]
    pub skip_validation: bool,
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from an explicit path or the default config file
    ///
    /// Returns default configuration if no file exists at the default
    /// location. An explicit path that does not exist is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match config_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| super::Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| super::Error::ConfigParse(e.to_string()))
    }
}
