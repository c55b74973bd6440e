//! State shared by the steps of a scenario run

use std::time::Duration;

use crate::api::Credentials;
use crate::common::config::Config;
use crate::common::Result;
use crate::device::{DeviceAction, DeviceBridge};
use crate::fixtures::{FixtureBridge, FixtureScript};
use crate::ui::{wait, UiDriver};

/// Switches fixed for the whole run
#[derive(Debug, Clone)]
pub struct ScenarioOptions {
    /// Bulk (300 product) data path instead of the single item path
    pub stress_test: bool,
    /// Skip value checks the target build cannot satisfy
    pub skip_validation: bool,
    pub wait_timeout: Duration,
    pub poll_interval: Duration,
    /// Pause between UI actions that trigger animations
    pub settle_delay: Duration,
    /// Account used by the login steps
    pub credentials: Credentials,
}

impl ScenarioOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            stress_test: config.scenario.stress_test,
            skip_validation: config.scenario.skip_validation,
            wait_timeout: Duration::from_secs(config.ui.wait_timeout_secs),
            poll_interval: Duration::from_millis(config.ui.poll_interval_ms),
            settle_delay: Duration::from_millis(config.ui.settle_delay_ms),
            credentials: config.environment.credentials(),
        }
    }
}

pub struct StepContext {
    driver: Box<dyn UiDriver>,
    device: DeviceBridge,
    fixtures: FixtureBridge,
    pub options: ScenarioOptions,
}

impl StepContext {
    pub fn new(driver: Box<dyn UiDriver>, config: &Config, verbose: bool) -> Self {
        Self {
            driver,
            device: DeviceBridge::new(&config.device),
            fixtures: FixtureBridge::new(&config.fixtures, verbose),
            options: ScenarioOptions::from_config(config),
        }
    }

    pub fn driver(&self) -> &dyn UiDriver {
        self.driver.as_ref()
    }

    pub async fn device(&self, action: DeviceAction) -> Result<()> {
        self.device.run(&action).await
    }

    pub async fn fixture(&self, script: FixtureScript) -> Result<()> {
        self.fixtures.run(script).await
    }

    /// Wait for text using the configured timeout
    pub async fn wait_for_text(&self, text: &str) -> Result<()> {
        wait::wait_for_text(
            self.driver(),
            text,
            self.options.wait_timeout,
            self.options.poll_interval,
        )
        .await
    }

    /// Wait for an activity using the configured timeout
    pub async fn wait_for_activity(&self, name: &str) -> Result<()> {
        wait::wait_for_activity(
            self.driver(),
            name,
            self.options.wait_timeout,
            self.options.poll_interval,
        )
        .await
    }

    pub async fn settle(&self) {
        if !self.options.settle_delay.is_zero() {
            tokio::time::sleep(self.options.settle_delay).await;
        }
    }
}
