//! Server-side fixture provisioning
//!
//! Test data on the server is changed by shell scripts that live in a
//! checkout of the server repository. Each script is run with that checkout
//! as working directory and the step blocks until it exits.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tracing::{info, warn};

use crate::common::config::FixtureConfig;
use crate::common::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureScript {
    UpdateProducts,
    RollbackUpdatedProducts,
    DeactivateProducts,
    ReactivateProducts,
    DeactivateProductsWithStockMovement,
}

impl FixtureScript {
    pub fn file_name(&self) -> &'static str {
        match self {
            FixtureScript::UpdateProducts => "update_products.sh",
            FixtureScript::RollbackUpdatedProducts => "rollback_updated_products.sh",
            FixtureScript::DeactivateProducts => "deactivate_products.sh",
            FixtureScript::ReactivateProducts => "reactivate_products.sh",
            FixtureScript::DeactivateProductsWithStockMovement => {
                "deactivate_products_have_stock_movement.sh"
            }
        }
    }
}

pub struct FixtureBridge {
    server_dir: PathBuf,
    scripts_dir: PathBuf,
    check_exit_status: bool,
    verbose: bool,
}

impl FixtureBridge {
    pub fn new(config: &FixtureConfig, verbose: bool) -> Self {
        Self {
            server_dir: config.server_dir.clone(),
            scripts_dir: config.scripts_dir.clone(),
            check_exit_status: config.check_exit_status,
            verbose,
        }
    }

    /// Script path relative to the server checkout
    pub fn script_path(&self, script: FixtureScript) -> PathBuf {
        Path::new(".").join(&self.scripts_dir).join(script.file_name())
    }

    pub async fn run(&self, script: FixtureScript) -> Result<()> {
        let server_dir = self.server_dir.canonicalize().map_err(|e| {
            Error::Config(format!(
                "Server checkout '{}' not found: {}",
                self.server_dir.display(),
                e
            ))
        })?;
        let path = server_dir.join(self.script_path(script));
        info!(script = %path.display(), "running fixture script");

        let status = Command::new(&path)
            .current_dir(&server_dir)
            .stdin(Stdio::null())
            .stdout(if self.verbose {
                Stdio::inherit()
            } else {
                Stdio::null()
            })
            .stderr(if self.verbose {
                Stdio::inherit()
            } else {
                Stdio::null()
            })
            .status()
            .await
            .map_err(|e| Error::spawn(path.display(), &e))?;

        if status.success() {
            return Ok(());
        }

        if self.check_exit_status {
            Err(Error::FixtureFailed {
                script: script.file_name().to_string(),
                code: status.code(),
            })
        } else {
            warn!(
                script = script.file_name(),
                code = ?status.code(),
                "fixture script failed; continuing because check_exit_status is off"
            );
            Ok(())
        }
    }
}
