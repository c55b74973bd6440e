//! Device-level actions through adb
//!
//! Clock and radio changes cannot be made from inside the app, so they go
//! through the device bridge on the host. A device serial, when configured,
//! targets one device among several.

use std::path::PathBuf;
use std::process::Stdio;

use tokio::process::Command;
use tracing::{info, warn};

use crate::common::config::DeviceConfig;
use crate::common::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceAction {
    /// Set the device clock; the value is passed to `date -s` verbatim
    SetDate(String),
    SetWifi(bool),
}

pub struct DeviceBridge {
    adb: PathBuf,
    serial: Option<String>,
    check_exit_status: bool,
}

impl DeviceBridge {
    pub fn new(config: &DeviceConfig) -> Self {
        Self {
            adb: config.adb_path.clone(),
            serial: config.resolved_serial(),
            check_exit_status: config.check_exit_status,
        }
    }

    /// Arguments passed to adb for an action
    pub fn command_args(&self, action: &DeviceAction) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(serial) = &self.serial {
            args.push("-s".to_string());
            args.push(serial.clone());
        }
        args.push("shell".to_string());
        match action {
            DeviceAction::SetDate(time) => {
                args.extend(["su", "0", "date", "-s"].map(String::from));
                args.push(time.clone());
            }
            DeviceAction::SetWifi(enabled) => {
                args.extend(["svc", "wifi"].map(String::from));
                args.push(if *enabled { "enable" } else { "disable" }.to_string());
            }
        }
        args
    }

    fn resolve_adb(&self) -> Result<PathBuf> {
        if self.adb.components().count() > 1 || self.adb.is_absolute() {
            return Ok(self.adb.clone());
        }
        which::which(&self.adb).map_err(|_| Error::ToolNotFound(self.adb.display().to_string()))
    }

    pub async fn run(&self, action: &DeviceAction) -> Result<()> {
        let adb = self.resolve_adb()?;
        let args = self.command_args(action);
        let command = format!("{} {}", adb.display(), args.join(" "));
        info!(%command, "device command");

        let status = Command::new(&adb)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| Error::spawn(adb.display(), &e))?;

        if status.success() {
            Ok(())
        } else if self.check_exit_status {
            Err(Error::DeviceCommandFailed {
                command,
                code: status.code(),
            })
        } else {
            warn!(%command, code = ?status.code(), "device command failed");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bridge(serial: Option<&str>) -> DeviceBridge {
        DeviceBridge {
            adb: PathBuf::from("adb"),
            serial: serial.map(String::from),
            check_exit_status: true,
        }
    }

    #[test]
    fn test_date_without_serial() {
        let args = bridge(None).command_args(&DeviceAction::SetDate("20160121.130000".into()));
        assert_eq!(args, ["shell", "su", "0", "date", "-s", "20160121.130000"]);
    }

    #[test]
    fn test_wifi_with_serial() {
        let args = bridge(Some("emulator-5554")).command_args(&DeviceAction::SetWifi(false));
        assert_eq!(args, ["-s", "emulator-5554", "shell", "svc", "wifi", "disable"]);
    }

    #[test]
    fn test_explicit_adb_path_is_not_searched() {
        let mut b = bridge(None);
        b.adb = PathBuf::from("/opt/android/platform-tools/adb");
        assert_eq!(b.resolve_adb().unwrap(), PathBuf::from("/opt/android/platform-tools/adb"));
    }

    #[test]
    fn test_missing_adb_is_reported() {
        let mut b = bridge(None);
        b.adb = PathBuf::from("adb-that-does-not-exist-anywhere");
        assert!(matches!(b.resolve_adb(), Err(Error::ToolNotFound(_))));
    }
}
