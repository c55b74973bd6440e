//! LMIS harness - contract and UI acceptance test runner
//!
//! This library provides the REST contract client and cases, the step
//! registry and catalogue for UI scenarios, the UI driver layer and the
//! bridges to fixture scripts and the Android device.

pub mod api;
pub mod cli;
pub mod commands;
pub mod common;
pub mod device;
pub mod fixtures;
pub mod steps;
pub mod testing;
pub mod ui;

// Re-export commonly used types for tests
pub use common::{Error, Result};
