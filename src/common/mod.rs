//! Common utilities shared between the contract and UI runners

pub mod config;
pub mod error;
pub mod logging;
pub mod paths;

pub use error::{Error, Result};
