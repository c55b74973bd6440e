//! Scenario steps
//!
//! Every phrase a scenario may contain is registered here against the
//! handler that performs it. Handlers that build on other steps call the
//! other handlers' helpers directly.

mod context;
mod registry;

pub mod generic;
pub mod login;
pub mod products;
pub mod requisition;
pub mod server_data;
pub mod stock_movement;

pub use context::{ScenarioOptions, StepContext};
pub use registry::{strip_keyword, ResolvedStep, StepArgs, StepFn, StepFuture, StepRegistry};

#[cfg(test)]
pub(crate) use context::test_support;
