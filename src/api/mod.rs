//! REST API contract runner
//!
//! Talks to the LMIS web server over HTTP and checks that login,
//! requisition and stock card endpoints keep their response contracts.

mod client;
pub mod contract;
pub mod fixtures;
mod types;

pub use client::LmisClient;
pub use contract::{run_case, run_suite, CaseResult, ContractCase, ContractTargets};
pub use types::*;
