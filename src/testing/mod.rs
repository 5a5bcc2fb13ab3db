//! Scenario runner
//!
//! Reads YAML scenarios and executes their steps in order against the
//! target API, asserting on parsed responses rather than raw text where
//! the body is JSON.

mod config;
mod runner;

pub use config::*;
pub use runner::{
    build_request, check_response, run_scenario, RunOptions, ScenarioReport, StepReport,
};
