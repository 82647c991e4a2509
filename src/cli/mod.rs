//! CLI command handlers.
//!
//! This module provides testable command handlers that are invoked by
//! main.rs. Each handler implements the business logic for a specific CLI
//! subcommand, prints the selected output format, and decides the process
//! exit: 0 for a clean pass, 1 for a failed gate (drift found, policy
//! failed, changes with `--fail-on-change`). Tooling errors propagate as
//! `Err` and exit 2 from main.

mod baseline;
mod diff;
mod drift;
mod validate;

pub use baseline::{run_baseline_delete, run_baseline_list, run_baseline_save};
pub use diff::run_diff;
pub use drift::run_drift;
pub use validate::run_validate;

use clap::ValueEnum;

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON of the full structured result
    Json,
    /// Human-readable text summary
    Summary,
}
