//! Validate command handler.

use super::OutputFormat;
use crate::error::SbomGuardError;
use crate::policy::{PolicyConfig, PolicyEngine};
use anyhow::Result;
use std::path::PathBuf;

/// Run the validate command.
///
/// Exits 1 when the inventory fails the policy. A malformed policy or
/// inventory is a tooling error instead and propagates as `Err`.
pub fn run_validate(
    sbom: PathBuf,
    policy: PathBuf,
    fail_on_warning: bool,
    output: OutputFormat,
) -> Result<()> {
    let content = std::fs::read_to_string(&policy)
        .map_err(|e| SbomGuardError::from_read(&policy, e))?;
    let mut config = PolicyConfig::from_yaml(&content, &policy.display().to_string())?;
    // The CLI flag widens the gate on top of whatever the policy file set.
    config.options.fail_on_warning |= fail_on_warning;

    let engine = PolicyEngine::new(config);
    let result = engine.validate(&sbom)?;

    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Summary => println!("{}", result.summary.trim_end()),
    }

    if !result.passed {
        std::process::exit(1);
    }

    Ok(())
}
