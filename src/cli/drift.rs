//! Drift command handler.

use super::OutputFormat;
use crate::drift::{DriftDetector, DriftOptions, DriftResult};
use anyhow::Result;
use std::path::PathBuf;

/// Run the drift command.
///
/// Exits 1 when drift is detected; a drift check that finds only
/// allow-listed changes passes.
pub fn run_drift(
    sbom: PathBuf,
    baseline_name: String,
    dir: PathBuf,
    options: DriftOptions,
    output: OutputFormat,
) -> Result<()> {
    let detector = DriftDetector::new(dir)?;
    let result = detector.detect_drift(&sbom, &baseline_name, &options)?;

    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Summary => println!("{}", format_drift_text(&result)),
    }

    if result.has_drift {
        std::process::exit(1);
    }

    Ok(())
}

fn format_drift_text(result: &DriftResult) -> String {
    let mut lines = Vec::new();
    let s = &result.drift_summary;

    if result.has_drift {
        lines.push(format!(
            "DRIFT DETECTED ({:?} severity, {} violations)",
            s.severity_level,
            result.violations.len()
        ));
    } else if s.total_changes > 0 {
        lines.push(format!(
            "No drift: all {} changes are allowed",
            s.total_changes
        ));
    } else {
        lines.push("No drift: inventory matches baseline".to_string());
    }

    lines.push(format!(
        "Baseline: {} ({} components, created {})",
        result.baseline.path,
        result.baseline.component_count,
        result.baseline.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    lines.push(format!(
        "Current:  {} ({} components)",
        result.current.path, result.current.component_count
    ));

    for violation in &result.violations {
        lines.push(format!(
            "  [{:?}] {}",
            violation.severity, violation.message
        ));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::baseline::BaselineStore;
    use std::fs;

    const SBOM: &str = r#"{
        "bomFormat": "CycloneDX",
        "specVersion": "1.5",
        "components": [{"name": "pkg1", "version": "1.0.0"}]
    }"#;

    const SBOM_WITH_ADDITION: &str = r#"{
        "bomFormat": "CycloneDX",
        "specVersion": "1.5",
        "components": [
            {"name": "pkg1", "version": "1.0.0"},
            {"name": "pkg4", "version": "0.1.0"}
        ]
    }"#;

    #[test]
    fn test_format_drift_text() {
        let dir = tempfile::tempdir().expect("tempdir");
        let sbom_path = dir.path().join("sbom.json");
        fs::write(&sbom_path, SBOM).expect("write");
        let current_path = dir.path().join("current.json");
        fs::write(&current_path, SBOM_WITH_ADDITION).expect("write");

        let store_dir = dir.path().join("baselines");
        let store = BaselineStore::new(&store_dir).expect("store");
        store.save(&sbom_path, "default", "", "").expect("save");

        let detector = DriftDetector::new(&store_dir).expect("detector");
        let result = detector
            .detect_drift(&current_path, "default", &DriftOptions::default())
            .expect("drift");

        let text = format_drift_text(&result);
        assert!(text.contains("DRIFT DETECTED"));
        assert!(text.contains("Unexpected dependency added: pkg4"));
    }
}
