//! Diff command handler.

use super::OutputFormat;
use crate::diff::{diff_paths, DiffOptions, DiffResult};
use anyhow::Result;
use std::path::PathBuf;

/// Run the diff command.
///
/// Exits 1 when `fail_on_change` is set and the diff is non-empty.
pub fn run_diff(
    old: PathBuf,
    new: PathBuf,
    show_unchanged: bool,
    ignore_licenses: bool,
    output: OutputFormat,
    fail_on_change: bool,
) -> Result<()> {
    let options = DiffOptions {
        show_unchanged,
        ignore_licenses,
    };
    let result = diff_paths(&old, &new, options)?;

    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Summary => println!("{}", format_diff_text(&result)),
    }

    if fail_on_change && result.has_changes() {
        std::process::exit(1);
    }

    Ok(())
}

fn format_diff_text(result: &DiffResult) -> String {
    let mut lines = Vec::new();
    let s = &result.summary;

    lines.push(format!(
        "Compared {} ({} components) -> {} ({} components)",
        result.comparison.old_sbom.path,
        result.comparison.old_sbom.component_count,
        result.comparison.new_sbom.path,
        result.comparison.new_sbom.component_count,
    ));
    lines.push(format!(
        "Added: {}  Removed: {}  Modified: {}  Unchanged: {}",
        s.added_count, s.removed_count, s.modified_count, s.unchanged_count
    ));
    if s.version_upgrades + s.version_downgrades + s.license_changes > 0 {
        lines.push(format!(
            "Upgrades: {}  Downgrades: {}  License changes: {}",
            s.version_upgrades, s.version_downgrades, s.license_changes
        ));
    }

    for row in &result.added {
        lines.push(format!(
            "  + {} {}",
            row.full_name(),
            row.version.as_deref().unwrap_or("")
        ));
    }
    for row in &result.removed {
        lines.push(format!(
            "  - {} {}",
            row.full_name(),
            row.version.as_deref().unwrap_or("")
        ));
    }
    for row in &result.modified {
        for change in &row.changes {
            lines.push(format!("  ~ {}: {}", row.full_name(), change));
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::DiffEngine;
    use crate::model::{Component, Inventory};

    #[test]
    fn test_format_diff_text_lists_changes() {
        let old = Inventory::from_components(
            "CycloneDX",
            "1.5",
            vec![Component {
                name: "pkg".to_string(),
                version: "1.0.0".to_string(),
                ..Component::default()
            }],
        );
        let new = Inventory::from_components(
            "CycloneDX",
            "1.5",
            vec![
                Component {
                    name: "pkg".to_string(),
                    version: "2.0.0".to_string(),
                    ..Component::default()
                },
                Component {
                    name: "fresh".to_string(),
                    version: "0.1.0".to_string(),
                    ..Component::default()
                },
            ],
        );

        let result = DiffEngine::new().diff_with_sources(&old, &new, "a.json", "b.json");
        let text = format_diff_text(&result);
        assert!(text.contains("+ fresh 0.1.0"));
        assert!(text.contains("~ pkg: Version upgraded from 1.0.0 to 2.0.0"));
        assert!(text.contains("Added: 1  Removed: 0  Modified: 1"));
    }
}
