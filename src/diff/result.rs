//! Diff result structures.

use crate::model::Component;
use serde::{Deserialize, Serialize};

/// Classification of a single component's change between two inventories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    Added,
    Removed,
    VersionChange,
    LicenseChange,
    Unchanged,
}

impl std::fmt::Display for ChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Added => "added",
            Self::Removed => "removed",
            Self::VersionChange => "version_change",
            Self::LicenseChange => "license_change",
            Self::Unchanged => "unchanged",
        };
        write!(f, "{label}")
    }
}

/// Direction of a version change.
///
/// `Changed` covers versions that order as equal but differ textually
/// (e.g. semver build metadata).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionSeverity {
    Upgrade,
    Downgrade,
    Changed,
    Unchanged,
}

impl std::fmt::Display for VersionSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Upgrade => "upgrade",
            Self::Downgrade => "downgrade",
            Self::Changed => "changed",
            Self::Unchanged => "unchanged",
        };
        write!(f, "{label}")
    }
}

/// One row of a diff result.
///
/// Added/removed/unchanged rows carry the single relevant snapshot's values
/// in `version`/`license`; modified rows carry `old_*`/`new_*` pairs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentDiff {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub group: String,
    pub change_type: ChangeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_license: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_license: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    /// Set only when the version changed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<VersionSeverity>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub purl: String,
    /// Human-readable change sentences: version change first, then license
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<String>,
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

impl ComponentDiff {
    /// Row for a component present only in the new inventory
    #[must_use]
    pub fn added(comp: &Component) -> Self {
        Self::snapshot(comp, ChangeType::Added)
    }

    /// Row for a component present only in the old inventory
    #[must_use]
    pub fn removed(comp: &Component) -> Self {
        Self::snapshot(comp, ChangeType::Removed)
    }

    /// Row for a component unchanged between the two inventories
    #[must_use]
    pub fn unchanged(comp: &Component) -> Self {
        Self::snapshot(comp, ChangeType::Unchanged)
    }

    fn snapshot(comp: &Component, change_type: ChangeType) -> Self {
        Self {
            name: comp.name.clone(),
            group: comp.group.clone(),
            change_type,
            old_version: None,
            new_version: None,
            version: non_empty(&comp.version),
            old_license: None,
            new_license: None,
            license: non_empty(&comp.license),
            severity: None,
            purl: comp.purl.clone(),
            changes: Vec::new(),
        }
    }

    /// Full display name: `group/name` when a group is present
    #[must_use]
    pub fn full_name(&self) -> String {
        if self.group.is_empty() {
            self.name.clone()
        } else {
            format!("{}/{}", self.group, self.name)
        }
    }
}

/// High-level statistics about a diff.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiffSummary {
    pub total_components: usize,
    pub added_count: usize,
    pub removed_count: usize,
    pub modified_count: usize,
    pub unchanged_count: usize,
    pub version_upgrades: usize,
    pub version_downgrades: usize,
    pub license_changes: usize,
}

/// Metadata about one input inventory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SbomMeta {
    pub path: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub format: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub spec_version: String,
    pub component_count: usize,
}

/// Metadata about the comparison inputs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComparisonMeta {
    pub old_sbom: SbomMeta,
    pub new_sbom: SbomMeta,
}

/// Complete result of an inventory diff operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[must_use]
pub struct DiffResult {
    pub added: Vec<ComponentDiff>,
    pub removed: Vec<ComponentDiff>,
    pub modified: Vec<ComponentDiff>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unchanged: Vec<ComponentDiff>,
    pub summary: DiffSummary,
    pub comparison: ComparisonMeta,
}

impl DiffResult {
    /// Check if there are any changes
    #[must_use]
    pub fn has_changes(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty() || !self.modified.is_empty()
    }

    /// Sort all four output lists by `(group, name)` for stable output
    pub fn sort_lists(&mut self) {
        for list in [
            &mut self.added,
            &mut self.removed,
            &mut self.modified,
            &mut self.unchanged,
        ] {
            list.sort_by(|a, b| a.group.cmp(&b.group).then_with(|| a.name.cmp(&b.name)));
        }
    }

    /// Recalculate summary statistics from the result lists.
    ///
    /// Upgrades and downgrades are counted only from modified rows whose
    /// severity is exactly `Upgrade`/`Downgrade`; license changes only where
    /// both old and new license are present and differ.
    pub fn calculate_summary(&mut self) {
        let mut summary = DiffSummary {
            added_count: self.added.len(),
            removed_count: self.removed.len(),
            modified_count: self.modified.len(),
            unchanged_count: self.unchanged.len(),
            ..DiffSummary::default()
        };

        for diff in &self.modified {
            match diff.severity {
                Some(VersionSeverity::Upgrade) => summary.version_upgrades += 1,
                Some(VersionSeverity::Downgrade) => summary.version_downgrades += 1,
                _ => {}
            }
            if let (Some(old), Some(new)) = (&diff.old_license, &diff.new_license) {
                if !old.is_empty() && !new.is_empty() && old != new {
                    summary.license_changes += 1;
                }
            }
        }

        summary.total_components = summary.added_count
            + summary.removed_count
            + summary.modified_count
            + summary.unchanged_count;

        self.summary = summary;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_type_serialization() {
        let json = serde_json::to_string(&ChangeType::VersionChange).expect("serialize");
        assert_eq!(json, "\"version_change\"");
        let json = serde_json::to_string(&VersionSeverity::Downgrade).expect("serialize");
        assert_eq!(json, "\"downgrade\"");
    }

    #[test]
    fn test_snapshot_row_drops_empty_fields() {
        let comp = Component {
            name: "pkg".to_string(),
            version: "1.0.0".to_string(),
            ..Component::default()
        };
        let row = ComponentDiff::added(&comp);
        assert_eq!(row.version.as_deref(), Some("1.0.0"));
        assert!(row.license.is_none());

        let json = serde_json::to_string(&row).expect("serialize");
        assert!(!json.contains("license"));
        assert!(!json.contains("old_version"));
    }

    #[test]
    fn test_summary_counts_only_exact_severities() {
        let mut result = DiffResult::default();
        result.modified.push(ComponentDiff {
            severity: Some(VersionSeverity::Upgrade),
            ..ComponentDiff::added(&Component::default())
        });
        result.modified.push(ComponentDiff {
            severity: Some(VersionSeverity::Changed),
            ..ComponentDiff::added(&Component::default())
        });
        result.modified.push(ComponentDiff {
            old_license: Some("MIT".to_string()),
            new_license: Some("GPL-3.0".to_string()),
            ..ComponentDiff::added(&Component::default())
        });

        result.calculate_summary();
        assert_eq!(result.summary.version_upgrades, 1);
        assert_eq!(result.summary.version_downgrades, 0);
        assert_eq!(result.summary.license_changes, 1);
        assert_eq!(result.summary.modified_count, 3);
    }
}
