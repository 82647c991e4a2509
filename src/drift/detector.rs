//! Drift detection: baseline loading, diffing, and violation analysis.

use super::options::{is_allowed, DriftOptions};
use crate::baseline::{BaselineMeta, BaselineStore};
use crate::diff::{DiffEngine, DiffOptions, DiffResult, SbomMeta, VersionSeverity};
use crate::error::Result;
use crate::model::Inventory;
use crate::parsers::parse_inventory;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Kind of a single drift violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriftViolationKind {
    Added,
    Removed,
    Upgrade,
    Downgrade,
    LicenseChange,
    /// Synthetic strict-mode fallback when no other violation fired
    Drift,
}

/// Severity of a single drift violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriftSeverity {
    Low,
    Medium,
    High,
}

/// Overall severity rollup for a drift result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallSeverity {
    #[default]
    None,
    Low,
    Medium,
    High,
}

/// Fixed violation-kind → severity mapping.
///
/// This is the single point where diff-side classifications translate into
/// drift severities; it is not configurable.
const fn severity_for(kind: DriftViolationKind) -> DriftSeverity {
    match kind {
        DriftViolationKind::Upgrade => DriftSeverity::Low,
        DriftViolationKind::Added | DriftViolationKind::LicenseChange => DriftSeverity::Medium,
        DriftViolationKind::Removed | DriftViolationKind::Downgrade | DriftViolationKind::Drift => {
            DriftSeverity::High
        }
    }
}

/// A specific drift violation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriftViolation {
    #[serde(rename = "type")]
    pub kind: DriftViolationKind,
    /// Formatted `group/name`; empty for the synthetic strict-mode violation
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub component: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub old_value: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub new_value: String,
    pub severity: DriftSeverity,
    pub message: String,
}

/// High-level drift statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DriftSummary {
    pub total_changes: usize,
    pub unexpected_added: usize,
    pub unexpected_removed: usize,
    pub unexpected_upgrades: usize,
    pub unexpected_downgrades: usize,
    pub license_changes: usize,
    pub severity_level: OverallSeverity,
}

/// The outcome of drift detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[must_use]
pub struct DriftResult {
    /// True iff any violation was generated. A non-empty diff where every
    /// change was allow-listed is NOT drift.
    pub has_drift: bool,
    pub drift_summary: DriftSummary,
    pub changes: DiffResult,
    pub baseline: BaselineMeta,
    pub current: SbomMeta,
    pub detected_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<DriftViolation>,
}

/// Detects drift of a current inventory from a stored baseline.
#[derive(Debug, Clone)]
pub struct DriftDetector {
    store: BaselineStore,
}

impl DriftDetector {
    /// Create a detector over the baseline directory `baseline_dir`.
    pub fn new(baseline_dir: impl Into<std::path::PathBuf>) -> Result<Self> {
        Ok(Self {
            store: BaselineStore::new(baseline_dir)?,
        })
    }

    /// Create a detector over an existing store.
    #[must_use]
    pub const fn with_store(store: BaselineStore) -> Self {
        Self { store }
    }

    /// The underlying baseline store.
    #[must_use]
    pub const fn store(&self) -> &BaselineStore {
        &self.store
    }

    /// Compare the inventory at `current_path` against the baseline
    /// `baseline_name` (empty name = default).
    ///
    /// Missing or corrupt baselines propagate as errors; they are not
    /// treated as drift.
    pub fn detect_drift(
        &self,
        current_path: &Path,
        baseline_name: &str,
        options: &DriftOptions,
    ) -> Result<DriftResult> {
        let baseline = self.store.load(baseline_name)?;
        let baseline_file = self.store.baseline_path(baseline_name);

        let current = parse_inventory(current_path)?;

        // The stored snapshot becomes the "old" side directly; the header
        // values match what the snapshot was originally parsed from.
        let baseline_inventory =
            Inventory::from_components("CycloneDX", "1.4", baseline.components.clone());

        // Globally-allowed license changes are not even surfaced as diff rows.
        let engine = DiffEngine::with_options(DiffOptions {
            show_unchanged: false,
            ignore_licenses: options.allow_license_changes,
        });
        let diff = engine.diff_with_sources(
            &baseline_inventory,
            &current,
            &baseline_file.display().to_string(),
            &current_path.display().to_string(),
        );

        let violations = analyze_violations(&diff, options);
        let drift_summary = calculate_drift_summary(&diff, &violations);

        Ok(DriftResult {
            has_drift: !violations.is_empty(),
            drift_summary,
            baseline: BaselineMeta {
                path: baseline_file.display().to_string(),
                ..baseline.meta
            },
            current: SbomMeta {
                path: current_path.display().to_string(),
                format: current.format.clone(),
                spec_version: current.spec_version.clone(),
                component_count: current.component_count(),
            },
            changes: diff,
            detected_at: Utc::now(),
            violations,
        })
    }
}

/// Classify diff rows into violations according to the allow-list options.
fn analyze_violations(diff: &DiffResult, options: &DriftOptions) -> Vec<DriftViolation> {
    let mut violations = Vec::new();

    for row in &diff.added {
        let full_name = row.full_name();
        if !is_allowed(&full_name, &options.allowed_additions) {
            let version = row.version.clone().unwrap_or_default();
            violations.push(DriftViolation {
                kind: DriftViolationKind::Added,
                message: format!("Unexpected dependency added: {full_name} v{version}"),
                component: full_name,
                old_value: String::new(),
                new_value: version,
                severity: severity_for(DriftViolationKind::Added),
            });
        }
    }

    for row in &diff.removed {
        let full_name = row.full_name();
        if !is_allowed(&full_name, &options.allowed_removals) {
            let version = row.version.clone().unwrap_or_default();
            violations.push(DriftViolation {
                kind: DriftViolationKind::Removed,
                message: format!("Unexpected dependency removed: {full_name} v{version}"),
                component: full_name,
                old_value: version,
                new_value: String::new(),
                severity: severity_for(DriftViolationKind::Removed),
            });
        }
    }

    for row in &diff.modified {
        let full_name = row.full_name();
        let old_version = row.old_version.clone().unwrap_or_default();
        let new_version = row.new_version.clone().unwrap_or_default();

        if row.severity == Some(VersionSeverity::Upgrade) && !options.allow_upgrades {
            violations.push(DriftViolation {
                kind: DriftViolationKind::Upgrade,
                message: format!(
                    "Unexpected version upgrade: {full_name} from v{old_version} to v{new_version}"
                ),
                component: full_name.clone(),
                old_value: old_version.clone(),
                new_value: new_version.clone(),
                severity: severity_for(DriftViolationKind::Upgrade),
            });
        }

        if row.severity == Some(VersionSeverity::Downgrade) && !options.allow_downgrades {
            violations.push(DriftViolation {
                kind: DriftViolationKind::Downgrade,
                message: format!(
                    "Unexpected version downgrade: {full_name} from v{old_version} to v{new_version}"
                ),
                component: full_name.clone(),
                old_value: old_version.clone(),
                new_value: new_version.clone(),
                severity: severity_for(DriftViolationKind::Downgrade),
            });
        }

        // Unreachable when license diffs were suppressed upstream via
        // ignore_licenses; kept for diffs produced with licenses visible.
        if let (Some(old_license), Some(new_license)) = (&row.old_license, &row.new_license) {
            if !old_license.is_empty()
                && !new_license.is_empty()
                && old_license != new_license
                && !options.allow_license_changes
            {
                violations.push(DriftViolation {
                    kind: DriftViolationKind::LicenseChange,
                    message: format!(
                        "License changed: {full_name} from {old_license} to {new_license}"
                    ),
                    component: full_name.clone(),
                    old_value: old_license.clone(),
                    new_value: new_license.clone(),
                    severity: severity_for(DriftViolationKind::LicenseChange),
                });
            }
        }
    }

    // Strict mode is a fallback catch-all, not an allow-list override: it
    // only synthesizes a violation when the rules above produced none.
    if options.strict_mode && diff.has_changes() && violations.is_empty() {
        violations.push(DriftViolation {
            kind: DriftViolationKind::Drift,
            component: String::new(),
            old_value: String::new(),
            new_value: String::new(),
            severity: severity_for(DriftViolationKind::Drift),
            message: "Strict mode enabled: any change from baseline is not allowed".to_string(),
        });
    }

    violations
}

fn calculate_drift_summary(diff: &DiffResult, violations: &[DriftViolation]) -> DriftSummary {
    let mut summary = DriftSummary {
        total_changes: diff.summary.added_count
            + diff.summary.removed_count
            + diff.summary.modified_count,
        ..DriftSummary::default()
    };

    for violation in violations {
        match violation.kind {
            DriftViolationKind::Added => summary.unexpected_added += 1,
            DriftViolationKind::Removed => summary.unexpected_removed += 1,
            DriftViolationKind::Upgrade => summary.unexpected_upgrades += 1,
            DriftViolationKind::Downgrade => summary.unexpected_downgrades += 1,
            DriftViolationKind::LicenseChange => summary.license_changes += 1,
            DriftViolationKind::Drift => {}
        }
    }

    summary.severity_level = violations
        .iter()
        .map(|v| match v.severity {
            DriftSeverity::Low => OverallSeverity::Low,
            DriftSeverity::Medium => OverallSeverity::Medium,
            DriftSeverity::High => OverallSeverity::High,
        })
        .max_by_key(|s| match s {
            OverallSeverity::None => 0u8,
            OverallSeverity::Low => 1,
            OverallSeverity::Medium => 2,
            OverallSeverity::High => 3,
        })
        .unwrap_or(OverallSeverity::None);

    summary
}
