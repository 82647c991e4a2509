//! Diff computation over two in-memory inventories.

use super::result::{
    ChangeType, ComparisonMeta, ComponentDiff, DiffResult, SbomMeta, VersionSeverity,
};
use crate::error::Result;
use crate::model::{Component, Inventory};
use crate::parsers::parse_inventory;
use crate::utils::version::compare_versions;
use std::cmp::Ordering;
use std::path::Path;

/// Controls diff behavior.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffOptions {
    /// Emit unchanged rows alongside the changed ones
    pub show_unchanged: bool,
    /// Suppress license comparison entirely
    pub ignore_licenses: bool,
}

/// Computes the delta between two component inventories.
#[derive(Debug, Clone, Default)]
pub struct DiffEngine {
    options: DiffOptions,
}

impl DiffEngine {
    /// Create an engine with default options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with explicit options
    #[must_use]
    pub const fn with_options(options: DiffOptions) -> Self {
        Self { options }
    }

    /// Diff two in-memory inventories.
    ///
    /// Every component key present in either input appears in exactly one
    /// of the four result lists (unchanged rows only when requested).
    pub fn diff(&self, old: &Inventory, new: &Inventory) -> DiffResult {
        self.diff_with_sources(old, new, "", "")
    }

    /// Diff two in-memory inventories, recording their origins in the
    /// comparison metadata.
    pub fn diff_with_sources(
        &self,
        old: &Inventory,
        new: &Inventory,
        old_source: &str,
        new_source: &str,
    ) -> DiffResult {
        let old_map = old.component_map();
        let new_map = new.component_map();

        let mut result = DiffResult {
            comparison: ComparisonMeta {
                old_sbom: SbomMeta {
                    path: old_source.to_string(),
                    format: old.format.clone(),
                    spec_version: old.spec_version.clone(),
                    component_count: old_map.len(),
                },
                new_sbom: SbomMeta {
                    path: new_source.to_string(),
                    format: new.format.clone(),
                    spec_version: new.spec_version.clone(),
                    component_count: new_map.len(),
                },
            },
            ..DiffResult::default()
        };

        // Identical content hashes mean identical key/version/license/purl
        // sets, so the compare loop can be skipped outright.
        if old.content_hash != 0 && old.content_hash == new.content_hash {
            if self.options.show_unchanged {
                result.unchanged = new_map.values().map(|c| ComponentDiff::unchanged(c)).collect();
            }
            result.sort_lists();
            result.calculate_summary();
            return result;
        }

        // Added and modified: walk the new inventory
        for (key, new_comp) in &new_map {
            match old_map.get(key) {
                Some(old_comp) => match self.compare_components(old_comp, new_comp) {
                    Some(diff) => result.modified.push(diff),
                    None if self.options.show_unchanged => {
                        result.unchanged.push(ComponentDiff::unchanged(new_comp));
                    }
                    None => {}
                },
                None => result.added.push(ComponentDiff::added(new_comp)),
            }
        }

        // Removed: walk the old inventory
        for (key, old_comp) in &old_map {
            if !new_map.contains_key(key) {
                result.removed.push(ComponentDiff::removed(old_comp));
            }
        }

        result.sort_lists();
        result.calculate_summary();
        result
    }

    /// Compare two matched components, returning a diff row iff they differ.
    ///
    /// A row can carry both a version-change and a license-change sentence;
    /// version takes classification priority for `change_type`.
    fn compare_components(&self, old: &Component, new: &Component) -> Option<ComponentDiff> {
        let version_changed = old.version != new.version;
        let license_changed = !self.options.ignore_licenses && old.license != new.license;

        if !version_changed && !license_changed {
            return None;
        }

        let mut changes = Vec::new();
        let mut diff = ComponentDiff {
            name: new.name.clone(),
            group: new.group.clone(),
            change_type: ChangeType::Unchanged,
            old_version: None,
            new_version: None,
            version: None,
            old_license: None,
            new_license: None,
            license: None,
            severity: None,
            purl: new.purl.clone(),
            changes: Vec::new(),
        };

        if version_changed {
            diff.old_version = Some(old.version.clone());
            diff.new_version = Some(new.version.clone());
            diff.change_type = ChangeType::VersionChange;

            let severity = classify_version_change(&old.version, &new.version);
            diff.severity = Some(severity);

            let verb = match severity {
                VersionSeverity::Upgrade => "upgraded",
                VersionSeverity::Downgrade => "downgraded",
                VersionSeverity::Changed | VersionSeverity::Unchanged => "changed",
            };
            changes.push(format!(
                "Version {verb} from {} to {}",
                old.version, new.version
            ));
        }

        if license_changed {
            diff.old_license = Some(old.license.clone());
            diff.new_license = Some(new.license.clone());
            if diff.change_type == ChangeType::Unchanged {
                diff.change_type = ChangeType::LicenseChange;
            }
            changes.push(format!(
                "License changed from {} to {}",
                old.license, new.license
            ));
        }

        diff.changes = changes;
        Some(diff)
    }
}

/// Classify the direction of a version change.
///
/// A single leading `v` is stripped from each side before comparison.
/// Ordering comes from [`compare_versions`]: semver when both sides parse,
/// lexicographic otherwise. Versions that order as equal but differ
/// textually (semver build metadata) classify as `Changed`.
#[must_use]
pub(crate) fn classify_version_change(old: &str, new: &str) -> VersionSeverity {
    let old = old.strip_prefix('v').unwrap_or(old);
    let new = new.strip_prefix('v').unwrap_or(new);

    if old == new {
        return VersionSeverity::Unchanged;
    }

    match compare_versions(new, old) {
        Ordering::Greater => VersionSeverity::Upgrade,
        Ordering::Less => VersionSeverity::Downgrade,
        Ordering::Equal => VersionSeverity::Changed,
    }
}

/// Convenience wrapper: parse two inventory files and diff them.
pub fn diff_paths(old_path: &Path, new_path: &Path, options: DiffOptions) -> Result<DiffResult> {
    let old = parse_inventory(old_path)?;
    let new = parse_inventory(new_path)?;

    Ok(DiffEngine::with_options(options).diff_with_sources(
        &old,
        &new,
        &old_path.display().to_string(),
        &new_path.display().to_string(),
    ))
}
