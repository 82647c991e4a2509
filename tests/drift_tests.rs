//! Integration tests for the baseline store and drift detector.

use sbom_guard::baseline::BaselineStore;
use sbom_guard::drift::{
    DriftDetector, DriftOptions, DriftSeverity, DriftViolationKind, OverallSeverity,
};
use sbom_guard::SbomGuardError;
use std::path::{Path, PathBuf};

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn fixture_path(name: &str) -> PathBuf {
    Path::new(FIXTURES_DIR).join(name)
}

fn detector_with_baseline(dir: &Path) -> DriftDetector {
    let store = BaselineStore::new(dir).expect("store");
    store
        .save(
            &fixture_path("cyclonedx/base.cdx.json"),
            "default",
            "v1.0",
            "release baseline",
        )
        .expect("save baseline");
    DriftDetector::with_store(store)
}

#[test]
fn test_save_then_detect_is_drift_free() {
    let dir = tempfile::tempdir().expect("tempdir");
    let detector = detector_with_baseline(dir.path());

    let result = detector
        .detect_drift(
            &fixture_path("cyclonedx/base.cdx.json"),
            "default",
            &DriftOptions::default(),
        )
        .expect("drift check");

    assert!(!result.has_drift);
    assert!(result.violations.is_empty());
    assert_eq!(result.drift_summary.total_changes, 0);
    assert_eq!(result.drift_summary.severity_level, OverallSeverity::None);
}

#[test]
fn test_drift_violations_and_severities() {
    let dir = tempfile::tempdir().expect("tempdir");
    let detector = detector_with_baseline(dir.path());

    let result = detector
        .detect_drift(
            &fixture_path("cyclonedx/updated.cdx.json"),
            "default",
            &DriftOptions::default(),
        )
        .expect("drift check");

    assert!(result.has_drift);
    // added pkg4, removed legacy-tool, upgrade pkg1, downgrade pkg2,
    // license change pkg3
    assert_eq!(result.violations.len(), 5);
    assert_eq!(result.drift_summary.unexpected_added, 1);
    assert_eq!(result.drift_summary.unexpected_removed, 1);
    assert_eq!(result.drift_summary.unexpected_upgrades, 1);
    assert_eq!(result.drift_summary.unexpected_downgrades, 1);
    assert_eq!(result.drift_summary.license_changes, 1);
    assert_eq!(result.drift_summary.severity_level, OverallSeverity::High);

    let added = result
        .violations
        .iter()
        .find(|v| v.kind == DriftViolationKind::Added)
        .expect("added violation");
    assert_eq!(added.component, "pkg4");
    assert_eq!(added.severity, DriftSeverity::Medium);

    let removed = result
        .violations
        .iter()
        .find(|v| v.kind == DriftViolationKind::Removed)
        .expect("removed violation");
    assert_eq!(removed.component, "legacy-tool");
    assert_eq!(removed.severity, DriftSeverity::High);

    let upgrade = result
        .violations
        .iter()
        .find(|v| v.kind == DriftViolationKind::Upgrade)
        .expect("upgrade violation");
    assert_eq!(upgrade.severity, DriftSeverity::Low);
    assert_eq!(upgrade.old_value, "1.0.0");
    assert_eq!(upgrade.new_value, "1.1.0");
}

#[test]
fn test_allow_lists_suppress_violations() {
    let dir = tempfile::tempdir().expect("tempdir");
    let detector = detector_with_baseline(dir.path());

    let options = DriftOptions {
        allowed_additions: vec!["pkg4".to_string()],
        allowed_removals: vec!["legacy-*".to_string()],
        allow_upgrades: true,
        allow_downgrades: true,
        allow_license_changes: true,
        strict_mode: false,
    };
    let result = detector
        .detect_drift(
            &fixture_path("cyclonedx/updated.cdx.json"),
            "default",
            &options,
        )
        .expect("drift check");

    // Every change is individually allowed: changes exist, drift does not
    assert!(!result.has_drift);
    assert!(result.violations.is_empty());
    assert!(result.drift_summary.total_changes > 0);
}

#[test]
fn test_allowed_license_changes_are_not_surfaced_in_diff() {
    let dir = tempfile::tempdir().expect("tempdir");
    let detector = detector_with_baseline(dir.path());

    let options = DriftOptions {
        allow_license_changes: true,
        ..DriftOptions::default()
    };
    let result = detector
        .detect_drift(
            &fixture_path("cyclonedx/updated.cdx.json"),
            "default",
            &options,
        )
        .expect("drift check");

    // pkg3 differs only by license, so it is absent from the diff entirely
    assert!(result.changes.modified.iter().all(|d| d.name != "pkg3"));
    assert!(result
        .violations
        .iter()
        .all(|v| v.kind != DriftViolationKind::LicenseChange));
}

#[test]
fn test_strict_mode_escalates_allowed_changes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let detector = detector_with_baseline(dir.path());

    let options = DriftOptions {
        allowed_additions: vec!["*".to_string()],
        allowed_removals: vec!["*".to_string()],
        allow_upgrades: true,
        allow_downgrades: true,
        allow_license_changes: true,
        strict_mode: true,
    };
    let result = detector
        .detect_drift(
            &fixture_path("cyclonedx/updated.cdx.json"),
            "default",
            &options,
        )
        .expect("drift check");

    // Exactly one synthetic high-severity fallback violation
    assert!(result.has_drift);
    assert_eq!(result.violations.len(), 1);
    assert_eq!(result.violations[0].kind, DriftViolationKind::Drift);
    assert_eq!(result.violations[0].severity, DriftSeverity::High);
}

#[test]
fn test_missing_baseline_propagates_not_found() {
    let dir = tempfile::tempdir().expect("tempdir");
    let detector = DriftDetector::new(dir.path()).expect("detector");

    let err = detector
        .detect_drift(
            &fixture_path("cyclonedx/base.cdx.json"),
            "never-saved",
            &DriftOptions::default(),
        )
        .unwrap_err();
    assert!(matches!(err, SbomGuardError::NotFound { .. }));
}

#[test]
fn test_corrupt_baseline_propagates_parse_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("broken.baseline.json"), "{oops").expect("write");

    let detector = DriftDetector::new(dir.path()).expect("detector");
    let err = detector
        .detect_drift(
            &fixture_path("cyclonedx/base.cdx.json"),
            "broken",
            &DriftOptions::default(),
        )
        .unwrap_err();
    assert!(matches!(err, SbomGuardError::Parse { .. }));
}

#[test]
fn test_baseline_lifecycle() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = BaselineStore::new(dir.path()).expect("store");

    store
        .save(&fixture_path("cyclonedx/base.cdx.json"), "one", "", "")
        .expect("save one");
    store
        .save(&fixture_path("cyclonedx/updated.cdx.json"), "two", "v2", "second")
        .expect("save two");

    let listed = store.list().expect("list");
    assert_eq!(listed.len(), 2);
    assert!(listed[0].path.ends_with("one.baseline.json"));
    assert_eq!(listed[1].version, "v2");
    assert_eq!(listed[1].component_count, 4);

    store.delete("one").expect("delete");
    assert_eq!(store.list().expect("list").len(), 1);

    let err = store.delete("one").unwrap_err();
    assert!(matches!(err, SbomGuardError::NotFound { .. }));
}

#[test]
fn test_save_overwrites_silently() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = BaselineStore::new(dir.path()).expect("store");

    store
        .save(&fixture_path("cyclonedx/base.cdx.json"), "default", "", "")
        .expect("first save");
    store
        .save(&fixture_path("cyclonedx/updated.cdx.json"), "default", "", "")
        .expect("overwrite");

    let baseline = store.load("default").expect("load");
    assert_eq!(baseline.meta.component_count, 4);
    assert!(baseline.components.iter().any(|c| c.name == "pkg4"));

    // Detect against the updated inventory: the overwrite took effect
    let detector = DriftDetector::with_store(store);
    let result = detector
        .detect_drift(
            &fixture_path("cyclonedx/updated.cdx.json"),
            "default",
            &DriftOptions::default(),
        )
        .expect("drift check");
    assert!(!result.has_drift);
}

#[test]
fn test_empty_baseline_name_uses_default() {
    let dir = tempfile::tempdir().expect("tempdir");
    let detector = detector_with_baseline(dir.path());

    let result = detector
        .detect_drift(
            &fixture_path("cyclonedx/base.cdx.json"),
            "",
            &DriftOptions::default(),
        )
        .expect("drift check");
    assert!(!result.has_drift);
    assert!(result.baseline.path.ends_with("default.baseline.json"));
}
