//! Integration tests for the policy engine.

use sbom_guard::policy::{PolicyEngine, RuleSeverity};
use sbom_guard::SbomGuardError;
use std::path::{Path, PathBuf};

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn fixture_path(name: &str) -> PathBuf {
    Path::new(FIXTURES_DIR).join(name)
}

#[test]
fn test_gpl_block_scenario() {
    let engine =
        PolicyEngine::from_path(&fixture_path("policy/no-gpl.yaml")).expect("engine");
    let result = engine
        .validate(&fixture_path("cyclonedx/with-metadata.cdx.json"))
        .expect("validate");

    assert!(!result.passed);
    assert_eq!(result.violations.len(), 1);
    assert_eq!(result.violations[0].rule, "no-gpl");
    assert_eq!(result.violations[0].component, "gpl-tool");
    assert_eq!(result.violations[0].severity, RuleSeverity::Error);
    assert!(result.summary.contains("Policy validation failed"));
}

#[test]
fn test_clean_inventory_passes_gpl_policy() {
    let engine =
        PolicyEngine::from_path(&fixture_path("policy/no-gpl.yaml")).expect("engine");
    let result = engine
        .validate(&fixture_path("cyclonedx/updated.cdx.json"))
        .expect("validate");

    assert!(result.passed);
    assert!(result.violations.is_empty());
    assert!(result.summary.contains("All policy checks passed"));
}

#[test]
fn test_hygiene_policy_over_build_metadata() {
    let engine =
        PolicyEngine::from_path(&fixture_path("policy/hygiene.yaml")).expect("engine");
    let result = engine
        .validate(&fixture_path("cyclonedx/with-metadata.cdx.json"))
        .expect("validate");

    assert!(!result.passed);

    // Errors: local-path replace, retracted version, cgo enabled
    let error_rules: Vec<&str> = result.violations.iter().map(|v| v.rule.as_str()).collect();
    assert!(error_rules.contains(&"no-local-replaces"));
    assert!(error_rules.contains(&"no-retracted"));
    assert!(error_rules.contains(&"cgo-off"));
    assert_eq!(result.violations.len(), 3);

    // Warnings: vendored deps, missing openssl (zlib is present)
    let warning_rules: Vec<&str> = result.warnings.iter().map(|v| v.rule.as_str()).collect();
    assert!(warning_rules.contains(&"no-vendoring"));
    assert!(warning_rules.contains(&"core-deps"));
    assert_eq!(result.warnings.len(), 2);

    // Info: missing build_context.go_version metadata, advisory only
    assert_eq!(result.advisories.len(), 1);
    assert_eq!(result.advisories[0].rule, "build-metadata");
    assert!(result.advisories[0].message.contains("build_context.go_version"));
}

#[test]
fn test_hygiene_policy_ignores_metadata_free_inventory() {
    let engine =
        PolicyEngine::from_path(&fixture_path("policy/hygiene.yaml")).expect("engine");
    let result = engine
        .validate(&fixture_path("cyclonedx/base.cdx.json"))
        .expect("validate");

    // No build metadata: supply-chain and security checks find nothing;
    // only the completeness rules fire (warning + info), which don't gate.
    // core-deps misses both zlib and openssl; build-metadata misses both
    // required properties.
    assert!(result.passed);
    assert!(result.violations.is_empty());
    assert_eq!(result.warnings.len(), 2);
    assert!(result.warnings.iter().all(|w| w.rule == "core-deps"));
    assert_eq!(result.advisories.len(), 2);
}

#[test]
fn test_policy_validation_fails_fast() {
    let dir = tempfile::tempdir().expect("tempdir");

    let no_version = dir.path().join("no-version.yaml");
    std::fs::write(
        &no_version,
        "rules:\n  - name: r\n    type: license\n    severity: error\n",
    )
    .expect("write");
    let err = PolicyEngine::from_path(&no_version).unwrap_err();
    assert!(err.to_string().contains("version is required"));

    let no_rules = dir.path().join("no-rules.yaml");
    std::fs::write(&no_rules, "version: \"1.0\"\nrules: []\n").expect("write");
    let err = PolicyEngine::from_path(&no_rules).unwrap_err();
    assert!(err.to_string().contains("at least one rule is required"));

    let bad_type = dir.path().join("bad-type.yaml");
    std::fs::write(
        &bad_type,
        "version: \"1.0\"\nrules:\n  - name: r\n    type: voodoo\n    severity: error\n",
    )
    .expect("write");
    let err = PolicyEngine::from_path(&bad_type).unwrap_err();
    assert!(matches!(err, SbomGuardError::Validation(_)));
    assert!(err.to_string().contains("invalid type"));
}

#[test]
fn test_missing_policy_file_is_not_found() {
    let err = PolicyEngine::from_path(&fixture_path("policy/absent.yaml")).unwrap_err();
    assert!(matches!(err, SbomGuardError::NotFound { .. }));
}

#[test]
fn test_missing_inventory_is_error_not_failure() {
    let engine =
        PolicyEngine::from_path(&fixture_path("policy/no-gpl.yaml")).expect("engine");
    let err = engine
        .validate(&fixture_path("cyclonedx/absent.json"))
        .unwrap_err();
    assert!(matches!(err, SbomGuardError::NotFound { .. }));
}
