//! Policy rule evaluation against a parsed inventory document.

use super::config::{PolicyConfig, PolicyRule, RuleKind, RuleSeverity};
use crate::error::{Result, SbomGuardError};
use crate::model::Document;
use crate::parsers::parse_document;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt::Write as _;
use std::path::Path;

// Build-metadata property names inspected by supply-chain and security
// checks. Generators namespace these under `module_context.` (dependency
// resolution facts) and `build_context.` (build environment facts).
const REPLACES_PREFIX: &str = "module_context.replaces";
const VENDORED_PROPERTY: &str = "module_context.vendored";
const CGO_ENABLED_PROPERTY: &str = "build_context.cgo_enabled";

/// A single failed policy check.
#[derive(Debug, Clone, Serialize)]
pub struct PolicyViolation {
    pub rule: String,
    pub severity: RuleSeverity,
    pub message: String,
    pub component: String,
    pub remediation: String,
}

/// The outcome of policy validation.
#[derive(Debug, Clone, Serialize)]
#[must_use]
pub struct PolicyResult {
    pub passed: bool,
    /// Error-severity violations; any entry here means `passed == false`
    pub violations: Vec<PolicyViolation>,
    /// Warning-severity violations; fail the result only with
    /// `fail_on_warning`
    pub warnings: Vec<PolicyViolation>,
    /// Info-severity rows: purely advisory, never affect `passed`
    pub advisories: Vec<PolicyViolation>,
    pub summary: String,
}

/// Validates inventories against a policy document.
#[derive(Debug, Clone)]
pub struct PolicyEngine {
    config: PolicyConfig,
}

impl PolicyEngine {
    /// Build an engine from a policy YAML file.
    ///
    /// The document is validated eagerly; schema problems fail here,
    /// before any SBOM is touched.
    pub fn from_path(policy_path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(policy_path)
            .map_err(|e| SbomGuardError::from_read(policy_path, e))?;
        let config = PolicyConfig::from_yaml(&content, &policy_path.display().to_string())?;
        Ok(Self { config })
    }

    /// Build an engine from an already-validated config.
    #[must_use]
    pub const fn new(config: PolicyConfig) -> Self {
        Self { config }
    }

    /// The validated policy document.
    #[must_use]
    pub const fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Run every rule against the inventory at `inventory_path`.
    pub fn validate(&self, inventory_path: &Path) -> Result<PolicyResult> {
        let document = parse_document(inventory_path)?;
        Ok(self.validate_document(&document))
    }

    /// Run every rule against an already-parsed document.
    pub fn validate_document(&self, document: &Document) -> PolicyResult {
        let mut result = PolicyResult {
            passed: true,
            violations: Vec::new(),
            warnings: Vec::new(),
            advisories: Vec::new(),
            summary: String::new(),
        };

        for rule in &self.config.rules {
            for violation in run_rule(rule, document) {
                match violation.severity {
                    RuleSeverity::Error => {
                        result.passed = false;
                        result.violations.push(violation);
                    }
                    RuleSeverity::Warning => {
                        if self.config.options.fail_on_warning {
                            result.passed = false;
                        }
                        result.warnings.push(violation);
                    }
                    RuleSeverity::Info => result.advisories.push(violation),
                }
            }
        }

        result.summary = generate_summary(&result);
        result
    }
}

/// Execute a single rule, returning its violations (possibly empty).
fn run_rule(rule: &PolicyRule, document: &Document) -> Vec<PolicyViolation> {
    match rule.kind {
        RuleKind::License => check_license(rule, document),
        RuleKind::SupplyChain => check_supply_chain(rule, document),
        RuleKind::Security => check_security(rule, document),
        RuleKind::Completeness => check_completeness(rule, document),
        RuleKind::Custom => Vec::new(),
    }
}

fn violation(rule: &PolicyRule, message: String, component: &str, remediation: &str) -> PolicyViolation {
    PolicyViolation {
        rule: rule.name.clone(),
        severity: rule.severity,
        message,
        component: component.to_string(),
        remediation: remediation.to_string(),
    }
}

/// Flag components whose declared license id appears in the blocked list.
fn check_license(rule: &PolicyRule, document: &Document) -> Vec<PolicyViolation> {
    let mut violations = Vec::new();

    for comp in &document.components {
        for entry in &comp.licenses {
            let license = entry.resolved();
            if !license.is_empty() && rule.blocked.iter().any(|b| b == license) {
                violations.push(violation(
                    rule,
                    format!("Blocked license detected: {license}"),
                    &comp.name,
                    &format!("Replace {} with an alternative not licensed under {license}", comp.name),
                ));
            }
        }
    }

    violations
}

fn check_supply_chain(rule: &PolicyRule, document: &Document) -> Vec<PolicyViolation> {
    let mut violations = Vec::new();

    match rule.check.as_deref() {
        Some("replace-directives") => {
            let blocks_local_path = rule.blocked.iter().any(|b| b == "local-path");
            for prop in document.metadata_properties_with_prefix(REPLACES_PREFIX) {
                if blocks_local_path && prop.value.contains("local-path") {
                    violations.push(violation(
                        rule,
                        "Local path replace directive detected".to_string(),
                        "module dependencies",
                        "Replace local dependencies with versioned module references",
                    ));
                }
            }
        }
        Some("vendoring-status") => {
            let blocks_vendored = rule.blocked.iter().any(|b| b == "vendored");
            if blocks_vendored {
                if let Some(prop) = document.metadata_property(VENDORED_PROPERTY) {
                    if prop.value == "true" {
                        violations.push(violation(
                            rule,
                            "Vendored dependencies detected".to_string(),
                            "vendor directory",
                            "Remove vendored sources and resolve dependencies from the registry",
                        ));
                    }
                }
            }
        }
        other => {
            tracing::debug!(rule = %rule.name, check = ?other, "Unrecognized supply-chain check");
        }
    }

    violations
}

fn check_security(rule: &PolicyRule, document: &Document) -> Vec<PolicyViolation> {
    let mut violations = Vec::new();

    match rule.check.as_deref() {
        Some("retracted-versions") => {
            for comp in &document.components {
                let retracted = comp
                    .properties
                    .iter()
                    .any(|p| p.name.contains("retracted") && p.value == "true");
                if retracted {
                    violations.push(violation(
                        rule,
                        "Retracted version in use".to_string(),
                        &comp.name,
                        "Update to a non-retracted version",
                    ));
                }
            }
        }
        Some("cgo-disabled") => {
            let requires_disabled = rule.required.iter().any(|r| r == "false");
            if requires_disabled {
                if let Some(prop) = document.metadata_property(CGO_ENABLED_PROPERTY) {
                    if prop.value == "true" {
                        violations.push(violation(
                            rule,
                            "CGO is enabled".to_string(),
                            "build configuration",
                            "Build with CGO_ENABLED=0 for better security",
                        ));
                    }
                }
            }
        }
        other => {
            tracing::debug!(rule = %rule.name, check = ?other, "Unrecognized security check");
        }
    }

    violations
}

fn check_completeness(rule: &PolicyRule, document: &Document) -> Vec<PolicyViolation> {
    let mut violations = Vec::new();

    match rule.check.as_deref() {
        Some("required-components") => {
            let names: HashSet<&str> = document
                .components
                .iter()
                .map(|c| c.name.as_str())
                .collect();
            for required in &rule.required {
                if !names.contains(required.as_str()) {
                    violations.push(violation(
                        rule,
                        format!("Required component missing: {required}"),
                        required,
                        "Ensure the SBOM includes all required components",
                    ));
                }
            }
        }
        Some("required-metadata") => {
            let names: HashSet<&str> = document
                .metadata
                .properties
                .iter()
                .map(|p| p.name.as_str())
                .collect();
            for required in &rule.required {
                if !names.contains(required.as_str()) {
                    violations.push(violation(
                        rule,
                        format!("Required metadata missing: {required}"),
                        "metadata",
                        "Regenerate the SBOM with build metadata enabled",
                    ));
                }
            }
        }
        other => {
            tracing::debug!(rule = %rule.name, check = ?other, "Unrecognized completeness check");
        }
    }

    violations
}

fn generate_summary(result: &PolicyResult) -> String {
    let mut summary = String::new();

    if result.passed {
        summary.push_str("All policy checks passed\n");
    } else {
        summary.push_str("Policy validation failed\n");
    }

    for (label, rows) in [
        ("violations", &result.violations),
        ("warnings", &result.warnings),
        ("advisories", &result.advisories),
    ] {
        if rows.is_empty() {
            continue;
        }
        let _ = write!(summary, "\n{} {label} found:\n", rows.len());
        for row in rows {
            let _ = write!(summary, "  - [{}] {}: {}\n", row.severity, row.rule, row.message);
        }
    }

    summary
}
