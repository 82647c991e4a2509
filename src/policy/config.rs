//! Policy document schema and eager validation.

use crate::error::{ParseErrorKind, Result, SbomGuardError};
use serde::{Deserialize, Serialize};

/// Rule category, drawn from a closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleKind {
    SupplyChain,
    Security,
    Completeness,
    License,
    /// Reserved for future expression-based rules; evaluates to no violations
    Custom,
}

impl RuleKind {
    fn from_str(s: &str) -> Option<Self> {
        match s {
            "supply-chain" => Some(Self::SupplyChain),
            "security" => Some(Self::Security),
            "completeness" => Some(Self::Completeness),
            "license" => Some(Self::License),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }
}

/// Rule severity, drawn from a closed set.
///
/// `Info` rows are purely advisory: they are collected and reported but
/// never affect the overall pass/fail outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleSeverity {
    Error,
    Warning,
    Info,
}

impl RuleSeverity {
    fn from_str(s: &str) -> Option<Self> {
        match s {
            "error" => Some(Self::Error),
            "warning" => Some(Self::Warning),
            "info" => Some(Self::Info),
            _ => None,
        }
    }
}

impl std::fmt::Display for RuleSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        };
        write!(f, "{label}")
    }
}

/// A validated policy rule.
#[derive(Debug, Clone)]
pub struct PolicyRule {
    pub name: String,
    pub kind: RuleKind,
    pub severity: RuleSeverity,
    pub description: String,
    /// Values a rule rejects (license ids, feature markers)
    pub blocked: Vec<String>,
    /// Values a rule demands (component names, property names)
    pub required: Vec<String>,
    /// Selects the specific sub-check within a rule kind
    pub check: Option<String>,
}

/// Options controlling how policy results gate the overall outcome.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PolicyOptions {
    /// Kept for config compatibility; error-severity violations always fail
    /// the result regardless of this flag
    #[serde(default)]
    pub fail_on_error: bool,
    #[serde(default)]
    pub fail_on_warning: bool,
    #[serde(default)]
    pub verbose: bool,
}

/// A validated policy document.
#[derive(Debug, Clone)]
pub struct PolicyConfig {
    pub version: String,
    pub rules: Vec<PolicyRule>,
    pub options: PolicyOptions,
}

// Raw YAML shape; `type` and `severity` arrive as free strings and are
// checked against the closed sets during validation.

#[derive(Debug, Deserialize)]
struct RawPolicyConfig {
    #[serde(default)]
    version: String,
    #[serde(default)]
    rules: Vec<RawPolicyRule>,
    #[serde(default)]
    options: PolicyOptions,
}

#[derive(Debug, Deserialize)]
struct RawPolicyRule {
    #[serde(default)]
    name: String,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    severity: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    blocked: Vec<String>,
    #[serde(default)]
    required: Vec<String>,
    #[serde(default)]
    check: Option<String>,
}

impl PolicyConfig {
    /// Parse and validate a policy document.
    ///
    /// Validation is eager and fails fast: the first schema problem is
    /// returned as a `Validation` error before any SBOM is touched.
    pub fn from_yaml(content: &str, origin: &str) -> Result<Self> {
        let raw: RawPolicyConfig = serde_yaml::from_str(content).map_err(|e| {
            SbomGuardError::parse(
                format!("policy at {origin}"),
                ParseErrorKind::InvalidYaml(e.to_string()),
            )
        })?;

        if raw.version.is_empty() {
            return Err(SbomGuardError::validation("policy version is required"));
        }
        if raw.rules.is_empty() {
            return Err(SbomGuardError::validation("at least one rule is required"));
        }

        let mut rules = Vec::with_capacity(raw.rules.len());
        for (i, rule) in raw.rules.into_iter().enumerate() {
            if rule.name.is_empty() {
                return Err(SbomGuardError::validation(format!(
                    "rule {i}: name is required"
                )));
            }
            if rule.kind.is_empty() {
                return Err(SbomGuardError::validation(format!(
                    "rule {:?}: type is required",
                    rule.name
                )));
            }
            let Some(kind) = RuleKind::from_str(&rule.kind) else {
                return Err(SbomGuardError::validation(format!(
                    "rule {:?}: invalid type {:?}",
                    rule.name, rule.kind
                )));
            };
            if rule.severity.is_empty() {
                return Err(SbomGuardError::validation(format!(
                    "rule {:?}: severity is required",
                    rule.name
                )));
            }
            let Some(severity) = RuleSeverity::from_str(&rule.severity) else {
                return Err(SbomGuardError::validation(format!(
                    "rule {:?}: invalid severity {:?}",
                    rule.name, rule.severity
                )));
            };

            rules.push(PolicyRule {
                name: rule.name,
                kind,
                severity,
                description: rule.description,
                blocked: rule.blocked,
                required: rule.required,
                check: rule.check,
            });
        }

        Ok(Self {
            version: raw.version,
            rules,
            options: raw.options,
        })
    }
}
