//! Drift detection options and allow-list pattern matching.

/// Configures drift detection behavior. Everything defaults to deny.
#[derive(Debug, Clone, Default)]
pub struct DriftOptions {
    /// Component name patterns allowed to be added
    pub allowed_additions: Vec<String>,
    /// Component name patterns allowed to be removed
    pub allowed_removals: Vec<String>,
    /// Whether version upgrades are allowed
    pub allow_upgrades: bool,
    /// Whether version downgrades are allowed (usually false)
    pub allow_downgrades: bool,
    /// Whether license changes are allowed
    pub allow_license_changes: bool,
    /// Fail on any drift, even changes the other options allow
    pub strict_mode: bool,
}

/// Check whether a component's full name matches any allowed pattern.
///
/// An empty pattern list allows nothing.
pub(crate) fn is_allowed(full_name: &str, patterns: &[String]) -> bool {
    patterns.iter().any(|p| match_pattern(p, full_name))
}

/// Limited wildcard matching, deliberately NOT a general glob.
///
/// Exactly four wildcard forms are supported: `*` (match-all), `*suffix`,
/// `prefix*`, and `*substr*`; anything else is exact string equality.
pub(crate) fn match_pattern(pattern: &str, s: &str) -> bool {
    if pattern == "*" {
        return true;
    }

    if let Some(inner) = pattern
        .strip_prefix('*')
        .and_then(|p| p.strip_suffix('*'))
    {
        return s.contains(inner);
    }
    if let Some(suffix) = pattern.strip_prefix('*') {
        return s.ends_with(suffix);
    }
    if let Some(prefix) = pattern.strip_suffix('*') {
        return s.starts_with(prefix);
    }

    pattern == s
}
