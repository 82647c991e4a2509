//! Version comparison utilities.

use semver::Version;
use std::cmp::Ordering;

/// Compare two version strings.
///
/// Both sides parsing as semver get a semantic comparison, so multi-digit
/// segments order correctly (`9.0.0` < `10.0.0`). When either side is not
/// valid semver, the comparison falls back to lexicographic byte order —
/// a deliberate, deterministic fallback for free-form version strings, not
/// an attempt at ecosystem-specific ordering.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    if let (Ok(ver_a), Ok(ver_b)) = (Version::parse(a), Version::parse(b)) {
        return ver_a.cmp(&ver_b);
    }

    a.cmp(b)
}
