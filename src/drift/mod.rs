//! Drift detection against stored baselines.
//!
//! Composes the baseline store and the diff engine: the stored baseline is
//! materialized as an in-memory inventory and diffed against the current
//! one, then allow-list policy classifies the remaining changes into
//! violations. `has_drift` tracks violations, not raw diff non-emptiness —
//! a diff where every change was allow-listed is not drift.

mod detector;
mod options;

pub use detector::{
    DriftDetector, DriftResult, DriftSeverity, DriftSummary, DriftViolation, DriftViolationKind,
    OverallSeverity,
};
pub use options::DriftOptions;
