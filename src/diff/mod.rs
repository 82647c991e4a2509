//! Inventory diff engine.
//!
//! Computes a deterministic delta between two normalized inventories:
//! every component key present in either input lands in exactly one of the
//! added/removed/modified/unchanged result lists, and all lists are sorted
//! by `(group, name)` for stable output.

mod engine;
mod result;

pub use engine::{diff_paths, DiffEngine, DiffOptions};
pub use result::{
    ChangeType, ComparisonMeta, ComponentDiff, DiffResult, DiffSummary, SbomMeta, VersionSeverity,
};
