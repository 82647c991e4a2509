//! **SBOM diff, drift detection, and policy validation.**
//!
//! `sbom-guard` compares two point-in-time inventories of software
//! components (CycloneDX-style SBOMs) and judges whether the differences
//! between them are acceptable according to operator-defined rules. It
//! provides three stacked capabilities sharing one data model:
//!
//! - **Diff engine** ([`diff`]): a deterministic delta between two
//!   inventories — added, removed, modified, unchanged — with version- and
//!   license-change sub-classification.
//! - **Drift detector** ([`drift`]): re-uses the diff engine to compare a
//!   live inventory against a previously saved, named baseline
//!   ([`baseline`]), classifying unexpected changes as violations with
//!   severities.
//! - **Policy engine** ([`policy`]): evaluates a declarative YAML rule set
//!   (license restrictions, supply-chain hygiene, build-security posture,
//!   completeness requirements) against a single inventory.
//!
//! ## Diffing two inventories
//!
//! ```no_run
//! use std::path::Path;
//! use sbom_guard::diff::{diff_paths, DiffOptions};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let result = diff_paths(
//!         Path::new("old-sbom.json"),
//!         Path::new("new-sbom.json"),
//!         DiffOptions::default(),
//!     )?;
//!
//!     println!("Components added: {}", result.summary.added_count);
//!     for added in &result.added {
//!         println!("  + {} {}", added.full_name(),
//!             added.version.as_deref().unwrap_or(""));
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Detecting drift against a baseline
//!
//! ```no_run
//! use std::path::Path;
//! use sbom_guard::baseline::BaselineStore;
//! use sbom_guard::drift::{DriftDetector, DriftOptions};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = BaselineStore::new(".sbom-baselines")?;
//!     store.save(Path::new("sbom.json"), "release-1.2", "v1.2.0", "")?;
//!
//!     let detector = DriftDetector::with_store(store);
//!     let result = detector.detect_drift(
//!         Path::new("sbom.json"),
//!         "release-1.2",
//!         &DriftOptions::default(),
//!     )?;
//!     assert!(!result.has_drift);
//!     Ok(())
//! }
//! ```
//!
//! ## Validating against a policy
//!
//! ```no_run
//! use std::path::Path;
//! use sbom_guard::policy::PolicyEngine;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = PolicyEngine::from_path(Path::new("policy.yaml"))?;
//!     let result = engine.validate(Path::new("sbom.json"))?;
//!
//!     if !result.passed {
//!         for violation in &result.violations {
//!             println!("[{}] {}: {}", violation.severity,
//!                 violation.rule, violation.message);
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! A failed check (`passed == false`, `has_drift == true`) is a successful
//! evaluation, not an error: [`error::SbomGuardError`] is reserved for
//! tooling failures such as unreadable files, malformed JSON/YAML, and
//! invalid policy schemas.

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    // Doc completeness: # Errors / # Panics sections are aspirational
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    // Option structs legitimately use many bools for toggle flags
    clippy::struct_excessive_bools,
    clippy::fn_params_excessive_bools,
    // Variable names like `old`/`new` are clear in context
    clippy::similar_names
)]

pub mod baseline;
pub mod cli;
pub mod diff;
pub mod drift;
pub mod error;
pub mod model;
pub mod parsers;
pub mod policy;
pub mod utils;

// Re-export main types for convenience
pub use baseline::{Baseline, BaselineMeta, BaselineStore};
pub use diff::{diff_paths, DiffEngine, DiffOptions, DiffResult};
pub use drift::{DriftDetector, DriftOptions, DriftResult, DriftViolation};
pub use error::{Result, SbomGuardError};
pub use model::{Component, ComponentKey, Document, Inventory};
pub use parsers::{parse_document, parse_inventory};
pub use policy::{PolicyConfig, PolicyEngine, PolicyResult, PolicyViolation};
