//! Intermediate representation for parsed SBOM inventories.
//!
//! Two views of the same document serve the two halves of the crate:
//!
//! - [`Inventory`] is the minimal normalized component list consumed by the
//!   diff engine and drift detector. One component, one resolved license,
//!   one identity key.
//! - [`Document`] is the typed CycloneDX-shaped tree consumed by the policy
//!   engine. It keeps every license entry and the vendor property bags
//!   (`metadata.properties`, per-component `properties`) that policy rules
//!   inspect.

mod document;
mod inventory;

pub use document::*;
pub use inventory::*;
