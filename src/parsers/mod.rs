//! SBOM document parsing.
//!
//! Only the CycloneDX-style JSON shape is supported: a top-level `bomFormat`
//! and `specVersion` plus a `components[]` array. Parsing is best-effort —
//! unknown fields are ignored and missing fields default to empty values;
//! only unreadable files and invalid JSON are errors.

mod cyclonedx;

pub use cyclonedx::{parse_document, parse_document_str, parse_inventory, parse_inventory_str};
