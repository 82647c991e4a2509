//! Typed document model consumed by the policy engine.
//!
//! Policy rules inspect parts of the SBOM that the normalized
//! [`Inventory`](super::Inventory) deliberately drops: every declared
//! license entry, per-component vendor properties, and the document-level
//! `metadata.properties` bag carrying build metadata. Rather than an
//! untyped JSON map, those live here as explicit name/value pairs.

use serde::{Deserialize, Serialize};

/// A single name/value extension property.
///
/// CycloneDX properties are ordered and may repeat names; both are
/// preserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

/// One declared license entry on a component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseEntry {
    /// SPDX license id, when declared
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Free-form license name, when no id is declared
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
}

impl LicenseEntry {
    /// Resolve to a single identifier: the id if non-empty, else the name.
    #[must_use]
    pub fn resolved(&self) -> &str {
        if self.id.is_empty() {
            &self.name
        } else {
            &self.id
        }
    }
}

/// Document-level metadata retained for policy evaluation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Build/environment properties attached by the SBOM generator
    #[serde(default)]
    pub properties: Vec<Property>,
}

/// A component as seen by the policy engine: identity plus the license
/// entries and property bag that rules inspect.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocComponent {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub group: String,
    #[serde(default)]
    pub version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub purl: String,
    /// All declared license entries, in document order
    #[serde(default)]
    pub licenses: Vec<LicenseEntry>,
    /// Per-component vendor properties
    #[serde(default)]
    pub properties: Vec<Property>,
}

/// The parsed SBOM document, policy-engine view.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    /// Format marker from the top-level `bomFormat` field
    pub bom_format: String,
    /// Specification version
    pub spec_version: String,
    pub metadata: DocumentMetadata,
    pub components: Vec<DocComponent>,
}

impl Document {
    /// Find a metadata property by exact name
    #[must_use]
    pub fn metadata_property(&self, name: &str) -> Option<&Property> {
        self.metadata.properties.iter().find(|p| p.name == name)
    }

    /// Iterate metadata properties whose name starts with `prefix`
    pub fn metadata_properties_with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = &'a Property> {
        self.metadata
            .properties
            .iter()
            .filter(move |p| p.name.starts_with(prefix))
    }
}
