//! Normalized inventory structures used by the diff engine.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

/// A single inventoried package/module.
///
/// Versions are free-form strings and NOT guaranteed to be valid semver;
/// `license` holds the first resolved license id or name (may be empty for
/// unlicensed components); `purl` is an opaque package identifier passed
/// through unmodified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub group: String,
    #[serde(default)]
    pub version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub license: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub purl: String,
}

impl Component {
    /// Identity key used to match this component across two inventories
    #[must_use]
    pub fn key(&self) -> ComponentKey {
        ComponentKey::new(&self.group, &self.name)
    }

    /// Full display name: `group/name` when a group is present, else `name`
    #[must_use]
    pub fn full_name(&self) -> String {
        if self.group.is_empty() {
            self.name.clone()
        } else {
            format!("{}/{}", self.group, self.name)
        }
    }
}

/// Identity used to match the "same" component across two inventories.
///
/// Formatted as `group/name` when the component has a group, else `name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentKey(String);

impl ComponentKey {
    /// Build a key from a group (possibly empty) and a name
    #[must_use]
    pub fn new(group: &str, name: &str) -> Self {
        if group.is_empty() {
            Self(name.to_string())
        } else {
            Self(format!("{group}/{name}"))
        }
    }

    /// Get the key as a string slice
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ComponentKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A point-in-time inventory of software components.
///
/// Immutable once loaded; a fresh `Inventory` is parsed per comparison call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    /// Document format marker (e.g. "CycloneDX"), informational
    pub format: String,
    /// Format specification version, informational
    pub spec_version: String,
    /// Flat component list in document order
    pub components: Vec<Component>,
    /// Content hash for quick equality checks
    #[serde(skip)]
    pub content_hash: u64,
}

impl Inventory {
    /// Create an inventory from a component list, computing its content hash.
    ///
    /// Used by drift detection to materialize a stored baseline as an
    /// in-memory inventory without a serialize/parse round trip.
    #[must_use]
    pub fn from_components(
        format: impl Into<String>,
        spec_version: impl Into<String>,
        components: Vec<Component>,
    ) -> Self {
        let mut inventory = Self {
            format: format.into(),
            spec_version: spec_version.into(),
            components,
            content_hash: 0,
        };
        inventory.calculate_content_hash();
        inventory
    }

    /// Get total component count
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Build a key → component map for diffing.
    ///
    /// Duplicate keys resolve last-parsed-wins; the loader has already
    /// surfaced duplicates through the diagnostics channel by this point.
    #[must_use]
    pub fn component_map(&self) -> IndexMap<ComponentKey, &Component> {
        let mut map = IndexMap::with_capacity(self.components.len());
        for comp in &self.components {
            map.insert(comp.key(), comp);
        }
        map
    }

    /// Calculate and update the content hash.
    ///
    /// Hashed over the key-sorted component tuple stream so that two
    /// inventories with the same components in different document order
    /// still compare equal.
    pub fn calculate_content_hash(&mut self) {
        let mut keys: Vec<_> = self.components.iter().map(|c| (c.key(), c)).collect();
        keys.sort_by(|a, b| a.0.cmp(&b.0));

        let mut hasher_input = Vec::new();
        for (key, comp) in keys {
            hasher_input.extend(key.value().as_bytes());
            hasher_input.push(0);
            hasher_input.extend(comp.version.as_bytes());
            hasher_input.push(0);
            hasher_input.extend(comp.license.as_bytes());
            hasher_input.push(0);
            hasher_input.extend(comp.purl.as_bytes());
            hasher_input.push(0);
        }

        self.content_hash = xxh3_64(&hasher_input);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component(group: &str, name: &str, version: &str) -> Component {
        Component {
            name: name.to_string(),
            group: group.to_string(),
            version: version.to_string(),
            ..Component::default()
        }
    }

    #[test]
    fn test_component_key_formatting() {
        assert_eq!(ComponentKey::new("", "lodash").value(), "lodash");
        assert_eq!(
            ComponentKey::new("org.apache", "commons-io").value(),
            "org.apache/commons-io"
        );
    }

    #[test]
    fn test_full_name_matches_key() {
        let comp = component("org.apache", "commons-io", "2.11.0");
        assert_eq!(comp.full_name(), comp.key().value());
    }

    #[test]
    fn test_component_map_last_wins() {
        let inventory = Inventory::from_components(
            "CycloneDX",
            "1.5",
            vec![
                component("", "pkg", "1.0.0"),
                component("", "pkg", "2.0.0"),
            ],
        );
        let map = inventory.component_map();
        assert_eq!(map.len(), 1);
        assert_eq!(map[&ComponentKey::new("", "pkg")].version, "2.0.0");
    }

    #[test]
    fn test_content_hash_ignores_document_order() {
        let a = Inventory::from_components(
            "CycloneDX",
            "1.5",
            vec![component("", "a", "1.0.0"), component("", "b", "2.0.0")],
        );
        let b = Inventory::from_components(
            "CycloneDX",
            "1.5",
            vec![component("", "b", "2.0.0"), component("", "a", "1.0.0")],
        );
        assert_eq!(a.content_hash, b.content_hash);

        let c = Inventory::from_components(
            "CycloneDX",
            "1.5",
            vec![component("", "a", "1.0.1"), component("", "b", "2.0.0")],
        );
        assert_ne!(a.content_hash, c.content_hash);
    }
}
