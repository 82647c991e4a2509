//! CycloneDX JSON document parser.

use crate::error::{ParseErrorKind, Result, SbomGuardError};
use crate::model::{
    Component, DocComponent, Document, DocumentMetadata, Inventory, LicenseEntry, Property,
};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

// Raw serde structures mirroring the CycloneDX JSON shape. Only the fields
// the core consumes are declared; everything else is ignored.

#[derive(Debug, Deserialize)]
struct CdxBom {
    #[serde(rename = "bomFormat", default)]
    bom_format: String,
    #[serde(rename = "specVersion", default)]
    spec_version: String,
    #[serde(default)]
    metadata: Option<CdxMetadata>,
    #[serde(default)]
    components: Vec<CdxComponent>,
}

#[derive(Debug, Deserialize)]
struct CdxMetadata {
    #[serde(default)]
    properties: Vec<CdxProperty>,
}

#[derive(Debug, Deserialize)]
struct CdxComponent {
    #[serde(default)]
    name: String,
    #[serde(default)]
    group: String,
    #[serde(default)]
    version: String,
    #[serde(default)]
    purl: String,
    #[serde(default)]
    licenses: Vec<CdxLicenseChoice>,
    #[serde(default)]
    properties: Vec<CdxProperty>,
}

#[derive(Debug, Deserialize)]
struct CdxLicenseChoice {
    #[serde(default)]
    license: Option<CdxLicense>,
}

#[derive(Debug, Deserialize)]
struct CdxLicense {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct CdxProperty {
    name: String,
    #[serde(default)]
    value: String,
}

/// Parse an SBOM file into the typed [`Document`] (policy-engine view).
pub fn parse_document(path: &Path) -> Result<Document> {
    let content =
        std::fs::read_to_string(path).map_err(|e| SbomGuardError::from_read(path, e))?;
    parse_document_str(&content, &path.display().to_string())
}

/// Parse SBOM content into the typed [`Document`].
pub fn parse_document_str(content: &str, origin: &str) -> Result<Document> {
    let bom: CdxBom = serde_json::from_str(content).map_err(|e| {
        SbomGuardError::parse(
            format!("SBOM at {origin}"),
            ParseErrorKind::InvalidJson(e.to_string()),
        )
    })?;

    Ok(convert_document(bom))
}

/// Parse an SBOM file into a normalized [`Inventory`] (diff-engine view).
pub fn parse_inventory(path: &Path) -> Result<Inventory> {
    let document = parse_document(path)?;
    Ok(normalize(&document, &path.display().to_string()))
}

/// Parse SBOM content into a normalized [`Inventory`].
pub fn parse_inventory_str(content: &str, origin: &str) -> Result<Inventory> {
    let document = parse_document_str(content, origin)?;
    Ok(normalize(&document, origin))
}

fn convert_document(bom: CdxBom) -> Document {
    let metadata = DocumentMetadata {
        properties: bom
            .metadata
            .map(|m| m.properties.into_iter().map(convert_property).collect())
            .unwrap_or_default(),
    };

    let components = bom
        .components
        .into_iter()
        .map(|c| DocComponent {
            name: c.name,
            group: c.group,
            version: c.version,
            purl: c.purl,
            licenses: c
                .licenses
                .into_iter()
                .filter_map(|choice| choice.license)
                .map(|l| LicenseEntry {
                    id: l.id,
                    name: l.name,
                })
                .collect(),
            properties: c.properties.into_iter().map(convert_property).collect(),
        })
        .collect();

    Document {
        bom_format: bom.bom_format,
        spec_version: bom.spec_version,
        metadata,
        components,
    }
}

fn convert_property(p: CdxProperty) -> Property {
    Property {
        name: p.name,
        value: p.value,
    }
}

/// Normalize the typed document into the flat inventory used for diffing.
///
/// License resolution order: the FIRST license entry's id if non-empty, else
/// that entry's name, else empty (component treated as unlicensed).
/// Duplicate component keys are not rejected — the last-parsed entry wins at
/// map-building time — but each duplicate is counted and surfaced as one
/// warning per document.
fn normalize(document: &Document, origin: &str) -> Inventory {
    let mut seen: HashSet<_> = HashSet::with_capacity(document.components.len());
    let mut duplicates = 0usize;

    let components: Vec<Component> = document
        .components
        .iter()
        .map(|c| {
            let license = c
                .licenses
                .first()
                .map(|entry| entry.resolved().to_string())
                .unwrap_or_default();

            let comp = Component {
                name: c.name.clone(),
                group: c.group.clone(),
                version: c.version.clone(),
                license,
                purl: c.purl.clone(),
            };
            if !seen.insert(comp.key()) {
                duplicates += 1;
            }
            comp
        })
        .collect();

    if duplicates > 0 {
        tracing::warn!(
            duplicates,
            origin,
            "Duplicate component keys in inventory; last-parsed entry wins"
        );
    }

    Inventory::from_components(
        document.bom_format.clone(),
        document.spec_version.clone(),
        components,
    )
}
