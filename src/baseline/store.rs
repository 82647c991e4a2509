//! Baseline persistence: save, load, list, delete.

use crate::error::{ParseErrorKind, Result, SbomGuardError};
use crate::model::Component;
use crate::parsers::parse_inventory;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name used when the caller does not supply one.
pub const DEFAULT_BASELINE_NAME: &str = "default";

const BASELINE_SUFFIX: &str = ".baseline.json";

/// Metadata describing a stored baseline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BaselineMeta {
    /// Source inventory path at save time; replaced by the baseline file
    /// path in listings
    pub path: String,
    pub created_at: DateTime<Utc>,
    /// Free-form label (e.g. a release tag)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
    pub component_count: usize,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

/// A stored baseline: metadata plus the snapshotted component list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Baseline {
    #[serde(flatten)]
    pub meta: BaselineMeta,
    pub components: Vec<Component>,
}

/// CRUD over named baseline files in a single directory.
#[derive(Debug, Clone)]
pub struct BaselineStore {
    dir: PathBuf,
}

impl BaselineStore {
    /// Open a store rooted at `dir`, creating the directory if missing.
    ///
    /// An empty directory name is a validation error.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if dir.as_os_str().is_empty() {
            return Err(SbomGuardError::validation(
                "baseline directory cannot be empty",
            ));
        }

        std::fs::create_dir_all(&dir).map_err(|e| SbomGuardError::io(&dir, e))?;

        Ok(Self { dir })
    }

    /// Directory this store reads and writes.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path the baseline `name` is (or would be) stored at.
    ///
    /// An empty name resolves to [`DEFAULT_BASELINE_NAME`].
    #[must_use]
    pub fn baseline_path(&self, name: &str) -> PathBuf {
        let name = if name.is_empty() {
            DEFAULT_BASELINE_NAME
        } else {
            name
        };
        self.dir.join(format!("{name}{BASELINE_SUFFIX}"))
    }

    /// Save the inventory at `inventory_path` as the baseline `name`,
    /// silently overwriting any existing baseline of that name.
    pub fn save(
        &self,
        inventory_path: &Path,
        name: &str,
        version: &str,
        description: &str,
    ) -> Result<()> {
        let inventory = parse_inventory(inventory_path)?;

        let baseline = Baseline {
            meta: BaselineMeta {
                path: inventory_path.display().to_string(),
                created_at: Utc::now(),
                version: version.to_string(),
                component_count: inventory.component_count(),
                description: description.to_string(),
            },
            components: inventory.components,
        };

        let file = self.baseline_path(name);
        let data = serde_json::to_string_pretty(&baseline)?;
        std::fs::write(&file, data).map_err(|e| SbomGuardError::io(&file, e))?;

        tracing::debug!(baseline = %file.display(), "Baseline saved");
        Ok(())
    }

    /// Load the baseline `name`.
    pub fn load(&self, name: &str) -> Result<Baseline> {
        let file = self.baseline_path(name);
        let data =
            std::fs::read_to_string(&file).map_err(|e| SbomGuardError::from_read(&file, e))?;

        serde_json::from_str(&data).map_err(|e| {
            SbomGuardError::parse(
                format!("baseline at {}", file.display()),
                ParseErrorKind::InvalidJson(e.to_string()),
            )
        })
    }

    /// List all stored baselines, sorted by file name.
    ///
    /// Unreadable or unparseable baseline files are skipped (partial-result
    /// semantics) with a warning naming the file; a corrupt baseline does
    /// not fail the whole listing. The returned metadata's `path` is the
    /// baseline file path, not the original inventory path.
    pub fn list(&self) -> Result<Vec<BaselineMeta>> {
        let entries = std::fs::read_dir(&self.dir).map_err(|e| SbomGuardError::io(&self.dir, e))?;

        let mut files: Vec<PathBuf> = entries
            .filter_map(std::result::Result::ok)
            .map(|e| e.path())
            .filter(|p| {
                p.is_file()
                    && p.file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|n| n.ends_with(BASELINE_SUFFIX))
            })
            .collect();
        files.sort();

        let mut baselines = Vec::with_capacity(files.len());
        for file in files {
            let data = match std::fs::read_to_string(&file) {
                Ok(data) => data,
                Err(err) => {
                    tracing::warn!(file = %file.display(), %err, "Skipping unreadable baseline");
                    continue;
                }
            };
            // Unknown fields (the component list) are ignored here; only the
            // metadata header is needed for listings.
            let mut meta: BaselineMeta = match serde_json::from_str(&data) {
                Ok(meta) => meta,
                Err(err) => {
                    tracing::warn!(file = %file.display(), %err, "Skipping corrupt baseline");
                    continue;
                }
            };
            meta.path = file.display().to_string();
            baselines.push(meta);
        }

        Ok(baselines)
    }

    /// Delete the baseline `name`.
    ///
    /// Fails with `NotFound` when no such baseline exists; an empty name is
    /// a validation error (deletion never falls back to the default name).
    pub fn delete(&self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(SbomGuardError::validation("baseline name cannot be empty"));
        }

        let file = self.baseline_path(name);
        std::fs::remove_file(&file).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SbomGuardError::not_found(format!("baseline: {name}"))
            } else {
                SbomGuardError::io(&file, e)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_dir_is_rejected() {
        let err = BaselineStore::new("").unwrap_err();
        assert!(matches!(err, SbomGuardError::Validation(_)));
    }

    #[test]
    fn test_baseline_file_naming() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = BaselineStore::new(dir.path()).expect("store");

        assert!(store
            .baseline_path("release-1.2")
            .ends_with("release-1.2.baseline.json"));
        // Empty name falls back to the default
        assert!(store
            .baseline_path("")
            .ends_with("default.baseline.json"));
    }

    #[test]
    fn test_load_missing_baseline_is_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = BaselineStore::new(dir.path()).expect("store");

        let err = store.load("absent").unwrap_err();
        assert!(matches!(err, SbomGuardError::NotFound { .. }));
    }

    #[test]
    fn test_delete_missing_baseline_is_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = BaselineStore::new(dir.path()).expect("store");

        let err = store.delete("absent").unwrap_err();
        assert!(matches!(err, SbomGuardError::NotFound { .. }));

        let err = store.delete("").unwrap_err();
        assert!(matches!(err, SbomGuardError::Validation(_)));
    }

    #[test]
    fn test_list_skips_corrupt_baselines() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = BaselineStore::new(dir.path()).expect("store");

        let good = Baseline {
            meta: BaselineMeta {
                path: "sbom.json".to_string(),
                created_at: Utc::now(),
                version: "v1".to_string(),
                component_count: 0,
                description: String::new(),
            },
            components: Vec::new(),
        };
        std::fs::write(
            dir.path().join("good.baseline.json"),
            serde_json::to_string(&good).expect("serialize"),
        )
        .expect("write");
        std::fs::write(dir.path().join("bad.baseline.json"), "{not json").expect("write");
        // Non-baseline files are ignored entirely
        std::fs::write(dir.path().join("notes.txt"), "hello").expect("write");

        let listed = store.list().expect("list");
        assert_eq!(listed.len(), 1);
        assert!(listed[0].path.ends_with("good.baseline.json"));
    }
}
