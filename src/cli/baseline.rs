//! Baseline management command handlers.

use crate::baseline::BaselineStore;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Save an inventory as a named baseline.
pub fn run_baseline_save(
    sbom: PathBuf,
    name: String,
    label: String,
    description: String,
    dir: PathBuf,
) -> Result<()> {
    let store = BaselineStore::new(dir)?;
    store.save(&sbom, &name, &label, &description)?;

    println!(
        "Saved baseline {}",
        store.baseline_path(&name).display()
    );
    Ok(())
}

/// List all stored baselines.
pub fn run_baseline_list(dir: PathBuf) -> Result<()> {
    let store = BaselineStore::new(dir)?;
    let baselines = store.list()?;

    if baselines.is_empty() {
        println!("No baselines stored in {}", store.dir().display());
        return Ok(());
    }

    for meta in baselines {
        let name = baseline_name(&meta.path);
        let label = if meta.version.is_empty() {
            String::new()
        } else {
            format!(" [{}]", meta.version)
        };
        println!(
            "{name}{label}  {} components  created {}",
            meta.component_count,
            meta.created_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
        if !meta.description.is_empty() {
            println!("  {}", meta.description);
        }
    }
    Ok(())
}

/// Delete a stored baseline.
pub fn run_baseline_delete(name: String, dir: PathBuf) -> Result<()> {
    let store = BaselineStore::new(dir)?;
    store.delete(&name)?;

    println!("Deleted baseline {name}");
    Ok(())
}

/// Derive the baseline name from its file path.
fn baseline_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .map_or_else(|| path.to_string(), |n| {
            n.strip_suffix(".baseline.json").unwrap_or(n).to_string()
        })
}
