//! Folder catalog runs driven by a `folders.json` document.
//!
//! # Design
//! - Only entries marked `No` are indexed; successful entries flip to `Yes` with a timestamp.
//! - The catalog is rewritten only when at least one entry changed.
//! - Missing folders stay pending so a later run picks them up.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{info, warn};
use wellfile_config::{IndexedFlag, load_catalog, save_catalog};

use crate::error::Result;
use crate::files::index_files;
use crate::output::write_json;
use crate::walk::MODIFIED_FORMAT;

/// A folder indexed during a catalog run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexedFolder {
    /// Catalog name.
    pub name: String,
    /// Index file written for the folder.
    pub output: PathBuf,
    /// Number of files catalogued.
    pub files: usize,
}

/// A pending folder left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFolder {
    /// Catalog name.
    pub name: String,
    /// Why the folder was not indexed.
    pub reason: String,
}

/// Summary of one catalog run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogRun {
    /// Folders indexed in this run.
    pub indexed: Vec<IndexedFolder>,
    /// Pending folders that were skipped.
    pub skipped: Vec<SkippedFolder>,
    /// Entries already marked as indexed.
    pub already_indexed: usize,
    /// Whether the catalog document was rewritten.
    pub catalog_updated: bool,
}

/// Replace every non-alphanumeric character with `_`.
#[must_use]
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

/// Index every pending folder in the catalog at `catalog_path`.
///
/// Index files land in `output_dir` as `{sanitized name}.json`.
///
/// # Errors
///
/// Returns an error if the catalog cannot be read or rewritten.
pub fn index_catalog(
    catalog_path: &Path,
    output_dir: &Path,
    indexed_at: NaiveDateTime,
) -> Result<CatalogRun> {
    let mut catalog = load_catalog(catalog_path)?;
    let mut run = CatalogRun::default();
    let stamp = indexed_at.format(MODIFIED_FORMAT).to_string();

    for entry in &mut catalog.folders {
        if entry.indexed == IndexedFlag::Yes {
            run.already_indexed += 1;
            continue;
        }
        if !entry.path.is_dir() {
            warn!(folder = %entry.name, path = %entry.path.display(), "path does not exist; skipping");
            run.skipped.push(SkippedFolder {
                name: entry.name.clone(),
                reason: "path does not exist".to_string(),
            });
            continue;
        }

        let index = index_files(std::slice::from_ref(&entry.path));
        let output = output_dir.join(format!("{}.json", sanitize_name(&entry.name)));
        if let Err(error) = write_json(&output, "folder_index", &index.entries) {
            warn!(folder = %entry.name, output = %output.display(), error = %error, "failed to write folder index");
            run.skipped.push(SkippedFolder {
                name: entry.name.clone(),
                reason: error.to_string(),
            });
            continue;
        }

        info!(folder = %entry.name, files = index.entries.len(), output = %output.display(), "folder indexed");
        entry.indexed = IndexedFlag::Yes;
        entry.date_indexed = Some(stamp.clone());
        run.indexed.push(IndexedFolder {
            name: entry.name.clone(),
            output,
            files: index.entries.len(),
        });
    }

    if !run.indexed.is_empty() {
        save_catalog(catalog_path, &catalog)?;
        run.catalog_updated = true;
    }
    Ok(run)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use chrono::NaiveDate;
    use serde_json::{Value, json};
    use std::fs;
    use wellfile_test_support::fixtures::{temp_dir, write_file};

    fn indexed_at() -> Result<NaiveDateTime> {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .and_then(|date| date.and_hms_opt(9, 30, 0))
            .ok_or_else(|| anyhow::anyhow!("invalid timestamp"))
    }

    #[test]
    fn sanitize_replaces_non_alphanumerics() {
        assert_eq!(sanitize_name("Field A/North (2024)"), "Field_A_North__2024_");
        assert_eq!(sanitize_name("Plain"), "Plain");
    }

    #[test]
    fn pending_folders_are_indexed_and_marked() -> Result<()> {
        let dir = temp_dir("catalog")?;
        let field_a = dir.path().join("field-a");
        write_file(&field_a.join("one.pdf"), "1")?;
        write_file(&field_a.join("sub/two.pdf"), "2")?;
        let catalog_path = dir.path().join("folders.json");
        let document = json!([
            {"name": "Field A", "path": field_a, "Indexed": "No", "owner": "ops"},
            {"name": "Gone", "path": dir.path().join("gone"), "Indexed": "No"},
            {"name": "Done", "path": "/elsewhere", "Indexed": "Yes", "Date Indexed": "2023-01-01 00:00:00"}
        ]);
        write_file(&catalog_path, &document.to_string())?;
        let output_dir = dir.path().join("indexes");

        let run = index_catalog(&catalog_path, &output_dir, indexed_at()?)?;

        assert!(run.catalog_updated);
        assert_eq!(run.already_indexed, 1);
        assert_eq!(run.indexed.len(), 1);
        assert_eq!(run.indexed[0].files, 2);
        assert_eq!(run.indexed[0].output, output_dir.join("Field_A.json"));
        assert_eq!(run.skipped.len(), 1);
        assert_eq!(run.skipped[0].name, "Gone");

        let saved: Value = serde_json::from_str(&fs::read_to_string(&catalog_path)?)?;
        assert_eq!(saved[0]["Indexed"], "Yes");
        assert_eq!(saved[0]["Date Indexed"], "2024-06-01 09:30:00");
        assert_eq!(saved[0]["owner"], "ops");
        assert_eq!(saved[1]["Indexed"], "No");

        let index: Value = serde_json::from_str(&fs::read_to_string(output_dir.join("Field_A.json"))?)?;
        assert_eq!(index.as_array().map(Vec::len), Some(2));
        Ok(())
    }

    #[test]
    fn unchanged_catalog_is_not_rewritten() -> Result<()> {
        let dir = temp_dir("catalog")?;
        let catalog_path = dir.path().join("folders.json");
        let original = json!([
            {"name": "Gone", "path": dir.path().join("gone"), "Indexed": "No"}
        ])
        .to_string();
        write_file(&catalog_path, &original)?;

        let run = index_catalog(&catalog_path, dir.path(), indexed_at()?)?;

        assert!(!run.catalog_updated);
        assert_eq!(fs::read_to_string(&catalog_path)?, original);
        Ok(())
    }
}
