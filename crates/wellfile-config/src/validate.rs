//! Validation helpers for configuration documents.

use std::collections::HashSet;

use crate::error::{ConfigError, ConfigResult};
use crate::model::{FolderCatalog, IndexPolicy, WellfileConfig};

/// Validate a loaded configuration and normalise cosmetic variations in place.
///
/// The diagram extension loses any leading dot and is lower-cased.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] describing the first offending field.
pub fn validate_config(config: &mut WellfileConfig) -> ConfigResult<()> {
    for (index, source) in config.copy.sources.iter().enumerate() {
        if source.as_os_str().is_empty() || source.to_string_lossy().trim().is_empty() {
            return Err(ConfigError::invalid(
                "copy",
                format!("sources[{index}]"),
                Some(source.display().to_string()),
                "empty",
            ));
        }
    }
    if let Some(destination) = &config.copy.destination
        && destination.to_string_lossy().trim().is_empty()
    {
        return Err(ConfigError::invalid(
            "copy",
            "destination",
            Some(destination.display().to_string()),
            "empty",
        ));
    }
    validate_index_policy(&mut config.index)
}

fn validate_index_policy(policy: &mut IndexPolicy) -> ConfigResult<()> {
    if policy.max_file_name_len == 0 {
        return Err(ConfigError::invalid(
            "index",
            "max_file_name_len",
            Some("0".to_string()),
            "must_be_positive",
        ));
    }

    let extension = policy
        .extension
        .trim()
        .trim_start_matches('.')
        .to_ascii_lowercase();
    if extension.is_empty() {
        return Err(ConfigError::invalid(
            "index",
            "extension",
            Some(policy.extension.clone()),
            "empty",
        ));
    }
    policy.extension = extension;

    if let Some(position) = policy
        .exclude_dir_markers
        .iter()
        .position(|marker| marker.trim().is_empty())
    {
        return Err(ConfigError::invalid(
            "index",
            format!("exclude_dir_markers[{position}]"),
            None,
            "empty",
        ));
    }
    Ok(())
}

/// Validate a folder catalog: every entry needs a name and a path, and names are unique.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] describing the first offending entry.
pub fn validate_catalog(catalog: &FolderCatalog) -> ConfigResult<()> {
    let mut seen = HashSet::new();
    for (index, entry) in catalog.folders.iter().enumerate() {
        let name = entry.name.trim();
        if name.is_empty() {
            return Err(ConfigError::invalid(
                "folders",
                format!("[{index}].name"),
                None,
                "empty",
            ));
        }
        if entry.path.to_string_lossy().trim().is_empty() {
            return Err(ConfigError::invalid(
                "folders",
                format!("[{index}].path"),
                None,
                "empty",
            ));
        }
        if !seen.insert(name.to_string()) {
            return Err(ConfigError::invalid(
                "folders",
                format!("[{index}].name"),
                Some(name.to_string()),
                "duplicate",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FolderEntry, IndexedFlag};
    use serde_json::Map;
    use std::path::PathBuf;

    fn entry(name: &str, path: &str) -> FolderEntry {
        FolderEntry {
            name: name.to_string(),
            path: PathBuf::from(path),
            indexed: IndexedFlag::No,
            date_indexed: None,
            extra: Map::new(),
        }
    }

    #[test]
    fn extension_is_normalised() -> ConfigResult<()> {
        let mut config = WellfileConfig::default();
        config.index.extension = " .PDF".to_string();
        validate_config(&mut config)?;
        assert_eq!(config.index.extension, "pdf");
        Ok(())
    }

    #[test]
    fn blank_source_is_rejected() {
        let mut config = WellfileConfig::default();
        config.copy.sources = vec![PathBuf::from("/srv/wbd"), PathBuf::from("  ")];
        let err = validate_config(&mut config).err();
        assert!(matches!(
            err,
            Some(ConfigError::InvalidField { section: "copy", ref field, reason: "empty", .. })
                if field == "sources[1]"
        ));
    }

    #[test]
    fn zero_name_length_is_rejected() {
        let mut config = WellfileConfig::default();
        config.index.max_file_name_len = 0;
        assert!(matches!(
            validate_config(&mut config),
            Err(ConfigError::InvalidField {
                reason: "must_be_positive",
                ..
            })
        ));
    }

    #[test]
    fn blank_marker_is_rejected() {
        let mut config = WellfileConfig::default();
        config.index.exclude_dir_markers.push(String::new());
        assert!(validate_config(&mut config).is_err());
    }

    #[test]
    fn catalog_rejects_duplicate_names() {
        let catalog = FolderCatalog {
            folders: vec![entry("Field A", "/a"), entry("Field A ", "/b")],
        };
        assert!(matches!(
            validate_catalog(&catalog),
            Err(ConfigError::InvalidField {
                reason: "duplicate",
                ..
            })
        ));
    }

    #[test]
    fn catalog_rejects_missing_path() {
        let catalog = FolderCatalog {
            folders: vec![entry("Field A", "")],
        };
        assert!(validate_catalog(&catalog).is_err());
        let ok = FolderCatalog {
            folders: vec![entry("Field A", "/a"), entry("Field B", "/b")],
        };
        assert!(validate_catalog(&ok).is_ok());
    }
}
