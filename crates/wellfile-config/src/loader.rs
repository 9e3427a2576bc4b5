//! Reading and writing configuration documents on disk.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::model::{FolderCatalog, WellfileConfig};
use crate::validate::{validate_catalog, validate_config};

/// Load and validate the root configuration document.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not valid JSON for the schema,
/// or fails validation.
pub fn load_config(path: &Path) -> ConfigResult<WellfileConfig> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        operation: "config.read",
        path: path.to_path_buf(),
        source,
    })?;
    let mut config: WellfileConfig =
        serde_json::from_str(&raw).map_err(|source| ConfigError::Json {
            operation: "config.parse",
            path: path.to_path_buf(),
            source,
        })?;
    validate_config(&mut config)?;
    debug!(
        path = %path.display(),
        sources = config.copy.sources.len(),
        "loaded configuration"
    );
    Ok(config)
}

/// Load and validate a folder catalog (`folders.json`).
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed, or validated.
pub fn load_catalog(path: &Path) -> ConfigResult<FolderCatalog> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        operation: "catalog.read",
        path: path.to_path_buf(),
        source,
    })?;
    let catalog: FolderCatalog =
        serde_json::from_str(&raw).map_err(|source| ConfigError::Json {
            operation: "catalog.parse",
            path: path.to_path_buf(),
            source,
        })?;
    validate_catalog(&catalog)?;
    Ok(catalog)
}

/// Persist a folder catalog using four-space indentation.
///
/// # Errors
///
/// Returns an error if serialisation or the write fails.
pub fn save_catalog(path: &Path, catalog: &FolderCatalog) -> ConfigResult<()> {
    let mut buffer = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
    catalog
        .serialize(&mut serializer)
        .map_err(|source| ConfigError::Json {
            operation: "catalog.serialize",
            path: path.to_path_buf(),
            source,
        })?;
    fs::write(path, buffer).map_err(|source| ConfigError::Io {
        operation: "catalog.write",
        path: path.to_path_buf(),
        source,
    })
}
