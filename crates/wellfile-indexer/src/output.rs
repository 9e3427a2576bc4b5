//! JSON and CSV writers for index outputs.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::{IndexError, Result};

/// Path of the CSV written next to a JSON output.
#[must_use]
pub fn csv_sibling(json_path: &Path) -> PathBuf {
    json_path.with_extension("csv")
}

/// Write `value` as four-space indented JSON, creating parent directories.
///
/// # Errors
///
/// Returns an error if serialisation or the write fails.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, label: &'static str, value: &T) -> Result<()> {
    ensure_parent(path)?;
    let mut buffer = Vec::new();
    let mut serializer =
        Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
    value
        .serialize(&mut serializer)
        .map_err(|source| IndexError::SerializeJson { label, source })?;
    fs::write(path, buffer).map_err(|source| IndexError::WriteOutput {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `rows` as CSV with a header row derived from the row type.
///
/// # Errors
///
/// Returns an error if the file cannot be created or a row fails to serialise.
pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    ensure_parent(path)?;
    let csv_error = |source| IndexError::WriteCsv {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;
    for row in rows {
        writer.serialize(row).map_err(csv_error)?;
    }
    writer.flush().map_err(|source| IndexError::WriteOutput {
        path: path.to_path_buf(),
        source,
    })
}

fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|source| IndexError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use serde_json::json;
    use wellfile_test_support::fixtures::temp_dir;

    #[derive(Serialize)]
    struct Row {
        name: &'static str,
        size: u32,
    }

    #[test]
    fn json_uses_four_space_indent_and_creates_parents() -> Result<()> {
        let dir = temp_dir("output")?;
        let path = dir.path().join("nested/index.json");
        write_json(&path, "index", &json!([{"name": "a"}]))?;
        let body = fs::read_to_string(&path)?;
        assert_eq!(body, "[\n    {\n        \"name\": \"a\"\n    }\n]");
        Ok(())
    }

    #[test]
    fn csv_has_header_row() -> Result<()> {
        let dir = temp_dir("output")?;
        let path = csv_sibling(&dir.path().join("index.json"));
        assert_eq!(path.extension().and_then(|ext| ext.to_str()), Some("csv"));
        write_csv(&path, &[Row { name: "a", size: 1 }, Row { name: "b", size: 2 }])?;
        let body = fs::read_to_string(&path)?;
        assert_eq!(body, "name,size\na,1\nb,2\n");
        Ok(())
    }
}
