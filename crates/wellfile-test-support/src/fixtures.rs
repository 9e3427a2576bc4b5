//! Filesystem fixtures for building source trees with controlled timestamps.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use tempfile::TempDir;

/// Create a fresh temporary directory with a recognisable prefix.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn temp_dir(prefix: &str) -> Result<TempDir> {
    tempfile::Builder::new()
        .prefix(&format!("wellfile-{prefix}-"))
        .tempdir()
        .context("failed to create temporary directory")
}

/// Timestamp `secs` seconds after the Unix epoch.
#[must_use]
pub fn mtime_at(secs: u64) -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(secs)
}

/// Write `contents` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if any directory or the file cannot be written.
pub fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let mut file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    file.write_all(contents.as_bytes())
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Write a file and pin its modification time.
///
/// # Errors
///
/// Returns an error if the file cannot be written or its timestamp updated.
pub fn write_file_with_mtime(path: &Path, contents: &str, modified: SystemTime) -> Result<()> {
    write_file(path, contents)?;
    let file = File::options()
        .write(true)
        .open(path)
        .with_context(|| format!("failed to reopen {}", path.display()))?;
    file.set_modified(modified)
        .with_context(|| format!("failed to set mtime on {}", path.display()))?;
    Ok(())
}

/// Write one entry per line, the way identifier lists are handed to the tools.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_lines(path: &Path, lines: &[&str]) -> Result<()> {
    let mut body = lines.join("\n");
    body.push('\n');
    write_file(path, &body)
}

/// Make `dir` read-only and report whether the platform actually rejects writes.
///
/// Returns `false` when writes still succeed (for example when running as root),
/// in which case callers should skip permission-dependent assertions.
///
/// # Errors
///
/// Returns an error if permissions cannot be changed.
pub fn make_read_only(dir: &Path) -> Result<bool> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(dir, fs::Permissions::from_mode(0o555))
            .with_context(|| format!("failed to chmod {}", dir.display()))?;
        let probe = dir.join(".write-probe");
        if File::create(&probe).is_ok() {
            let _ = fs::remove_file(&probe);
            return Ok(false);
        }
        Ok(true)
    }
    #[cfg(not(unix))]
    {
        let _ = dir;
        Ok(false)
    }
}

/// Restore write access on a directory previously passed to [`make_read_only`].
///
/// # Errors
///
/// Returns an error if permissions cannot be changed.
pub fn make_writable(dir: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(dir, fs::Permissions::from_mode(0o755))
            .with_context(|| format!("failed to chmod {}", dir.display()))?;
    }
    #[cfg(not(unix))]
    {
        let _ = dir;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_file_with_mtime_pins_timestamp() -> Result<()> {
        let temp = temp_dir("fixtures")?;
        let path = temp.path().join("nested/a.pdf");
        write_file_with_mtime(&path, "pdf", mtime_at(1_000_000))?;
        assert_eq!(fs::metadata(&path)?.modified()?, mtime_at(1_000_000));
        Ok(())
    }

    #[test]
    fn write_lines_terminates_each_entry() -> Result<()> {
        let temp = temp_dir("fixtures")?;
        let path = temp.path().join("ids.txt");
        write_lines(&path, &["a", "b"])?;
        assert_eq!(fs::read_to_string(&path)?, "a\nb\n");
        Ok(())
    }
}
