//! Staged single-file copy.

use std::ffi::OsStr;
use std::fs::{self, File, FileTimes};
use std::io;
use std::path::{Path, PathBuf};

use tracing::warn;

/// Suffix of the hidden staging file written next to the final target.
pub const STAGING_SUFFIX: &str = ".wellfile-partial";

/// Copy `source` into `destination_dir` under its own file name.
///
/// Content, permissions and modification time are preserved. Bytes land in a hidden
/// sibling first and are renamed over the target, so the target is either the old
/// file or the complete new one. The staging file never outlives the call.
///
/// # Errors
///
/// Returns the first I/O error raised while reading, writing or renaming.
pub fn copy_into(source: &Path, destination_dir: &Path) -> io::Result<PathBuf> {
    let file_name = source.file_name().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "source path has no file name")
    })?;
    let target = destination_dir.join(file_name);
    let staging = destination_dir.join(staging_name(file_name));

    let result = stage(source, &staging).and_then(|()| fs::rename(&staging, &target));
    if let Err(error) = result {
        if let Err(cleanup) = fs::remove_file(&staging)
            && cleanup.kind() != io::ErrorKind::NotFound
        {
            warn!(path = %staging.display(), error = %cleanup, "failed to remove staging file");
        }
        return Err(error);
    }
    Ok(target)
}

fn staging_name(file_name: &OsStr) -> String {
    format!(".{}{STAGING_SUFFIX}", file_name.to_string_lossy())
}

fn stage(source: &Path, staging: &Path) -> io::Result<()> {
    let mut reader = File::open(source)?;
    let metadata = reader.metadata()?;
    let mut writer = File::create(staging)?;
    io::copy(&mut reader, &mut writer)?;

    let mut times = FileTimes::new().set_modified(metadata.modified()?);
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }
    writer.set_times(times)?;
    writer.set_permissions(metadata.permissions())?;
    Ok(())
}
