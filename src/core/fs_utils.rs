//! File system helpers: whole-file replacement and the `.bak` swap.
use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::errors::{NormalizeError, NormalizeResult};

/// Suffix appended to the original file name by [`replace_with_backup`]
pub const BACKUP_SUFFIX: &str = ".bak";

/// Directory a sibling temp file for `path` should be created in.
fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// `a/b.txt` -> `a/b.txt.bak`
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

/// Fails unless `path` could be opened for writing in place.
///
/// A rename only needs write access to the directory, so without this a
/// read-only file would still be replaced. Nothing is truncated.
pub fn ensure_writable(path: &Path) -> NormalizeResult<()> {
    fs::OpenOptions::new()
        .write(true)
        .open(path)
        .map(drop)
        .map_err(|e| NormalizeError::io(path, e))
}

/// Replace the whole content of `path` in one rename.
///
/// The new bytes go into a temp file next to the target, which then takes
/// over the target's permissions and is renamed onto it. On any error the
/// temp file is removed and `path` keeps its old content. Read-only files
/// are refused.
pub fn replace_atomically(path: &Path, contents: &[u8]) -> NormalizeResult<()> {
    ensure_writable(path)?;
    write_replacing(path, contents, path)
}

fn write_replacing(path: &Path, contents: &[u8], permissions_from: &Path) -> NormalizeResult<()> {
    let mut temp =
        NamedTempFile::new_in(parent_dir(path)).map_err(|e| NormalizeError::io(path, e))?;

    temp.write_all(contents)
        .and_then(|_| temp.as_file().sync_all())
        .map_err(|e| NormalizeError::io(path, e))?;

    match fs::metadata(permissions_from) {
        Ok(metadata) => {
            if let Err(e) = temp.as_file().set_permissions(metadata.permissions()) {
                tracing::debug!("Could not copy permissions to {}: {}", path.display(), e);
            }
        }
        Err(e) => tracing::debug!("No metadata for {}: {}", permissions_from.display(), e),
    }

    temp.persist(path).map_err(|e| NormalizeError::Replace {
        path: path.to_path_buf(),
        source: e.error,
    })?;

    Ok(())
}

/// Move `path` aside to `path.bak`, write `contents` to `path`, and drop the
/// backup unless `keep_backup` is set.
///
/// If the new content cannot be written, the backup is moved back. Returns the
/// backup path when it was kept.
pub fn replace_with_backup(
    path: &Path,
    contents: &[u8],
    keep_backup: bool,
) -> NormalizeResult<Option<PathBuf>> {
    ensure_writable(path)?;
    let backup = backup_path(path);

    fs::rename(path, &backup).map_err(|e| NormalizeError::io(path, e))?;

    if let Err(err) = write_replacing(path, contents, &backup) {
        fs::rename(&backup, path).map_err(|source| NormalizeError::Restore {
            path: path.to_path_buf(),
            backup: backup.clone(),
            source,
        })?;
        return Err(err);
    }

    if keep_backup {
        return Ok(Some(backup));
    }

    if let Err(e) = fs::remove_file(&backup) {
        tracing::warn!("Could not delete backup {}: {}", backup.display(), e);
    }
    Ok(None)
}
