/*!
# Error System for Unbom

Per-file errors never abort a scan: the normalizer turns them into a
failed outcome. Only [`ScanError`] ends a run early.
*/

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result of a single-file operation
pub type NormalizeResult<T> = Result<T, NormalizeError>;

/// Errors raised while detecting, decoding or rewriting one file
#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("{}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: content is not valid {}", .path.display(), .encoding)]
    Decode { path: PathBuf, encoding: String },

    #[error("{}: could not replace file: {}", .path.display(), .source)]
    Replace {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: could not restore backup {}: {}", .path.display(), .backup.display(), .source)]
    Restore {
        path: PathBuf,
        backup: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl NormalizeError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        NormalizeError::Io {
            path: path.into(),
            source,
        }
    }

    /// Path of the file the error belongs to
    pub fn path(&self) -> &PathBuf {
        match self {
            NormalizeError::Io { path, .. }
            | NormalizeError::Decode { path, .. }
            | NormalizeError::Replace { path, .. }
            | NormalizeError::Restore { path, .. } => path,
        }
    }
}

/// Scan-level failures
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("Invalid file name pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
