/*!
# Scanner

Turns the command-line target into a directory plus file name pattern,
walks the directory and feeds every matching file to the normalizer.
Outcomes are folded into a [`RunSummary`] as they arrive.
*/

pub mod pattern;

use std::path::{is_separator, Path, PathBuf};

use walkdir::WalkDir;

use crate::core::fs_utils::BACKUP_SUFFIX;
use crate::core::ScanError;
use crate::encoding::EncodingDetector;
use crate::normalizer::{Normalizer, Outcome, RewriteStrategy, RunSummary};

pub use pattern::{FilePattern, MATCH_ALL};

/// Directory to scan and the file name pattern to match in it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanTarget {
    pub directory: PathBuf,
    pub pattern: String,
}

impl ScanTarget {
    pub fn new(directory: impl Into<PathBuf>, pattern: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            pattern: pattern.into(),
        }
    }

    /// Splits a command-line argument into directory and pattern.
    ///
    /// - an existing directory, or a path ending in a separator, is scanned
    ///   with `default_pattern` (or `*`)
    /// - otherwise the last segment is the pattern and the rest the directory,
    ///   `.` when there is no directory part
    pub fn parse(argument: &Path, default_pattern: Option<&str>) -> Self {
        let default_pattern = default_pattern.unwrap_or(MATCH_ALL);
        let text = argument.to_string_lossy();

        if text.is_empty() {
            return Self::new(".", default_pattern);
        }
        if argument.is_dir() || text.ends_with(is_separator) {
            return Self::new(argument, default_pattern);
        }

        let pattern = match argument.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => default_pattern.to_string(),
        };
        let directory = match argument.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        Self::new(directory, pattern)
    }
}

/// Regular files under `directory` whose name matches `pattern`, in file
/// name order. Unreadable entries are logged and skipped; symlinks are not
/// followed.
pub fn candidate_files<'a>(
    directory: &Path,
    pattern: &'a FilePattern,
    recurse: bool,
) -> impl Iterator<Item = PathBuf> + 'a {
    let mut walker = WalkDir::new(directory).min_depth(1).sort_by_file_name();
    if !recurse {
        walker = walker.max_depth(1);
    }

    walker
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!("Skipping unreadable entry: {}", err);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(move |entry| pattern.matches(&entry.file_name().to_string_lossy()))
        .map(|entry| entry.into_path())
}

/// `<name>.bak` next to an existing `<name>` that is itself a candidate:
/// the backup the swap strategy writes for it. Other `.bak` files are
/// ordinary candidates.
fn is_swap_backup(path: &Path, pattern: &FilePattern) -> bool {
    let text = path.to_string_lossy();
    let Some(stem) = text.strip_suffix(BACKUP_SUFFIX) else {
        return false;
    };
    let sibling = Path::new(stem);

    sibling.is_file()
        && sibling
            .file_name()
            .is_some_and(|name| pattern.matches(&name.to_string_lossy()))
}

/// Normalizes every matching file, calling `on_outcome` after each one.
///
/// Fails only when the directory does not exist or the pattern is invalid;
/// in that case no file is touched.
pub fn scan<D, F>(
    target: &ScanTarget,
    recurse: bool,
    normalizer: &Normalizer<D>,
    mut on_outcome: F,
) -> Result<RunSummary, ScanError>
where
    D: EncodingDetector,
    F: FnMut(&Outcome),
{
    let pattern = FilePattern::new(&target.pattern)?;

    if !target.directory.is_dir() {
        return Err(ScanError::DirectoryNotFound(target.directory.clone()));
    }

    tracing::debug!(
        "path={} pattern={} recurse={}",
        target.directory.display(),
        pattern.as_str(),
        recurse
    );

    let skip_backups = matches!(normalizer.options().strategy, RewriteStrategy::Swap { .. });

    let summary = candidate_files(&target.directory, &pattern, recurse)
        .filter(|path| {
            let is_backup = skip_backups && is_swap_backup(path, &pattern);
            if is_backup {
                tracing::debug!("{}: backup file, ignored", path.display());
            }
            !is_backup
        })
        .map(|path| normalizer.normalize(&path))
        .inspect(|outcome| on_outcome(outcome))
        .fold(RunSummary::default(), |summary, outcome| {
            summary.record(&outcome)
        });

    tracing::debug!(
        "{} rewritten, {} skipped, {} failed",
        summary.rewritten,
        summary.skipped,
        summary.failed
    );

    Ok(summary)
}
