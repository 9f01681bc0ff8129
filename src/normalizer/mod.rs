/*!
# Normalization Engine

Decides per file whether a rewrite is needed and performs it.

```text
detect ──► decide ──► Skip
                 └──► Rewrite ──► transcode ──► RewriteStrategy::apply
```

The decision step is the pure function [`decide`]; everything with side
effects happens in [`Normalizer::normalize`], which never returns an error:
failures become [`Outcome::Failed`] so a scan keeps going.
*/

pub mod rewrite;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::{NormalizeError, NormalizeResult};
use crate::encoding::{has_utf8_bom, Detection, EncodingDetector};

pub use rewrite::{transcode, RewriteStrategy, StrategyKind};

/// Encoding names treated as already being UTF-8
pub const UTF8_FAMILY: [&str; 3] = ["ascii", "utf8", "utf-8"];

/// Case-sensitive match against [`UTF8_FAMILY`]
pub fn is_utf8_family(encoding_name: Option<&str>) -> bool {
    encoding_name.is_some_and(|name| UTF8_FAMILY.contains(&name))
}

/// What to do with one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Already UTF-8 with the requested BOM state
    Skip,
    Rewrite {
        source_encoding: Option<String>,
        had_bom: bool,
    },
}

/// Combines the detector's answer with the raw prefix check.
///
/// The detector's BOM flag only counts when it also reports a UTF-8 family
/// encoding; the prefix check counts on its own.
pub fn decide(detection: &Detection, prefix_has_bom: bool, add_bom: bool) -> Decision {
    let is_utf8 = is_utf8_family(detection.encoding_name.as_deref());
    let has_bom = (is_utf8 && detection.has_bom) || prefix_has_bom;

    if is_utf8 && has_bom == add_bom {
        Decision::Skip
    } else {
        Decision::Rewrite {
            source_encoding: detection.encoding_name.clone(),
            had_bom: has_bom,
        }
    }
}

/// Options shared by every file of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NormalizeOptions {
    /// Write the UTF-8 BOM instead of stripping it
    pub add_bom: bool,
    pub strategy: RewriteStrategy,
}

/// A file that was rewritten
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub encoding: Option<String>,
    pub had_bom: bool,
    pub bom_written: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup: Option<PathBuf>,
}

impl FileReport {
    /// "utf-8 BOM found", "windows-1252 found" or "unknown"
    pub fn describe(&self) -> String {
        match self.encoding.as_deref() {
            Some(name) if !name.is_empty() => {
                let bom = if self.had_bom { " BOM" } else { "" };
                format!("{}{} found", name, bom)
            }
            _ => "unknown".to_string(),
        }
    }
}

impl fmt::Display for FileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - converting: {} done",
            self.describe(),
            self.path.display()
        )
    }
}

/// A file that could not be processed; it is left as it was
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub message: String,
}

impl From<NormalizeError> for FileFailure {
    fn from(error: NormalizeError) -> Self {
        Self {
            path: error.path().clone(),
            message: error.to_string(),
        }
    }
}

/// Terminal state of one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum Outcome {
    Rewritten(FileReport),
    Skipped { path: PathBuf },
    Failed(FileFailure),
}

impl Outcome {
    pub fn path(&self) -> &Path {
        match self {
            Outcome::Rewritten(report) => &report.path,
            Outcome::Skipped { path } => path,
            Outcome::Failed(failure) => &failure.path,
        }
    }

    pub fn is_rewritten(&self) -> bool {
        matches!(self, Outcome::Rewritten(_))
    }
}

/// Per-run tallies; `rewritten` is the reported "processed" count
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub rewritten: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl RunSummary {
    /// Folds one outcome into the tallies
    pub fn record(mut self, outcome: &Outcome) -> Self {
        match outcome {
            Outcome::Rewritten(_) => self.rewritten += 1,
            Outcome::Skipped { .. } => self.skipped += 1,
            Outcome::Failed(_) => self.failed += 1,
        }
        self
    }

    pub fn total(&self) -> usize {
        self.rewritten + self.skipped + self.failed
    }
}

/// Applies the UTF-8/BOM policy to single files
#[derive(Debug, Clone)]
pub struct Normalizer<D> {
    detector: D,
    options: NormalizeOptions,
}

impl<D: EncodingDetector> Normalizer<D> {
    pub fn new(detector: D, options: NormalizeOptions) -> Self {
        Self { detector, options }
    }

    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    /// Processes one file. Never fails: errors are reported as
    /// [`Outcome::Failed`] and the file is left untouched.
    pub fn normalize(&self, path: &Path) -> Outcome {
        match self.try_normalize(path) {
            Ok(Some(report)) => Outcome::Rewritten(report),
            Ok(None) => Outcome::Skipped {
                path: path.to_path_buf(),
            },
            Err(error) => {
                tracing::debug!("failed: {}", error);
                Outcome::Failed(error.into())
            }
        }
    }

    fn try_normalize(&self, path: &Path) -> NormalizeResult<Option<FileReport>> {
        let detection = self.detector.detect(path)?;
        let prefix_has_bom = has_utf8_bom(path).map_err(|e| NormalizeError::io(path, e))?;
        tracing::debug!(
            "{}: detected {:?}, detector BOM {}, prefix BOM {}",
            path.display(),
            detection.encoding_name,
            detection.has_bom,
            prefix_has_bom
        );

        let (source_encoding, had_bom) =
            match decide(&detection, prefix_has_bom, self.options.add_bom) {
                Decision::Skip => return Ok(None),
                Decision::Rewrite {
                    source_encoding,
                    had_bom,
                } => (source_encoding, had_bom),
            };

        let original = std::fs::read(path).map_err(|e| NormalizeError::io(path, e))?;
        let converted = transcode(
            path,
            &original,
            source_encoding.as_deref(),
            self.options.add_bom,
        )?;

        if converted == original {
            tracing::debug!("{}: already normalized, not rewriting", path.display());
            return Ok(None);
        }

        let backup = self.options.strategy.apply(path, &converted)?;
        tracing::info!("{}: rewritten as UTF-8", path.display());

        Ok(Some(FileReport {
            path: path.to_path_buf(),
            encoding: source_encoding,
            had_bom,
            bom_written: self.options.add_bom,
            backup,
        }))
    }
}
