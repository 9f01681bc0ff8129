//! Re-encoding a file's content as UTF-8 and writing it back.

use std::path::{Path, PathBuf};

use encoding_rs::{Encoding, UTF_8};
use serde::{Deserialize, Serialize};

use crate::core::{fs_utils, NormalizeError, NormalizeResult};
use crate::encoding::{encoding_for_label, UTF8_BOM};

/// How the converted content replaces the original file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RewriteStrategy {
    /// Temp file in the same directory renamed over the original
    Atomic,
    /// Original moved to `<name>.bak` first; the backup is deleted afterwards
    /// unless `keep_backup` is set
    Swap { keep_backup: bool },
}

impl Default for RewriteStrategy {
    fn default() -> Self {
        RewriteStrategy::Atomic
    }
}

/// Strategy names accepted on the command line and in the config file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    #[default]
    Atomic,
    Swap,
}

impl RewriteStrategy {
    pub fn from_kind(kind: StrategyKind, keep_backup: bool) -> Self {
        match kind {
            StrategyKind::Atomic => RewriteStrategy::Atomic,
            StrategyKind::Swap => RewriteStrategy::Swap { keep_backup },
        }
    }

    /// Writes `contents` to `path`; returns the backup file if one was kept.
    pub fn apply(&self, path: &Path, contents: &[u8]) -> NormalizeResult<Option<PathBuf>> {
        match *self {
            RewriteStrategy::Atomic => {
                fs_utils::replace_atomically(path, contents)?;
                Ok(None)
            }
            RewriteStrategy::Swap { keep_backup } => {
                fs_utils::replace_with_backup(path, contents, keep_backup)
            }
        }
    }
}

/// Decodes `bytes` and re-encodes them as UTF-8, optionally prefixed with
/// the UTF-8 BOM.
///
/// A leading UTF-8 or UTF-16 BOM decides the source encoding on its own.
/// Otherwise `encoding_name` is used, falling back to UTF-8 when it is absent
/// or unknown. Malformed input is an error rather than being replaced with
/// U+FFFD.
pub fn transcode(
    path: &Path,
    bytes: &[u8],
    encoding_name: Option<&str>,
    add_bom: bool,
) -> NormalizeResult<Vec<u8>> {
    let (encoding, body) = match Encoding::for_bom(bytes) {
        Some((encoding, bom_length)) => (encoding, &bytes[bom_length..]),
        None => (resolve_encoding(encoding_name), bytes),
    };

    let text = encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .ok_or_else(|| NormalizeError::Decode {
            path: path.to_path_buf(),
            encoding: encoding.name().to_string(),
        })?;
    // stray repeated BOMs
    let text = text.trim_start_matches('\u{FEFF}');

    let mut output = Vec::with_capacity(text.len() + UTF8_BOM.len());
    if add_bom {
        output.extend_from_slice(&UTF8_BOM);
    }
    output.extend_from_slice(text.as_bytes());
    Ok(output)
}

fn resolve_encoding(encoding_name: Option<&str>) -> &'static Encoding {
    match encoding_name {
        Some(name) => encoding_for_label(name).unwrap_or_else(|| {
            tracing::debug!("Unknown encoding '{}', decoding as UTF-8", name);
            UTF_8
        }),
        None => UTF_8,
    }
}
