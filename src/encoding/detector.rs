/*!
# Encoding Detector

The normalizer only needs a guess of the encoding name and whether the
detector saw a BOM. [`EncodingDetector`] is that seam; [`ChardetngDetector`]
is the implementation used by the CLI.
*/

use std::path::Path;

use chardetng::EncodingDetector as Chardet;
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use serde::Serialize;

use super::bom::starts_with_utf8_bom;
use crate::core::{NormalizeError, NormalizeResult};

/// Outcome of analyzing one file's bytes
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Detection {
    /// Detected encoding, e.g. "ascii", "utf-8", "windows-1252"; `None` when
    /// the detector could not tell
    pub encoding_name: Option<String>,
    /// Whether the detector itself saw a byte-order mark
    pub has_bom: bool,
}

impl Detection {
    pub fn new(encoding_name: impl Into<String>, has_bom: bool) -> Self {
        Self {
            encoding_name: Some(encoding_name.into()),
            has_bom,
        }
    }

    pub fn unknown() -> Self {
        Self::default()
    }
}

/// Guesses the character encoding of a file
pub trait EncodingDetector {
    fn detect(&self, path: &Path) -> NormalizeResult<Detection>;
}

impl<D: EncodingDetector + ?Sized> EncodingDetector for &D {
    fn detect(&self, path: &Path) -> NormalizeResult<Detection> {
        (**self).detect(path)
    }
}

/// Detector backed by `chardetng` for legacy encodings.
///
/// BOMs and valid UTF-8 are recognised directly; only undecodable input is
/// handed to chardetng.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChardetngDetector;

impl ChardetngDetector {
    pub fn new() -> Self {
        Self
    }

    /// Classifies an in-memory buffer
    pub fn detect_bytes(&self, bytes: &[u8]) -> Detection {
        if let Some((encoding, _)) = Encoding::for_bom(bytes) {
            if encoding == UTF_16LE || encoding == UTF_16BE {
                return Detection::new(encoding_label(encoding), true);
            }
        }

        if starts_with_utf8_bom(bytes) {
            return Detection::new("utf-8", true);
        }

        if std::str::from_utf8(bytes).is_ok() {
            let name = if bytes.is_ascii() { "ascii" } else { "utf-8" };
            return Detection::new(name, false);
        }

        let mut detector = Chardet::new();
        detector.feed(bytes, true);
        let encoding = detector.guess(None, false);
        tracing::trace!("chardetng guessed {}", encoding.name());

        Detection::new(encoding_label(encoding), false)
    }
}

impl EncodingDetector for ChardetngDetector {
    fn detect(&self, path: &Path) -> NormalizeResult<Detection> {
        let bytes = std::fs::read(path).map_err(|e| NormalizeError::io(path, e))?;
        Ok(self.detect_bytes(&bytes))
    }
}

/// Lower-cased WHATWG name, e.g. "utf-16le", "shift_jis"
pub fn encoding_label(encoding: &'static Encoding) -> String {
    encoding.name().to_ascii_lowercase()
}

/// Maps a detector label back to an `encoding_rs` encoding.
///
/// The UTF-8 family ("ascii", "utf8", "utf-8") always resolves to UTF-8;
/// unknown labels yield `None`.
pub fn encoding_for_label(label: &str) -> Option<&'static Encoding> {
    match label {
        "ascii" | "utf8" | "utf-8" => Some(UTF_8),
        other => Encoding::for_label(other.as_bytes()),
    }
}
