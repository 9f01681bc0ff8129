//! File name wildcards: `*` matches any run of characters, `?` exactly one.

use regex::Regex;

use crate::core::ScanError;

/// Pattern matching every file
pub const MATCH_ALL: &str = "*";

#[derive(Debug, Clone)]
pub struct FilePattern {
    source: String,
    regex: Regex,
}

impl FilePattern {
    pub fn new(pattern: &str) -> Result<Self, ScanError> {
        let mut expression = String::from("(?s)^");
        let mut literal = [0u8; 4];
        for c in pattern.chars() {
            match c {
                '*' => expression.push_str(".*"),
                '?' => expression.push('.'),
                other => expression.push_str(&regex::escape(other.encode_utf8(&mut literal))),
            }
        }
        expression.push('$');

        let regex = Regex::new(&expression).map_err(|source| ScanError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;

        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// Matches against a bare file name, never a full path
    pub fn matches(&self, file_name: &str) -> bool {
        self.regex.is_match(file_name)
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}
