/*!
# Configuration

Optional TOML file with defaults for a run. Command-line flags are applied
on top of it; a boolean flag can switch an option on but never off.

```toml
[scan]
recurse = true
pattern = "*.cs"

[normalize]
set_bom = false
strategy = "swap"
keep_backup = true
```
*/

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::normalizer::{NormalizeOptions, RewriteStrategy, StrategyKind};

/// Default config file name
pub const CONFIG_FILE_NAME: &str = "unbom.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnbomConfig {
    pub scan: ScanConfig,
    pub normalize: NormalizeConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Descend into subdirectories
    pub recurse: bool,

    /// File name pattern used when the target has none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Write a UTF-8 BOM instead of stripping it
    pub set_bom: bool,

    pub strategy: StrategyKind,

    /// Keep `<name>.bak` after a swap rewrite
    pub keep_backup: bool,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            set_bom: false,
            strategy: StrategyKind::Atomic,
            keep_backup: true,
        }
    }
}

impl NormalizeConfig {
    pub fn options(&self) -> NormalizeOptions {
        NormalizeOptions {
            add_bom: self.set_bom,
            strategy: RewriteStrategy::from_kind(self.strategy, self.keep_backup),
        }
    }
}

impl UnbomConfig {
    /// Loads configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}
