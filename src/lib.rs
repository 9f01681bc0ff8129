//! # Unbom
//!
//! Normalizes text files to UTF-8 and strips (or adds) the UTF-8 byte-order
//! mark. Built for source trees that picked up mixed encodings and stray BOMs
//! along the way.
//!
//! ## Architecture
//!
//! ```text
//! Unbom
//! ├── Core        - error types, atomic replace / .bak swap
//! ├── Encoding    - BOM prefix check, pluggable encoding detector (chardetng)
//! ├── Normalizer  - skip/rewrite decision, transcoding, rewrite strategies
//! ├── Scanner     - dir/pattern target, directory walk, run summary
//! ├── Config      - optional unbom.toml
//! └── CLI common  - logging, console output, shared arguments
//! ```
//!
//! ## Usage
//!
//! ### CLI
//! ```bash
//! # Strip BOMs and convert legacy encodings in the current directory
//! unbom .
//!
//! # Only *.cs files, recursively, writing a BOM
//! unbom "src/*.cs" --recurse --set-bom
//!
//! # Keep a .bak copy of every rewritten file
//! unbom docs --strategy swap
//! ```
//!
//! ### Library
//! ```rust,no_run
//! use std::path::Path;
//! use unbom::{ChardetngDetector, NormalizeOptions, Normalizer, ScanTarget};
//!
//! let normalizer = Normalizer::new(ChardetngDetector::new(), NormalizeOptions::default());
//! let target = ScanTarget::parse(Path::new("src/*.txt"), None);
//! let summary = unbom::scanner::scan(&target, true, &normalizer, |outcome| {
//!     println!("{:?}", outcome);
//! })?;
//! println!("{} file(s) processed", summary.rewritten);
//! # Ok::<(), unbom::ScanError>(())
//! ```

pub mod cli_common;
pub mod config;
pub mod core;
pub mod encoding;
pub mod normalizer;
pub mod scanner;

pub use crate::config::UnbomConfig;
pub use crate::core::{NormalizeError, ScanError};
pub use crate::encoding::{ChardetngDetector, Detection, EncodingDetector};
pub use crate::normalizer::{
    decide, Decision, NormalizeOptions, Normalizer, Outcome, RewriteStrategy, RunSummary,
    StrategyKind,
};
pub use crate::scanner::{scan, ScanTarget};
