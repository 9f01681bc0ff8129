/*!
# Core Module

Error types and file system helpers shared by the encoding, normalizer
and scanner modules.
*/

pub mod errors;
pub mod fs_utils;

pub use errors::{NormalizeError, NormalizeResult, ScanError};
pub use fs_utils::{backup_path, replace_atomically, replace_with_backup};
