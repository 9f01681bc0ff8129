/*!
# Encoding Module

UTF-8 BOM detection and the pluggable encoding detector.
*/

pub mod bom;
pub mod detector;

pub use bom::{has_utf8_bom, starts_with_utf8_bom, UTF8_BOM};
pub use detector::{encoding_for_label, ChardetngDetector, Detection, EncodingDetector};
