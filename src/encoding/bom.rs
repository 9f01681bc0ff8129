//! UTF-8 byte-order-mark detection.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// The UTF-8 encoding of U+FEFF
pub const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Checks whether a byte slice begins with the UTF-8 BOM.
pub fn starts_with_utf8_bom(bytes: &[u8]) -> bool {
    bytes.starts_with(&UTF8_BOM)
}

/// Reads at most the first three bytes of `path` and compares them with
/// [`UTF8_BOM`].
///
/// Files shorter than three bytes never carry a BOM. Open and read errors are
/// returned to the caller.
pub fn has_utf8_bom<P: AsRef<Path>>(path: P) -> io::Result<bool> {
    let mut file = File::open(path)?;
    let mut buffer = [0u8; UTF8_BOM.len()];
    let mut filled = 0;

    // read() may return fewer bytes than asked for before EOF
    while filled < buffer.len() {
        match file.read(&mut buffer[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    Ok(filled == UTF8_BOM.len() && buffer == UTF8_BOM)
}
