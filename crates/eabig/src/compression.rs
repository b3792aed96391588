//! Compression classification for BIG archive entries

use std::fmt;

use crate::EAHD_MAGIC;

/// Compression scheme of an entry's raw region.
///
/// The BIG directory carries no per-entry compression flag; the scheme is
/// detected from the first two bytes of the region itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    /// Raw, uncompressed bytes
    None,
    /// EAHD (RefPack-family) compressed block
    Eahd,
}

impl Compression {
    /// Classify a raw entry region by its leading bytes.
    ///
    /// A slice shorter than two bytes is always `None`.
    pub fn detect(data: &[u8]) -> Self {
        if data.len() >= EAHD_MAGIC.len() && data[..EAHD_MAGIC.len()] == EAHD_MAGIC {
            Self::Eahd
        } else {
            Self::None
        }
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::Eahd => f.write_str("EAHD"),
        }
    }
}
