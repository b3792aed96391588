//! EA BIG archive container parsing and EAHD compression.
//!
//! `.big` files are EA's container format bundling many named resources
//! (textures, data blobs) behind a directory of offsets and sizes. Entries
//! are optionally compressed with EAHD, a proprietary byte-oriented LZ77
//! variant from the RefPack family, recognizable by its `0xFB 0x10` leading
//! bytes. Both formats are community reverse-engineered, so parsing is
//! defensive throughout: a broken directory record or a damaged compressed
//! stream degrades the affected entry instead of failing the whole archive.
//!
//! ```no_run
//! use eabig::BigArchive;
//!
//! let archive = BigArchive::open("data/scoreboard.big")?;
//! for entry in archive.entries() {
//!     println!("{} ({} bytes)", entry.name, entry.decompressed_size());
//! }
//! # Ok::<(), eabig::Error>(())
//! ```

pub mod archive;
pub mod compression;
pub mod cursor;
pub mod eahd;
pub mod error;

pub use archive::{BigArchive, BigEntry, BigVariant, ContentKind};
pub use compression::Compression;
pub use cursor::ByteCursor;
pub use error::{Error, Result};

/// Magic bytes of the classic BIG container variant.
pub const BIGF_MAGIC: [u8; 4] = *b"BIGF";

/// Magic bytes of the later BIG container variant used by FIFA-era titles.
pub const BIG4_MAGIC: [u8; 4] = *b"BIG4";

/// Leading bytes of an EAHD compressed block.
pub const EAHD_MAGIC: [u8; 2] = [0xFB, 0x10];
