//! EAHD (RefPack-family) compression and decompression
//!
//! An EAHD stream is:
//!
//! - bytes 0-1: magic `0xFB 0x10`
//! - bytes 2-4: big-endian 3-byte decompressed size
//! - remainder: a sequence of commands, each starting with a control byte
//!
//! The control byte's numeric range selects one of four encodings:
//!
//! | Range         | Extra bytes | Literals      | Copy length            | Back distance                          |
//! |---------------|-------------|---------------|------------------------|----------------------------------------|
//! | `0x00..=0x7F` | 1 (`a`)     | `ctrl & 3`    | `((ctrl & 1C) >> 2)+3` | `((ctrl & 60) << 3) + a + 1`           |
//! | `0x80..=0xBF` | 2 (`a b`)   | `(a >> 6) & 3`| `(ctrl & 3F) + 4`      | `((a & 3F) << 8) + b + 1`              |
//! | `0xC0..=0xDF` | 3 (`a b c`) | `ctrl & 3`    | `((ctrl & 0C) << 6)+c+5`| `((ctrl & 10) << 12) + (a << 8) + b + 1`|
//! | `0xE0..=0xFB` | 0           | `((ctrl & 1F) << 2) + 4` | none        | —                                      |
//! | `0xFC..=0xFF` | 0           | `ctrl & 3`    | none                   | —                                      |
//!
//! Each command first copies its literal bytes from the input, then performs
//! the back-reference copy. Distances may be smaller than the copy length,
//! so copies must be byte-wise to reproduce repeating patterns.

mod compress;
mod decompress;

pub use compress::{MAX_INPUT_SIZE, compress};
pub use decompress::{decompress, decompress_or_raw};
