//! BIG archive container parsing
//!
//! Handles the `BIGF`/`BIG4` header, the variable-length entry directory
//! with its zero-size sentinel records, and per-entry decompression.

use byteorder::{BigEndian, LittleEndian};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use tracing::{debug, warn};

use crate::{
    BIG4_MAGIC, BIGF_MAGIC, Compression, Error, Result, cursor::ByteCursor, eahd,
};

/// Magic bytes identifying a DDS texture payload.
pub const DDS_MAGIC: [u8; 4] = *b"DDS ";

/// Allocation guard, not a correctness bound: headers can claim absurd
/// entry counts, so cap the upfront reservation and let the vector grow
/// if the directory really is that large.
const MAX_PREALLOC_ENTRIES: u32 = 4096;

/// Which of the two accepted container magics the archive carries.
///
/// The declared-size field's exact meaning differs subtly between the two,
/// but neither is validated here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BigVariant {
    /// `BIGF`, the classic variant
    BigF,
    /// `BIG4`, the FIFA-era variant
    Big4,
}

/// Coarse classification of an entry's payload.
///
/// The directory carries no per-entry type field. The kind is inherited
/// from the most recent sentinel record, then overridden when the payload's
/// own magic identifies a known format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// Generic data blob (the initial kind)
    Dat,
    /// DDS texture
    Dds,
    /// APT UI data
    Apt,
}

impl ContentKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dat => "DAT",
            Self::Dds => "DDS",
            Self::Apt => "APT",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Zero-size directory names that retag subsequent entries.
fn sentinel_kind(name: &str) -> Option<ContentKind> {
    match name {
        "sg1" => Some(ContentKind::Dds),
        "sg2" => Some(ContentKind::Apt),
        _ => None,
    }
}

/// One directory record plus its resolved payload.
#[derive(Debug, Clone)]
pub struct BigEntry {
    /// Absolute offset of the entry's raw region in the archive file.
    pub offset: u32,

    /// Length of the region as stored in the directory, possibly compressed
    /// and possibly overrunning the file. Kept unclamped: callers writing a
    /// replacement payload back in place need the declared slot size.
    pub raw_size: u32,

    /// Archive-internal name. The format does not forbid duplicates.
    pub name: String,

    /// Payload classification (see [`ContentKind`]).
    pub kind: ContentKind,

    /// Compression detected on the raw region.
    pub compression: Compression,

    /// Decompressed payload; empty for sentinel records. When EAHD decoding
    /// failed this still holds the raw region (see [`BigArchive::parse`]).
    pub data: Vec<u8>,
}

impl BigEntry {
    /// Length of the decompressed payload.
    pub fn decompressed_size(&self) -> usize {
        self.data.len()
    }

    /// `true` for the zero-size records that only retag later entries.
    pub fn is_sentinel(&self) -> bool {
        self.raw_size == 0 && sentinel_kind(&self.name).is_some()
    }
}

/// A parsed BIG archive: the ordered entry list plus a name lookup.
///
/// Parsing is a single synchronous pass over one buffer and produces an
/// independent, immutable result; the raw file bytes are not retained.
#[derive(Debug)]
pub struct BigArchive {
    variant: BigVariant,
    declared_size: u32,
    entries: Vec<BigEntry>,
    by_name: HashMap<String, usize>,
}

impl BigArchive {
    /// Read and parse the archive at `path`.
    ///
    /// The file is re-read in full on every call, so the result always
    /// reflects current on-disk bytes; external tooling overwrites entry
    /// regions in place and there is no invalidation signal to listen for.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::parse(&data)
    }

    /// Parse an archive from its raw bytes.
    ///
    /// Only a broken fixed header is fatal. Everything below it is best
    /// effort: unreadable directory records are skipped with a warning, and
    /// an entry whose EAHD region fails to decode keeps its raw bytes (its
    /// `compression` still says [`Compression::Eahd`], which is how callers
    /// can tell decoding gave up).
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut cursor = ByteCursor::new(data);

        let mut magic = [0u8; 4];
        magic.copy_from_slice(cursor.read_bytes(4)?);
        let variant = if magic == BIGF_MAGIC {
            BigVariant::BigF
        } else if magic == BIG4_MAGIC {
            BigVariant::Big4
        } else {
            return Err(Error::InvalidMagic(magic));
        };

        let declared_size = cursor.read_uint::<LittleEndian>(4)? as u32;
        let entry_count = cursor.read_uint::<BigEndian>(4)? as u32;
        // directory size hint; only read to keep the cursor aligned
        let _directory_size = cursor.read_uint::<BigEndian>(4)? as u32;

        debug!("BIG {variant:?}: {entry_count} entries, declared size {declared_size}");

        let mut entries = Vec::with_capacity(entry_count.min(MAX_PREALLOC_ENTRIES) as usize);
        let mut current_kind = ContentKind::Dat;

        for index in 0..entry_count {
            if !cursor.has_remaining() {
                warn!(
                    "directory truncated after {} of {entry_count} entries",
                    entries.len()
                );
                break;
            }

            let (offset, raw_size, name) = match read_record(&mut cursor) {
                Ok(record) => record,
                Err(e) => {
                    // a failed record read consumes nothing, so retrying
                    // from the same position can never reach a later slot
                    warn!("directory record {index} unreadable, stopping: {e}");
                    break;
                }
            };

            if raw_size == 0 {
                if let Some(kind) = sentinel_kind(&name) {
                    current_kind = kind;
                    entries.push(BigEntry {
                        offset,
                        raw_size,
                        name,
                        kind,
                        compression: Compression::None,
                        data: Vec::new(),
                    });
                    continue;
                }
            }

            // clamp the region to the buffer: overruns are truncated, an
            // offset past the end yields an empty region
            let start = (offset as usize).min(data.len());
            let end = (offset as usize)
                .saturating_add(raw_size as usize)
                .min(data.len());
            let raw = &data[start..end];

            let compression = Compression::detect(raw);
            let payload = match compression {
                Compression::Eahd => match eahd::decompress(raw) {
                    Ok(decoded) => decoded,
                    Err(e) => {
                        warn!("entry {name:?}: EAHD decoding failed ({e}), keeping raw bytes");
                        raw.to_vec()
                    }
                },
                Compression::None => raw.to_vec(),
            };

            let kind = if payload.len() >= 4 && payload[..4] == DDS_MAGIC {
                ContentKind::Dds
            } else {
                current_kind
            };

            entries.push(BigEntry {
                offset,
                raw_size,
                name,
                kind,
                compression,
                data: payload,
            });
        }

        // last write wins for duplicate names, matching how the directory
        // is consumed by the editing tools this format comes from
        let by_name = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.name.clone(), i))
            .collect();

        Ok(Self {
            variant,
            declared_size,
            entries,
            by_name,
        })
    }

    /// Which container magic the archive carried.
    pub const fn variant(&self) -> BigVariant {
        self.variant
    }

    /// The header's little-endian declared total size, unvalidated.
    pub const fn declared_size(&self) -> u32 {
        self.declared_size
    }

    /// All entries, in directory order.
    pub fn entries(&self) -> &[BigEntry] {
        &self.entries
    }

    /// Look up an entry by name.
    ///
    /// Duplicate names are legal in the format; the last occurrence wins.
    pub fn get(&self, name: &str) -> Option<&BigEntry> {
        self.by_name.get(name).map(|&i| &self.entries[i])
    }

    /// Number of entries, sentinels included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names of all entries carrying a payload (sentinels and empty regions
    /// excluded).
    pub fn payload_names(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| !e.data.is_empty())
            .map(|e| e.name.as_str())
            .collect()
    }
}

/// One directory record: big-endian offset and raw size, then a
/// NUL-terminated name.
fn read_record(cursor: &mut ByteCursor<'_>) -> Result<(u32, u32, String)> {
    let offset = cursor.read_uint::<BigEndian>(4)? as u32;
    let raw_size = cursor.read_uint::<BigEndian>(4)? as u32;
    let name = cursor.read_cstring();
    Ok((offset, raw_size, name))
}
