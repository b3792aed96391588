//! EAHD compression
//!
//! A greedy LZ77 matcher constrained to the command encodings the decoder
//! understands. Match candidates come from a hash chain over 3-byte keys;
//! the newest candidates are tried first and the longest encodable match
//! wins. Output produced here always round-trips through
//! [`decompress`](super::decompress).

use byteorder::{BigEndian, ByteOrder};
use tracing::debug;

use crate::{EAHD_MAGIC, Error, Result};

/// Largest input the 3-byte decompressed-size header can describe.
pub const MAX_INPUT_SIZE: usize = 0xFF_FFFF;

/// Farthest back any command encoding can reach.
const MAX_DISTANCE: usize = 0x20000;

/// Longest copy any command encoding can express.
const MAX_COPY: usize = 1028;

/// Copy commands carry at most this many literals themselves.
const MAX_SHORT_LITERAL: usize = 3;

/// Largest literal run a single `0xE0`-range command can carry.
const MAX_RUN_LITERAL: usize = 112;

/// How many hash-chain candidates to try per position.
const CHAIN_LIMIT: usize = 64;

const NO_POS: usize = usize::MAX;
const HASH_BITS: u32 = 15;

/// Compress `data` into an EAHD stream.
///
/// Fails with [`Error::InputTooLarge`] when `data` exceeds
/// [`MAX_INPUT_SIZE`]; compression itself cannot fail.
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    if data.len() > MAX_INPUT_SIZE {
        return Err(Error::InputTooLarge {
            size: data.len(),
            max: MAX_INPUT_SIZE,
        });
    }

    let mut out = Vec::with_capacity(data.len() / 2 + 8);
    out.extend_from_slice(&EAHD_MAGIC);
    let mut size = [0u8; 3];
    BigEndian::write_uint(&mut size, data.len() as u64, 3);
    out.extend_from_slice(&size);

    let mut chain = HashChain::new(data.len());
    let mut pos = 0;
    let mut literal_start = 0;

    while pos < data.len() {
        let best = if pos + 3 <= data.len() {
            chain.find_match(data, pos)
        } else {
            None
        };

        if let Some((distance, len)) = best {
            flush_runs(&mut out, data, &mut literal_start, pos);
            emit_copy(&mut out, &data[literal_start..pos], distance, len);
            for i in pos..pos + len {
                chain.insert(data, i);
            }
            pos += len;
            literal_start = pos;
        } else {
            chain.insert(data, pos);
            pos += 1;
        }
    }

    flush_runs(&mut out, data, &mut literal_start, data.len());
    let rem = data.len() - literal_start;
    out.push(0xFC | rem as u8);
    out.extend_from_slice(&data[literal_start..]);

    debug!("EAHD: {} bytes -> {} bytes", data.len(), out.len());
    Ok(out)
}

/// Whether some command encoding can express this (distance, length) pair.
const fn encodable(distance: usize, len: usize) -> bool {
    (len >= 3 && distance <= 0x400)
        || (len >= 4 && distance <= 0x4000)
        || (len >= 5 && distance <= MAX_DISTANCE)
}

/// Reduce pending literals to at most [`MAX_SHORT_LITERAL`] by emitting
/// `0xE0`-range run commands (multiples of 4, up to 112 bytes each).
fn flush_runs(out: &mut Vec<u8>, data: &[u8], literal_start: &mut usize, pos: usize) {
    while pos - *literal_start > MAX_SHORT_LITERAL {
        let pending = pos - *literal_start;
        let run = (pending & !3).min(MAX_RUN_LITERAL);
        out.push(0xE0 | ((run - 4) >> 2) as u8);
        out.extend_from_slice(&data[*literal_start..*literal_start + run]);
        *literal_start += run;
    }
}

/// Emit one copy command carrying up to 3 leading literals, using the
/// smallest encoding that fits the pair.
fn emit_copy(out: &mut Vec<u8>, literals: &[u8], distance: usize, len: usize) {
    debug_assert!(literals.len() <= MAX_SHORT_LITERAL);
    debug_assert!(encodable(distance, len) && len <= MAX_COPY);

    let lit = literals.len() as u8;
    let d = distance - 1;

    if len <= 10 && distance <= 0x400 {
        out.push((((d >> 8) as u8) << 5) | (((len - 3) as u8) << 2) | lit);
        out.push((d & 0xFF) as u8);
    } else if len >= 4 && len <= 67 && distance <= 0x4000 {
        out.push(0x80 | (len - 4) as u8);
        out.push((lit << 6) | ((d >> 8) as u8 & 0x3F));
        out.push((d & 0xFF) as u8);
    } else {
        out.push(
            0xC0 | (((d >> 16) as u8 & 0x01) << 4) | ((((len - 5) >> 8) as u8 & 0x03) << 2) | lit,
        );
        out.push(((d >> 8) & 0xFF) as u8);
        out.push((d & 0xFF) as u8);
        out.push(((len - 5) & 0xFF) as u8);
    }
    out.extend_from_slice(literals);
}

/// Hash chain over 3-byte keys: `head` maps a key hash to the newest
/// position, `prev` links each inserted position to the previous one with
/// the same hash.
struct HashChain {
    head: Vec<usize>,
    prev: Vec<usize>,
}

impl HashChain {
    fn new(len: usize) -> Self {
        Self {
            head: vec![NO_POS; 1 << HASH_BITS],
            prev: vec![NO_POS; len],
        }
    }

    fn hash(data: &[u8], i: usize) -> usize {
        let key = u32::from(data[i]) << 16 | u32::from(data[i + 1]) << 8 | u32::from(data[i + 2]);
        (key.wrapping_mul(0x9E37_79B1) >> (32 - HASH_BITS)) as usize
    }

    fn insert(&mut self, data: &[u8], i: usize) {
        if i + 3 > data.len() {
            return;
        }
        let h = Self::hash(data, i);
        self.prev[i] = self.head[h];
        self.head[h] = i;
    }

    /// Longest encodable match at `pos`, as `(distance, len)`.
    fn find_match(&self, data: &[u8], pos: usize) -> Option<(usize, usize)> {
        let max_len = (data.len() - pos).min(MAX_COPY);
        let mut best: Option<(usize, usize)> = None;
        let mut candidate = self.head[Self::hash(data, pos)];

        for _ in 0..CHAIN_LIMIT {
            if candidate == NO_POS {
                break;
            }
            let distance = pos - candidate;
            if distance > MAX_DISTANCE {
                break;
            }

            // hash collisions are possible, so verify from the start;
            // the match may extend past `candidate + distance` (overlap)
            let mut len = 0;
            while len < max_len && data[candidate + len] == data[pos + len] {
                len += 1;
            }

            if encodable(distance, len) && best.is_none_or(|(_, b)| len > b) {
                best = Some((distance, len));
                if len == max_len {
                    break;
                }
            }
            candidate = self.prev[candidate];
        }
        best
    }
}
