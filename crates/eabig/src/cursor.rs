//! Position-tracked reading over in-memory byte buffers
//!
//! Both the BIG directory and EAHD streams are parsed out of a single
//! in-memory buffer, mixing endiannesses and field widths (the EAHD size
//! header is a 3-byte big-endian integer). [`ByteCursor`] keeps the bounds
//! checks in one place so the format code above it can stay linear.

use byteorder::ByteOrder;

use crate::{Error, Result};

/// A bounds-checked reader over a borrowed byte buffer.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor at position 0.
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current read position.
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left between the position and the end of the buffer.
    pub const fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// `true` while at least one byte remains.
    pub const fn has_remaining(&self) -> bool {
        self.pos < self.data.len()
    }

    /// Read `count` raw bytes, advancing the position.
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        if count > self.remaining() {
            return Err(Error::UnexpectedEof {
                expected: count,
                remaining: self.remaining(),
            });
        }
        let bytes = &self.data[self.pos..self.pos + count];
        self.pos += count;
        Ok(bytes)
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    /// Read a `width`-byte unsigned integer with the endianness of `B`.
    ///
    /// Widths of 1 through 8 bytes are supported; the BIG directory uses 4
    /// and the EAHD size header uses 3.
    pub fn read_uint<B: ByteOrder>(&mut self, width: usize) -> Result<u64> {
        debug_assert!((1..=8).contains(&width));
        let bytes = self.read_bytes(width)?;
        Ok(B::read_uint(bytes, width))
    }

    /// Read a NUL-terminated string, decoding lossily as UTF-8.
    ///
    /// Stops at the first `0x00` byte (consumed, not returned) or at the end
    /// of the buffer. Never fails; an unterminated string simply takes the
    /// rest of the buffer.
    pub fn read_cstring(&mut self) -> String {
        let start = self.pos;
        while self.pos < self.data.len() && self.data[self.pos] != 0 {
            self.pos += 1;
        }
        let s = String::from_utf8_lossy(&self.data[start..self.pos]).into_owned();
        if self.pos < self.data.len() {
            self.pos += 1; // consume the terminator
        }
        s
    }

    /// Read exactly `length` bytes as a lossy UTF-8 string, stripping
    /// trailing NUL padding.
    pub fn read_fixed_string(&mut self, length: usize) -> Result<String> {
        let bytes = self.read_bytes(length)?;
        let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
        Ok(String::from_utf8_lossy(&bytes[..end]).into_owned())
    }

    /// Advance the position by `count`, saturating at the end of the buffer.
    pub const fn skip(&mut self, count: usize) {
        self.pos = self.pos.saturating_add(count);
        if self.pos > self.data.len() {
            self.pos = self.data.len();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::{BigEndian, LittleEndian};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_read_u8_and_eof() {
        let mut c = ByteCursor::new(&[0xAB]);
        assert_eq!(c.read_u8().unwrap(), 0xAB);
        assert!(!c.has_remaining());

        let err = c.read_u8().unwrap_err();
        assert!(matches!(
            err,
            Error::UnexpectedEof {
                expected: 1,
                remaining: 0
            }
        ));
    }

    #[test]
    fn test_read_uint_endianness() {
        let data = [0x12, 0x34, 0x56, 0x78];

        let mut c = ByteCursor::new(&data);
        assert_eq!(c.read_uint::<BigEndian>(4).unwrap(), 0x12345678);
        assert_eq!(c.position(), 4);

        let mut c = ByteCursor::new(&data);
        assert_eq!(c.read_uint::<LittleEndian>(4).unwrap(), 0x78563412);
    }

    #[test]
    fn test_read_uint_narrow_widths() {
        // 2- and 3-byte reads are what the EAHD header needs
        let mut c = ByteCursor::new(&[0xFB, 0x10, 0x01, 0x02, 0x03]);
        assert_eq!(c.read_uint::<BigEndian>(2).unwrap(), 0xFB10);
        assert_eq!(c.read_uint::<BigEndian>(3).unwrap(), 0x010203);
        assert_eq!(c.remaining(), 0);
    }

    #[test]
    fn test_read_uint_eof() {
        let mut c = ByteCursor::new(&[0x01, 0x02]);
        let err = c.read_uint::<BigEndian>(4).unwrap_err();
        assert!(matches!(
            err,
            Error::UnexpectedEof {
                expected: 4,
                remaining: 2
            }
        ));
        // a failed read must not advance the position
        assert_eq!(c.position(), 0);
    }

    #[test]
    fn test_read_cstring_terminated() {
        let mut c = ByteCursor::new(b"sg1\0tex");
        assert_eq!(c.read_cstring(), "sg1");
        assert_eq!(c.position(), 4); // terminator consumed
        assert_eq!(c.read_cstring(), "tex");
        assert_eq!(c.remaining(), 0);
    }

    #[test]
    fn test_read_cstring_unterminated() {
        let mut c = ByteCursor::new(b"abc");
        assert_eq!(c.read_cstring(), "abc");
        assert!(!c.has_remaining());
        // at EOF, further reads yield empty strings rather than errors
        assert_eq!(c.read_cstring(), "");
    }

    #[test]
    fn test_read_cstring_lossy() {
        let mut c = ByteCursor::new(&[0x61, 0xFF, 0x62, 0x00]);
        assert_eq!(c.read_cstring(), "a\u{FFFD}b");
    }

    #[test]
    fn test_read_fixed_string_strips_padding() {
        let mut c = ByteCursor::new(b"DDS \0\0\0\0rest");
        assert_eq!(c.read_fixed_string(8).unwrap(), "DDS ");
        assert_eq!(c.position(), 8);
    }

    #[test]
    fn test_read_fixed_string_eof() {
        let mut c = ByteCursor::new(b"ab");
        assert!(matches!(
            c.read_fixed_string(3).unwrap_err(),
            Error::UnexpectedEof { .. }
        ));
    }

    #[test]
    fn test_skip_saturates() {
        let mut c = ByteCursor::new(&[1, 2, 3]);
        c.skip(2);
        assert_eq!(c.position(), 2);
        c.skip(100);
        assert_eq!(c.position(), 3);
        assert!(!c.has_remaining());
    }
}
