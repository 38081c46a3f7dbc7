//! Bounds-checked big-endian reader over a byte slice.
//!
//! A cursor never reads past the end of the slice it was built over. Nested
//! structures (blocks, records, items) are decoded from sub-cursors so a
//! malformed inner length can never run into the next structure.

use crate::types::{AsterixError, Result};

/// Read position within a bounded byte slice.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
    /// Offset of `buf[0]` within the outermost input, for diagnostics.
    base: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Cursor { buf, pos: 0, base: 0 }
    }

    /// Position relative to the start of this cursor.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Position relative to the outermost input buffer.
    pub fn absolute_position(&self) -> usize {
        self.base + self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Unread bytes, without consuming them.
    pub fn rest(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }

    fn need(&self, n: usize) -> Result<()> {
        if n > self.remaining() {
            return Err(AsterixError::Truncated {
                needed: n,
                remaining: self.remaining(),
            });
        }
        Ok(())
    }

    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.need(n)?;
        self.pos += n;
        Ok(())
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.need(n)?;
        let bytes = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    /// Split off the next `n` bytes as an independent cursor and advance
    /// past them.
    pub fn sub_cursor(&mut self, n: usize) -> Result<Cursor<'a>> {
        let base = self.absolute_position();
        let buf = self.read_bytes(n)?;
        Ok(Cursor { buf, pos: 0, base })
    }

    pub fn peek_u8(&self) -> Result<u8> {
        self.peek_at(0)
    }

    /// Byte at `offset` past the current position, without consuming.
    pub fn peek_at(&self, offset: usize) -> Result<u8> {
        self.need(offset + 1)?;
        Ok(self.buf[self.pos + offset])
    }

    pub fn peek_u16(&self) -> Result<u16> {
        Ok(u16::from_be_bytes([self.peek_at(0)?, self.peek_at(1)?]))
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        let b = self.read_bytes(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    pub fn read_u24(&mut self) -> Result<u32> {
        let b = self.read_bytes(3)?;
        Ok(u32::from_be_bytes([0, b[0], b[1], b[2]]))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let b = self.read_bytes(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(self.read_u16()? as i16)
    }

    /// 24-bit two's complement, sign-extended.
    pub fn read_i24(&mut self) -> Result<i32> {
        Ok(((self.read_u24()? << 8) as i32) >> 8)
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(self.read_u32()? as i32)
    }

    /// Unsigned big-endian integer of 1 to 4 octets.
    pub fn read_uint(&mut self, width: usize) -> Result<u32> {
        if !(1..=4).contains(&width) {
            return Err(AsterixError::invalid("field width outside 1..=4 octets"));
        }
        let b = self.read_bytes(width)?;
        Ok(b.iter().fold(0u32, |acc, &x| (acc << 8) | x as u32))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_big_endian() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A];
        let mut c = Cursor::new(&data);
        assert_eq!(c.read_u8().unwrap(), 0x01);
        assert_eq!(c.read_u16().unwrap(), 0x0203);
        assert_eq!(c.read_u24().unwrap(), 0x040506);
        assert_eq!(c.read_u32().unwrap(), 0x0708090A);
        assert!(c.is_empty());
    }

    #[test]
    fn test_signed_reads() {
        let data = [0xFF, 0xFF, 0xFE, 0xFF, 0xFF, 0xFD, 0x80, 0x00, 0x00, 0x00];
        let mut c = Cursor::new(&data);
        assert_eq!(c.read_i8().unwrap(), -1);
        assert_eq!(c.read_i16().unwrap(), -2);
        assert_eq!(c.read_i24().unwrap(), -3);
        assert_eq!(c.read_i32().unwrap(), i32::MIN);
    }

    #[test]
    fn test_overrun_is_truncated_and_does_not_advance() {
        let data = [0x01, 0x02];
        let mut c = Cursor::new(&data);
        let err = c.read_u24().unwrap_err();
        assert!(matches!(
            err,
            AsterixError::Truncated {
                needed: 3,
                remaining: 2
            }
        ));
        assert_eq!(c.position(), 0);
        assert_eq!(c.read_u16().unwrap(), 0x0102);
        assert!(c.read_u8().is_err());
    }

    #[test]
    fn test_sub_cursor_is_bounded() {
        let data = [0xAA, 0xBB, 0xCC, 0xDD];
        let mut c = Cursor::new(&data);
        c.skip(1).unwrap();
        let mut sub = c.sub_cursor(2).unwrap();
        assert_eq!(c.position(), 3);
        assert_eq!(sub.absolute_position(), 1);
        assert_eq!(sub.read_u16().unwrap(), 0xBBCC);
        assert!(sub.read_u8().is_err());
        assert!(c.sub_cursor(2).is_err());
    }

    #[test]
    fn test_peek_does_not_consume() {
        let data = [0x30, 0x00, 0x10];
        let c = Cursor::new(&data);
        assert_eq!(c.peek_u8().unwrap(), 0x30);
        assert_eq!(c.peek_at(2).unwrap(), 0x10);
        assert!(c.peek_at(3).is_err());
        assert_eq!(c.position(), 0);
    }

    #[test]
    fn test_read_uint_widths() {
        let data = [0x12, 0x34, 0x56];
        let mut c = Cursor::new(&data);
        assert_eq!(c.read_uint(3).unwrap(), 0x123456);
        let mut c = Cursor::new(&data);
        assert!(c.read_uint(5).is_err());
    }
}
