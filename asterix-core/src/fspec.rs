//! Field specification (FSPEC) parsing.
//!
//! An FSPEC is a chain of octets. Bits 8..2 of each octet flag the presence
//! of the next seven field reference numbers (FRNs); bit 1 (FX) says whether
//! another FSPEC octet follows. FRNs are 1-based: bit 8 of the first octet
//! is FRN 1, bit 8 of the second octet is FRN 8.

use crate::cursor::Cursor;
use crate::types::{AsterixError, Result};

/// Presence bitmap borrowed from the input buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fspec<'a> {
    octets: &'a [u8],
}

impl<'a> Fspec<'a> {
    /// Read an FSPEC chain at the cursor.
    ///
    /// Fails with `MalformedFspec` when no octet is available or the buffer
    /// ends while the last octet still has FX set.
    pub fn read(cur: &mut Cursor<'a>) -> Result<Fspec<'a>> {
        let rest = cur.rest();
        let len = rest
            .iter()
            .position(|b| b & 0x01 == 0)
            .map(|i| i + 1)
            .ok_or(AsterixError::MalformedFspec)?;
        let octets = cur.read_bytes(len)?;
        Ok(Fspec { octets })
    }

    pub fn len_octets(&self) -> usize {
        self.octets.len()
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.octets
    }

    /// True if the item with this 1-based FRN is present.
    pub fn is_set(&self, frn: usize) -> bool {
        if frn == 0 {
            return false;
        }
        let idx = frn - 1;
        match self.octets.get(idx / 7) {
            Some(b) => b & (0x80 >> (idx % 7)) != 0,
            None => false,
        }
    }

    /// Present FRNs in ascending order.
    pub fn items(&self) -> impl Iterator<Item = usize> + 'a {
        let octets: &'a [u8] = self.octets;
        octets.iter().enumerate().flat_map(|(i, &b)| {
            (0..7usize)
                .filter(move |bit| b & (0x80 >> bit) != 0)
                .map(move |bit| i * 7 + bit + 1)
        })
    }

    pub fn count(&self) -> usize {
        self.octets
            .iter()
            .map(|b| (b & 0xFE).count_ones() as usize)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_octet() {
        let data = [0b1010_0000, 0xFF];
        let mut c = Cursor::new(&data);
        let fs = Fspec::read(&mut c).unwrap();
        assert_eq!(fs.len_octets(), 1);
        assert_eq!(c.position(), 1);
        assert_eq!(fs.items().collect::<Vec<_>>(), vec![1, 3]);
        assert!(fs.is_set(1));
        assert!(!fs.is_set(2));
        assert!(!fs.is_set(8));
        assert_eq!(fs.count(), 2);
    }

    #[test]
    fn test_extended_chain() {
        // FRN 1, FX; FRN 8 and 14, FX; FRN 15
        let data = [0x81, 0x83, 0x80];
        let mut c = Cursor::new(&data);
        let fs = Fspec::read(&mut c).unwrap();
        assert_eq!(fs.len_octets(), 3);
        assert_eq!(fs.items().collect::<Vec<_>>(), vec![1, 8, 14, 15]);
        assert!(c.is_empty());
    }

    #[test]
    fn test_fx_at_end_of_buffer_is_malformed() {
        let data = [0x81, 0x01];
        let mut c = Cursor::new(&data);
        assert!(matches!(
            Fspec::read(&mut c),
            Err(AsterixError::MalformedFspec)
        ));
        assert_eq!(c.position(), 0);
    }

    #[test]
    fn test_empty_buffer_is_malformed() {
        let mut c = Cursor::new(&[]);
        assert!(matches!(
            Fspec::read(&mut c),
            Err(AsterixError::MalformedFspec)
        ));
    }

    #[test]
    fn test_fx_bit_is_not_an_item() {
        let data = [0x01, 0x00];
        let mut c = Cursor::new(&data);
        let fs = Fspec::read(&mut c).unwrap();
        assert!(fs.is_empty());
        assert_eq!(fs.items().count(), 0);
    }
}
