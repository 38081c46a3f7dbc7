//! Shared error enum, result alias, and byte/text helpers for asterix-core.

use thiserror::Error;

use crate::property::{Property, PropertyKind};

/// All errors produced by asterix-core.
#[derive(Debug, Error)]
pub enum AsterixError {
    #[error("truncated input: needed {needed} bytes, {remaining} remaining")]
    Truncated { needed: usize, remaining: usize },
    #[error("unknown category: {0}")]
    UnknownCategory(u8),
    #[error("unsupported version {major}.{minor} for category {category:03}")]
    UnsupportedVersion { category: u8, major: u8, minor: u8 },
    #[error("malformed FSPEC")]
    MalformedFspec,
    #[error("block length {0} is shorter than the block header")]
    InvalidBlockLength(usize),
    #[error("category {category:03} has no data item at FRN {frn}")]
    UnknownItem { category: u8, frn: usize },
    #[error("invalid data item {item}: {reason}")]
    InvalidItem {
        item: &'static str,
        reason: &'static str,
    },
    #[error("property {property:?} is {expected:?}, requested as {requested:?}")]
    WrongPropertyType {
        property: Property,
        expected: PropertyKind,
        requested: PropertyKind,
    },
    #[error("property not present: {0:?}")]
    PropertyNotPresent(Property),
    #[error("record rejected by SAC/SIC filter")]
    FilterRejected,
    /// A record failed to decode but was walked to its end; the next
    /// record can still be read.
    #[error("record skipped: {0}")]
    RecordSkipped(Box<AsterixError>),
    #[error("conversion not applicable: {0}")]
    NotApplicable(&'static str),
    #[error("invalid parameter {name}={value}")]
    InvalidParameter { name: String, value: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, AsterixError>;

impl AsterixError {
    /// Content error raised while decoding inside an item.
    pub(crate) fn invalid(reason: &'static str) -> Self {
        AsterixError::InvalidItem { item: "", reason }
    }

    /// Attach the item label to an `InvalidItem` that was raised without one.
    pub(crate) fn in_item(self, label: &'static str) -> Self {
        match self {
            AsterixError::InvalidItem { item: "", reason } => {
                AsterixError::InvalidItem { item: label, reason }
            }
            other => other,
        }
    }

    /// True for errors that leave the record boundary unknown.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            AsterixError::Truncated { .. }
                | AsterixError::MalformedFspec
                | AsterixError::UnknownItem { .. }
        )
    }
}

// ---------------------------------------------------------------------------
// Hex helpers
// ---------------------------------------------------------------------------

/// Decode a hex string into bytes. Whitespace between byte pairs is ignored.
pub fn hex_decode(hex: &str) -> Option<Vec<u8>> {
    let digits: Vec<u8> = hex
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    if digits.len() % 2 != 0 {
        return None;
    }
    let mut bytes = Vec::with_capacity(digits.len() / 2);
    for chunk in digits.chunks(2) {
        let high = hex_digit(chunk[0])?;
        let low = hex_digit(chunk[1])?;
        bytes.push((high << 4) | low);
    }
    Some(bytes)
}

/// Encode bytes as uppercase hex string.
pub fn hex_encode(data: &[u8]) -> String {
    let mut s = String::with_capacity(data.len() * 2);
    for &b in data {
        s.push(HEX_CHARS[(b >> 4) as usize] as char);
        s.push(HEX_CHARS[(b & 0x0F) as usize] as char);
    }
    s
}

const HEX_CHARS: &[u8; 16] = b"0123456789ABCDEF";

fn hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Text helpers
// ---------------------------------------------------------------------------

/// ICAO 6-bit character set used for aircraft identification.
/// `#` marks codes with no assigned character.
pub const CALLSIGN_CHARSET: &[u8; 64] =
    b"#ABCDEFGHIJKLMNOPQRSTUVWXYZ##### ###############0123456789######";

/// Unpack 6-bit ICAO characters, four per three octets.
///
/// Unassigned codes become `?`; trailing spaces are trimmed.
pub fn decode_six_bit(bytes: &[u8]) -> String {
    let bits = bytes.len() * 8;
    let mut out = String::with_capacity(bits / 6);
    let mut i = 0;
    while i + 6 <= bits {
        let mut code = 0usize;
        for bit in i..i + 6 {
            let byte = bytes[bit / 8];
            code = (code << 1) | ((byte >> (7 - bit % 8)) & 1) as usize;
        }
        let c = CALLSIGN_CHARSET[code];
        out.push(if c == b'#' { '?' } else { c as char });
        i += 6;
    }
    out.trim_end().to_string()
}

/// Decode fixed-width ASCII text, stopping at the first NUL and trimming
/// trailing spaces. Non-printable octets become `?`.
pub fn decode_ascii(bytes: &[u8]) -> String {
    bytes
        .iter()
        .take_while(|&&b| b != 0)
        .map(|&b| {
            if b.is_ascii_graphic() || b == b' ' {
                b as char
            } else {
                '?'
            }
        })
        .collect::<String>()
        .trim_end()
        .to_string()
}

/// Sign-extend the low `bits` bits of `raw`.
pub fn sign_extend(raw: u32, bits: u32) -> i32 {
    if bits == 0 || bits >= 32 {
        return raw as i32;
    }
    let shift = 32 - bits;
    ((raw << shift) as i32) >> shift
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_decode() {
        assert_eq!(hex_decode("300006"), Some(vec![0x30, 0x00, 0x06]));
        assert_eq!(hex_decode("30 00 06"), Some(vec![0x30, 0x00, 0x06]));
        assert_eq!(hex_decode("odd"), None);
        assert_eq!(hex_decode("ZZZZ"), None);
    }

    #[test]
    fn test_hex_encode() {
        assert_eq!(hex_encode(&[0x30, 0x00, 0x06]), "300006");
        assert_eq!(hex_encode(&[]), "");
    }

    #[test]
    fn test_six_bit_callsign() {
        // "KLM1023 " packed as 6-bit characters
        let bytes = [0x2C, 0xC3, 0x71, 0xC3, 0x2C, 0xE0];
        assert_eq!(decode_six_bit(&bytes), "KLM1023");
    }

    #[test]
    fn test_ascii_stops_at_nul() {
        assert_eq!(decode_ascii(b"EGLL\0\0\0"), "EGLL");
        assert_eq!(decode_ascii(b"RW27   "), "RW27");
        assert_eq!(decode_ascii(&[b'A', 0x07, b'B']), "A?B");
    }

    #[test]
    fn test_sign_extend() {
        assert_eq!(sign_extend(0x3FFF, 14), -1);
        assert_eq!(sign_extend(0x1FFF, 14), 0x1FFF);
        assert_eq!(sign_extend(0x80, 8), -128);
        assert_eq!(sign_extend(0xFFFF_FFFF, 32), -1);
    }

    #[test]
    fn test_in_item_labels_content_errors() {
        let err = AsterixError::invalid("bad length").in_item("I048/120");
        assert!(matches!(
            err,
            AsterixError::InvalidItem {
                item: "I048/120",
                reason: "bad length"
            }
        ));
        assert!(!err.is_structural());
        assert!(AsterixError::MalformedFspec.is_structural());
    }
}
