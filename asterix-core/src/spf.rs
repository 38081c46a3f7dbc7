//! Project-specific special purpose field (SPF) layouts.
//!
//! The SPF is stored raw on every record. When the decoder's project code
//! names a known layout, the blob is decoded on first access into its own
//! property store. An SPF layout is a sub-FSPEC followed by the flagged
//! sub-items, walked with the same machinery as compound items.

use crate::cursor::Cursor;
use crate::item::*;
use crate::message::PropertyStore;
use crate::property::Property as P;
use crate::types::Result;

/// Project code of the P466 CAT048 SPF.
pub const PROJECT_P466: u32 = 466;

static P466: &[Option<DataItem>] = &[
    fixed(
        0,
        "IDN",
        3,
        &[f(P::SpfP466SysTrack, 2, Unit::Raw), f(P::SpfP466Identity, 1, Unit::Raw)],
    ),
    fixed(0, "QUA", 1, &[f(P::SpfP466Quality, 1, Unit::Raw)]),
    fixed(0, "M6", 1, &[f(P::SpfP466M6, 1, Unit::Raw)]),
    fixed(0, "CLS", 1, &[f(P::SpfP466Classification, 1, Unit::Raw)]),
    fixed(0, "ALT", 2, &[f(P::SpfP466Altitude, 2, Unit::Height(25.0 * FT))]),
    fixed(
        0,
        "POS",
        8,
        &[
            f(P::SpfP466Latitude, 4, Unit::Latitude(180.0 / 2147483648.0)),
            f(P::SpfP466Longitude, 4, Unit::Longitude(180.0 / 2147483648.0)),
        ],
    ),
    fixed(
        0,
        "VEL",
        4,
        &[
            f(P::SpfP466Speed, 2, Unit::Speed(NM / 16384.0)),
            f(P::SpfP466Heading, 2, Unit::Angle(360.0 / 65536.0)),
        ],
    ),
    // FX
    item(0, "CSN", Shape::Fixed(8), Decode::Ascii(P::SpfP466Callsign), &[tag(P::SpfP466Callsign, Unit::Text)]),
    item(0, "PLT", Shape::Fixed(8), Decode::Ascii(P::SpfP466PlatType), &[tag(P::SpfP466PlatType, Unit::Text)]),
];

/// Sub-item table for a project's SPF, if it has one.
pub fn layout(project_code: u32) -> Option<Uap> {
    match project_code {
        PROJECT_P466 => Some(P466),
        _ => None,
    }
}

/// Decode SPF contents (without the length octet).
///
/// `Ok(None)` when the project has no known layout.
pub fn decode(project_code: u32, data: &[u8]) -> Result<Option<PropertyStore>> {
    let Some(uap) = layout(project_code) else {
        return Ok(None);
    };
    let mut store = PropertyStore::new();
    let mut cur = Cursor::new(data);
    decode_sub_items(&mut cur, uap, &mut store)?;
    if !cur.is_empty() {
        log::trace!("SPF for project {project_code}: {} trailing bytes", cur.remaining());
    }
    Ok(Some(store))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::AsterixMessage;
    use crate::version::Version;

    // IDN, ALT, FX; CSN
    const SPF: &[u8] = &[
        0x89, 0x80, // FSPEC
        0x01, 0x2C, 0x03, // system track 300, identity 3
        0x00, 0x28, // 1000 ft
        b'R', b'O', b'G', b'U', b'E', b'1', b' ', b' ',
    ];

    #[test]
    fn test_unknown_project() {
        assert!(layout(0).is_none());
        assert!(decode(12, SPF).unwrap().is_none());
    }

    #[test]
    fn test_p466_decode() {
        let store = decode(PROJECT_P466, SPF).unwrap().unwrap();
        assert_eq!(store.get::<u16>(P::SpfP466SysTrack).unwrap(), 300);
        assert_eq!(store.get::<u8>(P::SpfP466Identity).unwrap(), 3);
        assert_eq!(store.get::<i16>(P::SpfP466Altitude).unwrap(), 40);
        assert_eq!(store.get_text(P::SpfP466Callsign).unwrap(), "ROGUE1");
        assert!(!store.contains(P::SpfP466Quality));
    }

    #[test]
    fn test_p466_truncated() {
        assert!(decode(PROJECT_P466, &SPF[..6]).is_err());
    }

    #[test]
    fn test_message_reads_spf_lazily() {
        let mut m = AsterixMessage::with_context(48, Version::new(1, 31), PROJECT_P466, 0, &[]);
        m.set_data(P::Spf, SPF.to_vec()).unwrap();
        assert!(m.contains(P::SpfP466SysTrack));
        assert_eq!(m.get::<u16>(P::SpfP466SysTrack).unwrap(), 300);
        assert!((m.scaled(P::SpfP466Altitude).unwrap() - 1000.0 * FT).abs() < 1e-9);
        assert!(m.spf_store().is_some());
    }
}
