//! CAT019: multilateration system status.

use crate::item::*;
use crate::property::Property as P;

/// I019/000 message types.
pub const MSG_START_OF_UPDATE_CYCLE: u8 = 1;
pub const MSG_PERIODIC_STATUS: u8 = 2;
pub const MSG_EVENT_STATUS: u8 = 3;

/// CAT019 UAP.
pub static UAP: &[Option<DataItem>] = &[
    // FRN 1-7
    fixed(10, "I019/010", 2, DATA_SOURCE),
    fixed(0, "I019/000", 1, MESSAGE_TYPE),
    fixed(140, "I019/140", 3, TIME_OF_DAY),
    fixed(550, "I019/550", 1, &[f(P::SystemStatus, 1, Unit::Flags)]),
    fixed(551, "I019/551", 1, &[f(P::ProcessorStatus, 1, Unit::Flags)]),
    item(552, "I019/552", Shape::Repetitive(2), Decode::Blob(P::SensorStatus), &[tag(P::SensorStatus, Unit::Blob)]),
    item(
        553,
        "I019/553",
        Shape::Extended { first: 1, ext: 1 },
        Decode::Blob(P::RefTransponderStatus),
        &[tag(P::RefTransponderStatus, Unit::Blob)],
    ),
    // FRN 8-14
    fixed(
        600,
        "I019/600",
        8,
        &[
            f(P::PosLatitude, 4, Unit::Latitude(180.0 / 1073741824.0)),
            f(P::PosLongitude, 4, Unit::Longitude(180.0 / 1073741824.0)),
        ],
    ),
    fixed(610, "I019/610", 2, &[f(P::PosHeight, 2, Unit::Height(0.25))]),
    fixed(620, "I019/620", 1, &[f(P::Wgs84Undulation, 1, Unit::Height(1.0))]),
    None,
    None,
    reserved_skip(),
    special_purpose(),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{decode_record, Category, RecordContext};
    use crate::cursor::Cursor;

    fn decode(data: &[u8]) -> crate::message::AsterixMessage {
        let ctx = RecordContext::new(Category::Cat019.default_version());
        let mut cur = Cursor::new(data);
        let out = decode_record(&mut cur, Category::Cat019, &ctx).unwrap();
        assert!(cur.is_empty());
        out.message
    }

    #[test]
    fn test_periodic_status() {
        // FRN 1-5
        let m = decode(&[0xF8, 0x01, 0x02, 0x02, 0x00, 0x00, 0x80, 0x40, 0x80]);
        assert_eq!(m.get::<u8>(P::MessageType).unwrap(), MSG_PERIODIC_STATUS);
        assert_eq!(m.get::<u8>(P::SystemStatus).unwrap(), 0x40);
        assert_eq!(m.get::<u8>(P::ProcessorStatus).unwrap(), 0x80);
    }

    #[test]
    fn test_reference_point() {
        // FRN 1, FX; FRN 8 (600), 9 (610), 10 (620)
        let m = decode(&[
            0x81, 0xE0, 0x01, 0x02, // FSPEC, source
            0x10, 0x00, 0x00, 0x00, 0xE0, 0x00, 0x00, 0x00, // 45 N, 90 W
            0x01, 0x90, // 100 m
            0xFE, // -2 m
        ]);
        assert!((m.scaled(P::PosLatitude).unwrap() - 45.0).abs() < 1e-9);
        assert!((m.scaled(P::PosLongitude).unwrap() + 90.0).abs() < 1e-9);
        assert!((m.scaled(P::PosHeight).unwrap() - 100.0).abs() < 1e-9);
        assert_eq!(m.get::<i8>(P::Wgs84Undulation).unwrap(), -2);
    }
}
