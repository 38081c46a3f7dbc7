//! CAT002: monoradar service messages (legacy companion of CAT001).

use crate::item::*;
use crate::property::Property as P;

use super::cat034::{plot_counts, PLOT_COUNTS, ROTATION_PERIOD, SECTOR};

/// I002/000 message types.
pub const MSG_NORTH_MARKER: u8 = 1;
pub const MSG_SECTOR_CROSSING: u8 = 2;
pub const MSG_SOUTH_MARKER: u8 = 3;
pub const MSG_BLIND_ZONE_FILTERING_ON: u8 = 8;
pub const MSG_BLIND_ZONE_FILTERING_OFF: u8 = 9;

const RANGE: Unit = Unit::Distance(NM / 128.0);
const AZIMUTH: Unit = Unit::Angle(360.0 / 65536.0);

/// CAT002 UAP.
pub static UAP: &[Option<DataItem>] = &[
    // FRN 1-7
    fixed(10, "I002/010", 2, DATA_SOURCE),
    fixed(0, "I002/000", 1, MESSAGE_TYPE),
    fixed(20, "I002/020", 1, SECTOR),
    fixed(30, "I002/030", 3, TIME_OF_DAY),
    fixed(41, "I002/041", 2, ROTATION_PERIOD),
    item(
        50,
        "I002/050",
        Shape::Extended { first: 1, ext: 1 },
        Decode::Blob(P::StationStatus),
        &[tag(P::StationStatus, Unit::Blob)],
    ),
    item(
        60,
        "I002/060",
        Shape::Extended { first: 1, ext: 1 },
        Decode::Blob(P::StationMode),
        &[tag(P::StationMode, Unit::Blob)],
    ),
    // FRN 8-14
    item(70, "I002/070", Shape::Repetitive(2), Decode::Custom(plot_counts), PLOT_COUNTS),
    fixed(
        100,
        "I002/100",
        8,
        &[
            f(P::PolarWindowRangeStart, 2, RANGE),
            f(P::PolarWindowRangeEnd, 2, RANGE),
            f(P::PolarWindowAziStart, 2, AZIMUTH),
            f(P::PolarWindowAziEnd, 2, AZIMUTH),
        ],
    ),
    fixed(
        90,
        "I002/090",
        2,
        &[
            f(P::CollimationErrRange, 1, RANGE),
            f(P::CollimationErrAzi, 1, Unit::Angle(360.0 / 16384.0)),
        ],
    ),
    item(80, "I002/080", Shape::Extended { first: 1, ext: 1 }, Decode::Blob(P::WarningError), WARNING_ERROR),
    None,
    special_purpose(),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{decode_record, Category, RecordContext};
    use crate::cursor::Cursor;

    #[test]
    fn test_sector_crossing() {
        // FRN 1-4: sector 64 = 90 degrees
        let data = [0xF0, 0x07, 0x01, 0x02, 0x40, 0x00, 0x20, 0x00];
        let ctx = RecordContext::new(Category::Cat002.default_version());
        let mut cur = Cursor::new(&data);
        let m = decode_record(&mut cur, Category::Cat002, &ctx).unwrap().message;
        assert_eq!(m.get::<u8>(P::MessageType).unwrap(), MSG_SECTOR_CROSSING);
        assert!((m.scaled(P::SectorNumber).unwrap() - 90.0).abs() < 1e-9);
        assert_eq!(m.get::<u32>(P::TimeOfDay).unwrap(), 0x2000);
    }
}
