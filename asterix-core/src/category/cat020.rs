//! CAT020: multilateration target reports.

use crate::item::*;
use crate::property::Property as P;

const HALF_METRE: Unit = Unit::Distance(0.5);
const QUARTER_METRE: Unit = Unit::Distance(0.25);
const QUARTER_MPS: Unit = Unit::Speed(0.25);

static POSITION_ACCURACY: &[Option<DataItem>] = &[
    fixed(
        0,
        "DOP",
        6,
        &[
            f(P::PosAccuracyDopX, 2, Unit::Scaled(0.25, "")),
            f(P::PosAccuracyDopY, 2, Unit::Scaled(0.25, "")),
            f(P::PosAccuracyDopXy, 2, Unit::Scaled(0.25, "")),
        ],
    ),
    fixed(
        0,
        "SDP",
        6,
        &[
            f(P::PosAccuracySdX, 2, QUARTER_METRE),
            f(P::PosAccuracySdY, 2, QUARTER_METRE),
            f(P::PosAccuracySdXy, 2, Unit::Scaled(0.25, "m2")),
        ],
    ),
    fixed(0, "SDH", 2, &[f(P::PosAccuracySdGh, 2, Unit::Height(0.5))]),
];

/// CAT020 UAP.
pub static UAP: &[Option<DataItem>] = &[
    // FRN 1-7
    fixed(10, "I020/010", 2, DATA_SOURCE),
    extended(
        20,
        "I020/020",
        &[
            f(P::TargetReport, 1, Unit::Flags),
            f(P::TargetReportExt, 1, Unit::Flags),
            f(P::TargetReportExt2, 1, Unit::Flags),
        ],
    ),
    fixed(140, "I020/140", 3, TIME_OF_DAY),
    fixed(
        41,
        "I020/041",
        8,
        &[
            f(P::PosLatitude, 4, Unit::Latitude(180.0 / 33554432.0)),
            f(P::PosLongitude, 4, Unit::Longitude(180.0 / 33554432.0)),
        ],
    ),
    fixed(42, "I020/042", 6, &[f(P::CalcPosXHighPrec, 3, HALF_METRE), f(P::CalcPosYHighPrec, 3, HALF_METRE)]),
    fixed(161, "I020/161", 2, &[fb(P::TrackNumber, 2, 12, Unit::Raw)]),
    extended(170, "I020/170", &[f(P::TrackStatus, 1, Unit::Flags), f(P::TrackStatusExt, 1, Unit::Flags)]),
    // FRN 8-14
    fixed(70, "I020/070", 2, MODE_3A),
    fixed(202, "I020/202", 4, &[f(P::CalcVelocityX, 2, QUARTER_MPS), f(P::CalcVelocityY, 2, QUARTER_MPS)]),
    item(90, "I020/090", Shape::Fixed(2), Decode::Custom(flight_level_vg), FLIGHT_LEVEL_VG),
    fixed(100, "I020/100", 4, &[f(P::ModeCConf, 4, Unit::Flags)]),
    fixed(220, "I020/220", 3, AIRCRAFT_ADDRESS),
    item(245, "I020/245", Shape::Fixed(7), Decode::Custom(target_identification), TARGET_IDENTIFICATION),
    fixed(110, "I020/110", 2, &[f(P::Measured3dHeight, 2, Unit::Height(6.25 * FT))]),
    // FRN 15-21
    fixed(105, "I020/105", 2, &[f(P::GeometricHeight, 2, Unit::Height(6.25 * FT))]),
    fixed(
        210,
        "I020/210",
        2,
        &[f(P::CalcAccelX, 1, Unit::Scaled(0.25, "m/s2")), f(P::CalcAccelY, 1, Unit::Scaled(0.25, "m/s2"))],
    ),
    fixed(300, "I020/300", 1, &[f(P::VehicleFleet, 1, Unit::Raw)]),
    fixed(310, "I020/310", 1, &[f(P::PreprogMsg, 1, Unit::Raw)]),
    compound(500, "I020/500", POSITION_ACCURACY),
    item(
        400,
        "I020/400",
        Shape::Repetitive(1),
        Decode::Blob(P::ContributingReceivers),
        &[tag(P::ContributingReceivers, Unit::Blob)],
    ),
    item(250, "I020/250", Shape::Repetitive(8), Decode::Blob(P::ModeSMbData), MODE_S_MB),
    // FRN 22-28
    fixed(230, "I020/230", 2, &[f(P::CommsStatus, 2, Unit::Flags)]),
    item(260, "I020/260", Shape::Fixed(7), Decode::Blob(P::AcasResAdvReport), &[tag(P::AcasResAdvReport, Unit::Blob)]),
    item(30, "I020/030", Shape::Extended { first: 1, ext: 1 }, Decode::Blob(P::WarningError), WARNING_ERROR),
    fixed(55, "I020/055", 1, &[f(P::Mode1, 1, Unit::Octal)]),
    fixed(50, "I020/050", 2, &[f(P::Mode2, 2, Unit::Octal)]),
    reserved_skip(),
    special_purpose(),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{decode_record, Category, RecordContext};
    use crate::cursor::Cursor;

    #[test]
    fn test_high_precision_position() {
        // FRN 1, 5 (042); x = -2 m, y = 1000 m
        let data = [0x88, 0x01, 0x02, 0xFF, 0xFF, 0xFC, 0x00, 0x07, 0xD0];
        let ctx = RecordContext::new(Category::Cat020.default_version());
        let mut cur = Cursor::new(&data);
        let m = decode_record(&mut cur, Category::Cat020, &ctx).unwrap().message;
        assert_eq!(m.get::<i32>(P::CalcPosXHighPrec).unwrap(), -4);
        assert!((m.scaled(P::CalcPosYHighPrec).unwrap() - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_contributing_receivers() {
        // FRN 20 (400): two receiver bitmap octets
        let data = [0x01, 0x01, 0x04, 0x02, 0xA0, 0x01];
        let ctx = RecordContext::new(Category::Cat020.default_version());
        let mut cur = Cursor::new(&data);
        let m = decode_record(&mut cur, Category::Cat020, &ctx).unwrap().message;
        assert_eq!(m.get_data(P::ContributingReceivers).unwrap(), &[0xA0, 0x01]);
    }
}
