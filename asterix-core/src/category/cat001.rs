//! CAT001: monoradar plots and tracks.
//!
//! Plots and tracks share the category but use different UAPs; the TYP bit
//! of I001/020 (or a configured UAP code) selects one.

use crate::cursor::Cursor;
use crate::item::*;
use crate::message::PropertyStore;
use crate::property::Property as P;
use crate::types::Result;

/// I001/020 TYP bit: set for track reports.
pub const TYP_TRACK: u8 = 0x80;
/// I001/020 SSR/PSR detection field values.
pub const DETECTION_NONE: u8 = 0;
pub const DETECTION_PSR: u8 = 1;
pub const DETECTION_SSR: u8 = 2;
pub const DETECTION_SSR_PSR: u8 = 3;

const RANGE: Unit = Unit::Distance(NM / 128.0);
const AZIMUTH: Unit = Unit::Angle(360.0 / 65536.0);
const CART: Unit = Unit::Distance(NM / 64.0);
const SPEED: Unit = Unit::Speed(NM / 16384.0);

const TARGET_REPORT: &[Field] = &[
    f(P::TargetReport, 1, Unit::Flags),
    f(P::TargetReportExt, 1, Unit::Flags),
    tag(P::TargetReportType, Unit::Raw),
];

/// Target report descriptor; the report type is the SSR/PSR field.
fn target_report(cur: &mut Cursor<'_>, store: &mut PropertyStore) -> Result<()> {
    let first = cur.read_u8()?;
    store.set(P::TargetReport, first)?;
    store.set(P::TargetReportType, (first >> 4) & 0x03)?;
    if !cur.is_empty() {
        store.set(P::TargetReportExt, cur.read_u8()?)?;
    }
    Ok(())
}

const MEASURED_POSITION: &[Field] = &[f(P::MeasuredPosRange, 2, RANGE), f(P::MeasuredPosBearing, 2, AZIMUTH)];
const MODE_2: &[Field] = &[f(P::Mode2, 2, Unit::Octal)];
const DOPPLER: &[Field] = &[f(P::MeasuredDoppler, 1, SPEED)];
const RECEIVED_POWER: &[Field] = &[f(P::MsgAmplitude, 1, Unit::Scaled(1.0, "dBm"))];
const MODE_3A_CONF: &[Field] = &[f(P::Mode3Conf, 2, Unit::Flags)];
const MODE_C_CONF: &[Field] = &[f(P::ModeCConf, 4, Unit::Flags)];
const MODE_2_CONF: &[Field] = &[f(P::Mode2Conf, 2, Unit::Flags)];
const X_PULSE: &[Field] = &[f(P::XPulse, 1, Unit::Flags)];
const TRUNCATED_TIME: &[Field] = &[f(P::TimeOfDayTruncated, 2, Unit::Time(1.0 / 128.0))];

/// CAT001 plot UAP.
pub static UAP_PLOT: &[Option<DataItem>] = &[
    // FRN 1-7
    fixed(10, "I001/010", 2, DATA_SOURCE),
    item(20, "I001/020", Shape::Extended { first: 1, ext: 1 }, Decode::Custom(target_report), TARGET_REPORT),
    fixed(40, "I001/040", 4, MEASURED_POSITION),
    fixed(70, "I001/070", 2, MODE_3A),
    item(90, "I001/090", Shape::Fixed(2), Decode::Custom(flight_level_vg), FLIGHT_LEVEL_VG),
    item(
        130,
        "I001/130",
        Shape::Extended { first: 1, ext: 1 },
        Decode::Blob(P::PlotCharacteristics),
        &[tag(P::PlotCharacteristics, Unit::Blob)],
    ),
    fixed(141, "I001/141", 2, TRUNCATED_TIME),
    // FRN 8-14
    fixed(50, "I001/050", 2, MODE_2),
    fixed(120, "I001/120", 1, DOPPLER),
    fixed(131, "I001/131", 1, RECEIVED_POWER),
    fixed(80, "I001/080", 2, MODE_3A_CONF),
    fixed(100, "I001/100", 4, MODE_C_CONF),
    fixed(60, "I001/060", 2, MODE_2_CONF),
    item(30, "I001/030", Shape::Extended { first: 1, ext: 1 }, Decode::Blob(P::WarningError), WARNING_ERROR),
    // FRN 15-21
    fixed(150, "I001/150", 1, X_PULSE),
    None,
    None,
    None,
    None,
    special_purpose(),
];

/// CAT001 track UAP.
pub static UAP_TRACK: &[Option<DataItem>] = &[
    // FRN 1-7
    fixed(10, "I001/010", 2, DATA_SOURCE),
    item(20, "I001/020", Shape::Extended { first: 1, ext: 1 }, Decode::Custom(target_report), TARGET_REPORT),
    fixed(161, "I001/161", 2, TRACK_NUMBER),
    fixed(40, "I001/040", 4, MEASURED_POSITION),
    fixed(42, "I001/042", 4, &[f(P::CalcPosX, 2, CART), f(P::CalcPosY, 2, CART)]),
    fixed(200, "I001/200", 4, &[f(P::CalcSpeed, 2, SPEED), f(P::CalcHeading, 2, AZIMUTH)]),
    fixed(70, "I001/070", 2, MODE_3A),
    // FRN 8-14
    item(90, "I001/090", Shape::Fixed(2), Decode::Custom(flight_level_vg), FLIGHT_LEVEL_VG),
    fixed(141, "I001/141", 2, TRUNCATED_TIME),
    item(
        130,
        "I001/130",
        Shape::Extended { first: 1, ext: 1 },
        Decode::Blob(P::PlotCharacteristics),
        &[tag(P::PlotCharacteristics, Unit::Blob)],
    ),
    fixed(131, "I001/131", 1, RECEIVED_POWER),
    fixed(120, "I001/120", 1, DOPPLER),
    extended(170, "I001/170", &[f(P::TrackStatus, 1, Unit::Flags), f(P::TrackStatusExt, 1, Unit::Flags)]),
    item(
        210,
        "I001/210",
        Shape::Extended { first: 1, ext: 1 },
        Decode::Blob(P::TrackQuality),
        &[tag(P::TrackQuality, Unit::Blob)],
    ),
    // FRN 15-21
    fixed(50, "I001/050", 2, MODE_2),
    fixed(80, "I001/080", 2, MODE_3A_CONF),
    fixed(100, "I001/100", 4, MODE_C_CONF),
    fixed(60, "I001/060", 2, MODE_2_CONF),
    item(30, "I001/030", Shape::Extended { first: 1, ext: 1 }, Decode::Blob(P::WarningError), WARNING_ERROR),
    special_purpose(),
    None,
    // FRN 22
    fixed(150, "I001/150", 1, X_PULSE),
];

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{decode_record, Category, RecordContext, UAP_CAT001_TRACK};

    #[test]
    fn test_plot_layout_by_default() {
        // FRN 1, 2 (plot, SSR+PSR), 3 (040)
        let data = [0xE0, 0x08, 0x01, 0x30, 0x02, 0x00, 0x80, 0x00];
        let ctx = RecordContext::new(Category::Cat001.default_version());
        let mut cur = Cursor::new(&data);
        let m = decode_record(&mut cur, Category::Cat001, &ctx).unwrap().message;
        assert_eq!(m.get::<u8>(P::TargetReportType).unwrap(), DETECTION_SSR_PSR);
        assert_eq!(m.get::<u16>(P::MeasuredPosRange).unwrap(), 512);
        assert!((m.scaled(P::MeasuredPosRange).unwrap() - 4.0 * NM).abs() < 1e-6);
        assert!(!m.contains(P::TrackNumber));
        assert!(cur.is_empty());
    }

    #[test]
    fn test_uap_code_forces_track_layout() {
        // FRN 3 only: under the track UAP this is I001/161
        let data = [0x20, 0x01, 0x07];
        let mut ctx = RecordContext::new(Category::Cat001.default_version());
        ctx.uap_code = UAP_CAT001_TRACK;
        let mut cur = Cursor::new(&data);
        let m = decode_record(&mut cur, Category::Cat001, &ctx).unwrap().message;
        assert_eq!(m.get::<u16>(P::TrackNumber).unwrap(), 0x0107);
    }
}
