//! CAT034: monoradar service messages (north marker, sector crossing,
//! geographical filtering, jamming strobe) and sensor status.

use crate::cursor::Cursor;
use crate::item::*;
use crate::message::PropertyStore;
use crate::property::Property as P;
use crate::types::Result;

/// I034/000 message types.
pub const MSG_NORTH_MARKER: u8 = 1;
pub const MSG_SECTOR_CROSSING: u8 = 2;
pub const MSG_GEOGRAPHICAL_FILTERING: u8 = 3;
pub const MSG_JAMMING_STROBE: u8 = 4;

const RANGE: Unit = Unit::Distance(NM / 256.0);
const AZIMUTH: Unit = Unit::Angle(360.0 / 65536.0);

pub(crate) const SECTOR: &[Field] = &[f(P::SectorNumber, 1, Unit::Angle(360.0 / 256.0))];
pub(crate) const ROTATION_PERIOD: &[Field] = &[f(P::AntennaRotationPeriod, 2, Unit::Time(1.0 / 128.0))];

pub(crate) const PLOT_COUNTS: &[Field] = &[
    tag(P::CountSsrPsrHits, Unit::Raw),
    tag(P::CountPsrHits, Unit::Raw),
    tag(P::CountSsrHits, Unit::Raw),
    tag(P::CountSsrAllCall, Unit::Raw),
    tag(P::CountSsrRollCall, Unit::Raw),
    tag(P::CountAllCallSsr, Unit::Raw),
    tag(P::CountRollCallSsr, Unit::Raw),
    tag(P::CountTotalMessages, Unit::Raw),
    tag(P::CountSoleModeSAllCall, Unit::Raw),
    tag(P::CountSoleModeSRollCall, Unit::Raw),
    tag(P::CountModeSAllCallSsr, Unit::Raw),
    tag(P::CountModeSRollCallSsr, Unit::Raw),
    tag(P::CountModeSAllCallPsr, Unit::Raw),
    tag(P::CountModeSRollCallPsr, Unit::Raw),
    tag(P::CountModeSAllCallSsrPsr, Unit::Raw),
    tag(P::CountModeSRollCallSsrPsr, Unit::Raw),
    tag(P::CountOther, Unit::Raw),
];

/// Plot count values: each element is an aerial bit, a 5-bit counter type
/// and a 10-bit count. Counters of the same type are summed.
pub(crate) fn plot_counts(cur: &mut Cursor<'_>, store: &mut PropertyStore) -> Result<()> {
    let rep = cur.read_u8()?;
    for _ in 0..rep {
        let raw = cur.read_u16()?;
        let kind = ((raw >> 10) & 0x1F) as usize;
        let count = raw & 0x03FF;
        let prop = match kind {
            1 => P::CountPsrHits,
            2 => P::CountSsrHits,
            3 => P::CountSsrPsrHits,
            4 => P::CountSoleModeSAllCall,
            5 => P::CountSoleModeSRollCall,
            6 => P::CountModeSAllCallSsr,
            7 => P::CountModeSRollCallSsr,
            8 => P::CountModeSAllCallPsr,
            9 => P::CountModeSRollCallPsr,
            10 => P::CountModeSAllCallSsrPsr,
            11 => P::CountModeSRollCallSsrPsr,
            12 => P::CountSsrAllCall,
            13 => P::CountSsrRollCall,
            14 => P::CountAllCallSsr,
            15 => P::CountRollCallSsr,
            16 => P::CountTotalMessages,
            _ => P::CountOther,
        };
        let total = store.get::<u16>(prop).unwrap_or(0).saturating_add(count);
        store.set(prop, total)?;
    }
    Ok(())
}

const DATA_FILTER: &[Field] = &[
    tag(P::FilterWeather, Unit::Raw),
    tag(P::FilterJamming, Unit::Raw),
    tag(P::FilterPsr, Unit::Raw),
    tag(P::FilterSsrModeS, Unit::Raw),
    tag(P::FilterSsrModeSPsr, Unit::Raw),
    tag(P::FilterEnhancedSurveillance, Unit::Raw),
    tag(P::FilterPsrEnhancedSurveillance, Unit::Raw),
    tag(P::FilterPsrEnhancedSurveillanceNoSsr, Unit::Raw),
    tag(P::FilterPsrEnhancedSurveillanceSsrPsr, Unit::Raw),
    tag(P::FilterOther, Unit::Raw),
];

/// Generic polar window filter: the octet names which data the filter
/// applies to; the matching property is set to 1.
fn data_filter(cur: &mut Cursor<'_>, store: &mut PropertyStore) -> Result<()> {
    let typ = cur.read_u8()? >> 1;
    let prop = match typ {
        1 => P::FilterWeather,
        2 => P::FilterJamming,
        3 => P::FilterPsr,
        4 => P::FilterSsrModeS,
        5 => P::FilterSsrModeSPsr,
        6 => P::FilterEnhancedSurveillance,
        7 => P::FilterPsrEnhancedSurveillance,
        8 => P::FilterPsrEnhancedSurveillanceNoSsr,
        9 => P::FilterPsrEnhancedSurveillanceSsrPsr,
        _ => P::FilterOther,
    };
    store.set(prop, 1u8)
}

static SYSTEM_CONFIGURATION: &[Option<DataItem>] = &[
    fixed(0, "COM", 1, &[f(P::StatusCommon, 1, Unit::Flags)]),
    None,
    None,
    fixed(0, "PSR", 1, &[f(P::StatusPsr, 1, Unit::Flags)]),
    fixed(0, "SSR", 1, &[f(P::StatusSsr, 1, Unit::Flags)]),
    fixed(0, "MDS", 2, &[f(P::StatusModeS, 2, Unit::Flags)]),
];

static PROCESSING_MODE: &[Option<DataItem>] = &[
    fixed(0, "COM", 1, &[f(P::ProcModeCommon, 1, Unit::Flags)]),
    None,
    None,
    fixed(0, "PSR", 1, &[f(P::ProcModePsr, 1, Unit::Flags)]),
    fixed(0, "SSR", 1, &[f(P::ProcModeSsr, 1, Unit::Flags)]),
    fixed(0, "MDS", 1, &[f(P::ProcModeModeS, 1, Unit::Flags)]),
];

/// CAT034 UAP.
pub static UAP: &[Option<DataItem>] = &[
    // FRN 1-7
    fixed(10, "I034/010", 2, DATA_SOURCE),
    fixed(0, "I034/000", 1, MESSAGE_TYPE),
    fixed(30, "I034/030", 3, TIME_OF_DAY),
    fixed(20, "I034/020", 1, SECTOR),
    fixed(41, "I034/041", 2, ROTATION_PERIOD),
    compound(50, "I034/050", SYSTEM_CONFIGURATION),
    compound(60, "I034/060", PROCESSING_MODE),
    // FRN 8-14
    item(70, "I034/070", Shape::Repetitive(2), Decode::Custom(plot_counts), PLOT_COUNTS),
    fixed(
        100,
        "I034/100",
        8,
        &[
            f(P::PolarWindowRangeStart, 2, RANGE),
            f(P::PolarWindowRangeEnd, 2, RANGE),
            f(P::PolarWindowAziStart, 2, AZIMUTH),
            f(P::PolarWindowAziEnd, 2, AZIMUTH),
        ],
    ),
    item(110, "I034/110", Shape::Fixed(1), Decode::Custom(data_filter), DATA_FILTER),
    fixed(
        120,
        "I034/120",
        8,
        &[
            f(P::PosHeight, 2, Unit::Height(1.0)),
            f(P::PosLatitude, 3, Unit::Latitude(180.0 / 8388608.0)),
            f(P::PosLongitude, 3, Unit::Longitude(180.0 / 8388608.0)),
        ],
    ),
    fixed(
        90,
        "I034/090",
        2,
        &[
            f(P::CollimationErrRange, 1, RANGE),
            f(P::CollimationErrAzi, 1, Unit::Angle(360.0 / 16384.0)),
        ],
    ),
    reserved_skip(),
    special_purpose(),
];

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{decode_record, Category, RecordContext};

    fn decode(data: &[u8]) -> crate::message::AsterixMessage {
        let ctx = RecordContext::new(Category::Cat034.default_version());
        let mut cur = Cursor::new(data);
        let out = decode_record(&mut cur, Category::Cat034, &ctx).unwrap();
        assert!(cur.is_empty());
        out.message
    }

    #[test]
    fn test_north_marker() {
        let m = decode(&[0xF0, 0x01, 0x02, 0x01, 0x00, 0x10, 0x00, 0x00]);
        assert_eq!(m.get::<u8>(P::MessageType).unwrap(), MSG_NORTH_MARKER);
        assert_eq!(m.get::<u32>(P::TimeOfDay).unwrap(), 0x1000);
        assert_eq!(m.get::<u8>(P::SectorNumber).unwrap(), 0);
    }

    #[test]
    fn test_system_configuration_compound() {
        // FRN 6: COM and SSR present
        let m = decode(&[0x04, 0x88, 0x40, 0x20]);
        assert_eq!(m.get::<u8>(P::StatusCommon).unwrap(), 0x40);
        assert_eq!(m.get::<u8>(P::StatusSsr).unwrap(), 0x20);
        assert!(!m.contains(P::StatusPsr));
    }

    #[test]
    fn test_plot_counts_accumulate() {
        // FRN 8: three counters, two of them SSR
        let m = decode(&[0x01, 0x80, 0x03, 0x08, 0x05, 0x08, 0x02, 0x04, 0x07]);
        assert_eq!(m.get::<u16>(P::CountSsrHits).unwrap(), 7);
        assert_eq!(m.get::<u16>(P::CountPsrHits).unwrap(), 7);
    }

    #[test]
    fn test_sensor_position() {
        // FRN 11: height 100 m, lat 45 deg, lon -90 deg
        let m = decode(&[0x01, 0x10, 0x00, 0x64, 0x20, 0x00, 0x00, 0xC0, 0x00, 0x00]);
        assert_eq!(m.get::<i16>(P::PosHeight).unwrap(), 100);
        assert!((m.scaled(P::PosLatitude).unwrap() - 45.0).abs() < 1e-9);
        assert!((m.scaled(P::PosLongitude).unwrap() + 90.0).abs() < 1e-9);
    }
}
