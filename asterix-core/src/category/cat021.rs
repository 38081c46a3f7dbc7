//! CAT021: ADS-B target reports.
//!
//! Responsibilities:
//! - Current (2.x) item table, including data ages and the reserved
//!   expansion field
//! - Legacy (0.x) item table, selected by a major version of 0
//! - Custom decoders for the items whose meaning depends on a flag bit

use crate::cursor::Cursor;
use crate::item::*;
use crate::message::PropertyStore;
use crate::property::Property as P;
use crate::types::{sign_extend, Result};

/// I021/040 first octet: address type.
pub const ATP_24BIT_ICAO: u8 = 0;
pub const ATP_DUPLICATE: u8 = 1;
pub const ATP_SURFACE_VEHICLE: u8 = 2;
pub const ATP_ANONYMOUS: u8 = 3;

const AZIMUTH: Unit = Unit::Angle(360.0 / 65536.0);
const GROUND_SPEED: Unit = Unit::Speed(NM / 16384.0);
const VERTICAL_RATE: Unit = Unit::Speed(6.25 * FPM);
const LAT_23: Unit = Unit::Latitude(180.0 / 8388608.0);
const LON_23: Unit = Unit::Longitude(180.0 / 8388608.0);
const LAT_30: Unit = Unit::Latitude(180.0 / 1073741824.0);
const LON_30: Unit = Unit::Longitude(180.0 / 1073741824.0);
const TIME: Unit = Unit::Time(1.0 / 128.0);
const TIME_HIGH_PREC: Unit = Unit::Time(1.0 / 1073741824.0);
const AGE: Unit = Unit::Time(0.1);

// ---------------------------------------------------------------------------
// Custom decoders
// ---------------------------------------------------------------------------

const AIR_SPEED: &[Field] = &[
    tag(P::AirSpeed, Unit::Raw),
    tag(P::IndicatedAirSpeed, Unit::Speed(NM / 16384.0)),
    tag(P::MachNumber, Unit::Scaled(0.001, "Mach")),
];

/// Air speed: the IM bit selects IAS (2^-14 NM/s) or Mach (0.001).
fn air_speed(cur: &mut Cursor<'_>, store: &mut PropertyStore) -> Result<()> {
    let raw = cur.read_u16()?;
    let value = raw & 0x7FFF;
    store.set(P::AirSpeed, value)?;
    if raw & 0x8000 != 0 {
        store.set(P::MachNumber, value)
    } else {
        store.set(P::IndicatedAirSpeed, value)
    }
}

const SURFACE_GROUND_VECTOR: &[Field] = &[
    tag(P::SurfaceGroundSpeed, Unit::Speed(KT / 8.0)),
    tag(P::SurfaceTrackAngle, Unit::Angle(360.0 / 128.0)),
];

/// Surface ground vector: 11-bit speed, then an optional 7-bit track angle
/// in the extension octet.
fn surface_ground_vector(cur: &mut Cursor<'_>, store: &mut PropertyStore) -> Result<()> {
    let raw = cur.read_u16()?;
    store.set(P::SurfaceGroundSpeed, (raw >> 1) & 0x07FF)?;
    if raw & 0x01 != 0 {
        store.set(P::SurfaceTrackAngle, cur.read_u8()? >> 1)?;
    }
    Ok(())
}

const RATE_OF_TURN: &[Field] = &[tag(P::TrackAngleRate, Unit::Scaled(0.25, "deg/s"))];

/// Legacy rate of turn: turn indicator octet, then a 7-bit signed rate in
/// the extension octet.
fn rate_of_turn(cur: &mut Cursor<'_>, store: &mut PropertyStore) -> Result<()> {
    let first = cur.read_u8()?;
    if first & 0x01 != 0 {
        let rate = sign_extend((cur.read_u8()? >> 1) as u32, 7);
        store.set(P::TrackAngleRate, rate as i16)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Compound sub-items
// ---------------------------------------------------------------------------

static DATA_AGES: &[Option<DataItem>] = &[
    fixed(0, "AOS", 1, &[f(P::AircraftOpStatusAge, 1, AGE)]),
    fixed(0, "TRD", 1, &[f(P::TargetReportAge, 1, AGE)]),
    fixed(0, "M3A", 1, &[f(P::Mode3Age, 1, AGE)]),
    fixed(0, "QI", 1, &[f(P::QualIndAge, 1, AGE)]),
    fixed(0, "TI", 1, &[f(P::TrajIntentAge, 1, AGE)]),
    fixed(0, "MAM", 1, &[f(P::MsgAmplitudeAge, 1, AGE)]),
    fixed(0, "GH", 1, &[f(P::GeometricHeightAge, 1, AGE)]),
    fixed(0, "FL", 1, &[f(P::FlightLevelAge, 1, AGE)]),
    fixed(0, "SAL", 1, &[f(P::SelectedAltitudeAge, 1, AGE)]),
    fixed(0, "FSA", 1, &[f(P::FinalStateSelectedAltitudeAge, 1, AGE)]),
    fixed(0, "AS", 1, &[f(P::AirSpeedAge, 1, AGE)]),
    fixed(0, "TAS", 1, &[f(P::TrueAirSpeedAge, 1, AGE)]),
    fixed(0, "MH", 1, &[f(P::MagneticHeadingAge, 1, AGE)]),
    fixed(0, "BVR", 1, &[f(P::BarometricVerticalRateAge, 1, AGE)]),
    fixed(0, "GVR", 1, &[f(P::GeometricVerticalRateAge, 1, AGE)]),
    fixed(0, "GV", 1, &[f(P::AirborneAge, 1, AGE)]),
    fixed(0, "TAR", 1, &[f(P::TrackAngleRateAge, 1, AGE)]),
    fixed(0, "TID", 1, &[f(P::AircraftIdAge, 1, AGE)]),
    fixed(0, "TS", 1, &[f(P::TargetStatusAge, 1, AGE)]),
    fixed(0, "MET", 1, &[f(P::MetInfoAge, 1, AGE)]),
    fixed(0, "ROA", 1, &[f(P::RollAngleAge, 1, AGE)]),
    fixed(0, "ARA", 1, &[f(P::AcasResAdvReportAge, 1, AGE)]),
    fixed(0, "SCC", 1, &[f(P::SurfaceCapabilitiesAge, 1, AGE)]),
];

static MILITARY_EXTENDED_SQUITTER: &[Option<DataItem>] = &[
    fixed(0, "SUM", 1, &[f(P::MesMode5Summary, 1, Unit::Flags)]),
    fixed(0, "PNO", 2, &[fb(P::MesMode5Pin, 2, 14, Unit::Raw)]),
    fixed(0, "EM1", 2, &[fb(P::Mode1Ext, 2, 12, Unit::Octal)]),
    fixed(0, "XP", 1, &[f(P::MesXPulse, 1, Unit::Flags)]),
    fixed(0, "FOM", 1, &[fb(P::MesMode5Fom, 1, 5, Unit::Raw)]),
    fixed(0, "M2", 2, &[fb(P::MesMode2, 2, 12, Unit::Octal)]),
];

static RESERVED_EXPANSION: &[Option<DataItem>] = &[
    fixed(0, "BPS", 2, &[fb(P::BarometricPressure, 2, 12, Unit::Scaled(0.1, "hPa"))]),
    fixed(0, "SelH", 2, &[fb(P::SelectedHeading, 2, 10, Unit::Angle(360.0 / 1024.0))]),
    item(
        0,
        "NAV",
        Shape::Extended { first: 1, ext: 1 },
        Decode::Octets,
        &[f(P::NavigationMode, 1, Unit::Flags)],
    ),
    fixed(0, "GAO", 1, &[f(P::GpsOffset, 1, Unit::Raw)]),
    item(
        0,
        "SGV",
        Shape::Extended { first: 2, ext: 1 },
        Decode::Custom(surface_ground_vector),
        SURFACE_GROUND_VECTOR,
    ),
    item(
        0,
        "STA",
        Shape::Extended { first: 1, ext: 1 },
        Decode::Octets,
        &[f(P::AircraftStatus, 1, Unit::Flags), f(P::AircraftStatusExt, 1, Unit::Flags)],
    ),
    fixed(0, "TNH", 2, &[f(P::TrueHeading, 2, AZIMUTH)]),
    compound(0, "MES", MILITARY_EXTENDED_SQUITTER),
];

// ---------------------------------------------------------------------------
// Item tables
// ---------------------------------------------------------------------------

/// CAT021 2.x UAP.
pub static UAP: &[Option<DataItem>] = &[
    // FRN 1-7
    fixed(10, "I021/010", 2, DATA_SOURCE),
    extended(
        40,
        "I021/040",
        &[
            f(P::TargetReport, 1, Unit::Flags),
            f(P::TargetReportExt, 1, Unit::Flags),
            f(P::TargetReportExt2, 1, Unit::Flags),
        ],
    ),
    fixed(161, "I021/161", 2, &[fb(P::TrackNumber, 2, 12, Unit::Raw)]),
    fixed(15, "I021/015", 1, &[f(P::ServiceId, 1, Unit::Raw)]),
    fixed(71, "I021/071", 3, &[f(P::TimePosition, 3, TIME)]),
    fixed(130, "I021/130", 6, &[f(P::PosLatitude, 3, LAT_23), f(P::PosLongitude, 3, LON_23)]),
    fixed(131, "I021/131", 8, &[f(P::PosLatitudeHighPrec, 4, LAT_30), f(P::PosLongitudeHighPrec, 4, LON_30)]),
    // FRN 8-14
    fixed(72, "I021/072", 3, &[f(P::TimeVelocity, 3, TIME)]),
    item(150, "I021/150", Shape::Fixed(2), Decode::Custom(air_speed), AIR_SPEED),
    fixed(151, "I021/151", 2, &[fb(P::TrueAirSpeed, 2, 15, Unit::Speed(KT))]),
    fixed(80, "I021/080", 3, AIRCRAFT_ADDRESS),
    fixed(73, "I021/073", 3, &[f(P::MsgTimePosition, 3, TIME)]),
    fixed(74, "I021/074", 4, &[fb(P::MsgTimePositionHighPrec, 4, 30, TIME_HIGH_PREC)]),
    fixed(75, "I021/075", 3, &[f(P::MsgTimeVelocity, 3, TIME)]),
    // FRN 15-21
    fixed(76, "I021/076", 4, &[fb(P::MsgTimeVelocityHighPrec, 4, 30, TIME_HIGH_PREC)]),
    fixed(140, "I021/140", 2, &[f(P::GeometricHeight, 2, Unit::Height(6.25 * FT))]),
    extended(
        90,
        "I021/090",
        &[
            f(P::QualInd, 1, Unit::Flags),
            f(P::QualIndExt, 1, Unit::Flags),
            f(P::QualIndExt2, 1, Unit::Flags),
            f(P::QualIndExt3, 1, Unit::Flags),
        ],
    ),
    fixed(210, "I021/210", 1, &[f(P::MopsVersion, 1, Unit::Raw)]),
    fixed(70, "I021/070", 2, &[fb(P::Mode3, 2, 12, Unit::Octal)]),
    fixed(230, "I021/230", 2, &[f(P::RollAngle, 2, Unit::Angle(0.01))]),
    fixed(145, "I021/145", 2, &[f(P::FlightLevel, 2, Unit::FlightLevel(0.25))]),
    // FRN 22-28
    fixed(152, "I021/152", 2, &[f(P::MagneticHeading, 2, AZIMUTH)]),
    fixed(200, "I021/200", 1, &[f(P::TargetStatus, 1, Unit::Flags)]),
    fixed(155, "I021/155", 2, &[fb(P::BarometricVerticalRate, 2, 15, VERTICAL_RATE)]),
    fixed(157, "I021/157", 2, &[fb(P::GeometricVerticalRate, 2, 15, VERTICAL_RATE)]),
    fixed(
        160,
        "I021/160",
        4,
        &[fb(P::AirborneGroundSpeed, 2, 15, GROUND_SPEED), f(P::AirborneTrackAngle, 2, AZIMUTH)],
    ),
    fixed(165, "I021/165", 2, &[fb(P::TrackAngleRate, 2, 10, Unit::Scaled(1.0 / 32.0, "deg/s"))]),
    fixed(77, "I021/077", 3, TIME_OF_DAY),
    // FRN 29-35
    item(170, "I021/170", Shape::Fixed(6), Decode::SixBit(P::AircraftId), AIRCRAFT_ID),
    fixed(20, "I021/020", 1, &[f(P::EmitterCategory, 1, Unit::Raw)]),
    compound(220, "I021/220", MET_SUB_ITEMS),
    fixed(146, "I021/146", 2, &[fb(P::SelectedAltitude, 2, 13, Unit::Height(25.0 * FT))]),
    fixed(148, "I021/148", 2, &[fb(P::FinalStateSelectedAltitude, 2, 13, Unit::Height(25.0 * FT))]),
    compound(110, "I021/110", TRAJECTORY_INTENT_SUB_ITEMS),
    fixed(16, "I021/016", 1, &[f(P::ServiceManagement, 1, Unit::Time(0.5))]),
    // FRN 36-42
    fixed(8, "I021/008", 1, &[f(P::AircraftOpStatus, 1, Unit::Flags)]),
    item(
        271,
        "I021/271",
        Shape::Extended { first: 1, ext: 1 },
        Decode::Octets,
        &[f(P::SurfaceCapabilities, 1, Unit::Flags), f(P::SurfaceCapabilitiesExt, 1, Unit::Flags)],
    ),
    fixed(132, "I021/132", 1, &[f(P::MsgAmplitude, 1, Unit::Scaled(1.0, "dBm"))]),
    item(250, "I021/250", Shape::Repetitive(8), Decode::Blob(P::ModeSMbData), MODE_S_MB),
    item(260, "I021/260", Shape::Fixed(7), Decode::Blob(P::AcasResAdvReport), &[tag(P::AcasResAdvReport, Unit::Blob)]),
    fixed(400, "I021/400", 1, &[f(P::ReceiverId, 1, Unit::Raw)]),
    compound(295, "I021/295", DATA_AGES),
    // FRN 43-49
    None,
    None,
    None,
    None,
    None,
    reserved_expansion(RESERVED_EXPANSION, &[]),
    special_purpose(),
];

/// CAT021 0.x UAP.
pub static UAP_V0: &[Option<DataItem>] = &[
    // FRN 1-7
    fixed(10, "I021/010", 2, DATA_SOURCE),
    fixed(40, "I021/040", 2, &[f(P::TargetReportOld, 2, Unit::Flags)]),
    fixed(30, "I021/030", 3, TIME_OF_DAY),
    fixed(130, "I021/130", 8, &[f(P::PosLatitude, 4, LAT_23), f(P::PosLongitude, 4, LON_23)]),
    fixed(80, "I021/080", 3, AIRCRAFT_ADDRESS),
    fixed(140, "I021/140", 2, &[f(P::GeometricHeight, 2, Unit::Height(6.25 * FT))]),
    fixed(90, "I021/090", 2, &[f(P::AdsMerit, 2, Unit::Flags)]),
    // FRN 8-14
    fixed(210, "I021/210", 1, &[f(P::AdsLink, 1, Unit::Flags)]),
    fixed(230, "I021/230", 2, &[f(P::RollAngle, 2, Unit::Angle(0.01))]),
    fixed(145, "I021/145", 2, &[f(P::FlightLevel, 2, Unit::FlightLevel(0.25))]),
    item(150, "I021/150", Shape::Fixed(2), Decode::Custom(air_speed), AIR_SPEED),
    fixed(151, "I021/151", 2, &[f(P::TrueAirSpeed, 2, Unit::Speed(KT))]),
    fixed(152, "I021/152", 2, &[f(P::MagneticHeading, 2, AZIMUTH)]),
    fixed(155, "I021/155", 2, &[f(P::BarometricVerticalRate, 2, VERTICAL_RATE)]),
    // FRN 15-21
    fixed(157, "I021/157", 2, &[f(P::GeometricVerticalRate, 2, VERTICAL_RATE)]),
    fixed(
        160,
        "I021/160",
        4,
        &[f(P::AirborneGroundSpeed, 2, GROUND_SPEED), f(P::AirborneTrackAngle, 2, AZIMUTH)],
    ),
    item(
        165,
        "I021/165",
        Shape::Extended { first: 1, ext: 1 },
        Decode::Custom(rate_of_turn),
        RATE_OF_TURN,
    ),
    item(170, "I021/170", Shape::Fixed(6), Decode::SixBit(P::AircraftId), AIRCRAFT_ID),
    fixed(95, "I021/095", 1, &[f(P::VelocityUncertainty, 1, Unit::Raw)]),
    fixed(32, "I021/032", 1, &[f(P::TimeAccuracy, 1, Unit::Time(1.0 / 256.0))]),
    fixed(200, "I021/200", 1, &[f(P::TargetStatus, 1, Unit::Flags)]),
    // FRN 22-28
    fixed(20, "I021/020", 1, &[f(P::EmitterCategory, 1, Unit::Raw)]),
    compound(220, "I021/220", MET_SUB_ITEMS),
    fixed(146, "I021/146", 2, &[fb(P::SelectedAltitude, 2, 13, Unit::Height(25.0 * FT))]),
    fixed(148, "I021/148", 2, &[fb(P::FinalStateSelectedAltitude, 2, 13, Unit::Height(25.0 * FT))]),
    compound(110, "I021/110", TRAJECTORY_INTENT_SUB_ITEMS),
    None,
    None,
    // FRN 29-35
    None,
    None,
    None,
    None,
    None,
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
    use crate::version::Version;

    fn decode_with(data: &[u8], version: Version) -> crate::message::AsterixMessage {
        let ctx = RecordContext::new(version);
        let mut cur = Cursor::new(data);
        let out = decode_record(&mut cur, Category::Cat021, &ctx).unwrap();
        assert!(cur.is_empty(), "{} bytes left", cur.remaining());
        out.message
    }

    fn decode(data: &[u8]) -> crate::message::AsterixMessage {
        decode_with(data, Category::Cat021.default_version())
    }

    #[test]
    fn test_position_and_address() {
        // FRN 1, 6 (130), FX; FRN 11 (080)
        let m = decode(&[
            0x85, 0x10, // FSPEC
            0x01, 0x02, // source
            0x20, 0x00, 0x00, 0xE0, 0x00, 0x00, // 45 N, 45 W
            0x40, 0x62, 0x1D, // address
        ]);
        assert!((m.scaled(P::PosLatitude).unwrap() - 45.0).abs() < 1e-9);
        assert!((m.scaled(P::PosLongitude).unwrap() + 45.0).abs() < 1e-9);
        assert_eq!(m.get::<u32>(P::AircraftAddress).unwrap(), 0x40621D);
    }

    #[test]
    fn test_air_speed_and_vertical_rate() {
        // FRN 9 (150, Mach 0.08) and FRN 24 (155, -6.25 ft/min)
        let m = decode(&[0x01, 0x41, 0x01, 0x20, 0x80, 0x50, 0x7F, 0xFF]);
        assert_eq!(m.get::<u16>(P::MachNumber).unwrap(), 80);
        assert!(!m.contains(P::IndicatedAirSpeed));
        assert_eq!(m.get::<i16>(P::BarometricVerticalRate).unwrap(), -1);
        assert!((m.scaled(P::BarometricVerticalRate).unwrap() + 6.25 * FPM).abs() < 1e-9);
    }

    #[test]
    fn test_data_ages() {
        // FRN 42 (295): AOS and FL ages
        let m = decode(&[0x01, 0x01, 0x01, 0x01, 0x01, 0x02, 0x81, 0x80, 0x0A, 0x05]);
        assert!((m.scaled(P::AircraftOpStatusAge).unwrap() - 1.0).abs() < 1e-9);
        assert_eq!(m.get::<u8>(P::FlightLevelAge).unwrap(), 5);
    }

    #[test]
    fn test_reserved_expansion_surface_vector() {
        // FRN 48 (RE): BPS and SGV with the track angle extension
        let m = decode(&[
            0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x04, // FSPEC
            0x07, 0x88, 0x08, 0x54, 0x01, 0x41, 0x40, // RE
        ]);
        assert_eq!(m.get::<u16>(P::BarometricPressure).unwrap(), 0x854);
        assert_eq!(m.get::<u16>(P::SurfaceGroundSpeed).unwrap(), 160);
        assert!((m.scaled(P::SurfaceTrackAngle).unwrap() - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_legacy_layout() {
        // FRN 1, 4 (130, 8 octets), FX; FRN 17 (165) with a rate of turn
        let m = decode_with(
            &[
                0x91, 0x01, 0x20, // FSPEC
                0x01, 0x02, // source
                0x00, 0x20, 0x00, 0x00, 0xFF, 0xE0, 0x00, 0x00, // 45 N, 45 W
                0x41, 0xF8, // right turn, -4 = -1 deg/s
            ],
            Version::new(0, 26),
        );
        assert!((m.scaled(P::PosLatitude).unwrap() - 45.0).abs() < 1e-9);
        assert!((m.scaled(P::PosLongitude).unwrap() + 45.0).abs() < 1e-9);
        assert_eq!(m.get::<i16>(P::TrackAngleRate).unwrap(), -4);
    }
}
