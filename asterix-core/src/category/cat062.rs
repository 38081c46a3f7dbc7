//! CAT062: SDPS system track data.
//!
//! Responsibilities:
//! - Item table with the aircraft derived data, data ages, flight plan,
//!   accuracy and measured information compounds
//! - I062/080 track status bits used by the conversion layer
//! - Reserved expansion field (relative velocity, contributing sensors)

use crate::cursor::Cursor;
use crate::item::*;
use crate::message::PropertyStore;
use crate::property::Property as P;
use crate::types::{sign_extend, Result};

/// I062/080 first octet.
pub const TRACK_MON: u8 = 0x80;
pub const TRACK_SPI: u8 = 0x40;
pub const TRACK_MRH: u8 = 0x20;
pub const TRACK_CNF: u8 = 0x02;
/// I062/080 first extension.
pub const TRACK_SIM: u8 = 0x80;
pub const TRACK_TSE: u8 = 0x40;
pub const TRACK_TSB: u8 = 0x20;

const HALF_METRE: Unit = Unit::Distance(0.5);
const QUARTER_MPS: Unit = Unit::Speed(0.25);
const QUARTER_MPS2: Unit = Unit::Scaled(0.25, "m/s2");
const AZIMUTH: Unit = Unit::Angle(360.0 / 65536.0);
const ALT: Unit = Unit::Height(6.25 * FT);
const ALT_25FT: Unit = Unit::Height(25.0 * FT);
const RATE: Unit = Unit::Speed(6.25 * FPM);
const QUARTER_FL: Unit = Unit::FlightLevel(0.25);
const AGE: Unit = Unit::Time(0.25);

// ---------------------------------------------------------------------------
// Custom decoders
// ---------------------------------------------------------------------------

const BAROMETRIC_ALTITUDE: &[Field] = &[
    tag(P::CalcBarometricAltitudeQnh, Unit::Raw),
    tag(P::CalcBarometricAltitude, QUARTER_FL),
];

/// QNH correction bit, then a 15-bit signed altitude in 1/4 FL.
fn barometric_altitude(cur: &mut Cursor<'_>, store: &mut PropertyStore) -> Result<()> {
    let raw = cur.read_u16()?;
    store.set(P::CalcBarometricAltitudeQnh, (raw >> 15) as u8)?;
    store.set(P::CalcBarometricAltitude, sign_extend(raw as u32 & 0x7FFF, 15) as i16)
}

const TRACK_ANGLE_RATE: &[Field] = &[tag(P::TrackAngleRate, Unit::Scaled(0.25, "deg/s"))];

/// Turn indicator, then a 7-bit signed rate of turn in bits 8-2.
fn track_angle_rate(cur: &mut Cursor<'_>, store: &mut PropertyStore) -> Result<()> {
    let raw = cur.read_u16()?;
    let rate = sign_extend((raw as u32 >> 1) & 0x7F, 7);
    store.set(P::TrackAngleRate, rate as i16)
}

// ---------------------------------------------------------------------------
// Compound sub-items
// ---------------------------------------------------------------------------

static AIRCRAFT_DERIVED_DATA: &[Option<DataItem>] = &[
    fixed(0, "ADR", 3, AIRCRAFT_ADDRESS),
    item(0, "ID", Shape::Fixed(6), Decode::SixBit(P::AircraftId), AIRCRAFT_ID),
    fixed(0, "MHG", 2, &[f(P::MagneticHeading, 2, AZIMUTH)]),
    fixed(0, "IAS", 2, &[fb(P::AirSpeed, 2, 15, Unit::Raw)]),
    fixed(0, "TAS", 2, &[f(P::TrueAirSpeed, 2, Unit::Speed(KT))]),
    fixed(0, "SAL", 2, &[fb(P::SelectedAltitude, 2, 13, ALT_25FT)]),
    fixed(0, "FSS", 2, &[fb(P::FinalStateSelectedAltitude, 2, 13, ALT_25FT)]),
    // FX
    item(
        0,
        "TIS",
        Shape::Extended { first: 1, ext: 1 },
        Decode::Octets,
        &[f(P::TrajIntentStatus, 1, Unit::Flags)],
    ),
    item(
        0,
        "TID",
        Shape::Repetitive(15),
        Decode::Blob(P::TrajIntentData),
        &[tag(P::TrajIntentData, Unit::Blob)],
    ),
    fixed(0, "COM", 2, &[f(P::CommsStatus, 2, Unit::Flags)]),
    fixed(
        0,
        "SAB",
        2,
        &[f(P::AircraftStatus, 1, Unit::Flags), f(P::AircraftStatusExt, 1, Unit::Flags)],
    ),
    item(0, "ACS", Shape::Fixed(7), Decode::Blob(P::AcasResAdvReport), &[tag(P::AcasResAdvReport, Unit::Blob)]),
    fixed(0, "BVR", 2, &[f(P::BarometricVerticalRate, 2, RATE)]),
    fixed(0, "GVR", 2, &[f(P::GeometricVerticalRate, 2, RATE)]),
    // FX
    fixed(0, "RAN", 2, &[f(P::RollAngle, 2, Unit::Angle(0.01))]),
    item(0, "TAR", Shape::Fixed(2), Decode::Custom(track_angle_rate), TRACK_ANGLE_RATE),
    fixed(0, "TAN", 2, &[f(P::AirborneTrackAngle, 2, AZIMUTH)]),
    fixed(0, "GSP", 2, &[f(P::AirborneGroundSpeed, 2, Unit::Speed(NM / 16384.0))]),
    fixed(0, "VUN", 1, &[f(P::VelocityUncertainty, 1, Unit::Raw)]),
    fixed(
        0,
        "MET",
        8,
        &[
            spare(1),
            f(P::WindSpeed, 2, Unit::Speed(KT)),
            f(P::WindDirection, 2, Unit::Angle(1.0)),
            f(P::Temperature, 2, Unit::Scaled(0.25, "degC")),
            f(P::Turbulence, 1, Unit::Raw),
        ],
    ),
    fixed(0, "EMC", 1, &[f(P::EmitterCategory, 1, Unit::Raw)]),
    // FX
    fixed(
        0,
        "POS",
        6,
        &[
            f(P::DerivedLatitude, 3, Unit::Latitude(180.0 / 8388608.0)),
            f(P::DerivedLongitude, 3, Unit::Longitude(180.0 / 8388608.0)),
        ],
    ),
    fixed(0, "GAL", 2, &[f(P::GeometricHeight, 2, ALT)]),
    item(0, "PUN", Shape::Fixed(1), Decode::Skip, &[]),
    item(0, "MB", Shape::Repetitive(8), Decode::Blob(P::ModeSMbData), MODE_S_MB),
    fixed(0, "IAR", 2, &[f(P::IndicatedAirSpeed, 2, Unit::Speed(KT))]),
    fixed(0, "MAC", 2, &[f(P::MachNumber, 2, Unit::Scaled(0.008, "Mach"))]),
    fixed(0, "BPS", 2, &[fb(P::BarometricPressure, 2, 12, Unit::Scaled(0.1, "hPa"))]),
];

static SYSTEM_TRACK_AGES: &[Option<DataItem>] = &[
    fixed(0, "TRK", 1, &[f(P::TrackAge, 1, AGE)]),
    fixed(0, "PSR", 1, &[f(P::PsrAge, 1, AGE)]),
    fixed(0, "SSR", 1, &[f(P::SsrAge, 1, AGE)]),
    fixed(0, "MDS", 1, &[f(P::ModeSAge, 1, AGE)]),
    fixed(0, "ADS", 2, &[f(P::AdsCAge, 2, AGE)]),
    fixed(0, "ES", 1, &[f(P::EsAge, 1, AGE)]),
    fixed(0, "VDL", 1, &[f(P::VdlAge, 1, AGE)]),
    fixed(0, "UAT", 1, &[f(P::UatAge, 1, AGE)]),
    fixed(0, "LOP", 1, &[f(P::LoopAge, 1, AGE)]),
    fixed(0, "MLT", 1, &[f(P::MultilatAge, 1, AGE)]),
];

static TRACK_DATA_AGES: &[Option<DataItem>] = &[
    fixed(0, "MFL", 1, &[f(P::MeasuredFlightLevelAge, 1, AGE)]),
    fixed(0, "MD1", 1, &[f(P::Mode1Age, 1, AGE)]),
    fixed(0, "MD2", 1, &[f(P::Mode2Age, 1, AGE)]),
    fixed(0, "MDA", 1, &[f(P::Mode3Age, 1, AGE)]),
    fixed(0, "MD4", 1, &[f(P::Mode4Age, 1, AGE)]),
    fixed(0, "MD5", 1, &[f(P::Mode5Age, 1, AGE)]),
    fixed(0, "MHG", 1, &[f(P::MagneticHeadingAge, 1, AGE)]),
    fixed(0, "IAS", 1, &[f(P::AirSpeedAge, 1, AGE)]),
    fixed(0, "TAS", 1, &[f(P::TrueAirSpeedAge, 1, AGE)]),
    fixed(0, "SAL", 1, &[f(P::SelectedAltitudeAge, 1, AGE)]),
    fixed(0, "FSS", 1, &[f(P::FinalStateSelectedAltitudeAge, 1, AGE)]),
    fixed(0, "TID", 1, &[f(P::TrajIntentAge, 1, AGE)]),
    fixed(0, "COM", 1, &[f(P::CommsStatusAge, 1, AGE)]),
    fixed(0, "SAB", 1, &[f(P::AdsbStatusAge, 1, AGE)]),
    fixed(0, "ACS", 1, &[f(P::AcasResAdvReportAge, 1, AGE)]),
    fixed(0, "BVR", 1, &[f(P::BarometricVerticalRateAge, 1, AGE)]),
    fixed(0, "GVR", 1, &[f(P::GeometricVerticalRateAge, 1, AGE)]),
    fixed(0, "RAN", 1, &[f(P::RollAngleAge, 1, AGE)]),
    fixed(0, "TAR", 1, &[f(P::TrackAngleRateAge, 1, AGE)]),
    fixed(0, "TAN", 1, &[f(P::TrackAngleAge, 1, AGE)]),
    fixed(0, "GSP", 1, &[f(P::GroundSpeedAge, 1, AGE)]),
    fixed(0, "VUN", 1, &[f(P::VelocityUncertaintyAge, 1, AGE)]),
    fixed(0, "MET", 1, &[f(P::MetInfoAge, 1, AGE)]),
    fixed(0, "EMC", 1, &[f(P::EmitterCategoryAge, 1, AGE)]),
    fixed(0, "POS", 1, &[f(P::PosAge, 1, AGE)]),
    fixed(0, "GAL", 1, &[f(P::GeometricHeightAge, 1, AGE)]),
    fixed(0, "PUN", 1, &[f(P::PosUncertaintyAge, 1, AGE)]),
    fixed(0, "MB", 1, &[f(P::ModeSMbDataAge, 1, AGE)]),
    fixed(0, "IAR", 1, &[f(P::AirSpeedAge, 1, AGE)]),
    fixed(0, "MAC", 1, &[f(P::MachNumberAge, 1, AGE)]),
    fixed(0, "BPS", 1, &[f(P::BarometricPressureAge, 1, AGE)]),
];

static FLIGHT_PLAN_DATA: &[Option<DataItem>] = &[
    fixed(0, "TAG", 2, &[f(P::FlightPlanSac, 1, Unit::Raw), f(P::FlightPlanSic, 1, Unit::Raw)]),
    item(0, "CSN", Shape::Fixed(7), Decode::Ascii(P::FlightPlanCallsign), &[tag(P::FlightPlanCallsign, Unit::Text)]),
    fixed(0, "IFI", 4, &[fb(P::FlightPlanId, 4, 27, Unit::Raw)]),
    fixed(0, "FCT", 1, &[f(P::FlightPlanCategory, 1, Unit::Flags)]),
    item(
        0,
        "TAC",
        Shape::Fixed(4),
        Decode::Ascii(P::FlightPlanAircraftType),
        &[tag(P::FlightPlanAircraftType, Unit::Text)],
    ),
    fixed(0, "WTC", 1, &[f(P::FlightPlanWakeCategory, 1, Unit::Raw)]),
    item(
        0,
        "DEP",
        Shape::Fixed(4),
        Decode::Ascii(P::FlightPlanDepAirport),
        &[tag(P::FlightPlanDepAirport, Unit::Text)],
    ),
    // FX
    item(
        0,
        "DST",
        Shape::Fixed(4),
        Decode::Ascii(P::FlightPlanDestAirport),
        &[tag(P::FlightPlanDestAirport, Unit::Text)],
    ),
    item(0, "RDS", Shape::Fixed(3), Decode::Ascii(P::FlightPlanRunway), &[tag(P::FlightPlanRunway, Unit::Text)]),
    fixed(0, "CFL", 2, &[f(P::FlightPlanFlightLevel, 2, QUARTER_FL)]),
    fixed(0, "CTL", 2, &[f(P::FlightPlanControlPos, 2, Unit::Raw)]),
    item(0, "TOD", Shape::Repetitive(4), Decode::Blob(P::FlightPlanTimes), &[tag(P::FlightPlanTimes, Unit::Blob)]),
    item(0, "AST", Shape::Fixed(6), Decode::Ascii(P::FlightPlanStand), &[tag(P::FlightPlanStand, Unit::Text)]),
    fixed(0, "STS", 1, &[f(P::FlightPlanStandStatus, 1, Unit::Flags)]),
    // FX
    item(0, "STD", Shape::Fixed(7), Decode::Ascii(P::FlightPlanSid), &[tag(P::FlightPlanSid, Unit::Text)]),
    item(0, "STA", Shape::Fixed(7), Decode::Ascii(P::FlightPlanStar), &[tag(P::FlightPlanStar, Unit::Text)]),
    fixed(0, "PEM", 2, &[fb(P::FlightPlanPreEmergMode3, 2, 12, Unit::Octal)]),
    item(
        0,
        "PEC",
        Shape::Fixed(7),
        Decode::Ascii(P::FlightPlanPreEmergCallsign),
        &[tag(P::FlightPlanPreEmergCallsign, Unit::Text)],
    ),
];

static ESTIMATED_ACCURACIES: &[Option<DataItem>] = &[
    fixed(0, "APC", 4, &[f(P::PosAccuracySdX, 2, HALF_METRE), f(P::PosAccuracySdY, 2, HALF_METRE)]),
    fixed(0, "COV", 2, &[f(P::PosAccuracySdXy, 2, HALF_METRE)]),
    fixed(
        0,
        "APW",
        4,
        &[
            f(P::PosAccuracySdLat, 2, Unit::Latitude(180.0 / 33554432.0)),
            f(P::PosAccuracySdLon, 2, Unit::Longitude(180.0 / 33554432.0)),
        ],
    ),
    fixed(0, "AGA", 1, &[f(P::PosAccuracySdGeomAlt, 1, ALT)]),
    fixed(0, "ABA", 1, &[f(P::PosAccuracySdBaroAlt, 1, QUARTER_FL)]),
    fixed(0, "ATV", 2, &[f(P::VelAccuracySdX, 1, QUARTER_MPS), f(P::VelAccuracySdY, 1, QUARTER_MPS)]),
    fixed(0, "AA", 2, &[f(P::AccAccuracySdX, 1, QUARTER_MPS2), f(P::AccAccuracySdY, 1, QUARTER_MPS2)]),
    // FX
    fixed(0, "ARC", 1, &[f(P::VelAccuracySdVr, 1, RATE)]),
];

static MEASURED_INFORMATION: &[Option<DataItem>] = &[
    fixed(0, "SID", 2, &[f(P::SensorSac, 1, Unit::Raw), f(P::SensorSic, 1, Unit::Raw)]),
    fixed(
        0,
        "POS",
        4,
        &[f(P::MeasuredPosRange, 2, Unit::Distance(NM / 256.0)), f(P::MeasuredPosBearing, 2, AZIMUTH)],
    ),
    fixed(0, "HEI", 2, &[f(P::Measured3dHeight, 2, ALT_25FT)]),
    fixed(0, "MDC", 2, &[fb(P::MeasuredModeC, 2, 14, QUARTER_FL)]),
    fixed(0, "MDA", 2, &[fb(P::MeasuredMode3, 2, 12, Unit::Octal)]),
    fixed(0, "TYP", 1, &[f(P::MeasuredReportType, 1, Unit::Flags)]),
];

// Reserved expansion field.
static RESERVED_EXPANSION: &[Option<DataItem>] = &[
    item(0, "CST", Shape::Repetitive(4), Decode::Skip, &[]),
    item(0, "CSN", Shape::Repetitive(2), Decode::Skip, &[]),
    fixed(0, "TVS", 4, &[f(P::CalcVelocityRelX, 2, QUARTER_MPS), f(P::CalcVelocityRelY, 2, QUARTER_MPS)]),
    item(0, "STS", Shape::Extended { first: 1, ext: 1 }, Decode::Skip, &[]),
];

// ---------------------------------------------------------------------------
// Item table
// ---------------------------------------------------------------------------

/// CAT062 UAP.
pub static UAP: &[Option<DataItem>] = &[
    // FRN 1-7
    fixed(10, "I062/010", 2, DATA_SOURCE),
    None,
    fixed(15, "I062/015", 1, &[f(P::ServiceId, 1, Unit::Raw)]),
    fixed(70, "I062/070", 3, TIME_OF_DAY),
    fixed(
        105,
        "I062/105",
        8,
        &[
            f(P::PosLatitude, 4, Unit::Latitude(180.0 / 33554432.0)),
            f(P::PosLongitude, 4, Unit::Longitude(180.0 / 33554432.0)),
        ],
    ),
    fixed(100, "I062/100", 6, &[f(P::CalcPosXHighPrec, 3, HALF_METRE), f(P::CalcPosYHighPrec, 3, HALF_METRE)]),
    fixed(185, "I062/185", 4, &[f(P::CalcVelocityX, 2, QUARTER_MPS), f(P::CalcVelocityY, 2, QUARTER_MPS)]),
    // FRN 8-14
    fixed(210, "I062/210", 2, &[f(P::CalcAccelX, 1, QUARTER_MPS2), f(P::CalcAccelY, 1, QUARTER_MPS2)]),
    fixed(60, "I062/060", 2, &[fb(P::Mode3, 2, 12, Unit::Octal)]),
    item(245, "I062/245", Shape::Fixed(7), Decode::Custom(target_identification), TARGET_IDENTIFICATION),
    compound(380, "I062/380", AIRCRAFT_DERIVED_DATA),
    fixed(40, "I062/040", 2, TRACK_NUMBER),
    extended(
        80,
        "I062/080",
        &[
            f(P::TrackStatus, 1, Unit::Flags),
            f(P::TrackStatusExt, 1, Unit::Flags),
            f(P::TrackStatusExt2, 1, Unit::Flags),
            f(P::TrackStatusExt3, 1, Unit::Flags),
            f(P::TrackStatusExt4, 1, Unit::Flags),
            f(P::TrackStatusExt5, 1, Unit::Flags),
        ],
    ),
    compound(290, "I062/290", SYSTEM_TRACK_AGES),
    // FRN 15-21
    fixed(200, "I062/200", 1, &[f(P::ModeOfMovement, 1, Unit::Flags)]),
    compound(295, "I062/295", TRACK_DATA_AGES),
    fixed(136, "I062/136", 2, &[f(P::MeasuredFlightLevel, 2, QUARTER_FL)]),
    fixed(130, "I062/130", 2, &[f(P::CalcGeometricAltitude, 2, ALT)]),
    item(135, "I062/135", Shape::Fixed(2), Decode::Custom(barometric_altitude), BAROMETRIC_ALTITUDE),
    fixed(220, "I062/220", 2, &[f(P::CalcRateOfClimb, 2, RATE)]),
    compound(390, "I062/390", FLIGHT_PLAN_DATA),
    // FRN 22-28
    extended(
        270,
        "I062/270",
        &[
            f(P::TargetSizeLength, 1, Unit::Raw),
            f(P::TargetSizeOrient, 1, Unit::Raw),
            f(P::TargetSizeWidth, 1, Unit::Raw),
        ],
    ),
    fixed(300, "I062/300", 1, &[f(P::VehicleFleet, 1, Unit::Raw)]),
    compound(110, "I062/110", MODE5_SUB_ITEMS),
    fixed(120, "I062/120", 2, &[fb(P::Mode2, 2, 12, Unit::Octal)]),
    item(
        510,
        "I062/510",
        Shape::Extended { first: 3, ext: 3 },
        Decode::Blob(P::ComposedTrackNumber),
        &[tag(P::ComposedTrackNumber, Unit::Blob)],
    ),
    compound(500, "I062/500", ESTIMATED_ACCURACIES),
    compound(340, "I062/340", MEASURED_INFORMATION),
    // FRN 29-35
    None,
    None,
    None,
    None,
    None,
    reserved_expansion(RESERVED_EXPANSION, &[]),
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
        let ctx = RecordContext::new(Category::Cat062.default_version());
        let mut cur = Cursor::new(data);
        let out = decode_record(&mut cur, Category::Cat062, &ctx).unwrap();
        assert!(cur.is_empty(), "{} bytes left", cur.remaining());
        out.message
    }

    #[test]
    fn test_system_track() {
        // FRN 1, 4 (070), 5 (105), FX; FRN 12 (040), 13 (080)
        let m = decode(&[
            0x99, 0x0C, // FSPEC
            0x01, 0x02, // source
            0x00, 0x08, 0x00, // time
            0x00, 0x80, 0x00, 0x00, 0xFF, 0x00, 0x00, 0x00, // 45 N, 90 W
            0x00, 0x64, // track 100
            0x03, 0x00, // CNF, one extension
        ]);
        assert_eq!(m.get::<u32>(P::TimeOfDay).unwrap(), 0x800);
        assert!((m.scaled(P::PosLatitude).unwrap() - 45.0).abs() < 1e-9);
        assert!((m.scaled(P::PosLongitude).unwrap() + 90.0).abs() < 1e-9);
        assert_eq!(m.get::<u16>(P::TrackNumber).unwrap(), 100);
        assert_eq!(m.get::<u8>(P::TrackStatus).unwrap() & TRACK_CNF, TRACK_CNF);
        assert_eq!(m.get::<u8>(P::TrackStatusExt).unwrap(), 0);
    }

    #[test]
    fn test_barometric_altitude_qnh() {
        // FRN 19 (135): QNH corrected, 20 FL
        let m = decode(&[0x01, 0x01, 0x08, 0x80, 0x50]);
        assert_eq!(m.get::<u8>(P::CalcBarometricAltitudeQnh).unwrap(), 1);
        assert!((m.scaled(P::CalcBarometricAltitude).unwrap() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_derived_data_and_flight_plan() {
        // FRN 11 (380 with IAR) and FRN 21 (390 with CSN)
        let m = decode(&[
            0x01, 0x11, 0x02, // FSPEC
            0x01, 0x01, 0x01, 0x08, 0x00, 0xFA, // 380: IAR 250 kt
            0x40, b'B', b'A', b'W', b'1', b'2', b'3', b' ', // 390: CSN
        ]);
        assert_eq!(m.get::<u16>(P::IndicatedAirSpeed).unwrap(), 250);
        assert!((m.scaled(P::IndicatedAirSpeed).unwrap() - 250.0 * KT).abs() < 1e-9);
        assert_eq!(m.get_text(P::FlightPlanCallsign).unwrap(), "BAW123");
    }

    #[test]
    fn test_reserved_expansion_relative_velocity() {
        // FRN 34 (RE): TVS only
        let m = decode(&[0x01, 0x01, 0x01, 0x01, 0x04, 0x06, 0x20, 0x00, 0x10, 0xFF, 0xF0]);
        assert!((m.scaled(P::CalcVelocityRelX).unwrap() - 4.0).abs() < 1e-9);
        assert!((m.scaled(P::CalcVelocityRelY).unwrap() + 4.0).abs() < 1e-9);
    }
}
