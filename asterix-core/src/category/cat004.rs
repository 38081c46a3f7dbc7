//! CAT004: safety net messages (STCA, MSAW, APW, RIMCAS and friends).
//!
//! Responsibilities:
//! - I004/000 message types and the I004/060, I004/120 status bits
//! - Item table, including the two aircraft identification compounds
//! - `SafetyNetStatus`: the two I004/060 octets as one flag set

use bitflags::bitflags;

use crate::item::*;
use crate::message::AsterixMessage;
use crate::property::Property as P;

/// I004/000 message types.
pub const MSG_ALIVE: u8 = 1;
pub const MSG_RAMLD: u8 = 2;
pub const MSG_RAMHD: u8 = 3;
pub const MSG_MSAW: u8 = 4;
pub const MSG_APW: u8 = 5;
pub const MSG_CLAM: u8 = 6;
pub const MSG_STCA: u8 = 7;
pub const MSG_AFDA: u8 = 8;
pub const MSG_RIMCAS_ALM: u8 = 9;
pub const MSG_RIMCAS_WRA: u8 = 10;
pub const MSG_RIMCAS_OTA: u8 = 11;
pub const MSG_RIMCAS_RDM: u8 = 12;
pub const MSG_RIMCAS_RCM: u8 = 13;
pub const MSG_RIMCAS_TSM: u8 = 14;
pub const MSG_RIMCAS_UTMM: u8 = 15;
pub const MSG_RIMCAS_SBOA: u8 = 16;
pub const MSG_EOC: u8 = 17;
pub const MSG_ACASRA: u8 = 18;
pub const MSG_NTCA: u8 = 19;

bitflags! {
    /// Safety net functions and system status from I004/060. The first
    /// octet is the high byte; FX bits are dropped.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SafetyNetStatus: u16 {
        const MRVA = 0x8000;
        const RAMLD = 0x4000;
        const RAMHD = 0x2000;
        const MSAW = 0x1000;
        const APW = 0x0800;
        const CLAM = 0x0400;
        const STCA = 0x0200;
        const AFDA = 0x0080;
        const RIMCA = 0x0040;
        const ACASRA = 0x0020;
        const NTCA = 0x0010;
        /// System degraded.
        const DEGRADED = 0x0008;
        const OVERFLOW = 0x0004;
        const OVERLOAD = 0x0002;
    }
}

impl SafetyNetStatus {
    /// Status carried by a CAT004 message, empty when I004/060 is absent.
    pub fn from_message(msg: &AsterixMessage) -> Self {
        let first = msg.get::<u8>(P::SafetyNetStatus).unwrap_or(0) as u16;
        let second = msg.get::<u8>(P::SafetyNetStatusExt).unwrap_or(0) as u16;
        Self::from_bits_truncate((first << 8) | second)
    }
}

/// I004/120 CN primary octet.
pub const CONFLICT_MAS: u8 = 0x80;
pub const CONFLICT_CAS: u8 = 0x40;
pub const CONFLICT_FLD: u8 = 0x20;
pub const CONFLICT_FVD: u8 = 0x10;
pub const CONFLICT_MAJOR: u8 = 0x08;
pub const CONFLICT_CROSSED: u8 = 0x04;
pub const CONFLICT_DIVERGING: u8 = 0x02;
/// I004/120 CN first extension.
pub const CONFLICT_RRC: u8 = 0x80;
pub const CONFLICT_RTC: u8 = 0x40;
pub const CONFLICT_MSAW_MRVA: u8 = 0x20;

const HALF_METRE: Unit = Unit::Distance(0.5);
const ALT_25FT: Unit = Unit::Height(25.0 * FT);
const LAT: Unit = Unit::Latitude(180.0 / 33554432.0);
const LON: Unit = Unit::Longitude(180.0 / 33554432.0);
const TIME: Unit = Unit::Time(1.0 / 128.0);

static AIRCRAFT_1: &[Option<DataItem>] = &[
    item(0, "AI1", Shape::Fixed(7), Decode::Ascii(P::AircraftId), AIRCRAFT_ID),
    fixed(0, "M31", 2, MODE_3A),
    fixed(
        0,
        "CPW",
        10,
        &[f(P::SnPredPosLat1, 4, LAT), f(P::SnPredPosLong1, 4, LON), f(P::SnPredPosAlt1, 2, ALT_25FT)],
    ),
    fixed(
        0,
        "CPC",
        8,
        &[f(P::SnPredPosX1, 3, HALF_METRE), f(P::SnPredPosY1, 3, HALF_METRE), f(P::SnPredPosAlt1, 2, ALT_25FT)],
    ),
    fixed(0, "TT1", 3, &[f(P::SnTimeToThresh1, 3, TIME)]),
    fixed(0, "DT1", 2, &[f(P::SnDistToThresh1, 2, HALF_METRE)]),
    item(
        0,
        "AC1",
        Shape::Extended { first: 1, ext: 1 },
        Decode::Octets,
        &[f(P::SnAcCharacteristics1, 1, Unit::Flags), f(P::SnAcCharacteristicsExt1, 1, Unit::Flags)],
    ),
    item(0, "MS1", Shape::Fixed(6), Decode::SixBit(P::SnModeSId1), &[tag(P::SnModeSId1, Unit::Text)]),
    fixed(0, "FP1", 4, &[f(P::SnFlightPlanNum1, 4, Unit::Raw)]),
    fixed(0, "CF1", 2, &[f(P::SnClearedLevel1, 2, Unit::FlightLevel(0.25))]),
];

static AIRCRAFT_2: &[Option<DataItem>] = &[
    item(0, "AI2", Shape::Fixed(7), Decode::Ascii(P::AircraftId2), &[tag(P::AircraftId2, Unit::Text)]),
    fixed(0, "M32", 2, &[f(P::Mode3Ac2, 2, Unit::Octal)]),
    fixed(
        0,
        "CPW",
        10,
        &[f(P::SnPredPosLat2, 4, LAT), f(P::SnPredPosLong2, 4, LON), f(P::SnPredPosAlt2, 2, ALT_25FT)],
    ),
    fixed(
        0,
        "CPC",
        8,
        &[f(P::SnPredPosX2, 3, HALF_METRE), f(P::SnPredPosY2, 3, HALF_METRE), f(P::SnPredPosAlt2, 2, ALT_25FT)],
    ),
    fixed(0, "TT2", 3, &[f(P::SnTimeToThresh2, 3, TIME)]),
    fixed(0, "DT2", 2, &[f(P::SnDistToThresh2, 2, HALF_METRE)]),
    item(
        0,
        "AC2",
        Shape::Extended { first: 1, ext: 1 },
        Decode::Octets,
        &[f(P::SnAcCharacteristics2, 1, Unit::Flags), f(P::SnAcCharacteristicsExt2, 1, Unit::Flags)],
    ),
    item(0, "MS2", Shape::Fixed(6), Decode::SixBit(P::SnModeSId2), &[tag(P::SnModeSId2, Unit::Text)]),
    fixed(0, "FP2", 4, &[f(P::SnFlightPlanNum2, 4, Unit::Raw)]),
    fixed(0, "CF2", 2, &[f(P::SnClearedLevel2, 2, Unit::FlightLevel(0.25))]),
];

static CONFLICT_CHARACTERISTICS: &[Option<DataItem>] = &[
    item(
        0,
        "CN",
        Shape::Extended { first: 1, ext: 1 },
        Decode::Octets,
        &[f(P::SnConflictFlags, 1, Unit::Flags), f(P::SnConflictFlagsExt, 1, Unit::Flags)],
    ),
    fixed(0, "CC", 1, &[f(P::SnConflictClass, 1, Unit::Raw)]),
    fixed(0, "CP", 1, &[f(P::SnConflictProbability, 1, Unit::Scaled(0.5, "%"))]),
    fixed(0, "CD", 3, &[f(P::SnConflictDuration, 3, TIME)]),
];

static CONFLICT_TIMING: &[Option<DataItem>] = &[
    fixed(0, "TC", 3, &[f(P::SnTimeToConflict, 3, TIME)]),
    fixed(0, "TCA", 3, &[f(P::SnTimeToCpa, 3, TIME)]),
    fixed(0, "CHS", 3, &[f(P::SnCurrentHorizSep, 3, HALF_METRE)]),
    fixed(0, "MHS", 2, &[f(P::SnMinHorizSep, 2, HALF_METRE)]),
    fixed(0, "CVS", 2, &[f(P::SnCurrentVertSep, 2, ALT_25FT)]),
    fixed(0, "MVS", 2, &[f(P::SnMinVertSep, 2, ALT_25FT)]),
];

static AREA_DEFINITIONS: &[Option<DataItem>] = &[
    item(0, "AN", Shape::Fixed(6), Decode::SixBit(P::AreaName), &[tag(P::AreaName, Unit::Text)]),
    item(0, "CAN", Shape::Fixed(7), Decode::Ascii(P::CrossingAreaName), &[tag(P::CrossingAreaName, Unit::Text)]),
    item(0, "RT1", Shape::Fixed(7), Decode::Ascii(P::RunwayDesignator1), &[tag(P::RunwayDesignator1, Unit::Text)]),
    item(0, "RT2", Shape::Fixed(7), Decode::Ascii(P::RunwayDesignator2), &[tag(P::RunwayDesignator2, Unit::Text)]),
    item(0, "SB", Shape::Fixed(7), Decode::Ascii(P::StopBarDesignator), &[tag(P::StopBarDesignator, Unit::Text)]),
    item(0, "G", Shape::Fixed(7), Decode::Ascii(P::GateDesignator), &[tag(P::GateDesignator, Unit::Text)]),
];

/// CAT004 UAP.
pub static UAP: &[Option<DataItem>] = &[
    // FRN 1-7
    fixed(10, "I004/010", 2, DATA_SOURCE),
    fixed(0, "I004/000", 1, MESSAGE_TYPE),
    item(15, "I004/015", Shape::Repetitive(2), Decode::Blob(P::SdpsIdentifier), &[tag(P::SdpsIdentifier, Unit::Blob)]),
    fixed(20, "I004/020", 3, TIME_OF_DAY),
    fixed(40, "I004/040", 2, &[f(P::AlertIdentifier, 2, Unit::Raw)]),
    fixed(45, "I004/045", 1, &[f(P::AlertStatus, 1, Unit::Flags)]),
    extended(
        60,
        "I004/060",
        &[f(P::SafetyNetStatus, 1, Unit::Flags), f(P::SafetyNetStatusExt, 1, Unit::Flags)],
    ),
    // FRN 8-14
    fixed(30, "I004/030", 2, TRACK_NUMBER),
    compound(170, "I004/170", AIRCRAFT_1),
    compound(120, "I004/120", CONFLICT_CHARACTERISTICS),
    compound(70, "I004/070", CONFLICT_TIMING),
    fixed(76, "I004/076", 2, &[f(P::VerticalDeviation, 2, ALT_25FT)]),
    fixed(74, "I004/074", 2, &[f(P::LongitudinalDeviation, 2, Unit::Distance(32.0))]),
    fixed(75, "I004/075", 3, &[f(P::TransversalDeviation, 3, HALF_METRE)]),
    // FRN 15-21
    compound(100, "I004/100", AREA_DEFINITIONS),
    fixed(35, "I004/035", 2, &[f(P::TrackNumber2, 2, Unit::Raw)]),
    compound(171, "I004/171", AIRCRAFT_2),
    item(
        110,
        "I004/110",
        Shape::Repetitive(2),
        Decode::Blob(P::SdpsControllerIdentifier),
        &[tag(P::SdpsControllerIdentifier, Unit::Blob)],
    ),
    None,
    reserved_skip(),
    special_purpose(),
];

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
