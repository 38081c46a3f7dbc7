//! CAT048: monoradar target reports.

use crate::cursor::Cursor;
use crate::item::*;
use crate::message::PropertyStore;
use crate::property::Property as P;
use crate::types::{sign_extend, Result};

/// I048/020 TYP values.
pub const TYP_NO_DETECTION: u8 = 0;
pub const TYP_PSR: u8 = 1;
pub const TYP_SSR: u8 = 2;
pub const TYP_SSR_PSR: u8 = 3;
pub const TYP_MODE_S_ALL_CALL: u8 = 4;
pub const TYP_MODE_S_ROLL_CALL: u8 = 5;
pub const TYP_MODE_S_ALL_CALL_PSR: u8 = 6;
pub const TYP_MODE_S_ROLL_CALL_PSR: u8 = 7;

/// I048/170 track status bits (first octet).
pub const TRACK_CNF: u8 = 0x80;
pub const TRACK_DOU: u8 = 0x10;
pub const TRACK_MAH: u8 = 0x08;
/// I048/170 first extension.
pub const TRACK_TRE: u8 = 0x80;

const RANGE: Unit = Unit::Distance(NM / 256.0);
const AZIMUTH: Unit = Unit::Angle(360.0 / 65536.0);
const CART: Unit = Unit::Distance(NM / 128.0);
const SPEED: Unit = Unit::Speed(NM / 16384.0);

pub(crate) const TARGET_REPORT: &[Field] = &[
    f(P::TargetReport, 1, Unit::Flags),
    f(P::TargetReportExt, 1, Unit::Flags),
    f(P::TargetReportExt2, 1, Unit::Flags),
    f(P::TargetReportExt3, 1, Unit::Flags),
    tag(P::TargetReportType, Unit::Raw),
];

/// Target report descriptor: octets as flags plus the detection type
/// from the top three bits.
pub(crate) fn target_report(cur: &mut Cursor<'_>, store: &mut PropertyStore) -> Result<()> {
    let octets = cur.read_bytes(cur.remaining())?;
    let props = [P::TargetReport, P::TargetReportExt, P::TargetReportExt2, P::TargetReportExt3];
    for (prop, octet) in props.iter().zip(octets) {
        store.set(*prop, *octet)?;
    }
    if let Some(first) = octets.first() {
        store.set(P::TargetReportType, first >> 5)?;
    }
    Ok(())
}

const MEASURED_POSITION: &[Field] = &[f(P::MeasuredPosRange, 2, RANGE), f(P::MeasuredPosBearing, 2, AZIMUTH)];

pub(crate) static PLOT_CHARACTERISTICS: &[Option<DataItem>] = &[
    fixed(0, "SRL", 1, &[f(P::SsrPlotRunlength, 1, Unit::Angle(360.0 / 8192.0))]),
    fixed(0, "SRR", 1, &[f(P::SsrRepliesReceived, 1, Unit::Raw)]),
    fixed(0, "SAM", 1, &[f(P::SsrReplyAmplitude, 1, Unit::Scaled(1.0, "dBm"))]),
    fixed(0, "PRL", 1, &[f(P::PsrPlotRunlength, 1, Unit::Angle(360.0 / 8192.0))]),
    fixed(0, "PAM", 1, &[f(P::PsrPlotAmplitude, 1, Unit::Scaled(1.0, "dBm"))]),
    fixed(0, "RPD", 1, &[f(P::PsrSsrDiffRange, 1, RANGE)]),
    fixed(0, "APD", 1, &[f(P::PsrSsrDiffAzi, 1, Unit::Angle(360.0 / 16384.0))]),
];

const CALC_DOPPLER: &[Field] = &[
    tag(P::CalcDopplerSpeedValid, Unit::Raw),
    tag(P::CalcDopplerSpeed, Unit::Speed(1.0)),
];

/// Calculated Doppler speed: D bit then a 10-bit signed speed in m/s.
fn calculated_doppler(cur: &mut Cursor<'_>, store: &mut PropertyStore) -> Result<()> {
    let raw = cur.read_u16()?;
    store.set(P::CalcDopplerSpeedValid, (raw >> 15) as u8)?;
    store.set(P::CalcDopplerSpeed, sign_extend(raw as u32 & 0x03FF, 10) as i16)
}

const RAW_DOPPLER: &[Field] = &[
    tag(P::RawDopplerRep, Unit::Raw),
    tag(P::RawDopplerSpeed, Unit::Speed(1.0)),
    tag(P::RawDopplerAmbiguity, Unit::Speed(1.0)),
    tag(P::RawDopplerTransFreq, Unit::Scaled(1.0, "MHz")),
];

/// Raw Doppler speed: the repetition count and the first element.
fn raw_doppler(cur: &mut Cursor<'_>, store: &mut PropertyStore) -> Result<()> {
    let rep = cur.read_u8()?;
    store.set(P::RawDopplerRep, rep)?;
    if rep > 0 {
        store.set(P::RawDopplerSpeed, cur.read_i16()?)?;
        store.set(P::RawDopplerAmbiguity, cur.read_u16()?)?;
        store.set(P::RawDopplerTransFreq, cur.read_u16()?)?;
    }
    Ok(())
}

static RADIAL_DOPPLER: &[Option<DataItem>] = &[
    item(0, "CAL", Shape::Fixed(2), Decode::Custom(calculated_doppler), CALC_DOPPLER),
    item(0, "RDS", Shape::Repetitive(6), Decode::Custom(raw_doppler), RAW_DOPPLER),
];

// Reserved expansion field.
static RE_RADAR_PLOT_CHARACTERISTICS: &[Option<DataItem>] = &[
    item(0, "SCO", Shape::Fixed(1), Decode::Skip, &[]),
    item(0, "SCR", Shape::Fixed(2), Decode::Skip, &[]),
    item(0, "RW", Shape::Fixed(2), Decode::Skip, &[]),
    item(0, "AR", Shape::Fixed(2), Decode::Skip, &[]),
];

static RESERVED_EXPANSION: &[Option<DataItem>] = &[
    compound(0, "MD5", MODE5_SUB_ITEMS),
    compound(0, "M5N", MODE5_FOM_SUB_ITEMS),
    item(0, "M4E", Shape::Extended { first: 1, ext: 1 }, Decode::Skip, &[]),
    compound(0, "RPC", RE_RADAR_PLOT_CHARACTERISTICS),
    fixed(0, "ERR", 3, &[f(P::ExtendedRangeReport, 3, RANGE)]),
];

/// CAT048 UAP.
pub static UAP: &[Option<DataItem>] = &[
    // FRN 1-7
    fixed(10, "I048/010", 2, DATA_SOURCE),
    fixed(140, "I048/140", 3, TIME_OF_DAY),
    item(20, "I048/020", Shape::Extended { first: 1, ext: 1 }, Decode::Custom(target_report), TARGET_REPORT),
    fixed(40, "I048/040", 4, MEASURED_POSITION),
    fixed(70, "I048/070", 2, MODE_3A),
    item(90, "I048/090", Shape::Fixed(2), Decode::Custom(flight_level_vg), FLIGHT_LEVEL_VG),
    compound(130, "I048/130", PLOT_CHARACTERISTICS),
    // FRN 8-14
    fixed(220, "I048/220", 3, AIRCRAFT_ADDRESS),
    item(240, "I048/240", Shape::Fixed(6), Decode::SixBit(P::AircraftId), AIRCRAFT_ID),
    item(250, "I048/250", Shape::Repetitive(8), Decode::Blob(P::ModeSMbData), MODE_S_MB),
    fixed(161, "I048/161", 2, &[fb(P::TrackNumber, 2, 12, Unit::Raw)]),
    fixed(42, "I048/042", 4, &[f(P::CalcPosX, 2, CART), f(P::CalcPosY, 2, CART)]),
    fixed(200, "I048/200", 4, &[f(P::CalcSpeed, 2, SPEED), f(P::CalcHeading, 2, AZIMUTH)]),
    extended(170, "I048/170", &[f(P::TrackStatus, 1, Unit::Flags), f(P::TrackStatusExt, 1, Unit::Flags)]),
    // FRN 15-21
    fixed(
        210,
        "I048/210",
        4,
        &[
            f(P::TrackQualSigmaX, 1, CART),
            f(P::TrackQualSigmaY, 1, CART),
            f(P::TrackQualSigmaV, 1, SPEED),
            f(P::TrackQualSigmaH, 1, Unit::Angle(360.0 / 4096.0)),
        ],
    ),
    item(30, "I048/030", Shape::Extended { first: 1, ext: 1 }, Decode::Blob(P::WarningError), WARNING_ERROR),
    fixed(80, "I048/080", 2, &[f(P::Mode3Conf, 2, Unit::Flags)]),
    fixed(100, "I048/100", 4, &[f(P::ModeCConf, 4, Unit::Flags)]),
    fixed(110, "I048/110", 2, &[f(P::Measured3dHeight, 2, Unit::Height(25.0 * FT))]),
    compound(120, "I048/120", RADIAL_DOPPLER),
    fixed(230, "I048/230", 2, &[f(P::CommsStatus, 2, Unit::Flags)]),
    // FRN 22-28
    item(260, "I048/260", Shape::Fixed(7), Decode::Blob(P::AcasResAdvReport), &[tag(P::AcasResAdvReport, Unit::Blob)]),
    fixed(55, "I048/055", 1, &[f(P::Mode1, 1, Unit::Octal)]),
    fixed(50, "I048/050", 2, &[f(P::Mode2, 2, Unit::Octal)]),
    fixed(65, "I048/065", 1, &[f(P::Mode1Conf, 1, Unit::Flags)]),
    fixed(60, "I048/060", 2, &[f(P::Mode2Conf, 2, Unit::Flags)]),
    special_purpose(),
    reserved_expansion(RESERVED_EXPANSION, &[]),
];

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
