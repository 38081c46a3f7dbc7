//! CAT010: monosensor surface movement data.

use crate::item::*;
use crate::property::Property as P;

/// I010/000 message types.
pub const MSG_TARGET_REPORT: u8 = 1;
pub const MSG_START_OF_UPDATE_CYCLE: u8 = 2;
pub const MSG_PERIODIC_STATUS: u8 = 3;
pub const MSG_EVENT_STATUS: u8 = 4;

/// I010/170 first octet: track confirmed when clear.
pub const TRACK_CNF: u8 = 0x80;

const AZIMUTH: Unit = Unit::Angle(360.0 / 65536.0);
const QUARTER_METRE: Unit = Unit::Distance(0.25);
const QUARTER_MPS: Unit = Unit::Speed(0.25);

/// CAT010 UAP.
pub static UAP: &[Option<DataItem>] = &[
    // FRN 1-7
    fixed(10, "I010/010", 2, DATA_SOURCE),
    fixed(0, "I010/000", 1, MESSAGE_TYPE),
    extended(
        20,
        "I010/020",
        &[
            f(P::TargetReport, 1, Unit::Flags),
            f(P::TargetReportExt, 1, Unit::Flags),
            f(P::TargetReportExt2, 1, Unit::Flags),
        ],
    ),
    fixed(140, "I010/140", 3, TIME_OF_DAY),
    fixed(
        41,
        "I010/041",
        8,
        &[
            f(P::PosLatitude, 4, Unit::Latitude(180.0 / 2147483648.0)),
            f(P::PosLongitude, 4, Unit::Longitude(180.0 / 2147483648.0)),
        ],
    ),
    fixed(
        40,
        "I010/040",
        4,
        &[f(P::MeasuredPosRange, 2, Unit::Distance(1.0)), f(P::MeasuredPosBearing, 2, AZIMUTH)],
    ),
    fixed(
        42,
        "I010/042",
        4,
        &[f(P::CalcPosX, 2, Unit::Distance(1.0)), f(P::CalcPosY, 2, Unit::Distance(1.0))],
    ),
    // FRN 8-14
    fixed(
        200,
        "I010/200",
        4,
        &[f(P::CalcSpeed, 2, Unit::Speed(NM / 16384.0)), f(P::CalcHeading, 2, AZIMUTH)],
    ),
    fixed(202, "I010/202", 4, &[f(P::CalcVelocityX, 2, QUARTER_MPS), f(P::CalcVelocityY, 2, QUARTER_MPS)]),
    fixed(161, "I010/161", 2, &[fb(P::TrackNumber, 2, 12, Unit::Raw)]),
    extended(
        170,
        "I010/170",
        &[
            f(P::TrackStatus, 1, Unit::Flags),
            f(P::TrackStatusExt, 1, Unit::Flags),
            f(P::TrackStatusExt2, 1, Unit::Flags),
        ],
    ),
    fixed(60, "I010/060", 2, MODE_3A),
    fixed(220, "I010/220", 3, AIRCRAFT_ADDRESS),
    item(245, "I010/245", Shape::Fixed(7), Decode::Custom(target_identification), TARGET_IDENTIFICATION),
    // FRN 15-21
    item(250, "I010/250", Shape::Repetitive(8), Decode::Blob(P::ModeSMbData), MODE_S_MB),
    fixed(300, "I010/300", 1, &[f(P::VehicleFleet, 1, Unit::Raw)]),
    item(90, "I010/090", Shape::Fixed(2), Decode::Custom(flight_level_vg), FLIGHT_LEVEL_VG),
    fixed(91, "I010/091", 2, &[f(P::Measured3dHeight, 2, Unit::Height(6.25 * FT))]),
    extended(
        270,
        "I010/270",
        &[
            f(P::TargetSizeLength, 1, Unit::Raw),
            f(P::TargetSizeOrient, 1, Unit::Raw),
            f(P::TargetSizeWidth, 1, Unit::Raw),
        ],
    ),
    fixed(550, "I010/550", 1, &[f(P::SystemStatus, 1, Unit::Flags)]),
    fixed(310, "I010/310", 1, &[f(P::PreprogMsg, 1, Unit::Raw)]),
    // FRN 22-28
    fixed(
        500,
        "I010/500",
        4,
        &[
            f(P::TrackQualSigmaX, 1, QUARTER_METRE),
            f(P::TrackQualSigmaY, 1, QUARTER_METRE),
            f(P::TrackQualCov, 2, Unit::Scaled(0.25, "m2")),
        ],
    ),
    item(280, "I010/280", Shape::Repetitive(2), Decode::Blob(P::Presence), &[tag(P::Presence, Unit::Blob)]),
    fixed(131, "I010/131", 1, &[f(P::PsrPlotAmplitude, 1, Unit::Scaled(1.0, "dBm"))]),
    fixed(210, "I010/210", 2, &[f(P::CalcAccelX, 1, Unit::Scaled(0.25, "m/s2")), f(P::CalcAccelY, 1, Unit::Scaled(0.25, "m/s2"))]),
    None,
    special_purpose(),
    reserved_skip(),
];
