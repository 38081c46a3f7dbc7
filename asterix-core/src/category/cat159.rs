//! CAT159: project-defined monoradar plots.
//!
//! Laid out like CAT048 with raw Doppler items in place of the Mode S
//! items; the target report and plot characteristics items are shared.

use crate::item::*;
use crate::property::Property as P;

use super::cat048::{target_report, PLOT_CHARACTERISTICS, TARGET_REPORT};

const RANGE: Unit = Unit::Distance(NM / 256.0);
const AZIMUTH: Unit = Unit::Angle(360.0 / 65536.0);
const CART: Unit = Unit::Distance(NM / 128.0);

/// CAT159 UAP.
pub static UAP: &[Option<DataItem>] = &[
    // FRN 1-7
    fixed(10, "I159/010", 2, DATA_SOURCE),
    fixed(140, "I159/140", 3, TIME_OF_DAY),
    item(20, "I159/020", Shape::Extended { first: 1, ext: 1 }, Decode::Custom(target_report), TARGET_REPORT),
    fixed(40, "I159/040", 4, &[f(P::MeasuredPosRange, 2, RANGE), f(P::MeasuredPosBearing, 2, AZIMUTH)]),
    fixed(42, "I159/042", 4, &[f(P::CalcPosX, 2, CART), f(P::CalcPosY, 2, CART)]),
    fixed(161, "I159/161", 2, &[fb(P::TrackNumber, 2, 12, Unit::Raw)]),
    extended(170, "I159/170", &[f(P::TrackStatus, 1, Unit::Flags), f(P::TrackStatusExt, 1, Unit::Flags)]),
    // FRN 8-14
    fixed(
        200,
        "I159/200",
        4,
        &[f(P::CalcSpeed, 2, Unit::Speed(NM / 16384.0)), f(P::CalcHeading, 2, AZIMUTH)],
    ),
    fixed(120, "I159/120", 2, &[f(P::RawDopplerSpeed, 2, Unit::Speed(1.0))]),
    fixed(125, "I159/125", 2, &[f(P::DcRawDopplerSpeed, 2, Unit::Speed(1.0))]),
    compound(130, "I159/130", PLOT_CHARACTERISTICS),
    None,
    special_purpose(),
    reserved_skip(),
];
