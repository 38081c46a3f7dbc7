//! Conversion of decoded records into downstream report shapes.
//!
//! Responsibilities:
//! - `TrackReport` from plot/track categories (001, 010, 020, 021, 048, 062, 159)
//! - `TrackerStatus` from service and status messages (002, 010, 019, 034)
//! - `Strobe` from CAT034 jamming strobes
//! - Filling polar from geographic positions (or the reverse) given the
//!   sensor site, applying the radar time offset, and merging
//!   category-specific status bits into one flag set
//!
//! Every builder is a pure function of the message and options.

use bitflags::bitflags;
use serde::Serialize;

use crate::category::{cat001, cat002, cat010, cat034, cat048, cat062};
use crate::config::{DecoderConfig, SensorPosition};
use crate::message::AsterixMessage;
use crate::property::Property as P;
use crate::types::{AsterixError, Result};

/// Mean earth radius in metres.
const EARTH_RADIUS: f64 = 6_371_000.0;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Inputs to conversion that do not come from the message.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConvertOptions {
    /// Seconds added to every time of day.
    pub time_offset: f64,
    pub sensor: Option<SensorPosition>,
}

impl ConvertOptions {
    pub fn from_config(config: &DecoderConfig) -> Self {
        ConvertOptions {
            time_offset: config.radar_time_offset,
            sensor: config.sensor,
        }
    }
}

bitflags! {
    /// Track status merged from the category's own status items.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
    pub struct TrackFlags: u16 {
        const TENTATIVE = 0x0001;
        const ENDED = 0x0002;
        const COASTING = 0x0004;
        const SIMULATED = 0x0008;
        const SPI = 0x0010;
        /// Plot without a track number.
        const PLOT = 0x0020;
        /// Built from a partially decoded record.
        const PARTIAL = 0x0040;
    }
}

bitflags! {
    /// Sensor or tracker health merged from the category's status items.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
    pub struct StatusFlags: u16 {
        const NOGO = 0x0001;
        const DEGRADED = 0x0002;
        const OVERLOAD = 0x0004;
        const TIME_INVALID = 0x0008;
        const TEST_TARGET_FAILED = 0x0010;
        /// Second processing channel selected.
        const CHANNEL_B = 0x0020;
    }
}

/// One target position update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackReport {
    pub category: u8,
    pub sac: Option<u8>,
    pub sic: Option<u8>,
    pub track_number: Option<u16>,
    pub address: Option<u32>,
    pub callsign: Option<String>,
    pub mode_3a: Option<u16>,
    /// Seconds since midnight UTC, offset applied.
    pub time_of_day: Option<f64>,
    pub range_m: Option<f64>,
    pub bearing_deg: Option<f64>,
    pub x_m: Option<f64>,
    pub y_m: Option<f64>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub flight_level: Option<f64>,
    pub speed_mps: Option<f64>,
    pub heading_deg: Option<f64>,
    pub flags: TrackFlags,
}

/// Sensor or tracker status message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackerStatus {
    pub category: u8,
    pub sac: Option<u8>,
    pub sic: Option<u8>,
    pub message_type: Option<u8>,
    pub time_of_day: Option<f64>,
    pub north_marker: bool,
    pub sector_deg: Option<f64>,
    pub rotation_period_s: Option<f64>,
    pub status: StatusFlags,
}

/// Jamming strobe bearing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Strobe {
    pub category: u8,
    pub sac: Option<u8>,
    pub sic: Option<u8>,
    pub time_of_day: Option<f64>,
    pub azimuth_deg: f64,
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Build a track report from a plot or track record.
pub fn build_track(msg: &AsterixMessage, opts: &ConvertOptions) -> Result<TrackReport> {
    match msg.category() {
        1 | 20 | 21 | 48 | 62 | 159 => {}
        10 if msg.get::<u8>(P::MessageType).map_or(true, |t| t == cat010::MSG_TARGET_REPORT) => {}
        _ => return Err(AsterixError::NotApplicable("not a target report")),
    }

    let mut polar = pair(msg, P::MeasuredPosRange, P::MeasuredPosBearing);
    let cartesian =
        pair(msg, P::CalcPosX, P::CalcPosY).or_else(|| pair(msg, P::CalcPosXHighPrec, P::CalcPosYHighPrec));
    let mut geo = pair(msg, P::PosLatitudeHighPrec, P::PosLongitudeHighPrec)
        .or_else(|| pair(msg, P::PosLatitude, P::PosLongitude));
    let track_number = msg.get::<u16>(P::TrackNumber).ok();
    let address = msg.get::<u32>(P::AircraftAddress).ok();

    if polar.is_none() && cartesian.is_none() && geo.is_none() && track_number.is_none() && address.is_none() {
        return Err(AsterixError::NotApplicable("no position or identity"));
    }

    if polar.is_none() {
        if let Some((x, y)) = cartesian {
            polar = Some((x.hypot(y), x.atan2(y).to_degrees().rem_euclid(360.0)));
        }
    }
    if let Some(sensor) = opts.sensor {
        match (polar, geo) {
            (Some((range, bearing)), None) => geo = Some(destination(sensor, range, bearing)),
            (None, Some((lat, lon))) => polar = Some(range_bearing(sensor, lat, lon)),
            _ => {}
        }
    }
    let cartesian = cartesian.or_else(|| {
        polar.map(|(range, bearing)| {
            let theta = bearing.to_radians();
            (range * theta.sin(), range * theta.cos())
        })
    });

    let flight_level = msg
        .scaled(P::FlightLevel)
        .or_else(|| msg.scaled(P::MeasuredFlightLevel))
        .or_else(|| msg.scaled(P::CalcBarometricAltitude));

    let velocity = pair(msg, P::CalcSpeed, P::CalcHeading)
        .or_else(|| {
            pair(msg, P::CalcVelocityX, P::CalcVelocityY)
                .map(|(vx, vy)| (vx.hypot(vy), vx.atan2(vy).to_degrees().rem_euclid(360.0)))
        })
        .or_else(|| pair(msg, P::AirborneGroundSpeed, P::AirborneTrackAngle));

    let mut flags = track_flags(msg);
    if track_number.is_none() && matches!(msg.category(), 48 | 159) {
        flags |= TrackFlags::PLOT;
    }
    if msg.is_partial() {
        flags |= TrackFlags::PARTIAL;
    }

    Ok(TrackReport {
        category: msg.category(),
        sac: msg.get::<u8>(P::Sac).ok(),
        sic: msg.get::<u8>(P::Sic).ok(),
        track_number,
        address,
        callsign: msg.get_text(P::AircraftId).ok().filter(|s| !s.is_empty()).map(str::to_string),
        mode_3a: msg.get::<u16>(P::Mode3).ok(),
        time_of_day: record_time(msg, opts),
        range_m: polar.map(|p| p.0),
        bearing_deg: polar.map(|p| p.1),
        x_m: cartesian.map(|c| c.0),
        y_m: cartesian.map(|c| c.1),
        lat: geo.map(|g| g.0),
        lon: geo.map(|g| g.1),
        flight_level,
        speed_mps: velocity.map(|v| v.0),
        heading_deg: velocity.map(|v| v.1),
        flags,
    })
}

/// Build a status report from a service or system status message.
pub fn build_status(msg: &AsterixMessage, opts: &ConvertOptions) -> Result<TrackerStatus> {
    let message_type = msg.get::<u8>(P::MessageType).ok();
    let applicable = match msg.category() {
        2 | 19 => true,
        34 => message_type != Some(cat034::MSG_JAMMING_STROBE),
        10 => message_type.is_some_and(|t| t != cat010::MSG_TARGET_REPORT),
        _ => false,
    };
    if !applicable {
        return Err(AsterixError::NotApplicable("not a status message"));
    }

    let north_marker = match msg.category() {
        2 => message_type == Some(cat002::MSG_NORTH_MARKER),
        34 => message_type == Some(cat034::MSG_NORTH_MARKER),
        _ => false,
    };

    Ok(TrackerStatus {
        category: msg.category(),
        sac: msg.get::<u8>(P::Sac).ok(),
        sic: msg.get::<u8>(P::Sic).ok(),
        message_type,
        time_of_day: record_time(msg, opts),
        north_marker,
        sector_deg: msg.scaled(P::SectorNumber),
        rotation_period_s: msg.scaled(P::AntennaRotationPeriod),
        status: status_flags(msg),
    })
}

/// Build a strobe from a CAT034 jamming strobe message.
pub fn build_strobe(msg: &AsterixMessage, opts: &ConvertOptions) -> Result<Strobe> {
    if msg.category() != 34 || msg.get::<u8>(P::MessageType).ok() != Some(cat034::MSG_JAMMING_STROBE) {
        return Err(AsterixError::NotApplicable("not a jamming strobe"));
    }
    let azimuth_deg = msg
        .scaled(P::SectorNumber)
        .ok_or(AsterixError::PropertyNotPresent(P::SectorNumber))?;
    Ok(Strobe {
        category: msg.category(),
        sac: msg.get::<u8>(P::Sac).ok(),
        sic: msg.get::<u8>(P::Sic).ok(),
        time_of_day: record_time(msg, opts),
        azimuth_deg,
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn pair(msg: &AsterixMessage, a: P, b: P) -> Option<(f64, f64)> {
    Some((msg.scaled(a)?, msg.scaled(b)?))
}

fn bit(msg: &AsterixMessage, prop: P, mask: u8) -> bool {
    msg.get::<u8>(prop).is_ok_and(|v| v & mask != 0)
}

/// Time of day of the record with the radar offset applied, wrapped to
/// one day.
fn record_time(msg: &AsterixMessage, opts: &ConvertOptions) -> Option<f64> {
    let tod = msg
        .scaled(P::TimeOfDay)
        .or_else(|| msg.scaled(P::TimePosition))
        .or_else(|| msg.scaled(P::MsgTimePosition))?;
    Some((tod + opts.time_offset).rem_euclid(SECONDS_PER_DAY))
}

fn track_flags(msg: &AsterixMessage) -> TrackFlags {
    let mut flags = TrackFlags::empty();
    let mut set = |flag: TrackFlags, on: bool| flags.set(flag, on);
    match msg.category() {
        1 => {
            set(TrackFlags::TENTATIVE, bit(msg, P::TrackStatus, 0x80));
            set(TrackFlags::ENDED, bit(msg, P::TrackStatusExt, 0x80));
            set(TrackFlags::SIMULATED, bit(msg, P::TargetReport, 0x40));
            set(TrackFlags::SPI, bit(msg, P::TargetReport, 0x04));
            set(TrackFlags::PLOT, !bit(msg, P::TargetReport, cat001::TYP_TRACK));
        }
        48 | 159 => {
            set(TrackFlags::TENTATIVE, bit(msg, P::TrackStatus, cat048::TRACK_CNF));
            set(TrackFlags::ENDED, bit(msg, P::TrackStatusExt, cat048::TRACK_TRE));
            set(TrackFlags::SIMULATED, bit(msg, P::TargetReport, 0x10));
            set(TrackFlags::SPI, bit(msg, P::TargetReport, 0x04));
        }
        10 => {
            set(TrackFlags::TENTATIVE, bit(msg, P::TrackStatus, cat010::TRACK_CNF));
            set(TrackFlags::ENDED, bit(msg, P::TrackStatus, 0x40));
            set(TrackFlags::COASTING, bit(msg, P::TrackStatus, 0x30));
            set(TrackFlags::SIMULATED, bit(msg, P::TargetReportExt, 0x80));
        }
        20 => {
            set(TrackFlags::TENTATIVE, bit(msg, P::TrackStatus, 0x80));
            set(TrackFlags::ENDED, bit(msg, P::TrackStatus, 0x40));
            set(TrackFlags::COASTING, bit(msg, P::TrackStatus, 0x20));
            set(TrackFlags::SPI, bit(msg, P::TargetReportExt, 0x40));
            set(TrackFlags::SIMULATED, bit(msg, P::TargetReportExt, 0x04));
        }
        21 if msg.version().major > 0 => {
            set(TrackFlags::SIMULATED, bit(msg, P::TargetReportExt, 0x20));
        }
        62 => {
            set(TrackFlags::TENTATIVE, bit(msg, P::TrackStatus, cat062::TRACK_CNF));
            set(TrackFlags::SPI, bit(msg, P::TrackStatus, cat062::TRACK_SPI));
            set(TrackFlags::SIMULATED, bit(msg, P::TrackStatusExt, cat062::TRACK_SIM));
            set(TrackFlags::ENDED, bit(msg, P::TrackStatusExt, cat062::TRACK_TSE));
        }
        _ => {}
    }
    flags
}

fn status_flags(msg: &AsterixMessage) -> StatusFlags {
    let mut flags = StatusFlags::empty();
    match msg.category() {
        34 => {
            flags.set(StatusFlags::NOGO, bit(msg, P::StatusCommon, 0x80));
            flags.set(StatusFlags::CHANNEL_B, bit(msg, P::StatusCommon, 0x40));
            flags.set(StatusFlags::OVERLOAD, bit(msg, P::StatusCommon, 0x18));
            flags.set(StatusFlags::TIME_INVALID, bit(msg, P::StatusCommon, 0x02));
        }
        10 | 19 => {
            if let Ok(status) = msg.get::<u8>(P::SystemStatus) {
                match status >> 6 {
                    0 => {}
                    1 => flags |= StatusFlags::DEGRADED,
                    _ => flags |= StatusFlags::NOGO,
                }
                flags.set(StatusFlags::OVERLOAD, status & 0x20 != 0);
                flags.set(StatusFlags::TIME_INVALID, status & 0x10 != 0);
                let ttf = if msg.category() == 19 { 0x08 } else { 0x04 };
                flags.set(StatusFlags::TEST_TARGET_FAILED, status & ttf != 0);
            }
        }
        _ => {}
    }
    flags
}

/// Point at `range` metres along `bearing` degrees from the sensor.
fn destination(sensor: SensorPosition, range: f64, bearing: f64) -> (f64, f64) {
    let (lat1, lon1) = (sensor.lat.to_radians(), sensor.lon.to_radians());
    let delta = range / EARTH_RADIUS;
    let theta = bearing.to_radians();
    let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * theta.cos()).asin();
    let lon2 = lon1 + (theta.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * lat2.sin());
    let lon2 = (lon2.to_degrees() + 540.0).rem_euclid(360.0) - 180.0;
    (lat2.to_degrees(), lon2)
}

/// Great-circle range (metres) and initial bearing (degrees) from the sensor.
fn range_bearing(sensor: SensorPosition, lat: f64, lon: f64) -> (f64, f64) {
    let (lat1, lat2) = (sensor.lat.to_radians(), lat.to_radians());
    let dlat = lat2 - lat1;
    let dlon = (lon - sensor.lon).to_radians();
    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let range = 2.0 * EARTH_RADIUS * a.sqrt().atan2((1.0 - a).sqrt());
    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
    (range, y.atan2(x).to_degrees().rem_euclid(360.0))
}

/// Absolute UNIX time for a 1/128 s time of day, taking the day from `now`.
///
/// Picks the day that puts the result within twelve hours of `now`, so
/// reports stamped just before midnight decoded just after it (and the
/// reverse) land on the right day.
pub fn time_from_128ths(tod_128ths: u32, now: f64) -> f64 {
    let tod = tod_128ths as f64 / 128.0;
    let day_start = (now / SECONDS_PER_DAY).floor() * SECONDS_PER_DAY;
    let t = day_start + tod;
    if t - now > SECONDS_PER_DAY / 2.0 {
        t - SECONDS_PER_DAY
    } else if now - t > SECONDS_PER_DAY / 2.0 {
        t + SECONDS_PER_DAY
    } else {
        t
    }
}

/// Decode a Gillham-coded Mode C reply to flight level (hundreds of feet).
///
/// `code` holds the pulses in reply order C1 A1 C2 A2 C4 A4 B1 D1 B2 D2 B4
/// D4, C1 in bit 11. Returns `None` for codes with an illegal 100 ft part.
pub fn unmangle_mode_c(code: u16) -> Option<i32> {
    let pulse = |bit: u32| ((code >> bit) & 1) as u32;
    let (c1, a1, c2, a2, c4, a4) = (pulse(11), pulse(10), pulse(9), pulse(8), pulse(7), pulse(6));
    let (b1, b2, d2, b4, d4) = (pulse(5), pulse(3), pulse(2), pulse(1), pulse(0));

    let gray500 = [d2, d4, a1, a2, a4, b1, b2, b4].iter().fold(0, |acc, &b| (acc << 1) | b);
    let gray100 = (c1 << 2) | (c2 << 1) | c4;

    let n500 = gray_to_binary(gray500) as i32;
    let mut n100 = match gray_to_binary(gray100) {
        7 => 5,
        n @ 1..=4 => n as i32,
        _ => return None,
    };
    if n500 % 2 == 1 {
        n100 = 6 - n100;
    }
    let feet = 500 * n500 + 100 * n100 - 1300;
    Some(feet / 100)
}

fn gray_to_binary(gray: u32) -> u32 {
    let mut binary = gray;
    let mut shift = gray >> 1;
    while shift != 0 {
        binary ^= shift;
        shift >>= 1;
    }
    binary
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
