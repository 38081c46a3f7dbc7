//! Display formatting of decoded data items.
//!
//! Kept off the decode path: items are rendered from a finished message by
//! looking up the item's fields in the table the record was decoded with
//! and printing every field present, honoring the caller's units.

use std::fmt::Write as _;
use std::str::FromStr;

use crate::item::{DataItem, Field, ItemKind, Unit, FT, KT, NM};
use crate::message::AsterixMessage;
use crate::property::{Property, PropertyKind};
use crate::spf;
use crate::types::{hex_encode, AsterixError, Result};

/// Horizontal distance unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DistanceUnit {
    Metres,
    Kilometres,
    #[default]
    NauticalMiles,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SpeedUnit {
    MetresPerSecond,
    #[default]
    Knots,
    KilometresPerHour,
}

/// Height and altitude unit; flight levels are converted as well.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HeightUnit {
    Metres,
    Feet,
    #[default]
    FlightLevel,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LatLongFormat {
    /// `51.500000N`
    #[default]
    Degrees,
    /// `51 30.0000N`
    DegreesMinutes,
    /// `51 30 00.00N`
    DegreesMinutesSeconds,
}

fn bad_unit(name: &str, value: &str) -> AsterixError {
    AsterixError::InvalidParameter {
        name: name.into(),
        value: value.into(),
    }
}

impl FromStr for DistanceUnit {
    type Err = AsterixError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "m" => Ok(DistanceUnit::Metres),
            "km" => Ok(DistanceUnit::Kilometres),
            "nm" => Ok(DistanceUnit::NauticalMiles),
            _ => Err(bad_unit("distance", s)),
        }
    }
}

impl FromStr for SpeedUnit {
    type Err = AsterixError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mps" | "m/s" => Ok(SpeedUnit::MetresPerSecond),
            "kt" | "kts" => Ok(SpeedUnit::Knots),
            "kmh" | "km/h" => Ok(SpeedUnit::KilometresPerHour),
            _ => Err(bad_unit("speed", s)),
        }
    }
}

impl FromStr for HeightUnit {
    type Err = AsterixError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "m" => Ok(HeightUnit::Metres),
            "ft" => Ok(HeightUnit::Feet),
            "fl" => Ok(HeightUnit::FlightLevel),
            _ => Err(bad_unit("height", s)),
        }
    }
}

impl FromStr for LatLongFormat {
    type Err = AsterixError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "deg" => Ok(LatLongFormat::Degrees),
            "dm" => Ok(LatLongFormat::DegreesMinutes),
            "dms" => Ok(LatLongFormat::DegreesMinutesSeconds),
            _ => Err(bad_unit("latlong", s)),
        }
    }
}

/// How to render values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    pub distance: DistanceUnit,
    pub speed: SpeedUnit,
    pub height: HeightUnit,
    pub lat_long: LatLongFormat,
    /// Decimal places for scaled values.
    pub precision: usize,
    /// Placed between the fields of one item.
    pub separator: String,
}

impl Default for FormatOptions {
    fn default() -> Self {
        FormatOptions {
            distance: DistanceUnit::default(),
            speed: SpeedUnit::default(),
            height: HeightUnit::default(),
            lat_long: LatLongFormat::default(),
            precision: 3,
            separator: ", ".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// Render one data item of a decoded message.
///
/// `id` selects the item by number (e.g. 40 for I048/040) and is ignored
/// for the reserved expansion and special purpose fields. Fails with
/// `NotApplicable` when the item is unknown or was not in the record.
pub fn format_item(msg: &AsterixMessage, kind: ItemKind, id: u16, opts: &FormatOptions) -> Result<String> {
    let item = msg
        .uap()
        .iter()
        .flatten()
        .find(|item| item.kind == kind && (kind != ItemKind::Data || item.id == id))
        .ok_or(AsterixError::NotApplicable("no such item in the record's table"))?;
    render_item(msg, item, opts).ok_or(AsterixError::NotApplicable("item not present in the record"))
}

/// Render every item present in a message, in table order, as
/// (label, text) pairs.
pub fn format_message(msg: &AsterixMessage, opts: &FormatOptions) -> Vec<(&'static str, String)> {
    msg.uap()
        .iter()
        .flatten()
        .filter_map(|item| Some((item.label, render_item(msg, item, opts)?)))
        .collect()
}

fn render_item(msg: &AsterixMessage, item: &DataItem, opts: &FormatOptions) -> Option<String> {
    let fields = match item.kind {
        ItemKind::Spf => match spf::layout(msg.project_code()) {
            Some(layout) if msg.spf_store().is_some() => layout.iter().flatten().flat_map(|s| s.all_fields()).collect(),
            _ => return msg.get_data(Property::Spf).ok().map(|d| format!("Spf={}", hex_encode(d))),
        },
        _ => item.all_fields(),
    };

    let mut out = String::new();
    for field in fields {
        let Some(text) = format_field(msg, field, opts) else {
            continue;
        };
        if !out.is_empty() {
            out.push_str(&opts.separator);
        }
        let _ = write!(out, "{}={text}", field.prop.map_or("?", Property::name));
    }
    (!out.is_empty()).then_some(out)
}

/// Render one field's value, `None` if its property is absent.
pub fn format_field(msg: &AsterixMessage, field: &Field, opts: &FormatOptions) -> Option<String> {
    let prop = field.prop?;
    match prop.kind() {
        PropertyKind::Text => return msg.get_text(prop).ok().map(str::to_string),
        PropertyKind::Data => return msg.get_data(prop).ok().map(hex_encode),
        _ => {}
    }
    let raw = msg.get_int(prop).ok()?;
    Some(format_value(prop, raw, field.unit, opts))
}

fn format_value(prop: Property, raw: i64, unit: Unit, opts: &FormatOptions) -> String {
    let p = opts.precision;
    let value = unit.apply(raw).unwrap_or(raw as f64);
    match unit {
        Unit::Raw | Unit::Text | Unit::Blob => raw.to_string(),
        Unit::Flags => format!("0x{:0w$X}", raw, w = prop.kind().width() * 2),
        Unit::Hex => format!("{raw:06X}"),
        Unit::Octal => format!("{raw:04o}"),
        Unit::Time(_) if is_time_of_day(prop) => format_time_of_day(value, p),
        Unit::Time(_) => format!("{value:.p$} s"),
        Unit::Distance(_) => match opts.distance {
            DistanceUnit::Metres => format!("{value:.p$} m"),
            DistanceUnit::Kilometres => format!("{:.p$} km", value / 1000.0),
            DistanceUnit::NauticalMiles => format!("{:.p$} NM", value / NM),
        },
        Unit::Height(_) => format_height(value, opts),
        Unit::FlightLevel(_) => format_height(value * 100.0 * FT, opts),
        Unit::Speed(_) => match opts.speed {
            SpeedUnit::MetresPerSecond => format!("{value:.p$} m/s"),
            SpeedUnit::Knots => format!("{:.p$} kt", value / KT),
            SpeedUnit::KilometresPerHour => format!("{:.p$} km/h", value * 3.6),
        },
        Unit::Angle(_) => format!("{value:.p$} deg"),
        Unit::Latitude(_) => format_lat_long(value, opts.lat_long, p, ['N', 'S']),
        Unit::Longitude(_) => format_lat_long(value, opts.lat_long, p, ['E', 'W']),
        Unit::Scaled(_, suffix) => format!("{value:.p$} {suffix}"),
    }
}

fn format_height(metres: f64, opts: &FormatOptions) -> String {
    let p = opts.precision;
    match opts.height {
        HeightUnit::Metres => format!("{metres:.p$} m"),
        HeightUnit::Feet => format!("{:.p$} ft", metres / FT),
        HeightUnit::FlightLevel => format!("FL{:.p$}", metres / FT / 100.0),
    }
}

fn is_time_of_day(prop: Property) -> bool {
    matches!(
        prop,
        Property::TimeOfDay
            | Property::TimePosition
            | Property::TimeVelocity
            | Property::MsgTimePosition
            | Property::MsgTimeVelocity
    )
}

/// `HH:MM:SS.sss`
pub fn format_time_of_day(secs: f64, precision: usize) -> String {
    let secs = secs.rem_euclid(86_400.0);
    let hours = (secs / 3600.0).floor();
    let minutes = ((secs - hours * 3600.0) / 60.0).floor();
    let seconds = secs - hours * 3600.0 - minutes * 60.0;
    let width = if precision == 0 { 2 } else { precision + 3 };
    format!("{:02}:{:02}:{seconds:0width$.precision$}", hours as u32, minutes as u32)
}

/// Latitude or longitude with a hemisphere letter.
pub fn format_lat_long(degrees: f64, format: LatLongFormat, precision: usize, hemispheres: [char; 2]) -> String {
    let hemi = if degrees < 0.0 { hemispheres[1] } else { hemispheres[0] };
    let abs = degrees.abs();
    let p = precision;
    match format {
        LatLongFormat::Degrees => format!("{abs:.p$}{hemi}"),
        LatLongFormat::DegreesMinutes => {
            let deg = abs.floor();
            let minutes = (abs - deg) * 60.0;
            let width = if p == 0 { 2 } else { p + 3 };
            format!("{} {minutes:0width$.p$}{hemi}", deg as u32)
        }
        LatLongFormat::DegreesMinutesSeconds => {
            let deg = abs.floor();
            let total_minutes = (abs - deg) * 60.0;
            let minutes = total_minutes.floor();
            let seconds = (total_minutes - minutes) * 60.0;
            let width = if p == 0 { 2 } else { p + 3 };
            format!("{} {:02} {seconds:0width$.p$}{hemi}", deg as u32, minutes as u32)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
