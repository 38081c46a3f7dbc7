//! Data item descriptions and the generic item decoders.
//!
//! Responsibilities:
//! - Table vocabulary: `DataItem`, `Shape`, `Decode`, `Field`, `Unit`
//! - Extent computation for the five item shapes (needed to skip items and
//!   to bound every item's decode to its own bytes)
//! - Generic decoders for fixed fields, FX-extended octets, blobs, text,
//!   and compound/expansion sub-items
//! - Decoders and sub-item tables shared by several categories

use crate::cursor::Cursor;
use crate::fspec::Fspec;
use crate::message::PropertyStore;
use crate::property::Property as P;
use crate::property::Property;
use crate::types::{decode_ascii, decode_six_bit, sign_extend, AsterixError, Result};

/// Metres per nautical mile.
pub const NM: f64 = 1852.0;
/// Metres per foot.
pub const FT: f64 = 0.3048;
/// Metres/second per knot.
pub const KT: f64 = 1852.0 / 3600.0;
/// Metres/second per foot/minute.
pub const FPM: f64 = 0.3048 / 60.0;

// ---------------------------------------------------------------------------
// Units
// ---------------------------------------------------------------------------

/// Physical meaning and scale of one LSB of a field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Unit {
    /// Plain count or enumeration.
    Raw,
    /// Bit flags, rendered in hex.
    Flags,
    /// Address, rendered as six hex digits.
    Hex,
    /// 12-bit reply code, rendered as four octal digits.
    Octal,
    Text,
    Blob,
    /// Seconds per LSB.
    Time(f64),
    /// Metres per LSB, horizontal.
    Distance(f64),
    /// Metres per LSB, vertical.
    Height(f64),
    /// Flight levels per LSB.
    FlightLevel(f64),
    /// Metres/second per LSB.
    Speed(f64),
    /// Degrees per LSB.
    Angle(f64),
    /// Degrees of latitude per LSB.
    Latitude(f64),
    /// Degrees of longitude per LSB.
    Longitude(f64),
    /// Any other scaled quantity with a fixed suffix.
    Scaled(f64, &'static str),
}

impl Unit {
    pub fn scale(self) -> Option<f64> {
        match self {
            Unit::Time(s)
            | Unit::Distance(s)
            | Unit::Height(s)
            | Unit::FlightLevel(s)
            | Unit::Speed(s)
            | Unit::Angle(s)
            | Unit::Latitude(s)
            | Unit::Longitude(s)
            | Unit::Scaled(s, _) => Some(s),
            Unit::Raw | Unit::Flags | Unit::Hex | Unit::Octal => Some(1.0),
            Unit::Text | Unit::Blob => None,
        }
    }

    pub fn apply(self, raw: i64) -> Option<f64> {
        Some(raw as f64 * self.scale()?)
    }

    /// Raw value for a physical quantity, rounded to the nearest LSB.
    pub fn invert(self, value: f64) -> Option<i64> {
        let scale = self.scale()?;
        if scale == 0.0 || !value.is_finite() {
            return None;
        }
        Some((value / scale).round() as i64)
    }
}

// ---------------------------------------------------------------------------
// Fields
// ---------------------------------------------------------------------------

/// One sub-field of a data item.
///
/// `width` octets are read big-endian. When `bits` is non-zero only the low
/// `bits` bits are kept (sign-extended for signed properties). A field with
/// `width` 0 only describes a property set by a custom decoder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Field {
    pub prop: Option<Property>,
    pub width: u8,
    pub bits: u8,
    pub unit: Unit,
}

pub const fn f(prop: Property, width: u8, unit: Unit) -> Field {
    Field {
        prop: Some(prop),
        width,
        bits: 0,
        unit,
    }
}

pub const fn fb(prop: Property, width: u8, bits: u8, unit: Unit) -> Field {
    Field {
        prop: Some(prop),
        width,
        bits,
        unit,
    }
}

pub const fn spare(width: u8) -> Field {
    Field {
        prop: None,
        width,
        bits: 0,
        unit: Unit::Raw,
    }
}

/// Descriptive field for a property produced by a custom decoder.
pub const fn tag(prop: Property, unit: Unit) -> Field {
    f(prop, 0, unit)
}

impl Field {
    fn extract(&self, prop: Property, raw: u32) -> i64 {
        let bits = if self.bits == 0 {
            self.width as u32 * 8
        } else {
            self.bits as u32
        };
        let masked = if bits >= 32 {
            raw
        } else {
            raw & ((1u32 << bits) - 1)
        };
        if prop.kind().is_signed() {
            sign_extend(masked, bits) as i64
        } else {
            masked as i64
        }
    }
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// Wire layout of an item, enough to find where it ends.
#[derive(Debug, Clone, Copy)]
pub enum Shape {
    /// Fixed number of octets.
    Fixed(usize),
    /// `first` octets, then `ext` more for as long as the last octet read
    /// has its FX bit set.
    Extended { first: usize, ext: usize },
    /// Repetition factor octet, then that many `n`-octet elements.
    Repetitive(usize),
    /// Length octet (counting itself), then contents.
    Explicit,
    /// Sub-field FSPEC, then the flagged sub-items.
    Compound(Uap),
}

pub type CustomFn = fn(&mut Cursor<'_>, &mut PropertyStore) -> Result<()>;

/// How an item's bytes become properties.
#[derive(Debug, Clone, Copy)]
pub enum Decode {
    /// Read `fields` in order.
    Fields,
    /// One octet per field, in order; extension octets beyond the field
    /// list are ignored.
    Octets,
    /// Item contents (past any repetition or length octet) as a blob.
    Blob(Property),
    /// 6-bit ICAO characters.
    SixBit(Property),
    Ascii(Property),
    /// Sub-items of a `Shape::Compound` item.
    Compound,
    /// Explicit-length item holding an FSPEC and sub-items.
    Expansion(Uap),
    Custom(CustomFn),
    /// Extent only; contents are not interpreted.
    Skip,
}

/// Role of an item within a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ItemKind {
    Data,
    /// Reserved expansion field.
    Ref,
    /// Special purpose field.
    Spf,
}

/// Table entry for one data item.
#[derive(Debug, Clone, Copy)]
pub struct DataItem {
    /// Item number within the category, e.g. 10 for I048/010.
    pub id: u16,
    pub label: &'static str,
    pub kind: ItemKind,
    pub shape: Shape,
    pub decode: Decode,
    pub fields: &'static [Field],
}

/// FRN-indexed item table; index 0 is FRN 1, `None` marks a spare FRN.
pub type Uap = &'static [Option<DataItem>];

pub const fn item(
    id: u16,
    label: &'static str,
    shape: Shape,
    decode: Decode,
    fields: &'static [Field],
) -> Option<DataItem> {
    Some(DataItem {
        id,
        label,
        kind: ItemKind::Data,
        shape,
        decode,
        fields,
    })
}

pub const fn fixed(id: u16, label: &'static str, len: usize, fields: &'static [Field]) -> Option<DataItem> {
    item(id, label, Shape::Fixed(len), Decode::Fields, fields)
}

/// FX-extended item stored one property per octet.
pub const fn extended(id: u16, label: &'static str, fields: &'static [Field]) -> Option<DataItem> {
    item(id, label, Shape::Extended { first: 1, ext: 1 }, Decode::Octets, fields)
}

pub const fn compound(id: u16, label: &'static str, subs: Uap) -> Option<DataItem> {
    item(id, label, Shape::Compound(subs), Decode::Compound, &[])
}

pub const fn reserved_expansion(subs: Uap, fields: &'static [Field]) -> Option<DataItem> {
    Some(DataItem {
        id: 0,
        label: "RE",
        kind: ItemKind::Ref,
        shape: Shape::Explicit,
        decode: Decode::Expansion(subs),
        fields,
    })
}

/// Reserved expansion field whose contents are skipped.
pub const fn reserved_skip() -> Option<DataItem> {
    Some(DataItem {
        id: 0,
        label: "RE",
        kind: ItemKind::Ref,
        shape: Shape::Explicit,
        decode: Decode::Skip,
        fields: &[],
    })
}

pub const fn special_purpose() -> Option<DataItem> {
    Some(DataItem {
        id: 0,
        label: "SP",
        kind: ItemKind::Spf,
        shape: Shape::Explicit,
        decode: Decode::Blob(P::Spf),
        fields: &[],
    })
}

impl Shape {
    /// Length in octets of the item starting at the cursor. Does not
    /// consume.
    pub fn extent(&self, cur: &Cursor<'_>) -> Result<usize> {
        let mut probe = *cur;
        let start = probe.position();
        self.skip(&mut probe)?;
        Ok(probe.position() - start)
    }

    fn skip(&self, cur: &mut Cursor<'_>) -> Result<()> {
        match *self {
            Shape::Fixed(n) => cur.skip(n),
            Shape::Extended { first, ext } => {
                let mut part = cur.read_bytes(first)?;
                while part.last().is_some_and(|b| b & 0x01 != 0) {
                    part = cur.read_bytes(ext)?;
                }
                Ok(())
            }
            Shape::Repetitive(n) => {
                let rep = cur.read_u8()? as usize;
                cur.skip(rep * n)
            }
            Shape::Explicit => {
                let len = cur.read_u8()? as usize;
                if len == 0 {
                    return Err(AsterixError::invalid("explicit length of zero"));
                }
                cur.skip(len - 1)
            }
            Shape::Compound(subs) => {
                let fspec = Fspec::read(cur)?;
                for frn in fspec.items() {
                    sub_item(subs, frn)?.shape.skip(cur)?;
                }
                Ok(())
            }
        }
    }
}

fn sub_item(subs: Uap, frn: usize) -> Result<&'static DataItem> {
    subs.get(frn - 1)
        .and_then(Option::as_ref)
        .ok_or(AsterixError::invalid("undefined compound sub-field"))
}

impl DataItem {
    /// Decode the item's contents. `cur` must span exactly the item.
    pub fn decode(&self, cur: &mut Cursor<'_>, store: &mut PropertyStore) -> Result<()> {
        match self.decode {
            Decode::Fields => decode_fields(cur, self.fields, store),
            Decode::Octets => decode_octets(cur, self.fields, store),
            Decode::Blob(prop) => {
                if matches!(self.shape, Shape::Repetitive(_) | Shape::Explicit) {
                    cur.skip(1)?;
                }
                store.set_data(prop, cur.read_bytes(cur.remaining())?)
            }
            Decode::SixBit(prop) => {
                let text = decode_six_bit(cur.read_bytes(cur.remaining())?);
                store.set_text(prop, text)
            }
            Decode::Ascii(prop) => {
                let text = decode_ascii(cur.read_bytes(cur.remaining())?);
                store.set_text(prop, text)
            }
            Decode::Compound => match self.shape {
                Shape::Compound(subs) => decode_sub_items(cur, subs, store),
                _ => Err(AsterixError::invalid("compound decode on a non-compound item")),
            },
            Decode::Expansion(subs) => {
                cur.skip(1)?;
                decode_sub_items(cur, subs, store)
            }
            Decode::Custom(decode) => decode(cur, store),
            Decode::Skip => Ok(()),
        }
    }

    /// Field describing `prop` in this item or its sub-items.
    pub fn find_field(&self, prop: Property) -> Option<&'static Field> {
        let fields: &'static [Field] = self.fields;
        if let Some(field) = fields.iter().find(|f| f.prop == Some(prop)) {
            return Some(field);
        }
        match (self.shape, self.decode) {
            (Shape::Compound(subs), _) | (_, Decode::Expansion(subs)) => find_field(subs, prop),
            _ => None,
        }
    }

    /// Every field of the item, sub-items included, in table order.
    pub fn all_fields(&self) -> Vec<&'static Field> {
        let fields: &'static [Field] = self.fields;
        let mut out: Vec<&'static Field> = fields.iter().filter(|f| f.prop.is_some()).collect();
        if let (Shape::Compound(subs), _) | (_, Decode::Expansion(subs)) = (self.shape, self.decode) {
            for sub in subs.iter().flatten() {
                out.extend(sub.all_fields());
            }
        }
        out
    }
}

/// First field describing `prop` anywhere in `uap`.
pub fn find_field(uap: Uap, prop: Property) -> Option<&'static Field> {
    uap.iter().flatten().find_map(|item| item.find_field(prop))
}

pub fn decode_fields(cur: &mut Cursor<'_>, fields: &[Field], store: &mut PropertyStore) -> Result<()> {
    for field in fields.iter().filter(|f| f.width > 0) {
        let raw = cur.read_uint(field.width as usize)?;
        if let Some(prop) = field.prop {
            store.set_raw(prop, field.extract(prop, raw))?;
        }
    }
    Ok(())
}

fn decode_octets(cur: &mut Cursor<'_>, fields: &[Field], store: &mut PropertyStore) -> Result<()> {
    let octets = cur.read_bytes(cur.remaining())?;
    for (octet, field) in octets.iter().zip(fields) {
        if let Some(prop) = field.prop {
            store.set_raw(prop, *octet as i64)?;
        }
    }
    Ok(())
}

/// Decode an FSPEC-indexed run of sub-items.
pub fn decode_sub_items(cur: &mut Cursor<'_>, subs: Uap, store: &mut PropertyStore) -> Result<()> {
    let fspec = Fspec::read(cur)?;
    for frn in fspec.items() {
        let sub = sub_item(subs, frn)?;
        let len = sub.shape.extent(cur)?;
        let mut body = cur.sub_cursor(len)?;
        sub.decode(&mut body, store).map_err(|e| e.in_item(sub.label))?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Shared fields and decoders
// ---------------------------------------------------------------------------

pub const DATA_SOURCE: &[Field] = &[f(P::Sac, 1, Unit::Raw), f(P::Sic, 1, Unit::Raw)];
pub const TIME_OF_DAY: &[Field] = &[f(P::TimeOfDay, 3, Unit::Time(1.0 / 128.0))];
pub const MESSAGE_TYPE: &[Field] = &[f(P::MessageType, 1, Unit::Raw)];
/// Reply code in the low 12 bits; V, G and L flags above it are dropped.
pub const MODE_3A: &[Field] = &[fb(P::Mode3, 2, 12, Unit::Octal)];
pub const TRACK_NUMBER: &[Field] = &[f(P::TrackNumber, 2, Unit::Raw)];
pub const AIRCRAFT_ADDRESS: &[Field] = &[f(P::AircraftAddress, 3, Unit::Hex)];
pub const AIRCRAFT_ID: &[Field] = &[tag(P::AircraftId, Unit::Text)];
pub const MODE_S_MB: &[Field] = &[tag(P::ModeSMbData, Unit::Blob)];
pub const WARNING_ERROR: &[Field] = &[tag(P::WarningError, Unit::Blob)];

pub const FLIGHT_LEVEL_VG: &[Field] = &[
    tag(P::FlightLevelFlags, Unit::Flags),
    tag(P::FlightLevel, Unit::FlightLevel(0.25)),
];

/// Flight level with V and G flags in the top two bits and a 14-bit
/// two's complement value in 1/4 FL.
pub fn flight_level_vg(cur: &mut Cursor<'_>, store: &mut PropertyStore) -> Result<()> {
    let raw = cur.read_u16()?;
    store.set(P::FlightLevelFlags, (raw >> 14) as u8)?;
    store.set(P::FlightLevel, sign_extend(raw as u32 & 0x3FFF, 14) as i16)
}

pub const TARGET_IDENTIFICATION: &[Field] = &[tag(P::Sti, Unit::Raw), tag(P::AircraftId, Unit::Text)];

/// Identification source indicator in the top two bits, then eight 6-bit
/// characters.
pub fn target_identification(cur: &mut Cursor<'_>, store: &mut PropertyStore) -> Result<()> {
    let sti = cur.read_u8()? >> 6;
    let chars = cur.read_bytes(6)?;
    store.set(P::Sti, sti)?;
    store.set_text(P::AircraftId, decode_six_bit(chars))
}

/// PIN (14 bits) then national origin (11 bits) in two 16-bit halves.
pub fn mode5_pin_national_origin(cur: &mut Cursor<'_>, store: &mut PropertyStore) -> Result<()> {
    let pin = cur.read_u16()? & 0x3FFF;
    let nat = cur.read_u16()? & 0x07FF;
    store.set(P::MesMode5Pin, pin)?;
    store.set(P::MesMode5Nat, nat)
}

/// Mode 5 GNSS altitude: RES bit selects 25 ft or 100 ft resolution; the
/// stored value is always in 25 ft.
pub fn mode5_altitude(cur: &mut Cursor<'_>, store: &mut PropertyStore) -> Result<()> {
    let raw = cur.read_u16()?;
    let value = sign_extend(raw as u32 & 0x3FFF, 14);
    let value = if raw & 0x4000 != 0 { value } else { value * 4 };
    let value = i16::try_from(value).map_err(|_| AsterixError::invalid("Mode 5 altitude out of range"))?;
    store.set(P::MesMode5Altitude, value)
}

const M5_SUM: &[Field] = &[f(P::MesMode5Summary, 1, Unit::Flags)];
const M5_PMN: &[Field] = &[tag(P::MesMode5Pin, Unit::Raw), tag(P::MesMode5Nat, Unit::Raw)];
const M5_POS: &[Field] = &[
    f(P::MesMode5PosLatitude, 3, Unit::Latitude(180.0 / 8388608.0)),
    f(P::MesMode5PosLongitude, 3, Unit::Longitude(180.0 / 8388608.0)),
];
const M5_GA: &[Field] = &[tag(P::MesMode5Altitude, Unit::Height(25.0 * FT))];
const M5_EM1: &[Field] = &[f(P::Mode1Ext, 2, Unit::Octal)];
const M5_TOS: &[Field] = &[f(P::MesMode5TimeOffset, 1, Unit::Time(1.0 / 128.0))];
const M5_XP: &[Field] = &[f(P::MesXPulse, 1, Unit::Flags)];
const M5_FOM: &[Field] = &[f(P::MesMode5Fom, 1, Unit::Raw)];

/// Mode 5 reports and extended Mode 1 code sub-items.
pub static MODE5_SUB_ITEMS: &[Option<DataItem>] = &[
    item(0, "SUM", Shape::Fixed(1), Decode::Fields, M5_SUM),
    item(0, "PMN", Shape::Fixed(4), Decode::Custom(mode5_pin_national_origin), M5_PMN),
    item(0, "POS", Shape::Fixed(6), Decode::Fields, M5_POS),
    item(0, "GA", Shape::Fixed(2), Decode::Custom(mode5_altitude), M5_GA),
    item(0, "EM1", Shape::Fixed(2), Decode::Fields, M5_EM1),
    item(0, "TOS", Shape::Fixed(1), Decode::Fields, M5_TOS),
    item(0, "XP", Shape::Fixed(1), Decode::Fields, M5_XP),
];

/// As `MODE5_SUB_ITEMS`, with a figure of merit in the second octet.
pub static MODE5_FOM_SUB_ITEMS: &[Option<DataItem>] = &[
    item(0, "SUM", Shape::Fixed(1), Decode::Fields, M5_SUM),
    item(0, "PMN", Shape::Fixed(4), Decode::Custom(mode5_pin_national_origin), M5_PMN),
    item(0, "POS", Shape::Fixed(6), Decode::Fields, M5_POS),
    item(0, "GA", Shape::Fixed(2), Decode::Custom(mode5_altitude), M5_GA),
    item(0, "EM1", Shape::Fixed(2), Decode::Fields, M5_EM1),
    item(0, "TOS", Shape::Fixed(1), Decode::Fields, M5_TOS),
    item(0, "XP", Shape::Fixed(1), Decode::Fields, M5_XP),
    item(0, "FOM", Shape::Fixed(1), Decode::Fields, M5_FOM),
];

/// Meteorological sub-items shared by CAT021 and CAT062.
pub static MET_SUB_ITEMS: &[Option<DataItem>] = &[
    fixed(0, "WS", 2, &[f(P::WindSpeed, 2, Unit::Speed(KT))]),
    fixed(0, "WD", 2, &[f(P::WindDirection, 2, Unit::Angle(1.0))]),
    fixed(0, "TMP", 2, &[f(P::Temperature, 2, Unit::Scaled(0.25, "degC"))]),
    fixed(0, "TRB", 1, &[f(P::Turbulence, 1, Unit::Raw)]),
];

/// Trajectory intent status and data sub-items.
pub static TRAJECTORY_INTENT_SUB_ITEMS: &[Option<DataItem>] = &[
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
];

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
