//! Category tables and record decoding.
//!
//! Responsibilities:
//! - `Category`: the supported categories, their default and accepted editions
//! - UAP selection (edition, configured UAP code, CAT001 plot/track peek)
//! - Record walk: FSPEC, SAC/SIC filter, per-item extent + decode, recovery
//! - Category post-processing (polar/Cartesian position completion)

pub mod cat001;
pub mod cat002;
pub mod cat004;
pub mod cat008;
pub mod cat010;
pub mod cat017;
pub mod cat019;
pub mod cat020;
pub mod cat021;
pub mod cat034;
pub mod cat048;
pub mod cat062;
pub mod cat159;
pub mod cat247;

use std::fmt;

use crate::config::RecoveryPolicy;
use crate::cursor::Cursor;
use crate::fspec::Fspec;
use crate::item::{DataItem, Uap};
use crate::message::AsterixMessage;
use crate::property::Property as P;
use crate::types::{AsterixError, Result};
use crate::version::Version;

/// UAP code forcing the CAT001 plot layout.
pub const UAP_CAT001_PLOT: u32 = 1;
/// UAP code forcing the CAT001 track layout.
pub const UAP_CAT001_TRACK: u32 = 2;

/// A supported ASTERIX category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Cat001,
    Cat002,
    Cat004,
    Cat008,
    Cat010,
    Cat017,
    Cat019,
    Cat020,
    Cat021,
    Cat034,
    Cat048,
    Cat062,
    Cat159,
    Cat247,
}

impl Category {
    pub const ALL: &'static [Category] = &[
        Category::Cat001,
        Category::Cat002,
        Category::Cat004,
        Category::Cat008,
        Category::Cat010,
        Category::Cat017,
        Category::Cat019,
        Category::Cat020,
        Category::Cat021,
        Category::Cat034,
        Category::Cat048,
        Category::Cat062,
        Category::Cat159,
        Category::Cat247,
    ];

    pub fn from_u8(code: u8) -> Option<Category> {
        Some(match code {
            1 => Category::Cat001,
            2 => Category::Cat002,
            4 => Category::Cat004,
            8 => Category::Cat008,
            10 => Category::Cat010,
            17 => Category::Cat017,
            19 => Category::Cat019,
            20 => Category::Cat020,
            21 => Category::Cat021,
            34 => Category::Cat034,
            48 => Category::Cat048,
            62 => Category::Cat062,
            159 => Category::Cat159,
            247 => Category::Cat247,
            _ => return None,
        })
    }

    pub fn code(self) -> u8 {
        match self {
            Category::Cat001 => 1,
            Category::Cat002 => 2,
            Category::Cat004 => 4,
            Category::Cat008 => 8,
            Category::Cat010 => 10,
            Category::Cat017 => 17,
            Category::Cat019 => 19,
            Category::Cat020 => 20,
            Category::Cat021 => 21,
            Category::Cat034 => 34,
            Category::Cat048 => 48,
            Category::Cat062 => 62,
            Category::Cat159 => 159,
            Category::Cat247 => 247,
        }
    }

    /// Edition used when nothing else selects one.
    pub fn default_version(self) -> Version {
        match self {
            Category::Cat001 => Version::new(1, 2),
            Category::Cat002 => Version::new(1, 0),
            Category::Cat004 => Version::new(1, 12),
            Category::Cat008 => Version::new(1, 2),
            Category::Cat010 => Version::new(1, 1),
            Category::Cat017 => Version::new(1, 3),
            Category::Cat019 => Version::new(1, 3),
            Category::Cat020 => Version::new(1, 9),
            Category::Cat021 => Version::new(2, 4),
            Category::Cat034 => Version::new(1, 29),
            Category::Cat048 => Version::new(1, 31),
            Category::Cat062 => Version::new(1, 19),
            Category::Cat159 => Version::new(1, 0),
            Category::Cat247 => Version::new(1, 3),
        }
    }

    /// True if a table exists for the edition.
    pub fn supports(self, version: Version) -> bool {
        match self {
            Category::Cat021 => version.major <= 2,
            _ => version.major == 1,
        }
    }

    /// Default item table for an edition and UAP code.
    pub fn uap(self, version: Version, uap_code: u32) -> Uap {
        match self {
            Category::Cat001 if uap_code == UAP_CAT001_TRACK => cat001::UAP_TRACK,
            Category::Cat001 => cat001::UAP_PLOT,
            Category::Cat002 => cat002::UAP,
            Category::Cat004 => cat004::UAP,
            Category::Cat008 => cat008::UAP,
            Category::Cat010 => cat010::UAP,
            Category::Cat017 => cat017::UAP,
            Category::Cat019 => cat019::UAP,
            Category::Cat020 => cat020::UAP,
            Category::Cat021 if version.major == 0 => cat021::UAP_V0,
            Category::Cat021 => cat021::UAP,
            Category::Cat034 => cat034::UAP,
            Category::Cat048 => cat048::UAP,
            Category::Cat062 => cat062::UAP,
            Category::Cat159 => cat159::UAP,
            Category::Cat247 => cat247::UAP,
        }
    }

    /// Item table for the record at `cur`, whose FSPEC has been read.
    ///
    /// CAT001 carries plots and tracks in one category; without a UAP code
    /// the TYP bit of I001/020 picks the layout.
    fn select_uap(self, version: Version, uap_code: u32, fspec: &Fspec<'_>, cur: &Cursor<'_>) -> Uap {
        if self == Category::Cat001 && uap_code != UAP_CAT001_PLOT && uap_code != UAP_CAT001_TRACK {
            if !fspec.is_set(2) {
                return cat001::UAP_PLOT;
            }
            let offset = if fspec.is_set(1) { 2 } else { 0 };
            return match cur.peek_at(offset) {
                Ok(b) if b & 0x80 != 0 => cat001::UAP_TRACK,
                _ => cat001::UAP_PLOT,
            };
        }
        self.uap(version, uap_code)
    }

    /// Fill in derived properties after all items are decoded.
    fn post_process(self, msg: &mut AsterixMessage) {
        match self {
            Category::Cat001 | Category::Cat048 | Category::Cat159 => {
                complete_position(msg);
            }
            _ => {}
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CAT{:03}", self.code())
    }
}

// ---------------------------------------------------------------------------
// Record decoding
// ---------------------------------------------------------------------------

/// Settings applied to every record of one block.
#[derive(Debug, Clone, Copy)]
pub struct RecordContext {
    pub version: Version,
    pub project_code: u32,
    pub uap_code: u32,
    /// Accept only this SAC; 0 accepts any.
    pub expected_sac: u8,
    /// Accept only this SIC; 0 accepts any.
    pub expected_sic: u8,
    pub permissive: bool,
    pub recovery: RecoveryPolicy,
}

impl RecordContext {
    pub fn new(version: Version) -> Self {
        RecordContext {
            version,
            project_code: 0,
            uap_code: 0,
            expected_sac: 0,
            expected_sic: 0,
            permissive: false,
            recovery: RecoveryPolicy::SkipItem,
        }
    }

    fn accepts(&self, sac: u8, sic: u8) -> bool {
        (self.expected_sac == 0 || self.expected_sac == sac)
            && (self.expected_sic == 0 || self.expected_sic == sic)
    }
}

/// A decoded record.
#[derive(Debug)]
pub struct RecordOutcome {
    pub message: AsterixMessage,
    /// False when the record's end could not be determined; the rest of
    /// the block cannot be decoded.
    pub resumable: bool,
}

fn lookup(uap: Uap, frn: usize) -> Option<&'static DataItem> {
    uap.get(frn.checked_sub(1)?).and_then(Option::as_ref)
}

/// Decode one record at the cursor, advancing past it.
///
/// Strict mode fails on the first error. When only an item's contents are
/// bad the remaining items are walked by extent and the failure comes back
/// as `RecordSkipped`, with the cursor on the next record. Permissive mode
/// marks the message partial and carries on with the next item. On
/// `FilterRejected` the cursor has been moved past the record.
pub fn decode_record(cur: &mut Cursor<'_>, category: Category, ctx: &RecordContext) -> Result<RecordOutcome> {
    let fspec = Fspec::read(cur)?;
    let uap = category.select_uap(ctx.version, ctx.uap_code, &fspec, cur);

    if (ctx.expected_sac != 0 || ctx.expected_sic != 0) && fspec.is_set(1) && carries_data_source(uap) {
        let (sac, sic) = (cur.peek_at(0)?, cur.peek_at(1)?);
        if !ctx.accepts(sac, sic) {
            skip_items(cur, &fspec, uap, category)?;
            return Err(AsterixError::FilterRejected);
        }
    }

    let mut msg = AsterixMessage::with_context(category.code(), ctx.version, ctx.project_code, ctx.uap_code, uap);
    let mut abandoned = false;
    let mut failure = None;

    for frn in fspec.items() {
        let Some(item) = lookup(uap, frn) else {
            let err = AsterixError::UnknownItem {
                category: category.code(),
                frn,
            };
            if ctx.permissive {
                log::warn!("{category}: {err}, dropping rest of block");
                msg.mark_partial();
                return Ok(RecordOutcome {
                    message: msg,
                    resumable: false,
                });
            }
            return Err(err);
        };

        let len = match item.shape.extent(cur) {
            Ok(len) => len,
            Err(e @ AsterixError::Truncated { .. }) => return Err(e),
            Err(e) if ctx.permissive => {
                log::warn!("{category} {}: {e}, dropping rest of block", item.label);
                msg.mark_partial();
                return Ok(RecordOutcome {
                    message: msg,
                    resumable: false,
                });
            }
            Err(e) => return Err(e.in_item(item.label)),
        };
        let mut body = cur.sub_cursor(len)?;
        if abandoned {
            continue;
        }

        if let Err(e) = item.decode(&mut body, msg.store_mut()) {
            let e = e.in_item(item.label);
            if !ctx.permissive {
                failure = Some(e);
                abandoned = true;
                continue;
            }
            log::warn!("{category}: {e}");
            msg.mark_partial();
            abandoned = ctx.recovery == RecoveryPolicy::AbortRecord;
        }
    }

    if let Some(e) = failure {
        return Err(AsterixError::RecordSkipped(Box::new(e)));
    }
    category.post_process(&mut msg);
    Ok(RecordOutcome {
        message: msg,
        resumable: true,
    })
}

fn carries_data_source(uap: Uap) -> bool {
    lookup(uap, 1).is_some_and(|item| item.fields.first().and_then(|f| f.prop) == Some(P::Sac))
}

/// Advance past every item flagged in `fspec` without decoding.
fn skip_items(cur: &mut Cursor<'_>, fspec: &Fspec<'_>, uap: Uap, category: Category) -> Result<()> {
    for frn in fspec.items() {
        let item = lookup(uap, frn).ok_or(AsterixError::UnknownItem {
            category: category.code(),
            frn,
        })?;
        let len = item.shape.extent(cur)?;
        cur.skip(len)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Post-processing
// ---------------------------------------------------------------------------

/// Derive the Cartesian position from the measured polar one, or the
/// reverse, when a record carries only one of them.
fn complete_position(msg: &mut AsterixMessage) {
    let polar = msg.contains(P::MeasuredPosRange) && msg.contains(P::MeasuredPosBearing);
    let cartesian = msg.contains(P::CalcPosX) && msg.contains(P::CalcPosY);

    if polar && !cartesian {
        let (Some(range), Some(bearing)) = (msg.scaled(P::MeasuredPosRange), msg.scaled(P::MeasuredPosBearing)) else {
            return;
        };
        let theta = bearing.to_radians();
        store_scaled(msg, P::CalcPosX, range * theta.sin());
        store_scaled(msg, P::CalcPosY, range * theta.cos());
    } else if cartesian && !polar {
        let (Some(x), Some(y)) = (msg.scaled(P::CalcPosX), msg.scaled(P::CalcPosY)) else {
            return;
        };
        store_scaled(msg, P::MeasuredPosRange, x.hypot(y));
        store_scaled(msg, P::MeasuredPosBearing, x.atan2(y).to_degrees().rem_euclid(360.0));
    }
}

fn store_scaled(msg: &mut AsterixMessage, prop: P, value: f64) {
    let Some(field) = msg.field(prop) else {
        return;
    };
    let Some(mut raw) = field.unit.invert(value) else {
        return;
    };
    if prop == P::MeasuredPosBearing {
        raw = raw.rem_euclid(1 << 16);
    }
    if let Err(e) = msg.store_mut().set_raw(prop, raw) {
        log::debug!("CAT{:03}: derived {prop:?} not stored: {e}", msg.category());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> RecordContext {
        RecordContext::new(Category::Cat048.default_version())
    }

    #[test]
    fn test_category_codes_round_trip() {
        for &cat in Category::ALL {
            assert_eq!(Category::from_u8(cat.code()), Some(cat));
            assert!(cat.supports(cat.default_version()));
        }
        assert_eq!(Category::from_u8(3), None);
        assert_eq!(Category::Cat048.to_string(), "CAT048");
    }

    #[test]
    fn test_every_table_starts_with_data_source() {
        for &cat in Category::ALL {
            let uap = cat.uap(cat.default_version(), 0);
            assert!(carries_data_source(uap), "{cat} FRN 1 is not SAC/SIC");
        }
    }

    #[test]
    fn test_decode_record_cat048() {
        // FRN 1 (010), 2 (140), 4 (040)
        let data = [0xD0, 0x01, 0x02, 0x00, 0x40, 0x00, 0x01, 0x00, 0x40, 0x00];
        let mut cur = Cursor::new(&data);
        let out = decode_record(&mut cur, Category::Cat048, &ctx()).unwrap();
        assert!(out.resumable);
        assert_eq!(cur.position(), data.len());
        let m = out.message;
        assert_eq!(m.get::<u8>(P::Sac).unwrap(), 1);
        assert_eq!(m.get::<u8>(P::Sic).unwrap(), 2);
        assert_eq!(m.get::<u32>(P::TimeOfDay).unwrap(), 0x4000);
        assert_eq!(m.get::<u16>(P::MeasuredPosRange).unwrap(), 256);
        assert_eq!(m.get::<u16>(P::MeasuredPosBearing).unwrap(), 0x4000);
        // derived Cartesian position: 1 NM due east at 1/128 NM
        assert_eq!(m.get::<i16>(P::CalcPosX).unwrap(), 128);
        assert_eq!(m.get::<i16>(P::CalcPosY).unwrap(), 0);
    }

    #[test]
    fn test_filter_skips_record() {
        let data = [0xC0, 0x01, 0x02, 0x00, 0x00, 0x10];
        let mut c = ctx();
        c.expected_sac = 9;
        let mut cur = Cursor::new(&data);
        assert!(matches!(
            decode_record(&mut cur, Category::Cat048, &c),
            Err(AsterixError::FilterRejected)
        ));
        assert_eq!(cur.position(), data.len());
    }

    #[test]
    fn test_unknown_frn_strict_and_permissive() {
        // FRN 1 and FRN 29, past the end of the CAT048 table
        let data = [0x81, 0x01, 0x01, 0x01, 0x80, 0x01, 0x02];
        let mut cur = Cursor::new(&data);
        assert!(matches!(
            decode_record(&mut cur, Category::Cat048, &ctx()),
            Err(AsterixError::UnknownItem { category: 48, frn: 29 })
        ));

        let mut c = ctx();
        c.permissive = true;
        let mut cur = Cursor::new(&data);
        let out = decode_record(&mut cur, Category::Cat048, &c).unwrap();
        assert!(!out.resumable);
        assert!(out.message.is_partial());
        assert_eq!(out.message.get::<u8>(P::Sac).unwrap(), 1);
    }

    #[test]
    fn test_items_decoded_in_frn_order() {
        // FRN 1 (010); FRN 11 (161), 12 (042); FRN 15 (210), 17 (080)
        let data = [
            0x81, 0x19, 0xA0, // FSPEC, three octets
            0x07, 0x08, // 010
            0x00, 0x2A, // 161
            0x00, 0x80, 0xFF, 0x80, // 042
            0x01, 0x02, 0x03, 0x04, // 210
            0x0F, 0xFF, // 080
        ];
        let mut cur = Cursor::new(&data);
        let m = decode_record(&mut cur, Category::Cat048, &ctx()).unwrap().message;
        assert_eq!(cur.position(), data.len());
        assert_eq!(m.get::<u8>(P::Sac).unwrap(), 7);
        assert_eq!(m.get::<u8>(P::Sic).unwrap(), 8);
        assert_eq!(m.get::<u16>(P::TrackNumber).unwrap(), 42);
        assert_eq!(m.get::<i16>(P::CalcPosX).unwrap(), 128);
        assert_eq!(m.get::<i16>(P::CalcPosY).unwrap(), -128);
        assert_eq!(m.get::<u8>(P::TrackQualSigmaX).unwrap(), 1);
        assert_eq!(m.get::<u8>(P::TrackQualSigmaH).unwrap(), 4);
        assert_eq!(m.get::<u16>(P::Mode3Conf).unwrap(), 0x0FFF);
        assert!(!m.contains(P::TimeOfDay));
    }

    /// CAT062: FRN 1, FRN 34 (RE announcing TVS with no room for it), FRN 35 (SP).
    const BAD_RE_062: [u8; 11] = [0x81, 0x01, 0x01, 0x01, 0x06, 0x01, 0x02, 0x02, 0x20, 0x02, 0xAB];

    fn ctx_062(permissive: bool, recovery: RecoveryPolicy) -> RecordContext {
        let mut c = RecordContext::new(Category::Cat062.default_version());
        c.permissive = permissive;
        c.recovery = recovery;
        c
    }

    #[test]
    fn test_skip_item_keeps_later_items() {
        let mut cur = Cursor::new(&BAD_RE_062);
        let out = decode_record(&mut cur, Category::Cat062, &ctx_062(true, RecoveryPolicy::SkipItem)).unwrap();
        assert!(out.resumable);
        assert!(cur.is_empty());
        let m = out.message;
        assert!(m.is_partial());
        assert_eq!(m.get::<u8>(P::Sac).unwrap(), 1);
        assert_eq!(m.get_data(P::Spf).unwrap(), &[0xAB]);
    }

    #[test]
    fn test_abort_record_drops_later_items() {
        let mut cur = Cursor::new(&BAD_RE_062);
        let out = decode_record(&mut cur, Category::Cat062, &ctx_062(true, RecoveryPolicy::AbortRecord)).unwrap();
        assert!(out.resumable);
        assert!(cur.is_empty());
        let m = out.message;
        assert!(m.is_partial());
        assert_eq!(m.get::<u8>(P::Sac).unwrap(), 1);
        assert!(!m.contains(P::Spf));
    }

    #[test]
    fn test_strict_bad_item_ends_on_record_boundary() {
        let mut data = BAD_RE_062.to_vec();
        data.push(0x80);
        let mut cur = Cursor::new(&data);
        assert!(matches!(
            decode_record(&mut cur, Category::Cat062, &ctx_062(false, RecoveryPolicy::SkipItem)),
            Err(AsterixError::RecordSkipped(_))
        ));
        assert_eq!(cur.remaining(), 1);
    }

    #[test]
    fn test_cat001_layout_follows_typ_bit() {
        // FRN 1 (010), FRN 2 (020, TYP = track), FRN 3 (track: 161)
        let data = [0xE0, 0x01, 0x02, 0x80, 0x00, 0x2A];
        let ctx = RecordContext::new(Category::Cat001.default_version());
        let mut cur = Cursor::new(&data);
        let out = decode_record(&mut cur, Category::Cat001, &ctx).unwrap();
        assert_eq!(out.message.get::<u16>(P::TrackNumber).unwrap(), 42);
    }
}
