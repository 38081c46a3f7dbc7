//! Decoder façade: the block loop and callback dispatch.
//!
//! Responsibilities:
//! - Own the decoder configuration and its setters/getters
//! - Walk data blocks (CAT, LEN, records) in a buffer
//! - Skip disabled and unknown categories, count filtered records
//! - Hand each decoded record to the installed handlers, then to the
//!   conversion layer for track/status/strobe handlers
//! - Learn category editions announced by CAT247

use std::collections::BTreeMap;
use std::time::Instant;

use serde::Serialize;

use crate::category::{cat247, decode_record, Category, RecordContext};
use crate::config::{DecoderConfig, RecoveryPolicy, SensorPosition};
use crate::convert::{build_status, build_strobe, build_track, ConvertOptions, Strobe, TrackReport, TrackerStatus};
use crate::cursor::Cursor;
use crate::message::AsterixMessage;
use crate::types::{AsterixError, Result};
use crate::version::Version;

/// CAT (1) + LEN (2).
pub const BLOCK_HEADER_LEN: usize = 3;

/// Receives every decoded record of a category.
pub type MessageHandler = Box<dyn FnMut(Category, &AsterixMessage) + Send>;
pub type TrackHandler = Box<dyn FnMut(&TrackReport) + Send>;
pub type StatusHandler = Box<dyn FnMut(&TrackerStatus) + Send>;
pub type StrobeHandler = Box<dyn FnMut(&Strobe) + Send>;

/// Counters for one `decode` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DecodeSummary {
    /// Data blocks found, skipped ones included.
    pub blocks: usize,
    /// Blocks of a disabled or unsupported category.
    pub skipped_blocks: usize,
    /// Records decoded and dispatched.
    pub records: usize,
    /// Dispatched records that were only partly decoded.
    pub partial: usize,
    /// Records rejected by the SAC/SIC filter.
    pub filtered: usize,
    /// Records that failed to decode. When a record's end could not be
    /// found the rest of its block was dropped too.
    pub failed_records: usize,
    /// A block ran past the end of the buffer, or the buffer ended inside
    /// a block header (permissive mode).
    pub truncated: bool,
}

impl DecodeSummary {
    fn merge(&mut self, other: &DecodeSummary) {
        self.blocks += other.blocks;
        self.skipped_blocks += other.skipped_blocks;
        self.records += other.records;
        self.partial += other.partial;
        self.filtered += other.filtered;
        self.failed_records += other.failed_records;
        self.truncated |= other.truncated;
    }
}

/// ASTERIX decoder with callback dispatch.
///
/// One instance per input stream. Configuration is copied at the start of
/// every `decode` call, so setters never affect a call already running.
pub struct Decoder {
    config: DecoderConfig,
    handlers: BTreeMap<u8, MessageHandler>,
    default_handler: Option<MessageHandler>,
    track_handler: Option<TrackHandler>,
    status_handler: Option<StatusHandler>,
    strobe_handler: Option<StrobeHandler>,
    /// Editions reported by CAT247, used when no override is configured.
    announced: BTreeMap<u8, Version>,
    last_message: Option<Instant>,
    /// Running totals over every `decode` call.
    pub totals: DecodeSummary,
}

impl Default for Decoder {
    fn default() -> Self {
        Decoder::new()
    }
}

impl std::fmt::Debug for Decoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Decoder")
            .field("config", &self.config)
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .field("announced", &self.announced)
            .field("totals", &self.totals)
            .finish()
    }
}

impl Decoder {
    pub fn new() -> Self {
        Decoder::with_config(DecoderConfig::default())
    }

    pub fn with_config(config: DecoderConfig) -> Self {
        Decoder {
            config,
            handlers: BTreeMap::new(),
            default_handler: None,
            track_handler: None,
            status_handler: None,
            strobe_handler: None,
            announced: BTreeMap::new(),
            last_message: None,
            totals: DecodeSummary::default(),
        }
    }

    // -----------------------------------------------------------------------
    // Configuration
    // -----------------------------------------------------------------------

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: DecoderConfig) {
        self.config = config;
    }

    pub fn expected_sac(&self) -> u8 {
        self.config.expected_sac
    }

    /// Accept only records from this SAC; 0 accepts any.
    pub fn set_expected_sac(&mut self, sac: u8) {
        self.config.expected_sac = sac;
    }

    pub fn expected_sic(&self) -> u8 {
        self.config.expected_sic
    }

    /// Accept only records from this SIC; 0 accepts any.
    pub fn set_expected_sic(&mut self, sic: u8) {
        self.config.expected_sic = sic;
    }

    pub fn is_category_enabled(&self, category: u8) -> bool {
        self.config.is_enabled(category)
    }

    pub fn set_category_enabled(&mut self, category: u8, enabled: bool) {
        self.config.set_enabled(category, enabled);
    }

    pub fn permissive(&self) -> bool {
        self.config.permissive
    }

    pub fn set_permissive(&mut self, permissive: bool) {
        self.config.permissive = permissive;
    }

    pub fn recovery(&self) -> RecoveryPolicy {
        self.config.recovery
    }

    pub fn set_recovery(&mut self, recovery: RecoveryPolicy) {
        self.config.recovery = recovery;
    }

    pub fn ignore_prefix_bytes(&self) -> usize {
        self.config.ignore_prefix_bytes
    }

    /// Skip a transport header of `n` bytes at the start of every buffer.
    pub fn set_ignore_prefix_bytes(&mut self, n: usize) {
        self.config.ignore_prefix_bytes = n;
    }

    pub fn project_code(&self) -> u32 {
        self.config.project_code
    }

    pub fn set_project_code(&mut self, code: u32) {
        self.config.project_code = code;
    }

    pub fn uap_code(&self) -> u32 {
        self.config.uap_code
    }

    pub fn set_uap_code(&mut self, code: u32) {
        self.config.uap_code = code;
    }

    /// Edition used for the next block of `category`.
    pub fn version(&self, category: u8) -> Result<Version> {
        let cat = Category::from_u8(category).ok_or(AsterixError::UnknownCategory(category))?;
        Ok(self.config.versions.resolve(cat, self.announced.get(&category).copied()))
    }

    /// Force an edition for `category`, overriding CAT247 reports.
    pub fn set_version(&mut self, category: u8, version: Version) -> Result<()> {
        self.config.versions.set(category, version)
    }

    /// Drop the override for `category`.
    pub fn clear_version(&mut self, category: u8) {
        self.config.versions.clear(category);
    }

    pub fn radar_time_offset(&self) -> f64 {
        self.config.radar_time_offset
    }

    /// Seconds added to decoded times of day in converted reports.
    pub fn set_radar_time_offset(&mut self, secs: f64) {
        self.config.radar_time_offset = secs;
    }

    pub fn sensor(&self) -> Option<SensorPosition> {
        self.config.sensor
    }

    pub fn set_sensor(&mut self, sensor: Option<SensorPosition>) {
        self.config.sensor = sensor;
    }

    /// Set a setting by name; see `DecoderConfig::set_parameter`.
    pub fn set_parameter(&mut self, name: &str, value: &str) -> Result<()> {
        self.config.set_parameter(name, value)
    }

    pub fn get_parameter(&self, name: &str) -> Result<String> {
        if let Some(category) = name
            .strip_prefix("cat")
            .and_then(|rest| rest.strip_suffix(".version"))
            .and_then(|code| code.parse::<u8>().ok())
        {
            return self.version(category).map(|v| v.to_string());
        }
        self.config.get_parameter(name)
    }

    // -----------------------------------------------------------------------
    // Handlers
    // -----------------------------------------------------------------------

    /// Install the handler for one category, replacing any previous one.
    pub fn install_handler(
        &mut self,
        category: u8,
        handler: impl FnMut(Category, &AsterixMessage) + Send + 'static,
    ) {
        self.handlers.insert(category, Box::new(handler));
    }

    /// Returns true if a handler was installed.
    pub fn remove_handler(&mut self, category: u8) -> bool {
        self.handlers.remove(&category).is_some()
    }

    /// Handler for categories without their own.
    pub fn install_default_handler(&mut self, handler: impl FnMut(Category, &AsterixMessage) + Send + 'static) {
        self.default_handler = Some(Box::new(handler));
    }

    pub fn remove_default_handler(&mut self) {
        self.default_handler = None;
    }

    pub fn install_track_handler(&mut self, handler: impl FnMut(&TrackReport) + Send + 'static) {
        self.track_handler = Some(Box::new(handler));
    }

    pub fn install_status_handler(&mut self, handler: impl FnMut(&TrackerStatus) + Send + 'static) {
        self.status_handler = Some(Box::new(handler));
    }

    pub fn install_strobe_handler(&mut self, handler: impl FnMut(&Strobe) + Send + 'static) {
        self.strobe_handler = Some(Box::new(handler));
    }

    /// Milliseconds since a record was last dispatched, `None` before the
    /// first one.
    pub fn millis_since_last_message(&self) -> Option<u64> {
        self.last_message
            .map(|t| u64::try_from(t.elapsed().as_millis()).unwrap_or(u64::MAX))
    }

    // -----------------------------------------------------------------------
    // Decoding
    // -----------------------------------------------------------------------

    /// Decode every block in `data`, dispatching records as they complete.
    ///
    /// Strict mode returns the first block-level error (truncation, bad
    /// length); records of earlier blocks stay dispatched, none of the bad
    /// block's are. Permissive mode dispatches the complete records of a
    /// truncated block, stops there, and reports it in the summary.
    pub fn decode(&mut self, data: &[u8]) -> Result<DecodeSummary> {
        let config = self.config.clone();
        let opts = ConvertOptions::from_config(&config);
        let mut summary = DecodeSummary::default();
        let mut cur = Cursor::new(data);

        let result = cur
            .skip(config.ignore_prefix_bytes)
            .and_then(|_| self.decode_blocks(&mut cur, &config, &opts, &mut summary));

        self.totals.merge(&summary);
        match result {
            Ok(()) => Ok(summary),
            Err(e) if config.permissive => {
                log::warn!("stopped at offset {}: {e}", cur.position());
                summary.truncated = true;
                self.totals.truncated = true;
                Ok(summary)
            }
            Err(e) => Err(e),
        }
    }

    fn decode_blocks(
        &mut self,
        cur: &mut Cursor<'_>,
        config: &DecoderConfig,
        opts: &ConvertOptions,
        summary: &mut DecodeSummary,
    ) -> Result<()> {
        while !cur.is_empty() {
            let mut block = read_block(cur, config.permissive)?;
            summary.blocks += 1;
            summary.truncated |= block.short;
            let code = block.category;

            let Some(category) = Category::from_u8(code) else {
                log::debug!("skipping block of unsupported CAT{code:03} ({} bytes)", block.body.remaining());
                summary.skipped_blocks += 1;
                continue;
            };
            if !config.is_enabled(code) {
                log::debug!("skipping block of disabled {category}");
                summary.skipped_blocks += 1;
                continue;
            }

            let ctx = RecordContext {
                version: config.versions.resolve(category, self.announced.get(&code).copied()),
                project_code: config.project_code,
                uap_code: config.uap_code,
                expected_sac: config.expected_sac,
                expected_sic: config.expected_sic,
                permissive: config.permissive,
                recovery: config.recovery,
            };
            self.decode_records(&mut block.body, category, &ctx, opts, summary);
        }
        Ok(())
    }

    fn decode_records(
        &mut self,
        body: &mut Cursor<'_>,
        category: Category,
        ctx: &RecordContext,
        opts: &ConvertOptions,
        summary: &mut DecodeSummary,
    ) {
        while !body.is_empty() {
            // Zero FSPEC: padding to the end of the block
            if body.peek_u8().is_ok_and(|b| b == 0) {
                log::trace!("{category}: {} padding bytes", body.remaining());
                return;
            }
            let offset = body.absolute_position();
            match decode_record(body, category, ctx) {
                Ok(outcome) => {
                    summary.records += 1;
                    if outcome.message.is_partial() {
                        summary.partial += 1;
                    }
                    self.dispatch(category, &outcome.message, opts);
                    if !outcome.resumable {
                        return;
                    }
                }
                Err(AsterixError::FilterRejected) => {
                    log::debug!("{category}: record at offset {offset} rejected by SAC/SIC filter");
                    summary.filtered += 1;
                }
                Err(AsterixError::RecordSkipped(e)) => {
                    log::warn!("{category}: record at offset {offset} failed: {e}");
                    summary.failed_records += 1;
                }
                Err(e) => {
                    log::warn!("{category}: record at offset {offset} failed, dropping rest of block: {e}");
                    summary.failed_records += 1;
                    return;
                }
            }
        }
    }

    /// Decode a single record (FSPEC onwards) without dispatching it.
    ///
    /// Uses the current configuration; SAC/SIC filtering applies.
    pub fn decode_record(&self, category: u8, data: &[u8]) -> Result<AsterixMessage> {
        let cat = Category::from_u8(category).ok_or(AsterixError::UnknownCategory(category))?;
        let ctx = RecordContext {
            version: self.version(category)?,
            project_code: self.config.project_code,
            uap_code: self.config.uap_code,
            expected_sac: self.config.expected_sac,
            expected_sic: self.config.expected_sic,
            permissive: self.config.permissive,
            recovery: self.config.recovery,
        };
        let mut cur = Cursor::new(data);
        match decode_record(&mut cur, cat, &ctx) {
            Ok(outcome) => Ok(outcome.message),
            Err(AsterixError::RecordSkipped(e)) => Err(*e),
            Err(e) => Err(e),
        }
    }

    fn dispatch(&mut self, category: Category, msg: &AsterixMessage, opts: &ConvertOptions) {
        self.last_message = Some(Instant::now());

        if category == Category::Cat247 {
            self.learn_versions(msg);
        }

        if let Some(handler) = self.handlers.get_mut(&category.code()) {
            handler(category, msg);
        } else if let Some(handler) = self.default_handler.as_mut() {
            handler(category, msg);
        }

        if let Some(handler) = self.track_handler.as_mut() {
            match build_track(msg, opts) {
                Ok(report) => handler(&report),
                Err(AsterixError::NotApplicable(_)) => {}
                Err(e) => log::debug!("{category}: no track report: {e}"),
            }
        }
        if let Some(handler) = self.status_handler.as_mut() {
            match build_status(msg, opts) {
                Ok(status) => handler(&status),
                Err(AsterixError::NotApplicable(_)) => {}
                Err(e) => log::debug!("{category}: no status report: {e}"),
            }
        }
        if let Some(handler) = self.strobe_handler.as_mut() {
            match build_strobe(msg, opts) {
                Ok(strobe) => handler(&strobe),
                Err(AsterixError::NotApplicable(_)) => {}
                Err(e) => log::debug!("{category}: no strobe: {e}"),
            }
        }
    }

    fn learn_versions(&mut self, msg: &AsterixMessage) {
        for (code, version) in cat247::version_reports(msg) {
            match Category::from_u8(code) {
                Some(cat) if cat.supports(version) => {
                    if self.announced.insert(code, version) != Some(version) {
                        log::debug!("{cat} edition {version} announced by CAT247");
                    }
                }
                _ => log::debug!("ignoring CAT247 report of CAT{code:03} edition {version}"),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Blocks
// ---------------------------------------------------------------------------

struct Block<'a> {
    category: u8,
    body: Cursor<'a>,
    /// Declared length ran past the buffer; `body` holds what is left.
    short: bool,
}

/// Read a block header and take its records as a sub-cursor.
///
/// A block longer than the rest of the buffer is an error in strict mode.
/// In permissive mode its available bytes are still returned, so the
/// complete records before the cut are decoded.
fn read_block<'a>(cur: &mut Cursor<'a>, permissive: bool) -> Result<Block<'a>> {
    if cur.remaining() < BLOCK_HEADER_LEN {
        return Err(AsterixError::Truncated {
            needed: BLOCK_HEADER_LEN,
            remaining: cur.remaining(),
        });
    }
    let category = cur.peek_u8()?;
    let len = cur.peek_at(1)? as usize * 256 + cur.peek_at(2)? as usize;
    if len < BLOCK_HEADER_LEN {
        return Err(AsterixError::InvalidBlockLength(len));
    }
    if len > cur.remaining() {
        let err = AsterixError::Truncated {
            needed: len,
            remaining: cur.remaining(),
        };
        if !permissive {
            return Err(err);
        }
        log::warn!("CAT{category:03} block at offset {}: {err}", cur.absolute_position());
        cur.skip(BLOCK_HEADER_LEN)?;
        let body = cur.sub_cursor(cur.remaining())?;
        return Ok(Block {
            category,
            body,
            short: true,
        });
    }
    cur.skip(BLOCK_HEADER_LEN)?;
    let body = cur.sub_cursor(len - BLOCK_HEADER_LEN)?;
    Ok(Block {
        category,
        body,
        short: false,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::Property as P;
    use std::sync::{Arc, Mutex};

    /// CAT048 record: SAC 1 / SIC 2, time of day, polar position.
    const RECORD_048: [u8; 10] = [0xD0, 0x01, 0x02, 0x00, 0x40, 0x00, 0x01, 0x00, 0x40, 0x00];

    fn block(cat: u8, records: &[&[u8]]) -> Vec<u8> {
        let body: Vec<u8> = records.concat();
        let len = body.len() + BLOCK_HEADER_LEN;
        let mut out = vec![cat, (len >> 8) as u8, len as u8];
        out.extend(body);
        out
    }

    fn counting(decoder: &mut Decoder, category: u8) -> Arc<Mutex<Vec<u8>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        decoder.install_handler(category, move |cat, _msg| sink.lock().unwrap().push(cat.code()));
        seen
    }

    #[test]
    fn test_empty_buffer() {
        let mut decoder = Decoder::new();
        assert_eq!(decoder.decode(&[]).unwrap(), DecodeSummary::default());
        assert!(decoder.millis_since_last_message().is_none());
    }

    #[test]
    fn test_decode_dispatches_each_record() {
        let mut decoder = Decoder::new();
        let seen = counting(&mut decoder, 48);
        let data = block(48, &[&RECORD_048, &RECORD_048]);
        let summary = decoder.decode(&data).unwrap();
        assert_eq!(summary.blocks, 1);
        assert_eq!(summary.records, 2);
        assert_eq!(*seen.lock().unwrap(), vec![48, 48]);
        assert!(decoder.millis_since_last_message().is_some());
    }

    #[test]
    fn test_default_handler_only_for_unclaimed_categories() {
        let mut decoder = Decoder::new();
        let own = counting(&mut decoder, 48);
        let other = Arc::new(Mutex::new(0));
        let sink = other.clone();
        decoder.install_default_handler(move |_, _| *sink.lock().unwrap() += 1);

        let mut data = block(48, &[&RECORD_048]);
        data.extend(block(34, &[&[0xC0, 0x01, 0x02, 0x01]]));
        decoder.decode(&data).unwrap();
        assert_eq!(own.lock().unwrap().len(), 1);
        assert_eq!(*other.lock().unwrap(), 1);

        assert!(decoder.remove_handler(48));
        assert!(!decoder.remove_handler(48));
        decoder.decode(&data).unwrap();
        assert_eq!(*other.lock().unwrap(), 3);
    }

    #[test]
    fn test_disabled_and_unknown_blocks_skipped() {
        let mut decoder = Decoder::new();
        let seen = counting(&mut decoder, 48);
        decoder.set_category_enabled(48, false);

        let mut data = block(48, &[&RECORD_048]);
        data.extend(block(99, &[&[0xAA, 0xBB]]));
        let summary = decoder.decode(&data).unwrap();
        assert_eq!(summary.blocks, 2);
        assert_eq!(summary.skipped_blocks, 2);
        assert!(seen.lock().unwrap().is_empty());

        decoder.set_category_enabled(48, true);
        assert_eq!(decoder.decode(&data).unwrap().records, 1);
    }

    #[test]
    fn test_prefix_skipped() {
        let mut decoder = Decoder::new();
        let seen = counting(&mut decoder, 48);
        decoder.set_ignore_prefix_bytes(4);
        let mut data = vec![0xDE, 0xAD, 0xBE, 0xEF];
        data.extend(block(48, &[&RECORD_048]));
        assert_eq!(decoder.decode(&data).unwrap().records, 1);
        assert_eq!(seen.lock().unwrap().len(), 1);

        assert!(matches!(decoder.decode(&[0x01, 0x02]), Err(AsterixError::Truncated { .. })));
    }

    #[test]
    fn test_invalid_block_length() {
        let mut decoder = Decoder::new();
        assert!(matches!(
            decoder.decode(&[48, 0x00, 0x02, 0x00]),
            Err(AsterixError::InvalidBlockLength(2))
        ));
        decoder.set_permissive(true);
        let summary = decoder.decode(&[48, 0x00, 0x02, 0x00]).unwrap();
        assert!(summary.truncated);
    }

    #[test]
    fn test_padding_ends_block() {
        let mut decoder = Decoder::new();
        let mut body = RECORD_048.to_vec();
        body.extend([0x00, 0x00, 0x00]);
        let summary = decoder.decode(&block(48, &[&body])).unwrap();
        assert_eq!(summary.records, 1);
        assert_eq!(summary.failed_records, 0);
    }

    #[test]
    fn test_bad_record_drops_rest_of_block_only() {
        let mut decoder = Decoder::new();
        let seen = counting(&mut decoder, 48);
        // Record claims I048/040 but the block ends first
        let mut data = block(48, &[&RECORD_048, &[0xD0, 0x01, 0x02, 0x00, 0x40]]);
        data.extend(block(48, &[&RECORD_048]));
        let summary = decoder.decode(&data).unwrap();
        assert_eq!(summary.records, 2);
        assert_eq!(summary.failed_records, 1);
        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_bad_item_skips_only_its_record() {
        let mut decoder = Decoder::new();
        let sacs = Arc::new(Mutex::new(Vec::new()));
        let sink = sacs.clone();
        decoder.install_handler(48, move |_, msg| sink.lock().unwrap().push(msg.get::<u8>(P::Sac).unwrap_or(0)));

        // I048/010, then RE (length 3) whose MD5 summary runs past its end
        let bad = [0x81, 0x01, 0x01, 0x02, 0x01, 0x02, 0x03, 0x80, 0x80];
        let mut good = RECORD_048;
        good[1] = 5;
        let summary = decoder.decode(&block(48, &[&bad, &good])).unwrap();
        assert_eq!(summary.failed_records, 1);
        assert_eq!(summary.records, 1);
        assert_eq!(*sacs.lock().unwrap(), vec![5]);

        // Single-record decoding reports the item's own error
        assert!(matches!(
            decoder.decode_record(48, &bad),
            Err(AsterixError::Truncated { .. } | AsterixError::InvalidItem { .. })
        ));
    }

    #[test]
    fn test_filter_counts() {
        let mut decoder = Decoder::new();
        let seen = counting(&mut decoder, 48);
        decoder.set_expected_sac(1);
        decoder.set_expected_sic(3);
        let summary = decoder.decode(&block(48, &[&RECORD_048])).unwrap();
        assert_eq!(summary.filtered, 1);
        assert_eq!(summary.records, 0);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_decode_record_direct() {
        let decoder = Decoder::new();
        let m = decoder.decode_record(48, &RECORD_048).unwrap();
        assert_eq!(m.get::<u8>(P::Sic).unwrap(), 2);
        assert!(matches!(decoder.decode_record(3, &RECORD_048), Err(AsterixError::UnknownCategory(3))));
    }

    #[test]
    fn test_parameters_and_versions() {
        let mut decoder = Decoder::new();
        assert_eq!(decoder.version(48).unwrap(), Category::Cat048.default_version());
        decoder.set_parameter("cat048.version", "1.21").unwrap();
        assert_eq!(decoder.version(48).unwrap(), Version::new(1, 21));
        assert_eq!(decoder.get_parameter("cat048.version").unwrap(), "1.21");
        decoder.set_parameter("expected_sac", "9").unwrap();
        assert_eq!(decoder.expected_sac(), 9);
        decoder.clear_version(48);
        assert_eq!(decoder.version(48).unwrap(), Category::Cat048.default_version());
        assert!(decoder.set_version(48, Version::new(7, 0)).is_err());
    }

    #[test]
    fn test_totals_accumulate() {
        let mut decoder = Decoder::new();
        let data = block(48, &[&RECORD_048]);
        decoder.decode(&data).unwrap();
        decoder.decode(&data).unwrap();
        assert_eq!(decoder.totals.records, 2);
        assert_eq!(decoder.totals.blocks, 2);
    }
}
