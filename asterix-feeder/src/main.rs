//! asterix-feeder: Feed ASTERIX capture files through the decoder.
//!
//! Supports:
//! - Decoding raw binary captures or hex dumps into records (text or JSON)
//! - Emitting converted track/status/strobe reports
//! - Rendering every decoded data item with selectable display units

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use env_logger::Env;

use asterix_core::config::{default_config_file, load_config};
use asterix_core::format::{format_message, DistanceUnit, FormatOptions, HeightUnit, LatLongFormat, SpeedUnit};
use asterix_core::{AsterixMessage, Category, DecodeSummary, Decoder, Value, Version};

mod capture;

use capture::{CaptureFormat, CaptureReader};

#[derive(Parser)]
#[command(name = "asterix-feeder", version, about = "ASTERIX capture decoding")]
struct Cli {
    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a capture file and print every record
    Decode {
        #[command(flatten)]
        input: InputArgs,

        /// Print records as JSON, one per line
        #[arg(long)]
        json: bool,

        /// Print converted track/status/strobe reports instead of records
        #[arg(long)]
        reports: bool,
    },
    /// Decode a capture file and render every data item
    Items {
        #[command(flatten)]
        input: InputArgs,

        /// Distance unit: m, km, nm
        #[arg(long, default_value = "nm")]
        dist: DistanceUnit,

        /// Speed unit: mps, kt, kmh
        #[arg(long, default_value = "kt")]
        speed: SpeedUnit,

        /// Height unit: m, ft, fl
        #[arg(long, default_value = "fl")]
        height: HeightUnit,

        /// Latitude/longitude format: deg, dm, dms
        #[arg(long, default_value = "deg")]
        latlong: LatLongFormat,

        /// Decimal places
        #[arg(long, default_value = "3")]
        precision: usize,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Capture file (raw binary, or hex dump with --hex)
    file: PathBuf,

    /// Input is a hex dump, one block buffer per line
    #[arg(long)]
    hex: bool,

    /// Salvage what decodes from malformed records
    #[arg(long)]
    permissive: bool,

    /// Accept only this SAC
    #[arg(long)]
    sac: Option<u8>,

    /// Accept only this SIC
    #[arg(long)]
    sic: Option<u8>,

    /// Bytes to skip at the start of every buffer
    #[arg(long)]
    skip_prefix: Option<usize>,

    /// Force a category edition, e.g. 21=0.26 (repeatable)
    #[arg(long = "category-version", value_parser = parse_category_version)]
    category_versions: Vec<(u8, Version)>,

    /// Skip blocks of this category (repeatable)
    #[arg(long)]
    disable: Vec<u8>,

    /// Project code selecting a special purpose field layout
    #[arg(long)]
    project_code: Option<u32>,

    /// Config file (default: ~/.asterix-decode/config.json)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn parse_category_version(s: &str) -> Result<(u8, Version), String> {
    let (cat, version) = s.split_once('=').ok_or("expected CAT=MAJOR.MINOR")?;
    let cat: u8 = cat.trim().parse().map_err(|_| format!("bad category '{cat}'"))?;
    let version = Version::parse(version).map_err(|e| e.to_string())?;
    Ok((cat, version))
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::from_env(Env::default())
        .filter_level(cli.verbose.log_level_filter())
        .init();

    match cli.command {
        Commands::Decode { input, json, reports } => cmd_decode(&input, json, reports),
        Commands::Items {
            input,
            dist,
            speed,
            height,
            latlong,
            precision,
        } => {
            let opts = FormatOptions {
                distance: dist,
                speed,
                height,
                lat_long: latlong,
                precision,
                ..FormatOptions::default()
            };
            cmd_items(&input, opts)
        }
    }
}

/// Build a decoder from the config file plus command-line overrides.
fn build_decoder(input: &InputArgs) -> Decoder {
    let path = input.config.clone().unwrap_or_else(default_config_file);
    let config = match load_config(&path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let mut decoder = Decoder::with_config(config);
    if input.permissive {
        decoder.set_permissive(true);
    }
    if let Some(sac) = input.sac {
        decoder.set_expected_sac(sac);
    }
    if let Some(sic) = input.sic {
        decoder.set_expected_sic(sic);
    }
    if let Some(n) = input.skip_prefix {
        decoder.set_ignore_prefix_bytes(n);
    }
    if let Some(code) = input.project_code {
        decoder.set_project_code(code);
    }
    for &cat in &input.disable {
        decoder.set_category_enabled(cat, false);
    }
    for &(cat, version) in &input.category_versions {
        if let Err(e) = decoder.set_version(cat, version) {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
    decoder
}

fn read_capture(input: &InputArgs) -> Vec<Vec<u8>> {
    let format = if input.hex { CaptureFormat::Hex } else { CaptureFormat::Binary };
    match CaptureReader::new(&input.file, format).read_all() {
        Ok(buffers) => buffers,
        Err(e) => {
            eprintln!("Error reading {}: {e}", input.file.display());
            std::process::exit(1);
        }
    }
}

/// Decode every buffer, reporting (not aborting on) per-buffer errors.
fn run(decoder: &mut Decoder, file: &Path, buffers: &[Vec<u8>]) -> DecodeSummary {
    eprintln!("Decoding: {} ({} buffers)", file.display(), buffers.len());
    let mut errors = 0usize;
    for (i, buf) in buffers.iter().enumerate() {
        if let Err(e) = decoder.decode(buf) {
            errors += 1;
            log::error!("buffer {}: {e}", i + 1);
        }
    }
    let t = decoder.totals;
    eprintln!(
        "{} records in {} blocks ({} skipped blocks, {} filtered, {} partial, {} failed, {} buffer errors)",
        t.records, t.blocks, t.skipped_blocks, t.filtered, t.partial, t.failed_records, errors
    );
    t
}

fn cmd_decode(input: &InputArgs, json: bool, reports: bool) {
    let buffers = read_capture(input);
    let mut decoder = build_decoder(input);

    if reports {
        decoder.install_track_handler(|t| print_json("track", t));
        decoder.install_status_handler(|s| print_json("status", s));
        decoder.install_strobe_handler(|s| print_json("strobe", s));
    } else if json {
        decoder.install_default_handler(|_, msg| match serde_json::to_string(msg) {
            Ok(line) => println!("{line}"),
            Err(e) => log::error!("JSON encoding failed: {e}"),
        });
    } else {
        decoder.install_default_handler(|cat, msg| println!("{}", record_line(cat, msg)));
    }

    run(&mut decoder, &input.file, &buffers);
}

fn cmd_items(input: &InputArgs, opts: FormatOptions) {
    let buffers = read_capture(input);
    let mut decoder = build_decoder(input);

    let mut count = 0u64;
    decoder.install_default_handler(move |cat, msg| {
        count += 1;
        let flag = if msg.is_nogo() { " (partial)" } else { "" };
        println!("#{count} {cat} v{}{flag}", msg.version());
        for (label, text) in format_message(msg, &opts) {
            println!("  {label}: {text}");
        }
    });

    run(&mut decoder, &input.file, &buffers);
}

fn print_json<T: serde::Serialize>(kind: &str, value: &T) {
    match serde_json::to_value(value) {
        Ok(v) => {
            let mut obj = serde_json::Map::new();
            obj.insert(kind.to_string(), v);
            println!("{}", serde_json::Value::Object(obj));
        }
        Err(e) => log::error!("JSON encoding failed: {e}"),
    }
}

/// `CAT048 1.31 Sac=1 Sic=2 TimeOfDay=16384 ...`, raw wire values.
fn record_line(cat: Category, msg: &AsterixMessage) -> String {
    let mut line = format!("{cat} {}", msg.version());
    if msg.is_nogo() {
        line.push_str(" PARTIAL");
    }
    for (prop, value) in msg.store().iter() {
        line.push(' ');
        line.push_str(prop.name());
        line.push('=');
        line.push_str(&value_text(value));
    }
    line
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Text(s) => format!("{s:?}"),
        Value::Data(d) => asterix_core::types::hex_encode(d),
        other => other.as_i64().map(|v| v.to_string()).unwrap_or_default(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use asterix_core::Property;

    #[test]
    fn test_parse_category_version() {
        assert_eq!(parse_category_version("21=0.26").unwrap(), (21, Version::new(0, 26)));
        assert!(parse_category_version("21").is_err());
        assert!(parse_category_version("x=1.0").is_err());
        assert!(parse_category_version("48=one").is_err());
    }

    #[test]
    fn test_record_line() {
        let mut msg = AsterixMessage::new(48, Version::new(1, 31));
        msg.set(Property::Sac, 1u8).unwrap();
        msg.set(Property::Sic, 2u8).unwrap();
        msg.set_text(Property::AircraftId, "KLM123").unwrap();
        assert_eq!(
            record_line(Category::Cat048, &msg),
            "CAT048 1.31 Sac=1 Sic=2 AircraftId=\"KLM123\""
        );
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from([
            "asterix-feeder",
            "items",
            "capture.hex",
            "--hex",
            "--dist",
            "km",
            "--category-version",
            "48=1.21",
            "--sac",
            "25",
        ])
        .unwrap();
        match cli.command {
            Commands::Items { input, dist, .. } => {
                assert!(input.hex);
                assert_eq!(dist, DistanceUnit::Kilometres);
                assert_eq!(input.category_versions, vec![(48, Version::new(1, 21))]);
                assert_eq!(input.sac, Some(25));
            }
            _ => panic!("expected items"),
        }
    }
}
