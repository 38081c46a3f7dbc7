//! Decoder configuration and its file form.
//!
//! Reads/writes `~/.asterix-decode/config.json` with the SAC/SIC filter,
//! enabled categories, recovery mode, layout selection and version
//! overrides. The same settings are reachable one at a time through the
//! string-keyed parameter interface.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::types::{AsterixError, Result};
use crate::version::{Version, VersionRegistry};

/// What permissive mode does after an item fails to decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryPolicy {
    /// Drop the bad item and carry on with the next one.
    #[default]
    SkipItem,
    /// Keep what was decoded so far and skip the rest of the record.
    AbortRecord,
}

impl RecoveryPolicy {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "skip_item" => Some(RecoveryPolicy::SkipItem),
            "abort_record" => Some(RecoveryPolicy::AbortRecord),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            RecoveryPolicy::SkipItem => "skip_item",
            RecoveryPolicy::AbortRecord => "abort_record",
        }
    }
}

/// Radar site, used to turn polar positions into latitude/longitude and back.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorPosition {
    pub lat: f64,
    pub lon: f64,
}

/// Full decoder configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Accept only this SAC; 0 accepts any.
    pub expected_sac: u8,
    /// Accept only this SIC; 0 accepts any.
    pub expected_sic: u8,
    /// Categories whose blocks are skipped.
    pub disabled_categories: BTreeSet<u8>,
    pub permissive: bool,
    pub recovery: RecoveryPolicy,
    /// Bytes skipped at the start of every buffer passed to `decode`.
    pub ignore_prefix_bytes: usize,
    pub project_code: u32,
    pub uap_code: u32,
    pub versions: VersionRegistry,
    /// Seconds added to decoded times of day.
    pub radar_time_offset: f64,
    pub sensor: Option<SensorPosition>,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        DecoderConfig {
            expected_sac: 0,
            expected_sic: 0,
            disabled_categories: BTreeSet::new(),
            permissive: false,
            recovery: RecoveryPolicy::SkipItem,
            ignore_prefix_bytes: 0,
            project_code: 0,
            uap_code: 0,
            versions: VersionRegistry::new(),
            radar_time_offset: 0.0,
            sensor: None,
        }
    }
}

impl DecoderConfig {
    pub fn is_enabled(&self, category: u8) -> bool {
        !self.disabled_categories.contains(&category)
    }

    pub fn set_enabled(&mut self, category: u8, enabled: bool) {
        if enabled {
            self.disabled_categories.remove(&category);
        } else {
            self.disabled_categories.insert(category);
        }
    }

    /// Set one setting by name.
    ///
    /// Names: `expected_sac`, `expected_sic`, `permissive`, `recovery`,
    /// `ignore_prefix_bytes`, `project_code`, `uap_code`,
    /// `radar_time_offset`, `catNNN.enable`, `catNNN.version`.
    pub fn set_parameter(&mut self, name: &str, value: &str) -> Result<()> {
        let bad = || AsterixError::InvalidParameter {
            name: name.into(),
            value: value.into(),
        };
        let value = value.trim();

        if let Some((category, key)) = parse_category_key(name) {
            return match key {
                "enable" => {
                    self.set_enabled(category, parse_bool(value).ok_or_else(bad)?);
                    Ok(())
                }
                "version" if value.is_empty() || value == "default" => {
                    self.versions.clear(category);
                    Ok(())
                }
                "version" => self.versions.set(category, Version::parse(value)?),
                _ => Err(bad()),
            };
        }

        match name {
            "expected_sac" => self.expected_sac = value.parse().map_err(|_| bad())?,
            "expected_sic" => self.expected_sic = value.parse().map_err(|_| bad())?,
            "permissive" => self.permissive = parse_bool(value).ok_or_else(bad)?,
            "recovery" => self.recovery = RecoveryPolicy::parse(value).ok_or_else(bad)?,
            "ignore_prefix_bytes" => self.ignore_prefix_bytes = value.parse().map_err(|_| bad())?,
            "project_code" => self.project_code = value.parse().map_err(|_| bad())?,
            "uap_code" => self.uap_code = value.parse().map_err(|_| bad())?,
            "radar_time_offset" => {
                let secs: f64 = value.parse().map_err(|_| bad())?;
                if !secs.is_finite() {
                    return Err(bad());
                }
                self.radar_time_offset = secs;
            }
            _ => return Err(bad()),
        }
        Ok(())
    }

    /// Current value of a named setting, in the form `set_parameter` takes.
    pub fn get_parameter(&self, name: &str) -> Result<String> {
        if let Some((category, key)) = parse_category_key(name) {
            return match key {
                "enable" => Ok(self.is_enabled(category).to_string()),
                "version" => {
                    let cat = Category::from_u8(category).ok_or(AsterixError::UnknownCategory(category))?;
                    Ok(self.versions.resolve(cat, None).to_string())
                }
                _ => Err(unknown(name)),
            };
        }

        Ok(match name {
            "expected_sac" => self.expected_sac.to_string(),
            "expected_sic" => self.expected_sic.to_string(),
            "permissive" => self.permissive.to_string(),
            "recovery" => self.recovery.as_str().to_string(),
            "ignore_prefix_bytes" => self.ignore_prefix_bytes.to_string(),
            "project_code" => self.project_code.to_string(),
            "uap_code" => self.uap_code.to_string(),
            "radar_time_offset" => self.radar_time_offset.to_string(),
            _ => return Err(unknown(name)),
        })
    }
}

fn unknown(name: &str) -> AsterixError {
    AsterixError::InvalidParameter {
        name: name.into(),
        value: String::new(),
    }
}

/// Split `cat048.version` into (48, "version").
fn parse_category_key(name: &str) -> Option<(u8, &str)> {
    let (cat, key) = name.strip_prefix("cat")?.split_once('.')?;
    Some((cat.parse().ok()?, key))
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Files
// ---------------------------------------------------------------------------

/// Get the config directory path (`~/.asterix-decode/`).
pub fn config_dir() -> PathBuf {
    dirs_home().join(".asterix-decode")
}

/// Get the default config file path.
pub fn default_config_file() -> PathBuf {
    config_dir().join("config.json")
}

fn dirs_home() -> PathBuf {
    std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}

/// Load a config file.
///
/// Returns the default config if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<DecoderConfig> {
    if !path.exists() {
        log::debug!("no config at {}, using defaults", path.display());
        return Ok(DecoderConfig::default());
    }
    let text = std::fs::read_to_string(path)?;
    serde_json::from_str(&text).map_err(|e| AsterixError::Config(format!("{}: {e}", path.display())))
}

/// Save a config file, creating its directory if needed.
pub fn save_config(path: &Path, config: &DecoderConfig) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| AsterixError::Config(e.to_string()))?;
    }
    let text = serde_json::to_string_pretty(config).map_err(|e| AsterixError::Config(e.to_string()))?;
    std::fs::write(path, text + "\n").map_err(|e| AsterixError::Config(e.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DecoderConfig::default();
        assert_eq!(config.expected_sac, 0);
        assert!(!config.permissive);
        assert_eq!(config.recovery, RecoveryPolicy::SkipItem);
        assert!(config.is_enabled(48));
        assert!(config.sensor.is_none());
    }

    #[test]
    fn test_parameters() {
        let mut config = DecoderConfig::default();
        config.set_parameter("expected_sac", "25").unwrap();
        config.set_parameter("permissive", "yes").unwrap();
        config.set_parameter("recovery", "abort_record").unwrap();
        config.set_parameter("cat034.enable", "0").unwrap();
        config.set_parameter("cat021.version", "0.26").unwrap();
        config.set_parameter("radar_time_offset", "-1.5").unwrap();

        assert_eq!(config.get_parameter("expected_sac").unwrap(), "25");
        assert_eq!(config.get_parameter("permissive").unwrap(), "true");
        assert_eq!(config.get_parameter("recovery").unwrap(), "abort_record");
        assert_eq!(config.get_parameter("cat034.enable").unwrap(), "false");
        assert_eq!(config.get_parameter("cat021.version").unwrap(), "0.26");
        assert_eq!(config.get_parameter("cat048.version").unwrap(), "1.31");
        assert_eq!(config.radar_time_offset, -1.5);
        assert!(!config.is_enabled(34));

        config.set_parameter("cat021.version", "default").unwrap();
        assert_eq!(config.get_parameter("cat021.version").unwrap(), "2.4");
    }

    #[test]
    fn test_bad_parameters() {
        let mut config = DecoderConfig::default();
        assert!(config.set_parameter("expected_sac", "300").is_err());
        assert!(config.set_parameter("permissive", "maybe").is_err());
        assert!(config.set_parameter("no_such_thing", "1").is_err());
        assert!(config.set_parameter("cat048.version", "9.0").is_err());
        assert!(matches!(
            config.set_parameter("cat099.version", "1.0"),
            Err(AsterixError::UnknownCategory(99))
        ));
        assert!(config.get_parameter("cat048.colour").is_err());
    }

    #[test]
    fn test_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("config.json");

        let mut config = DecoderConfig::default();
        config.expected_sic = 7;
        config.set_enabled(1, false);
        config.versions.set(48, Version::new(1, 21)).unwrap();
        config.sensor = Some(SensorPosition { lat: 51.5, lon: -0.1 });
        save_config(&path, &config).unwrap();

        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_gives_default() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_config(&dir.path().join("absent.json")).unwrap();
        assert_eq!(loaded, DecoderConfig::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "permissive": true, "versions": { "21": { "major": 0, "minor": 26 } } }"#).unwrap();
        let loaded = load_config(&path).unwrap();
        assert!(loaded.permissive);
        assert_eq!(loaded.expected_sac, 0);
        assert_eq!(loaded.versions.get(21), Some(Version::new(0, 26)));
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(load_config(&path), Err(AsterixError::Config(_))));
    }
}
