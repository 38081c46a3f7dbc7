//! Category edition numbers and per-category version overrides.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::types::{AsterixError, Result};

/// Category edition, e.g. `1.31`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Version {
    pub major: u8,
    pub minor: u8,
}

impl Version {
    pub const fn new(major: u8, minor: u8) -> Self {
        Version { major, minor }
    }

    /// Parse `"MAJOR.MINOR"`.
    pub fn parse(s: &str) -> Result<Self> {
        let bad = || AsterixError::InvalidParameter {
            name: "version".into(),
            value: s.into(),
        };
        let (major, minor) = s.trim().split_once('.').ok_or_else(bad)?;
        Ok(Version {
            major: major.parse().map_err(|_| bad())?,
            minor: minor.parse().map_err(|_| bad())?,
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for Version {
    type Err = AsterixError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

/// Per-category version overrides.
///
/// Resolution order for a category: explicit override, then the version
/// last announced by a CAT247 version report, then the category default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionRegistry {
    overrides: BTreeMap<u8, Version>,
}

impl VersionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin `category` to `version`. Fails if the category is unknown or the
    /// edition has no table.
    pub fn set(&mut self, category: u8, version: Version) -> Result<()> {
        let cat = Category::from_u8(category).ok_or(AsterixError::UnknownCategory(category))?;
        if !cat.supports(version) {
            return Err(AsterixError::UnsupportedVersion {
                category,
                major: version.major,
                minor: version.minor,
            });
        }
        self.overrides.insert(category, version);
        Ok(())
    }

    pub fn get(&self, category: u8) -> Option<Version> {
        self.overrides.get(&category).copied()
    }

    pub fn clear(&mut self, category: u8) -> Option<Version> {
        self.overrides.remove(&category)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, Version)> + '_ {
        self.overrides.iter().map(|(c, v)| (*c, *v))
    }

    /// Version to decode `category` with.
    pub fn resolve(&self, category: Category, announced: Option<Version>) -> Version {
        self.get(category.code())
            .or(announced.filter(|v| category.supports(*v)))
            .unwrap_or_else(|| category.default_version())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(Version::parse("1.31").unwrap(), Version::new(1, 31));
        assert_eq!(" 2.4 ".parse::<Version>().unwrap(), Version::new(2, 4));
        assert!(Version::parse("1").is_err());
        assert!(Version::parse("a.b").is_err());
        assert!(Version::parse("1.300").is_err());
    }

    #[test]
    fn test_ordering_and_display() {
        assert!(Version::new(1, 9) < Version::new(1, 10));
        assert!(Version::new(0, 26) < Version::new(2, 1));
        assert_eq!(Version::new(1, 31).to_string(), "1.31");
    }

    #[test]
    fn test_registry_resolution_order() {
        let mut reg = VersionRegistry::new();
        let cat = Category::Cat021;
        assert_eq!(reg.resolve(cat, None), cat.default_version());
        assert_eq!(
            reg.resolve(cat, Some(Version::new(0, 26))),
            Version::new(0, 26)
        );
        reg.set(21, Version::new(2, 1)).unwrap();
        assert_eq!(reg.resolve(cat, Some(Version::new(0, 26))), Version::new(2, 1));
        assert_eq!(reg.clear(21), Some(Version::new(2, 1)));
        assert_eq!(reg.get(21), None);
    }

    #[test]
    fn test_registry_rejects_unknown() {
        let mut reg = VersionRegistry::new();
        assert!(matches!(
            reg.set(99, Version::new(1, 0)),
            Err(AsterixError::UnknownCategory(99))
        ));
        assert!(matches!(
            reg.set(48, Version::new(7, 0)),
            Err(AsterixError::UnsupportedVersion { category: 48, .. })
        ));
    }
}
