//! Fingerprint output versions.
//!
//! Versions are totally ordered. A later version only ever adds items to a
//! category; it never drops or reorders items an earlier version emitted.

use crate::error::Error;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// Requested fingerprint output version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Version {
    V1,
    V2,
    V3,
}

impl Version {
    /// Every version, oldest first.
    pub const ALL: [Version; 3] = [Version::V1, Version::V2, Version::V3];

    /// The newest version this build knows about.
    pub const LATEST: Version = Version::V3;

    /// Numeric form (`1` for `v1`).
    pub fn number(self) -> u8 {
        match self {
            Version::V1 => 1,
            Version::V2 => 2,
            Version::V3 => 3,
        }
    }
}

impl Default for Version {
    fn default() -> Self {
        Version::LATEST
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().to_lowercase();
        let digits = trimmed.strip_prefix('v').unwrap_or(&trimmed);
        match digits {
            "1" => Ok(Version::V1),
            "2" => Ok(Version::V2),
            "3" => Ok(Version::V3),
            _ => Err(Error::UnsupportedVersion(s.to_string())),
        }
    }
}

/// Accepts the same spellings as [`FromStr`].
impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}", self.number())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_versions_are_ordered() {
        assert!(Version::V1 < Version::V2);
        assert!(Version::V2 < Version::V3);
        let mut sorted = Version::ALL;
        sorted.sort();
        assert_eq!(sorted, Version::ALL);
        assert_eq!(Version::ALL.last().copied(), Some(Version::LATEST));
    }

    #[test]
    fn test_parse_accepts_common_spellings() {
        assert_eq!("v1".parse::<Version>().unwrap(), Version::V1);
        assert_eq!("V2".parse::<Version>().unwrap(), Version::V2);
        assert_eq!(" 3 ".parse::<Version>().unwrap(), Version::V3);
    }

    #[test]
    fn test_parse_rejects_unknown_version() {
        let err = "v9".parse::<Version>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedVersion(ref v) if v == "v9"));
        assert!("".parse::<Version>().is_err());
        assert!("version-one".parse::<Version>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for version in Version::ALL {
            assert_eq!(version.to_string().parse::<Version>().unwrap(), version);
        }
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&Version::V2).unwrap(), "\"v2\"");
        let parsed: Version = serde_json::from_str("\"v3\"").unwrap();
        assert_eq!(parsed, Version::V3);
    }

    #[test]
    fn test_deserialize_accepts_parse_spellings() {
        for raw in ["\"2\"", "\"V2\"", "\" v2 \""] {
            let parsed: Version = serde_json::from_str(raw).unwrap();
            assert_eq!(parsed, Version::V2);
        }
        let err = serde_json::from_str::<Version>("\"v9\"").unwrap_err();
        assert!(err.to_string().contains("unsupported fingerprint version"));
    }
}
