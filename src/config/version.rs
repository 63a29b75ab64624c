// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 mp-builder contributors

//! Config version parsing and compatibility range

use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Oldest config version this build understands
pub const CONFIG_VERSION_MIN: &str = "0.0.1";

/// Newest config version this build understands
pub const CONFIG_VERSION_MAX: &str = "0.9.9";

/// A strict `MAJOR.MINOR.PATCH` config version
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConfigVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

fn version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\d+)\.(\d+)\.(\d+)$").expect("static version pattern"))
}

impl ConfigVersion {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Lowest supported version
    pub fn min_supported() -> Self {
        Self::new(0, 0, 1)
    }

    /// Highest supported version
    pub fn max_supported() -> Self {
        Self::new(0, 9, 9)
    }

    /// Parse and range-check in one go, producing a human readable reason on failure
    pub fn parse_supported(raw: &str) -> Result<Self, String> {
        let version: Self = raw.parse()?;

        if version < Self::min_supported() {
            return Err(format!(
                "incompatible config version {}: must be at least {}",
                version, CONFIG_VERSION_MIN
            ));
        }
        if version > Self::max_supported() {
            return Err(format!(
                "incompatible config version {}: can be at most {}",
                version, CONFIG_VERSION_MAX
            ));
        }

        Ok(version)
    }
}

impl FromStr for ConfigVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = version_pattern()
            .captures(s)
            .ok_or_else(|| format!("invalid config version '{}': expected MAJOR.MINOR.PATCH", s))?;

        let part = |i: usize| -> Result<u64, String> {
            caps[i]
                .parse::<u64>()
                .map_err(|_| format!("invalid config version '{}': component out of range", s))
        };

        Ok(Self::new(part(1)?, part(2)?, part(3)?))
    }
}

impl fmt::Display for ConfigVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strict_pattern() {
        assert_eq!("0.1.0".parse::<ConfigVersion>().unwrap(), ConfigVersion::new(0, 1, 0));
        assert!("0.1".parse::<ConfigVersion>().is_err());
        assert!("v0.1.0".parse::<ConfigVersion>().is_err());
        assert!("0.1.0-beta".parse::<ConfigVersion>().is_err());
        assert!("".parse::<ConfigVersion>().is_err());
    }

    #[test]
    fn test_comparison_is_numeric_not_lexical() {
        let a: ConfigVersion = "0.10.0".parse().unwrap();
        let b: ConfigVersion = "0.9.0".parse().unwrap();
        assert!(a > b);
    }

    #[test]
    fn test_supported_range() {
        assert!(ConfigVersion::parse_supported("0.0.1").is_ok());
        assert!(ConfigVersion::parse_supported("0.9.9").is_ok());
        assert!(ConfigVersion::parse_supported("0.0.0")
            .unwrap_err()
            .contains("at least"));
        assert!(ConfigVersion::parse_supported("0.10.0")
            .unwrap_err()
            .contains("at most"));
        assert!(ConfigVersion::parse_supported("1.0.0").is_err());
    }

    #[test]
    fn test_bounds_match_constants() {
        assert_eq!(ConfigVersion::min_supported().to_string(), CONFIG_VERSION_MIN);
        assert_eq!(ConfigVersion::max_supported().to_string(), CONFIG_VERSION_MAX);
    }
}
