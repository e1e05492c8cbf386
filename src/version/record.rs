//! Firmware version record
//!
//! The three-component semantic version carried by the version store. The
//! firmware's update check compares versions component-wise (major, then
//! minor, then patch), so ordering here must match that rule.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error parsing a "MAJOR.MINOR.PATCH" string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid version string: '{input}'")]
pub struct VersionParseError {
    /// The string that failed to parse
    pub input: String,
}

/// A firmware semantic version (major.minor.patch)
///
/// Field order matters: the derived `Ord` gives the component-wise
/// comparison the update check relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VersionRecord {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl VersionRecord {
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Next patch release: major and minor unchanged, patch + 1
    pub fn next_patch(&self) -> Self {
        Self {
            major: self.major,
            minor: self.minor,
            patch: self.patch + 1,
        }
    }
}

impl fmt::Display for VersionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for VersionRecord {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || VersionParseError {
            input: s.to_string(),
        };

        let mut parts = s.split('.');
        let major = parts.next().ok_or_else(err)?;
        let minor = parts.next().ok_or_else(err)?;
        let patch = parts.next().ok_or_else(err)?;
        if parts.next().is_some() {
            return Err(err());
        }

        Ok(Self {
            major: major.parse().map_err(|_| err())?,
            minor: minor.parse().map_err(|_| err())?,
            patch: patch.parse().map_err(|_| err())?,
        })
    }
}
