//! Schema versions
//!
//! Provides [`SchemaVersion`], the `major.minor.revision` stamp carried by
//! dataset definitions.

use crate::error::VariableError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

static VERSION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d+)\.(\d+)\.(\d+)\s*$").expect("version pattern is valid")
});

/// Three-part schema version
///
/// - `major`: previously logged data needs migrating
/// - `minor`: backwards compatible schema change
/// - `revision`: no migration needed
///
/// Ordering compares major, then minor, then revision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SchemaVersion {
    /// Breaking schema change
    pub major: u32,
    /// Compatible schema change
    pub minor: u32,
    /// Cosmetic change
    pub revision: u32,
}

impl SchemaVersion {
    /// Create version
    #[inline]
    #[must_use]
    pub fn new(major: u32, minor: u32, revision: u32) -> Self {
        Self {
            major,
            minor,
            revision,
        }
    }
}

impl Display for SchemaVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.revision)
    }
}

impl FromStr for SchemaVersion {
    type Err = VariableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || VariableError::MalformedVersion(s.to_string());
        let captures = VERSION_PATTERN.captures(s).ok_or_else(malformed)?;
        let component = |i: usize| captures[i].parse::<u32>().map_err(|_| malformed());
        Ok(Self::new(component(1)?, component(2)?, component(3)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_parse_and_display() {
        let version: SchemaVersion = " 1.2.3 ".parse().unwrap();
        assert_eq!(version, SchemaVersion::new(1, 2, 3));
        assert_eq!(version.to_string(), "1.2.3");
    }

    #[test]
    fn version_parse_rejects_malformed() {
        for bad in ["", "1.2", "1.2.3.4", "a.b.c", "1. 2.3"] {
            let result = bad.parse::<SchemaVersion>();
            assert!(
                matches!(result, Err(VariableError::MalformedVersion(_))),
                "'{bad}' should be rejected"
            );
        }
    }

    #[test]
    fn version_ordering() {
        let v = |s: &str| s.parse::<SchemaVersion>().unwrap();
        assert!(v("1.0.0") < v("1.0.1"));
        assert!(v("1.9.9") < v("2.0.0"));
        assert!(v("1.2.0") > v("1.1.7"));
        assert_eq!(v("1.2.3"), v("1.2.3"));
    }
}
