//! Type and units tags
//!
//! Variables store their type and units as string tags. Each tag has a
//! canonical spelling plus accepted abbreviations.

use crate::error::VariableError;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Value types a variable may hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SupportedType {
    /// Whole number
    Integer,
    /// Free text
    String,
}

impl SupportedType {
    /// Every supported type
    pub const ALL: [Self; 2] = [Self::Integer, Self::String];

    /// Accepted tags, canonical first
    #[must_use]
    pub fn tags(self) -> &'static [&'static str] {
        match self {
            Self::Integer => &["integer", "int"],
            Self::String => &["string", "str"],
        }
    }

    /// Canonical tag
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.tags()[0]
    }
}

impl Display for SupportedType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SupportedType {
    type Err = VariableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.tags().iter().any(|known| known.eq_ignore_ascii_case(tag)))
            .ok_or_else(|| VariableError::UnknownType(s.to_string()))
    }
}

/// Units attached to a quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Units {
    /// Plain number
    None,
    /// Days
    Days,
    /// Weeks
    Weeks,
    /// Calendar months
    Months,
    /// Calendar years
    Years,
}

impl Units {
    /// Every unit
    pub const ALL: [Self; 5] = [
        Self::None,
        Self::Days,
        Self::Weeks,
        Self::Months,
        Self::Years,
    ];

    /// Accepted tags, canonical first
    #[must_use]
    pub fn tags(self) -> &'static [&'static str] {
        match self {
            Self::None => &["none"],
            Self::Days => &["days", "day", "d", "D"],
            Self::Weeks => &["weeks", "week", "w", "W"],
            Self::Months => &["months", "month", "M", "MM"],
            Self::Years => &["years", "year", "y", "Y"],
        }
    }

    /// Canonical tag
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.tags()[0]
    }

    /// Check whether `tag` names this unit
    ///
    /// Single-letter tags are case-sensitive (`M` is months, `m` is nothing),
    /// longer tags are not.
    #[must_use]
    pub fn matches_tag(self, tag: &str) -> bool {
        self.tags().iter().any(|known| {
            if known.chars().count() == 1 {
                *known == tag
            } else {
                known.eq_ignore_ascii_case(tag)
            }
        })
    }
}

impl Display for Units {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Units {
    type Err = VariableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        Self::ALL
            .into_iter()
            .find(|u| u.matches_tag(tag))
            .ok_or_else(|| VariableError::UnknownUnits(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn units_canonical_tags() {
        assert_eq!(Units::None.as_str(), "none");
        assert_eq!(Units::Days.to_string(), "days");
        assert_eq!(Units::Years.as_str(), "years");
    }

    #[test]
    fn units_abbreviations() {
        assert_eq!("d".parse::<Units>().unwrap(), Units::Days);
        assert_eq!("D".parse::<Units>().unwrap(), Units::Days);
        assert_eq!("week".parse::<Units>().unwrap(), Units::Weeks);
        assert_eq!("MM".parse::<Units>().unwrap(), Units::Months);
        assert_eq!("Y".parse::<Units>().unwrap(), Units::Years);
    }

    #[test]
    fn units_single_letter_is_case_sensitive() {
        assert_eq!("M".parse::<Units>().unwrap(), Units::Months);
        assert!("m".parse::<Units>().is_err());
    }

    #[test]
    fn units_multi_letter_ignores_case() {
        assert_eq!("Years".parse::<Units>().unwrap(), Units::Years);
        assert_eq!("DAYS".parse::<Units>().unwrap(), Units::Days);
        assert_eq!("mm".parse::<Units>().unwrap(), Units::Months);
    }

    #[test]
    fn units_unknown_tag() {
        let result = "fortnights".parse::<Units>();
        assert!(matches!(result, Err(VariableError::UnknownUnits(_))));
        assert!("da".parse::<Units>().is_err());
    }

    #[test]
    fn supported_type_tags() {
        assert_eq!("integer".parse::<SupportedType>().unwrap(), SupportedType::Integer);
        assert_eq!("INT".parse::<SupportedType>().unwrap(), SupportedType::Integer);
        assert_eq!("str".parse::<SupportedType>().unwrap(), SupportedType::String);
        assert_eq!(SupportedType::String.as_str(), "string");
        assert!(matches!(
            "float".parse::<SupportedType>(),
            Err(VariableError::UnknownType(_))
        ));
    }
}
