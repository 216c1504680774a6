//! Encoded constants
//!
//! Provides [`Constant`] and its compact textual form: an integer followed
//! by a unit tag, e.g. `7days`, ` 9 weeks `, `1M`, `-5days`.

use crate::error::VariableError;
use crate::units::{SupportedType, Units};
use crate::variable::Variable;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

static ENCODED_CONSTANT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(-?\d+)\s*(\w+)\s*$").expect("encoded constant pattern is valid")
});

/// Literal, typed, unit-tagged value
///
/// Distinct from a [`crate::VariableRef`]: the value is written inline in a
/// setting instead of being looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Constant {
    value: i64,
    units: Units,
    supported_type: SupportedType,
}

impl Constant {
    /// Integer constant with units
    #[inline]
    #[must_use]
    pub fn new(value: i64, units: Units) -> Self {
        Self {
            value,
            units,
            supported_type: SupportedType::Integer,
        }
    }

    /// Literal value
    #[inline]
    #[must_use]
    pub fn value(&self) -> i64 {
        self.value
    }

    /// Units
    #[inline]
    #[must_use]
    pub fn units(&self) -> Units {
        self.units
    }

    /// Value type (always integer for encoded constants)
    #[inline]
    #[must_use]
    pub fn supported_type(&self) -> SupportedType {
        self.supported_type
    }

    /// Decode `<integer><unit>`, returning `None` on any mismatch
    ///
    /// Fails on blank input, digits that overflow, or an unknown unit tag.
    #[must_use]
    pub fn try_parse_encoded(encoded: &str) -> Option<Self> {
        if encoded.trim().is_empty() {
            return None;
        }
        let captures = ENCODED_CONSTANT.captures(encoded)?;
        let value = captures[1].parse::<i64>().ok()?;
        let units = captures[2].parse::<Units>().ok()?;
        Some(Self::new(value, units))
    }

    /// Decode `<integer><unit>`
    ///
    /// # Errors
    /// Returns [`VariableError::MalformedConstant`] when decoding fails
    pub fn parse_encoded(encoded: &str) -> Result<Self, VariableError> {
        Self::try_parse_encoded(encoded)
            .ok_or_else(|| VariableError::MalformedConstant(encoded.to_string()))
    }

    /// Encode using the canonical unit tag, no space
    #[inline]
    #[must_use]
    pub fn to_encoded(&self) -> String {
        format!("{}{}", self.value, self.units.as_str())
    }

    /// Unnamed variable holding this constant as both value and default
    #[must_use]
    pub fn to_variable(&self) -> Variable {
        let literal = self.value.to_string();
        Variable {
            value: Some(literal.clone()),
            default: Some(literal),
            units: Some(self.units.as_str().to_string()),
            var_type: Some(self.supported_type.as_str().to_string()),
            ..Variable::default()
        }
    }
}

impl Display for Constant {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_encoded())
    }
}

impl FromStr for Constant {
    type Err = VariableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_encoded(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parse_encoded_forms() {
        let cases = [
            ("1d", 1, Units::Days),
            ("27 days", 27, Units::Days),
            (" 9 weeks ", 9, Units::Weeks),
            ("1M", 1, Units::Months),
            ("7years", 7, Units::Years),
            ("7 Years", 7, Units::Years),
            ("88w", 88, Units::Weeks),
        ];
        for (encoded, value, units) in cases {
            let constant = Constant::try_parse_encoded(encoded)
                .unwrap_or_else(|| panic!("'{encoded}' should parse"));
            assert_eq!(constant.value(), value);
            assert_eq!(constant.units(), units);
            assert_eq!(constant.supported_type(), SupportedType::Integer);
        }
    }

    #[test]
    fn parse_encoded_rejects_invalid() {
        for encoded in ["", "   ", "1da", "eighty weeks", "seven days", "lskdj .asdf;;", "1m"] {
            assert!(
                Constant::try_parse_encoded(encoded).is_none(),
                "'{encoded}' should not parse"
            );
        }
    }

    #[test]
    fn negative_values_survive_encoding() {
        let constant = Constant::new(-5, Units::Days);
        assert_eq!(constant.to_encoded(), "-5days");
        assert_eq!(Constant::try_parse_encoded("-5days"), Some(constant));
        assert_eq!(Constant::try_parse_encoded(" -2 w"), Some(Constant::new(-2, Units::Weeks)));
        assert!(Constant::try_parse_encoded("--5days").is_none());
        assert!(Constant::try_parse_encoded("- 5days").is_none());
    }

    #[test]
    fn parse_encoded_rejects_overflow() {
        assert!(Constant::try_parse_encoded("99999999999999999999days").is_none());
    }

    #[test]
    fn parse_encoded_strict_error() {
        let result = Constant::parse_encoded("seven days");
        assert!(matches!(result, Err(VariableError::MalformedConstant(_))));
    }

    #[test]
    fn encode_uses_canonical_tag() {
        assert_eq!(Constant::new(1, Units::Days).to_encoded(), "1days");
        assert_eq!(Constant::new(7, Units::Years).to_encoded(), "7years");
        assert_eq!(Constant::parse_encoded("2 w").unwrap().to_string(), "2weeks");
    }

    #[test]
    fn to_variable_fills_value_and_default() {
        let variable = Constant::new(7, Units::Days).to_variable();
        assert_eq!(variable.value.as_deref(), Some("7"));
        assert_eq!(variable.default.as_deref(), Some("7"));
        assert_eq!(variable.units.as_deref(), Some("days"));
        assert_eq!(variable.var_type.as_deref(), Some("integer"));
    }

    fn any_units() -> impl Strategy<Value = Units> {
        prop::sample::select(Units::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn prop_decode_reproduces_encoded(value in any::<i64>(), units in any_units()) {
            let constant = Constant::new(value, units);
            let decoded = Constant::try_parse_encoded(&constant.to_encoded());
            prop_assert_eq!(decoded, Some(constant));
        }
    }
}
