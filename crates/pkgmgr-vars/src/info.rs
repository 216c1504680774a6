//! Typed view over a stored variable
//!
//! Provides [`VariableInfo`], which parses a [`Variable`]'s string tags and
//! values according to its declared type. Each unparseable field is
//! reported to the [`ErrorSink`] on its own; the rest still resolve.

use crate::error::VariableError;
use crate::sink::ErrorSink;
use crate::units::{SupportedType, Units};
use crate::variable::{Variable, VariableRef};
use std::fmt::{self, Display, Formatter};

/// A parsed variable value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypedValue {
    /// Whole number
    Integer(i64),
    /// Free text
    String(String),
}

impl TypedValue {
    /// Integer payload, if any
    #[inline]
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            Self::String(_) => None,
        }
    }

    /// String payload, if any
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            Self::Integer(_) => None,
        }
    }

    /// JSON rendering (number or string)
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Integer(i) => serde_json::Value::from(*i),
            Self::String(s) => serde_json::Value::from(s.as_str()),
        }
    }
}

impl Display for TypedValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

/// Read-only resolved view over a [`Variable`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableInfo {
    variable: Variable,
    var_ref: VariableRef,
    supported_type: Option<SupportedType>,
    units: Option<Units>,
    value: Option<TypedValue>,
    default: Option<TypedValue>,
    max: Option<TypedValue>,
    min: Option<TypedValue>,
    has_errors: bool,
}

impl VariableInfo {
    /// Parse `variable` as seen from `package_id`
    ///
    /// Tag and value problems are appended to `errors`; [`Self::has_errors`]
    /// reports whether this extraction added any.
    #[must_use]
    pub fn extract(variable: &Variable, package_id: &str, errors: &mut ErrorSink) -> Self {
        let before = errors.len();

        let supported_type = parse_tag::<SupportedType>(
            variable.var_type.as_deref(),
            "type",
            &variable.name,
            errors,
        );
        let units = parse_tag::<Units>(variable.units.as_deref(), "units", &variable.name, errors);

        let mut info = Self {
            variable: variable.clone(),
            var_ref: VariableRef::new(package_id, variable.name.clone()),
            supported_type,
            units,
            value: None,
            default: None,
            max: None,
            min: None,
            has_errors: false,
        };
        info.parse_values(errors);
        info.has_errors = errors.len() != before;
        info
    }

    fn parse_values(&mut self, errors: &mut ErrorSink) {
        match self.supported_type {
            Some(SupportedType::Integer) => {
                self.value = parse_integer(self.variable.value.as_deref(), errors);
                self.default = parse_integer(self.variable.default.as_deref(), errors);
                self.max = parse_integer(self.variable.max.as_deref(), errors);
                self.min = parse_integer(self.variable.min.as_deref(), errors);
            }
            Some(SupportedType::String) => {
                self.value = self.variable.value.clone().map(TypedValue::String);
                self.default = self.variable.default.clone().map(TypedValue::String);
            }
            None => {}
        }
    }

    /// Underlying variable (as it was at extraction)
    #[inline]
    #[must_use]
    pub fn variable(&self) -> &Variable {
        &self.variable
    }

    /// Reference the variable was resolved under
    #[inline]
    #[must_use]
    pub fn var_ref(&self) -> &VariableRef {
        &self.var_ref
    }

    /// Parsed type tag
    #[inline]
    #[must_use]
    pub fn supported_type(&self) -> Option<SupportedType> {
        self.supported_type
    }

    /// Parsed units tag
    #[inline]
    #[must_use]
    pub fn units(&self) -> Option<Units> {
        self.units
    }

    /// Parsed live value
    #[inline]
    #[must_use]
    pub fn value(&self) -> Option<&TypedValue> {
        self.value.as_ref()
    }

    /// Parsed default
    #[inline]
    #[must_use]
    pub fn default(&self) -> Option<&TypedValue> {
        self.default.as_ref()
    }

    /// Parsed maximum
    #[inline]
    #[must_use]
    pub fn max(&self) -> Option<&TypedValue> {
        self.max.as_ref()
    }

    /// Parsed minimum
    #[inline]
    #[must_use]
    pub fn min(&self) -> Option<&TypedValue> {
        self.min.as_ref()
    }

    /// Whether any field failed to parse
    #[inline]
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    /// Live value, else default
    #[inline]
    #[must_use]
    pub fn value_or_default(&self) -> Option<&TypedValue> {
        self.value.as_ref().or(self.default.as_ref())
    }

    /// Live value or default as an integer
    ///
    /// # Errors
    /// Returns [`VariableError::TypeMismatch`] when absent or not an integer
    pub fn integer_or_default(&self) -> Result<i64, VariableError> {
        self.value_or_default()
            .and_then(TypedValue::as_integer)
            .ok_or_else(|| self.mismatch("integer"))
    }

    /// Live value or default as a string
    ///
    /// # Errors
    /// Returns [`VariableError::TypeMismatch`] when absent or not a string
    pub fn string_or_default(&self) -> Result<&str, VariableError> {
        self.value_or_default()
            .and_then(TypedValue::as_str)
            .ok_or_else(|| self.mismatch("string"))
    }

    fn mismatch(&self, expected: &'static str) -> VariableError {
        VariableError::TypeMismatch {
            variable: self.variable.name.clone(),
            expected,
            value: self
                .value_or_default()
                .map(ToString::to_string)
                .unwrap_or_default(),
        }
    }
}

fn parse_tag<T: std::str::FromStr>(
    tag: Option<&str>,
    field: &str,
    name: &str,
    errors: &mut ErrorSink,
) -> Option<T> {
    let parsed = tag
        .filter(|t| !t.trim().is_empty())
        .and_then(|t| t.parse::<T>().ok());
    if parsed.is_none() {
        errors.add_error(format!("Error parsing {field} for variable {name}"));
    }
    parsed
}

/// Surrounding whitespace is accepted; an empty string is absent
fn parse_integer(raw: Option<&str>, errors: &mut ErrorSink) -> Option<TypedValue> {
    let raw = raw.filter(|r| !r.is_empty())?;
    match raw.trim().parse::<i64>() {
        Ok(i) => Some(TypedValue::Integer(i)),
        Err(_) => {
            errors.add_error(format!("Could not parse '{raw}' as an integer"));
            None
        }
    }
}
