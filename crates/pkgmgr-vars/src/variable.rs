//! Variables and references to them
//!
//! Provides [`Variable`], the stored configuration value, and
//! [`VariableRef`], its `packageId::variableName` address.

use crate::error::VariableError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Separator between package id and variable name in a full name
pub const REF_SEPARATOR: &str = "::";

/// A configurable value owned by a package
///
/// All value-bearing fields are string-encoded; [`crate::VariableInfo`]
/// gives the typed view.
///
/// # Identity
/// Lookups use `(package_id, name)` rendered as `package_id::name`. The
/// `id` is the storage key and is what deletions target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    /// Storage key
    #[serde(default)]
    pub id: String,

    /// Owning package
    #[serde(rename = "package-id")]
    pub package_id: String,

    /// Name local to the package
    #[serde(rename = "variable-name")]
    pub name: String,

    /// Live value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Type tag (`integer`, `string`)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub var_type: Option<String>,

    /// Value used when no live value is set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    /// Upper bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<String>,

    /// Lower bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<String>,

    /// Units tag (`days`, `weeks`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,

    /// Synthesised from a constant setting rather than declared
    #[serde(rename = "is-generated", default, skip_serializing_if = "Option::is_none")]
    pub is_generated: Option<bool>,

    /// Where the value can be edited
    #[serde(rename = "edit-uri", default, skip_serializing_if = "Option::is_none")]
    pub edit_uri: Option<String>,
}

impl Variable {
    /// Create variable with a deterministic id derived from its identity
    #[must_use]
    pub fn new(package_id: impl Into<String>, name: impl Into<String>) -> Self {
        let mut variable = Self {
            package_id: package_id.into(),
            name: name.into(),
            ..Self::default()
        };
        variable.ensure_id();
        variable
    }

    /// Builder: set the type tag
    #[inline]
    #[must_use]
    pub fn with_type(mut self, tag: impl Into<String>) -> Self {
        self.var_type = Some(tag.into());
        self
    }

    /// Builder: set the live value
    #[inline]
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Builder: set the default value
    #[inline]
    #[must_use]
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Builder: set the units tag
    #[inline]
    #[must_use]
    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }

    /// Reference addressing this variable
    #[inline]
    #[must_use]
    pub fn var_ref(&self) -> VariableRef {
        VariableRef::new(self.package_id.clone(), self.name.clone())
    }

    /// `package_id::name`
    #[inline]
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}{}{}", self.package_id, REF_SEPARATOR, self.name)
    }

    /// Fill an empty id with the full name
    pub fn ensure_id(&mut self) {
        if self.id.is_empty() {
            self.id = self.full_name();
        }
    }

    /// Whether syncing `self` over `other` would change the store
    ///
    /// Compares every synchronised field; `id` and `package_id` do not take
    /// part. An absent `other` always counts as changed.
    #[must_use]
    pub fn is_changed(&self, other: Option<&Variable>) -> bool {
        let Some(other) = other else {
            return true;
        };
        self.value != other.value
            || self.var_type != other.var_type
            || self.default != other.default
            || self.max != other.max
            || self.min != other.min
            || self.units != other.units
            || self.is_generated != other.is_generated
            || self.edit_uri != other.edit_uri
    }
}

/// Reference to a variable: `packageId::variableName`
///
/// An empty `package_id` means "the current package" wherever a reference
/// is resolved on behalf of a package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct VariableRef {
    /// Owning package (may be empty)
    pub package_id: String,
    /// Variable name within the package
    pub variable_name: String,
    /// Fallback value declared alongside the reference
    pub default_value: Option<String>,
}

impl VariableRef {
    /// Create reference
    #[inline]
    #[must_use]
    pub fn new(package_id: impl Into<String>, variable_name: impl Into<String>) -> Self {
        Self {
            package_id: package_id.into(),
            variable_name: variable_name.into(),
            default_value: None,
        }
    }

    /// Reference with no package (resolved against the current package)
    #[inline]
    #[must_use]
    pub fn local(variable_name: impl Into<String>) -> Self {
        Self::new(String::new(), variable_name)
    }

    /// Builder: attach a default value
    #[inline]
    #[must_use]
    pub fn with_default(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = Some(default_value.into());
        self
    }

    /// True when no variable is named
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variable_name.trim().is_empty()
    }

    /// True when the package part is blank
    #[inline]
    #[must_use]
    pub fn has_package(&self) -> bool {
        !self.package_id.trim().is_empty()
    }

    /// `package_id::variable_name`
    #[inline]
    #[must_use]
    pub fn to_full_name(&self) -> String {
        format!("{}{}{}", self.package_id, REF_SEPARATOR, self.variable_name)
    }

    /// Parse, returning `None` unless the separator appears exactly once
    #[must_use]
    pub fn try_parse(full_name: &str) -> Option<Self> {
        let mut parts = full_name.split(REF_SEPARATOR);
        let package_id = parts.next()?;
        let variable_name = parts.next()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self::new(package_id, variable_name))
    }
}

impl Display for VariableRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.package_id, REF_SEPARATOR, self.variable_name)
    }
}

impl FromStr for VariableRef {
    type Err = VariableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_parse(s).ok_or_else(|| VariableError::MalformedRef(s.to_string()))
    }
}
