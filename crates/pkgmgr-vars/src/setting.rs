//! Declared setting values

use crate::constant::Constant;
use crate::variable::VariableRef;

/// Which form a [`SettingValue`] takes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingValueType {
    /// Nothing declared; fall back to the global default
    None,
    /// Inline literal
    Constant,
    /// Reference to another variable
    Variable,
}

/// A setting as declared on a dataset: nothing, a constant, or a reference
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SettingValue {
    /// Nothing declared
    #[default]
    None,
    /// Inline literal
    Constant(Constant),
    /// Reference to another variable
    Variable(VariableRef),
}

impl SettingValue {
    /// Derived form of this setting
    #[inline]
    #[must_use]
    pub fn value_type(&self) -> SettingValueType {
        match self {
            Self::None => SettingValueType::None,
            Self::Constant(_) => SettingValueType::Constant,
            Self::Variable(_) => SettingValueType::Variable,
        }
    }

    /// True when nothing is declared
    #[inline]
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl From<Constant> for SettingValue {
    fn from(constant: Constant) -> Self {
        Self::Constant(constant)
    }
}

impl From<VariableRef> for SettingValue {
    fn from(var_ref: VariableRef) -> Self {
        Self::Variable(var_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Units;

    #[test]
    fn default_is_none() {
        let setting = SettingValue::default();
        assert!(setting.is_none());
        assert_eq!(setting.value_type(), SettingValueType::None);
    }

    #[test]
    fn conversions() {
        let constant: SettingValue = Constant::new(88, Units::Weeks).into();
        assert_eq!(constant.value_type(), SettingValueType::Constant);

        let reference: SettingValue = VariableRef::local("freddy").into();
        assert_eq!(reference.value_type(), SettingValueType::Variable);
        assert!(!reference.is_none());
    }
}
