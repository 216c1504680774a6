//! Error types for variables and their encodings

/// Fatal errors raised by malformed variable-related input
///
/// These abort the current call. Problems that should be collected and
/// reported together go to an [`ErrorSink`](crate::ErrorSink) instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VariableError {
    /// Reference string did not contain the separator exactly once
    #[error("variable reference '{0}' was not correctly formatted (should be PACKAGEID::VARIABLENAME)")]
    MalformedRef(String),

    /// Encoded constant could not be parsed
    #[error("could not parse '{0}' as a constant")]
    MalformedConstant(String),

    /// Schema version string could not be parsed
    #[error("could not parse '{0}' as a version number")]
    MalformedVersion(String),

    /// Units tag is not recognised
    #[error("unknown units tag: '{0}'")]
    UnknownUnits(String),

    /// Type tag is not recognised
    #[error("unknown type tag: '{0}'")]
    UnknownType(String),

    /// Resolved value does not have the requested type
    #[error("could not convert '{value}' to {expected} for variable: {variable}")]
    TypeMismatch {
        /// Variable name
        variable: String,
        /// Requested type
        expected: &'static str,
        /// Rendered value (empty when absent)
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_ref_display() {
        let err = VariableError::MalformedRef("a:b".to_string());
        assert!(err.to_string().contains("PACKAGEID::VARIABLENAME"));
    }

    #[test]
    fn type_mismatch_display() {
        let err = VariableError::TypeMismatch {
            variable: "refresh".to_string(),
            expected: "integer",
            value: "60s".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "could not convert '60s' to integer for variable: refresh"
        );
    }
}
