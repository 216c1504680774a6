//! Error types for scope lookups

use thiserror::Error;

/// Errors raised by strict scope lookups
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScopeError {
    /// No enclosing scope declares the variable
    #[error("Variable not found: {0}")]
    VariableNotFound(String),

    /// No scope of that name in the index
    #[error("Scope not found: {0}")]
    UnknownScope(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(
            ScopeError::VariableNotFound("Pkg::x".into()).to_string(),
            "Variable not found: Pkg::x"
        );
        assert_eq!(
            ScopeError::UnknownScope("Pkg.inner".into()).to_string(),
            "Scope not found: Pkg.inner"
        );
    }
}
