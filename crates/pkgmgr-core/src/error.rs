//! Error types for the package manager core
//!
//! Fatal errors only. Problems found while resolving or loading are
//! collected in an [`pkgmgr_vars::ErrorSink`] instead.

use pkgmgr_scope::ScopeError;
use pkgmgr_vars::VariableError;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Document could not be parsed
    #[error("invalid configuration document: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Package and defaults loading errors
#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    /// The loader is bound to a different package
    #[error("loader already validated package '{existing}', cannot validate '{requested}'")]
    AlreadyValidated {
        /// Package validated first
        existing: String,
        /// Package passed now
        requested: String,
    },

    /// Defaults document could not be parsed
    #[error("malformed defaults document: {0}")]
    MalformedDefaults(#[from] serde_yaml::Error),

    /// Scope lookup failed
    #[error("scope error: {0}")]
    Scope(#[from] ScopeError),

    /// Variable data was malformed
    #[error("variable error: {0}")]
    Variable(#[from] VariableError),
}

/// Errors reported by a repository implementation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    /// Backing store could not be reached
    #[error("repository unavailable: {0}")]
    Unavailable(String),

    /// A request was refused
    #[error("repository request failed: {0}")]
    RequestFailed(String),
}

/// Bootstrap errors
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    /// Repository call failed
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Loading global data failed
    #[error("loader error: {0}")]
    Loader(#[from] LoaderError),

    /// Collected errors must be fixed before anything is applied
    #[error("{count} unresolved error(s): {messages}")]
    PendingErrors {
        /// Number of collected errors
        count: usize,
        /// Collected messages joined with `; `
        messages: String,
    },

    /// The repository did not apply the change set
    #[error("repository rejected the change set")]
    ApplyRejected,

    /// Global data was loaded before being prepared
    #[error("global package data has not been prepared")]
    NotPrepared,
}
