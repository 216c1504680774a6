//! Package manager configuration
//!
//! [`ManagerConfig`] carries the well-known identities the manager works
//! under. Every field has a default, so an empty document is valid.

use crate::error::ConfigError;
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Package manager configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// Name of the package manager
    pub package_manager: String,
    /// Version suffix appended to the name (`v<version>`)
    pub current_version: String,
    /// Package id reserved for global variables
    pub global_package_id: String,
    /// Seconds between deriving a job and its first execution
    pub job_start_delay_secs: u32,
    /// Suffix of the index holding variables
    pub control_suffix: String,
}

impl ManagerConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a YAML (or JSON) document; missing fields take their defaults
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed documents
    pub fn from_yaml_str(document: &str) -> Result<Self, ConfigError> {
        if document.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(document)?)
    }

    /// With package manager name
    #[inline]
    #[must_use]
    pub fn with_package_manager(mut self, name: impl Into<String>) -> Self {
        self.package_manager = name.into();
        self
    }

    /// With current version
    #[inline]
    #[must_use]
    pub fn with_current_version(mut self, version: impl Into<String>) -> Self {
        self.current_version = version.into();
        self
    }

    /// With reserved global package id
    #[inline]
    #[must_use]
    pub fn with_global_package_id(mut self, id: impl Into<String>) -> Self {
        self.global_package_id = id.into();
        self
    }

    /// With job start delay
    #[inline]
    #[must_use]
    pub fn with_job_start_delay_secs(mut self, secs: u32) -> Self {
        self.job_start_delay_secs = secs;
        self
    }

    /// Identity owning global defaults, e.g. `PackageManager.v1`
    #[must_use]
    pub fn identity(&self) -> String {
        format!("{}.v{}", self.package_manager, self.current_version)
    }

    /// Index holding variables, e.g. `PackageManager.v1.Control`
    #[must_use]
    pub fn control_index(&self) -> String {
        format!("{}.{}", self.identity(), self.control_suffix)
    }

    /// Pattern matching every index and template the manager owns
    #[must_use]
    pub fn index_pattern(&self) -> String {
        format!("{}.*", self.package_manager)
    }

    /// Delay before a derived job first runs
    #[must_use]
    pub fn job_start_delay(&self) -> Duration {
        Duration::seconds(i64::from(self.job_start_delay_secs))
    }
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            package_manager: "PackageManager".to_string(),
            current_version: "1".to_string(),
            global_package_id: "Global.v1".to_string(),
            job_start_delay_secs: 20,
            control_suffix: "Control".to_string(),
        }
    }
}
