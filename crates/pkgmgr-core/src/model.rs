//! Package and dataset definitions
//!
//! What a package declares: its variables and the datasets it stores,
//! each dataset carrying index template details and management settings.

use indexmap::IndexMap;
use pkgmgr_vars::{SchemaVersion, SettingValue, Variable};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Well-known setting and variable names
pub mod setting_names {
    /// Age after which an index is treated as read-only
    pub const ACTIVE_AGE: &str = "active-age";
    /// How long data is kept
    pub const RETENTION_PERIOD: &str = "retention-period";
    /// Where expired data goes
    pub const ARCHIVE_TO: &str = "archive-to";
    /// Primary shard count
    pub const NUMBER_OF_SHARDS: &str = "number_of_shards";
    /// Replica count
    pub const NUMBER_OF_REPLICAS: &str = "number_of_replicas";
    /// Index refresh interval
    pub const REFRESH_INTERVAL: &str = "refresh_interval";
}

/// How a dataset's indexes are partitioned over time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PartitionGrain {
    /// Single index, no lifecycle management
    #[default]
    None,
    /// One index per day
    PerDay,
}

/// Index template details for a dataset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateInfo {
    /// Relative order of template application
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    /// Index settings
    #[serde(default)]
    pub settings: IndexMap<String, Value>,
    /// Aliases; the dataset name when empty
    #[serde(default)]
    pub aliases: IndexMap<String, Value>,
    /// Type mappings
    #[serde(default)]
    pub mappings: IndexMap<String, Value>,
}

/// Lifecycle settings for a dataset
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManagementInfo {
    /// Age until an index is read-only
    pub active_age: SettingValue,
    /// Age until data is removed
    pub retention_period: SettingValue,
    /// Archive destination
    pub archive_to: SettingValue,
}

/// A dataset declared by a package
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataSet {
    /// Schema version of the stored documents
    pub schema_version: SchemaVersion,
    /// Dataset name, unique within its package
    pub name: String,
    /// Free text description
    pub description: Option<String>,
    /// Index partitioning
    pub grain: PartitionGrain,
    /// Where the data can be queried
    pub query_uri: Option<String>,
    /// Index template details
    pub template: TemplateInfo,
    /// Lifecycle settings
    pub manage: ManagementInfo,
}

impl DataSet {
    /// Create dataset
    #[must_use]
    pub fn new(name: impl Into<String>, grain: PartitionGrain) -> Self {
        Self {
            name: name.into(),
            grain,
            ..Self::default()
        }
    }

    /// Builder: active age setting
    #[must_use]
    pub fn with_active_age(mut self, setting: impl Into<SettingValue>) -> Self {
        self.manage.active_age = setting.into();
        self
    }

    /// Builder: retention period setting
    #[must_use]
    pub fn with_retention_period(mut self, setting: impl Into<SettingValue>) -> Self {
        self.manage.retention_period = setting.into();
        self
    }

    /// Builder: explicit template setting
    #[must_use]
    pub fn with_template_setting(mut self, key: impl Into<String>, value: Value) -> Self {
        self.template.settings.insert(key.into(), value);
        self
    }
}

/// A package submitted for loading
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Package {
    /// Dotted package id, e.g. `Acme.Sales.v2`
    pub id: String,
    /// Free text description
    pub description: Option<String>,
    /// Version of the package itself
    pub package_version: u32,
    /// Manager version the package targets
    pub data_manager_version: u32,
    /// Declared variables
    pub variables: Vec<Variable>,
    /// Declared datasets
    pub data_sets: Vec<DataSet>,
}

impl Package {
    /// Create empty package
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Builder: add variable
    #[must_use]
    pub fn with_variable(mut self, variable: Variable) -> Self {
        self.variables.push(variable);
        self
    }

    /// Builder: add dataset
    #[must_use]
    pub fn with_data_set(mut self, data_set: DataSet) -> Self {
        self.data_sets.push(data_set);
        self
    }
}

/// Index template as held by the store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateMapping {
    /// Index name pattern the template applies to
    pub template: String,
    /// Relative order of template application
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    /// Index settings
    #[serde(default)]
    pub settings: IndexMap<String, Value>,
    /// Type mappings
    #[serde(default)]
    pub mappings: IndexMap<String, Value>,
    /// Aliases
    #[serde(default)]
    pub aliases: IndexMap<String, Value>,
}

impl TemplateMapping {
    /// Template for indexes matching `template`
    #[must_use]
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            ..Self::default()
        }
    }

    /// Builder: add an index setting
    #[must_use]
    pub fn with_setting(mut self, key: impl Into<String>, value: Value) -> Self {
        self.settings.insert(key.into(), value);
        self
    }
}
