//! Package Manager Core
//!
//! Resolves dataset settings against the scope tree, validates and loads
//! packages, and keeps the variable store in step with declarative
//! defaults:
//! - Setting resolution with constant / reference / global-default
//!   precedence, and maintenance job derivation
//! - Package validation and loading
//! - Global defaults loading and merging
//! - Snapshot diffing into persist/delete change sets
//! - Bootstrap orchestration against a [`VariableRepository`]
//!
//! # Example
//!
//! ```rust
//! use pkgmgr_core::{ManagerConfig, SettingResolver};
//! use pkgmgr_scope::ScopeTree;
//! use pkgmgr_vars::{ErrorSink, Variable};
//!
//! let config = ManagerConfig::default();
//! let mut tree = ScopeTree::new();
//! let global = tree.create_scope(config.identity(), None);
//! tree.store_variable(
//!     global,
//!     Variable::new(config.identity(), "retention-period")
//!         .with_type("integer")
//!         .with_units("days")
//!         .with_default("30"),
//! );
//! let scope = tree.create_scope("Acme", Some(global));
//!
//! let mut errors = ErrorSink::new();
//! let mut resolver = SettingResolver::new(&mut tree, scope, "Acme", &config, &mut errors);
//! let info = resolver.lookup_global_default_setting("retention-period");
//! assert_eq!(info.and_then(|i| i.integer_or_default().ok()), Some(30));
//! ```

#![warn(unreachable_pub)]
#![warn(missing_docs)]

pub mod bootstrap;
pub mod cache;
pub mod config;
pub mod error;
pub mod global;
pub mod jobs;
pub mod loader;
pub mod model;
pub mod repository;
pub mod resolver;
pub mod script;
pub mod timeseries;

pub use bootstrap::Bootstrap;
pub use cache::StateCache;
pub use config::ManagerConfig;
pub use error::{BootstrapError, ConfigError, LoaderError, RepositoryError};
pub use global::GlobalLoader;
pub use jobs::{JobBase, ScheduledJob};
pub use loader::{check_for_duplicate_names, PackageLoader};
pub use model::{
    setting_names, DataSet, ManagementInfo, Package, PartitionGrain, TemplateInfo,
    TemplateMapping,
};
pub use repository::{DefaultsSource, VariableRepository};
pub use resolver::SettingResolver;
pub use script::substitute_variables;
pub use timeseries::{resolve_settings, settings_for_lifestage, Lifestage, TemplateSetting};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
