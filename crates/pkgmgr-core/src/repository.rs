//! Store collaborators
//!
//! The package manager never talks to a document store directly; it goes
//! through [`VariableRepository`]. Declarative defaults and the desired
//! index templates come from a [`DefaultsSource`].

use crate::error::RepositoryError;
use crate::model::TemplateMapping;
use indexmap::IndexMap;
use pkgmgr_scope::ChangeSet;
use pkgmgr_vars::Variable;

/// Variable and schema storage
#[async_trait::async_trait]
pub trait VariableRepository: Send + Sync {
    /// Every stored variable whose package id starts with `prefix`
    async fn variables_by_package_prefix(
        &self,
        prefix: &str,
    ) -> Result<Vec<Variable>, RepositoryError>;

    /// Apply persist and delete operations in order
    ///
    /// Returns `Ok(false)` when the store refused the change set.
    async fn apply_change_set(&self, changes: &ChangeSet) -> Result<bool, RepositoryError>;

    /// Templates whose name matches `pattern`
    async fn index_templates(
        &self,
        pattern: &str,
    ) -> Result<IndexMap<String, TemplateMapping>, RepositoryError>;

    /// Create or replace templates
    async fn create_index_templates(
        &self,
        templates: &IndexMap<String, TemplateMapping>,
    ) -> Result<(), RepositoryError>;

    /// Delete templates by name
    async fn delete_index_templates(&self, names: &[String]) -> Result<(), RepositoryError>;

    /// Names of indexes matching `pattern`
    async fn indexes(&self, pattern: &str) -> Result<Vec<String>, RepositoryError>;

    /// Create an index
    async fn create_index(&self, name: &str) -> Result<(), RepositoryError>;
}

/// Source of declarative defaults
pub trait DefaultsSource: Send + Sync {
    /// Nested `variables`/`scoped` document, YAML or JSON
    fn load_global_defaults(&self) -> String;

    /// Templates the store should carry
    fn load_templates(&self) -> IndexMap<String, TemplateMapping>;
}
