//! Bootstrap of the package manager's own state
//!
//! Runs in three phases:
//! 1. [`Bootstrap::setup_schema`] brings index templates and the control
//!    index in line with the defaults source
//! 2. [`Bootstrap::prepare_global_package_data`] loads stored global
//!    variables and merges the declarative defaults into a working copy
//! 3. [`Bootstrap::load_global_package_data`] writes the difference back
//!
//! Running all three again against the same store applies nothing.

use crate::cache::StateCache;
use crate::config::ManagerConfig;
use crate::error::BootstrapError;
use crate::global::GlobalLoader;
use crate::repository::{DefaultsSource, VariableRepository};
use pkgmgr_scope::{correlate, ChangeSet, ScopeIndex, ScopeTree};
use pkgmgr_vars::{ErrorSink, Variable};
use std::sync::Arc;

/// Orchestrates schema setup and global variable synchronisation
pub struct Bootstrap {
    config: ManagerConfig,
    repository: Arc<dyn VariableRepository>,
    defaults: Arc<dyn DefaultsSource>,
    loader: GlobalLoader,
    errors: ErrorSink,
    state: Option<StateCache>,
}

impl Bootstrap {
    /// Create a bootstrap over the given collaborators
    #[must_use]
    pub fn new(
        config: ManagerConfig,
        repository: Arc<dyn VariableRepository>,
        defaults: Arc<dyn DefaultsSource>,
    ) -> Self {
        let loader = GlobalLoader::new(&config);
        Self {
            config,
            repository,
            defaults,
            loader,
            errors: ErrorSink::new(),
            state: None,
        }
    }

    /// Errors collected so far
    #[inline]
    #[must_use]
    pub fn errors(&self) -> &ErrorSink {
        &self.errors
    }

    /// Snapshot and working copy, once prepared
    #[inline]
    #[must_use]
    pub fn state(&self) -> Option<&StateCache> {
        self.state.as_ref()
    }

    /// Run every phase in order
    ///
    /// Returns the change set that was applied.
    ///
    /// # Errors
    /// Returns the first failing phase's error
    pub async fn run(&mut self) -> Result<ChangeSet, BootstrapError> {
        self.setup_schema().await?;
        self.prepare_global_package_data().await?;
        self.load_global_package_data().await
    }

    /// Create desired templates, delete stale ones, create the control index
    ///
    /// Existing indexes are never deleted.
    ///
    /// # Errors
    /// Returns [`BootstrapError::Repository`] when a store call fails
    pub async fn setup_schema(&self) -> Result<(), BootstrapError> {
        let pattern = self.config.index_pattern();
        tracing::info!(pattern = %pattern, "setting up schema");

        let desired = self.defaults.load_templates();
        let existing = self.repository.index_templates(&pattern).await?;
        let stale: Vec<String> = correlate(&desired, Some(&existing))
            .orphaned
            .iter()
            .map(|entry| entry.key.clone())
            .collect();

        if !desired.is_empty() {
            self.repository.create_index_templates(&desired).await?;
        }
        if !stale.is_empty() {
            tracing::info!(templates = ?stale, "deleting stale templates");
            self.repository.delete_index_templates(&stale).await?;
        }

        let control = self.config.control_index();
        let indexes = self.repository.indexes(&pattern).await?;
        if indexes.iter().any(|name| name.starts_with(&control)) {
            tracing::debug!(index = %control, "control index exists");
        } else {
            tracing::info!(index = %control, "creating control index");
            self.repository.create_index(&control).await?;
        }

        tracing::info!(
            templates = desired.len(),
            deleted = stale.len(),
            "schema ready"
        );
        Ok(())
    }

    /// Load stored global variables and merge the declarative defaults
    ///
    /// The stored variables become the snapshot; the defaults only touch the
    /// working copy. An empty store yields an empty identity scope.
    ///
    /// # Errors
    /// Returns [`BootstrapError::Repository`] when fetching fails and
    /// [`BootstrapError::Loader`] for a malformed defaults document
    pub async fn prepare_global_package_data(&mut self) -> Result<(), BootstrapError> {
        let identity = self.config.identity();
        tracing::info!(identity = %identity, "preparing global package data");

        let mut stored = self.repository.variables_by_package_prefix(&identity).await?;
        stored.retain(|variable| belongs_to(variable, &identity));

        let mut tree = ScopeTree::new();
        let root = tree.create_scope(identity.clone(), None);
        let index = ScopeIndex::from_tree(&tree, root);
        let count = stored.len();
        self.loader
            .load_from_storage(&mut tree, stored, &mut self.errors, Some(index))?;

        let mut state = StateCache::new(tree, root);
        let document = self.defaults.load_global_defaults();
        let (current, current_root) = state.current_mut();
        let existing = ScopeIndex::from_tree(current, current_root);
        self.loader
            .merge_defaults(current, &document, &mut self.errors, existing)?;

        tracing::info!(
            identity = %identity,
            stored = count,
            errors = self.errors.len(),
            "prepared global package data"
        );
        self.state = Some(state);
        Ok(())
    }

    /// Apply the difference between snapshot and working copy
    ///
    /// On success the working copy becomes the new snapshot and the applied
    /// change set is returned.
    ///
    /// # Errors
    /// - [`BootstrapError::NotPrepared`] before
    ///   [`Bootstrap::prepare_global_package_data`]
    /// - [`BootstrapError::PendingErrors`] while errors are collected
    /// - [`BootstrapError::Repository`] or [`BootstrapError::ApplyRejected`]
    ///   when the store does not apply the change set
    pub async fn load_global_package_data(&mut self) -> Result<ChangeSet, BootstrapError> {
        let Some(state) = self.state.as_mut() else {
            return Err(BootstrapError::NotPrepared);
        };

        let changes = state.record_changes();
        if !self.errors.is_empty() {
            tracing::error!(errors = self.errors.len(), "refusing to apply global package data");
            return Err(BootstrapError::PendingErrors {
                count: self.errors.len(),
                messages: self.errors.to_string(),
            });
        }

        tracing::info!(operations = changes.len(), "applying global package data");
        if !self.repository.apply_change_set(&changes).await? {
            tracing::error!(operations = changes.len(), "change set rejected");
            return Err(BootstrapError::ApplyRejected);
        }
        state.commit();
        Ok(changes)
    }
}

impl std::fmt::Debug for Bootstrap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bootstrap")
            .field("config", &self.config)
            .field("errors", &self.errors)
            .field("prepared", &self.state.is_some())
            .finish_non_exhaustive()
    }
}

/// `PackageManager.v1` and its nested scopes, but not `PackageManager.v10`
fn belongs_to(variable: &Variable, identity: &str) -> bool {
    variable
        .package_id
        .strip_prefix(identity)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_membership() {
        let identity = "PackageManager.v1";
        assert!(belongs_to(&Variable::new("PackageManager.v1", "a"), identity));
        assert!(belongs_to(&Variable::new("PackageManager.v1.ts", "a"), identity));
        assert!(!belongs_to(&Variable::new("PackageManager.v10", "a"), identity));
        assert!(!belongs_to(&Variable::new("Other", "a"), identity));
    }
}
