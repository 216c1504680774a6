//! Testing utilities for the package manager workspace
//!
//! In-memory collaborators and fixtures shared by the integration tests.

#![allow(missing_docs)]

use indexmap::IndexMap;
use parking_lot::Mutex;
use pkgmgr_core::{DefaultsSource, RepositoryError, TemplateMapping, VariableRepository};
use pkgmgr_scope::{ChangeOp, ChangeSet, ScopeId, ScopeTree};
use pkgmgr_vars::Variable;
use std::sync::atomic::{AtomicBool, Ordering};

/// Defaults document with root and nested scope variables
pub const SAMPLE_DEFAULTS: &str = r"
variables:
  number_of_shards: 3
  number_of_replicas: 2
scoped:
  timeseries:
    variables:
      number_of_replicas: 1
      refresh_interval: 60s
  unmanaged:
    variables:
      number_of_replicas: 3
";

#[derive(Debug, Default)]
struct StoreState {
    variables: IndexMap<String, Variable>,
    templates: IndexMap<String, TemplateMapping>,
    indexes: Vec<String>,
    applied: Vec<ChangeSet>,
}

/// Store kept in memory
///
/// Patterns ending in `*` match by prefix, anything else matches exactly.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    state: Mutex<StoreState>,
    reject_changes: AtomicBool,
    unavailable: AtomicBool,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_variables(self, variables: impl IntoIterator<Item = Variable>) -> Self {
        {
            let mut state = self.state.lock();
            for mut variable in variables {
                variable.ensure_id();
                state.variables.insert(variable.id.clone(), variable);
            }
        }
        self
    }

    pub fn with_template(self, name: &str, template: TemplateMapping) -> Self {
        self.state.lock().templates.insert(name.to_string(), template);
        self
    }

    pub fn with_index(self, name: &str) -> Self {
        self.state.lock().indexes.push(name.to_string());
        self
    }

    /// Make every later apply report failure
    pub fn set_reject_changes(&self, reject: bool) {
        self.reject_changes.store(reject, Ordering::SeqCst);
    }

    /// Make every later call fail
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn variables(&self) -> Vec<Variable> {
        self.state.lock().variables.values().cloned().collect()
    }

    pub fn variable(&self, id: &str) -> Option<Variable> {
        self.state.lock().variables.get(id).cloned()
    }

    pub fn template_names(&self) -> Vec<String> {
        self.state.lock().templates.keys().cloned().collect()
    }

    pub fn index_names(&self) -> Vec<String> {
        self.state.lock().indexes.clone()
    }

    /// Change sets applied so far, rejected ones excluded
    pub fn applied(&self) -> Vec<ChangeSet> {
        self.state.lock().applied.clone()
    }

    fn check_available(&self) -> Result<(), RepositoryError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable("in-memory store switched off".into()));
        }
        Ok(())
    }
}

fn glob_matches(pattern: &str, name: &str) -> bool {
    match pattern.strip_suffix('*') {
        Some(prefix) => name.starts_with(prefix),
        None => name == pattern,
    }
}

#[async_trait::async_trait]
impl VariableRepository for InMemoryRepository {
    async fn variables_by_package_prefix(
        &self,
        prefix: &str,
    ) -> Result<Vec<Variable>, RepositoryError> {
        self.check_available()?;
        Ok(self
            .state
            .lock()
            .variables
            .values()
            .filter(|variable| variable.package_id.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn apply_change_set(&self, changes: &ChangeSet) -> Result<bool, RepositoryError> {
        self.check_available()?;
        if self.reject_changes.load(Ordering::SeqCst) {
            return Ok(false);
        }

        let mut state = self.state.lock();
        for op in changes {
            match op {
                ChangeOp::Persist(variable) => {
                    state.variables.insert(variable.id.clone(), variable.clone());
                }
                ChangeOp::Delete { id } => {
                    state.variables.shift_remove(id);
                }
            }
        }
        state.applied.push(changes.clone());
        Ok(true)
    }

    async fn index_templates(
        &self,
        pattern: &str,
    ) -> Result<IndexMap<String, TemplateMapping>, RepositoryError> {
        self.check_available()?;
        Ok(self
            .state
            .lock()
            .templates
            .iter()
            .filter(|(name, _)| glob_matches(pattern, name))
            .map(|(name, template)| (name.clone(), template.clone()))
            .collect())
    }

    async fn create_index_templates(
        &self,
        templates: &IndexMap<String, TemplateMapping>,
    ) -> Result<(), RepositoryError> {
        self.check_available()?;
        let mut state = self.state.lock();
        for (name, template) in templates {
            state.templates.insert(name.clone(), template.clone());
        }
        Ok(())
    }

    async fn delete_index_templates(&self, names: &[String]) -> Result<(), RepositoryError> {
        self.check_available()?;
        let mut state = self.state.lock();
        for name in names {
            state.templates.shift_remove(name);
        }
        Ok(())
    }

    async fn indexes(&self, pattern: &str) -> Result<Vec<String>, RepositoryError> {
        self.check_available()?;
        Ok(self
            .state
            .lock()
            .indexes
            .iter()
            .filter(|name| glob_matches(pattern, name))
            .cloned()
            .collect())
    }

    async fn create_index(&self, name: &str) -> Result<(), RepositoryError> {
        self.check_available()?;
        let mut state = self.state.lock();
        if state.indexes.iter().any(|existing| existing == name) {
            return Err(RepositoryError::RequestFailed(format!("index '{name}' already exists")));
        }
        state.indexes.push(name.to_string());
        Ok(())
    }
}

/// Defaults held in memory
#[derive(Debug, Clone, Default)]
pub struct StaticDefaults {
    document: String,
    templates: IndexMap<String, TemplateMapping>,
}

impl StaticDefaults {
    pub fn new(document: impl Into<String>) -> Self {
        Self {
            document: document.into(),
            templates: IndexMap::new(),
        }
    }

    pub fn with_template(mut self, name: &str, template: TemplateMapping) -> Self {
        self.templates.insert(name.to_string(), template);
        self
    }
}

impl DefaultsSource for StaticDefaults {
    fn load_global_defaults(&self) -> String {
        self.document.clone()
    }

    fn load_templates(&self) -> IndexMap<String, TemplateMapping> {
        self.templates.clone()
    }
}

/// Integer variable with value and default
pub fn sample_variable(package_id: &str, name: &str, value: i64) -> Variable {
    Variable::new(package_id, name)
        .with_type("integer")
        .with_units("none")
        .with_value(value.to_string())
        .with_default(value.to_string())
}

/// Template for daily indexes under `prefix`
pub fn sample_template(prefix: &str, shards: i64) -> TemplateMapping {
    TemplateMapping::new(format!("{prefix}-*"))
        .with_setting("number_of_shards", serde_json::json!(shards))
}

/// Chain of `depth` nested scopes named `S`, `S.1`, `S.1.2`, ...
///
/// Returns the tree and the ids from outermost to innermost.
pub fn nested_scopes(depth: usize) -> (ScopeTree, Vec<ScopeId>) {
    let mut tree = ScopeTree::new();
    let mut ids = Vec::with_capacity(depth);
    let mut name = String::from("S");
    for level in 0..depth {
        if level > 0 {
            name.push_str(&format!(".{level}"));
        }
        let id = tree.create_scope(name.clone(), ids.last().copied());
        ids.push(id);
    }
    (tree, ids)
}
