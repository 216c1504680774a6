//! Variables declared at a scope
//!
//! [`VariableSet`] is the aspect that stores variables. The lookups on
//! [`ScopeTree`] in this module search the scope itself first and then each
//! enclosing scope, so an inner declaration shadows an outer one.

use crate::aspect::Aspect;
use crate::changes::ChangeSet;
use crate::correlate::correlate;
use crate::error::ScopeError;
use crate::tree::{ScopeId, ScopeTree};
use indexmap::IndexMap;
use pkgmgr_vars::{ErrorSink, Variable, VariableInfo, VariableRef};
use std::any::Any;

/// Variables declared at one scope
///
/// Owned by full name (`package::name`); a second index maps each local
/// name to the full name most recently stored under it.
#[derive(Debug, Clone, Default)]
pub struct VariableSet {
    scope: Option<ScopeId>,
    by_full_name: IndexMap<String, Variable>,
    by_local_name: IndexMap<String, String>,
}

impl VariableSet {
    /// Create empty set
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a variable; an empty id is filled from the full name
    pub fn store(&mut self, mut variable: Variable) {
        variable.ensure_id();
        let full_name = variable.full_name();
        self.by_local_name
            .insert(variable.name.clone(), full_name.clone());
        self.by_full_name.insert(full_name, variable);
    }

    /// Remove the variable known locally as `name`
    pub fn remove(&mut self, name: &str) -> Option<Variable> {
        let full_name = self.by_local_name.shift_remove(name)?;
        self.by_full_name.shift_remove(&full_name)
    }

    /// Variable under its full name
    #[must_use]
    pub fn get(&self, full_name: &str) -> Option<&Variable> {
        self.by_full_name.get(full_name)
    }

    /// Mutable variable under its full name
    pub fn get_mut(&mut self, full_name: &str) -> Option<&mut Variable> {
        self.by_full_name.get_mut(full_name)
    }

    /// Variable under its local name
    #[must_use]
    pub fn by_local(&self, name: &str) -> Option<&Variable> {
        self.by_local_name
            .get(name)
            .and_then(|full_name| self.by_full_name.get(full_name))
    }

    /// True when a variable is stored under `full_name`
    #[must_use]
    pub fn contains(&self, full_name: &str) -> bool {
        self.by_full_name.contains_key(full_name)
    }

    /// Number of locally named variables
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_local_name.len()
    }

    /// True when no variable is stored
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_local_name.is_empty()
    }

    /// Variables by local name, in store order
    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.by_local_name
            .values()
            .filter_map(|full_name| self.by_full_name.get(full_name))
    }

    fn local_view(&self) -> IndexMap<&str, &Variable> {
        self.by_local_name
            .iter()
            .filter_map(|(local, full_name)| {
                self.by_full_name
                    .get(full_name)
                    .map(|variable| (local.as_str(), variable))
            })
            .collect()
    }
}

impl Aspect for VariableSet {
    fn scope(&self) -> Option<ScopeId> {
        self.scope
    }

    fn attach(&mut self, scope: ScopeId) {
        self.scope = Some(scope);
    }

    fn clone_aspect(&self) -> Box<dyn Aspect> {
        Box::new(self.clone())
    }

    fn record_changes(&self, prior: Option<&dyn Aspect>, changes: &mut ChangeSet) {
        let current = self.local_view();
        let prior_view = prior
            .and_then(|aspect| aspect.as_any().downcast_ref::<VariableSet>())
            .map(VariableSet::local_view);

        let correlation = correlate(&current, prior_view.as_ref());
        for entry in &correlation.matched {
            let before = entry.paired_with.copied();
            if entry.item.is_changed(before) {
                changes.persist((*entry.item).clone());
            }
        }
        for orphan in &correlation.orphaned {
            changes.delete(orphan.item.id.clone());
        }
    }

    fn remove_all(&self, changes: &mut ChangeSet) {
        for variable in self.iter() {
            changes.delete(variable.id.clone());
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl ScopeTree {
    /// Store a variable in the scope's own [`VariableSet`]
    pub fn store_variable(&mut self, scope: ScopeId, variable: Variable) {
        self.get_aspect::<VariableSet>(scope).store(variable);
    }

    /// Innermost variable stored under `full_name`, searching outward
    #[must_use]
    pub fn try_find_variable(&self, scope: ScopeId, full_name: &str) -> Option<&Variable> {
        self.ancestors(scope).find_map(|id| {
            self.aspect::<VariableSet>(id)
                .and_then(|set| set.get(full_name))
        })
    }

    /// Innermost variable addressed by `var_ref`, searching outward
    #[must_use]
    pub fn try_find_ref(&self, scope: ScopeId, var_ref: &VariableRef) -> Option<&Variable> {
        self.try_find_variable(scope, &var_ref.to_full_name())
    }

    /// Mutable access to the innermost variable stored under `full_name`
    pub fn try_find_variable_mut(
        &mut self,
        scope: ScopeId,
        full_name: &str,
    ) -> Option<&mut Variable> {
        let holder = self.ancestors(scope).find(|id| {
            self.aspect::<VariableSet>(*id)
                .is_some_and(|set| set.contains(full_name))
        })?;
        self.aspect_mut::<VariableSet>(holder)?.get_mut(full_name)
    }

    /// Innermost variable stored under `full_name`
    ///
    /// # Errors
    /// Returns [`ScopeError::VariableNotFound`] when no enclosing scope has it
    pub fn find_variable(&self, scope: ScopeId, full_name: &str) -> Result<&Variable, ScopeError> {
        self.try_find_variable(scope, full_name)
            .ok_or_else(|| ScopeError::VariableNotFound(full_name.to_string()))
    }

    /// Typed view of the innermost variable with local name `name`
    ///
    /// Misses and parse problems go to `errors`.
    pub fn first_var_of_name(
        &self,
        scope: ScopeId,
        name: &str,
        errors: &mut ErrorSink,
    ) -> Option<VariableInfo> {
        let found = self.ancestors(scope).find_map(|id| {
            self.aspect::<VariableSet>(id)
                .and_then(|set| set.by_local(name))
        });
        match found {
            Some(variable) => Some(VariableInfo::extract(variable, &variable.package_id, errors)),
            None => {
                errors.add_error(format!(
                    "Could not find a variable called {name} in any enclosing scope"
                ));
                None
            }
        }
    }

    /// Variables of a scope, and optionally of its whole subtree
    #[must_use]
    pub fn variables(&self, scope: ScopeId, recurse: bool) -> Vec<&Variable> {
        let own = |id: ScopeId| {
            self.aspect::<VariableSet>(id)
                .into_iter()
                .flat_map(VariableSet::iter)
        };
        if recurse {
            self.flatten(scope).flat_map(own).collect()
        } else {
            own(scope).collect()
        }
    }
}
