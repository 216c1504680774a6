//! Scope hierarchy from dotted package identifiers
//!
//! `A.v1.Sub` nests under `A.v1`, which nests under `A`. Each scope is
//! named with its full dotted identifier.

use crate::error::ScopeError;
use crate::tree::{ScopeId, ScopeTree};
use indexmap::IndexMap;
use pkgmgr_vars::ErrorSink;
use std::collections::HashSet;

/// Case-insensitive name to scope map
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeIndex {
    scopes: IndexMap<String, ScopeId>,
}

impl ScopeIndex {
    /// Create empty index
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every scope in the subtree rooted at `root`
    #[must_use]
    pub fn from_tree(tree: &ScopeTree, root: ScopeId) -> Self {
        let mut index = Self::new();
        for (name, id) in tree.to_dictionary(root) {
            index.insert(&name, id);
        }
        index
    }

    /// Register `name`, replacing any scope registered under it
    pub fn insert(&mut self, name: &str, id: ScopeId) {
        self.scopes.insert(name.to_lowercase(), id);
    }

    /// Scope registered under `name`, ignoring case
    #[must_use]
    pub fn get(&self, name: &str) -> Option<ScopeId> {
        self.scopes.get(&name.to_lowercase()).copied()
    }

    /// Scope registered under `name`
    ///
    /// # Errors
    /// Returns [`ScopeError::UnknownScope`] when nothing is registered
    pub fn require(&self, name: &str) -> Result<ScopeId, ScopeError> {
        self.get(name)
            .ok_or_else(|| ScopeError::UnknownScope(name.to_string()))
    }

    /// True when `name` is registered, ignoring case
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.scopes.contains_key(&name.to_lowercase())
    }

    /// Number of registered names
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// True when nothing is registered
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Registered scopes in insertion order
    pub fn scopes(&self) -> impl Iterator<Item = ScopeId> + '_ {
        self.scopes.values().copied()
    }
}

/// Split `A.B.C` into parent `A.B` and local `C`
///
/// Names without a dot, or whose only dot is the first character, have no
/// parent.
#[must_use]
pub fn split_dotted(name: &str) -> (Option<&str>, &str) {
    match name.rfind('.') {
        Some(index) if index > 0 => (Some(&name[..index]), &name[index + 1..]),
        _ => (None, name),
    }
}

/// Create a scope for each dotted name, nested under its parent
///
/// Names already in `existing` are skipped, and duplicates are dropped
/// ignoring case. Shorter names are built first so parents exist before
/// their children. A name whose parent cannot be found becomes a root and
/// the problem goes to `errors`.
///
/// Returns the index extended with every created scope.
pub fn build_hierarchy<I, S>(
    tree: &mut ScopeTree,
    names: I,
    errors: &mut ErrorSink,
    existing: Option<ScopeIndex>,
) -> ScopeIndex
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut index = existing.unwrap_or_default();

    let mut seen = HashSet::new();
    let mut pending: Vec<String> = names
        .into_iter()
        .map(|name| name.as_ref().to_string())
        .filter(|name| seen.insert(name.to_lowercase()))
        .filter(|name| !index.contains(name))
        .collect();
    pending.sort_by_key(String::len);

    for name in pending {
        let parent = match split_dotted(&name).0 {
            Some(parent_name) => {
                let parent = index.get(parent_name);
                if parent.is_none() {
                    errors.add_error(format!(
                        "Could not locate parent '{parent_name}' when building hierarchy."
                    ));
                }
                parent
            }
            None => None,
        };
        let id = tree.create_scope(name.clone(), parent);
        index.insert(&name, id);
    }

    tracing::debug!(scopes = index.len(), "built scope hierarchy");
    index
}
