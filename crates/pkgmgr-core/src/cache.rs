//! Original and working state
//!
//! [`StateCache`] keeps the tree as last persisted next to a working copy.
//! Recording changes correlates the two trees scope by scope (by name) and
//! aspect by aspect (by type); whatever disappeared is removed.

use pkgmgr_scope::{correlate, ChangeSet, ScopeId, ScopeTree};

/// Persisted snapshot plus working copy
#[derive(Debug)]
pub struct StateCache {
    original: ScopeTree,
    original_root: ScopeId,
    current: ScopeTree,
    current_root: ScopeId,
}

impl StateCache {
    /// Cache whose snapshot is `tree`, rooted at `root`
    #[must_use]
    pub fn new(tree: ScopeTree, root: ScopeId) -> Self {
        let (current, current_root) = tree.clone_from_root(root);
        Self {
            original: tree,
            original_root: root,
            current,
            current_root,
        }
    }

    /// Replace the snapshot and reset the working copy to a clone of it
    pub fn set_original_state(&mut self, tree: ScopeTree, root: ScopeId) {
        *self = Self::new(tree, root);
    }

    /// Snapshot tree and its root
    #[inline]
    #[must_use]
    pub fn original(&self) -> (&ScopeTree, ScopeId) {
        (&self.original, self.original_root)
    }

    /// Working tree and its root
    #[inline]
    #[must_use]
    pub fn current(&self) -> (&ScopeTree, ScopeId) {
        (&self.current, self.current_root)
    }

    /// Mutable working tree and its root
    #[inline]
    pub fn current_mut(&mut self) -> (&mut ScopeTree, ScopeId) {
        (&mut self.current, self.current_root)
    }

    /// Operations turning the snapshot into the working copy
    #[must_use]
    pub fn record_changes(&self) -> ChangeSet {
        let original = self.original.to_dictionary(self.original_root);
        let current = self.current.to_dictionary(self.current_root);
        let correlation = correlate(&current, Some(&original));

        let mut changes = ChangeSet::new();
        for entry in &correlation.matched {
            let before = changes.len();
            self.record_scope_changes(*entry.item, entry.paired_with.copied(), &mut changes);
            tracing::debug!(
                scope = %entry.key,
                operations = changes.len() - before,
                "recorded scope changes"
            );
        }

        for orphan in &correlation.orphaned {
            tracing::debug!(scope = %orphan.key, "scope removed");
            for aspect in self.original.aspects(*orphan.item).as_map().values() {
                aspect.remove_all(&mut changes);
            }
        }
        changes
    }

    fn record_scope_changes(
        &self,
        current: ScopeId,
        original: Option<ScopeId>,
        changes: &mut ChangeSet,
    ) {
        let aspects = self.current.aspects(current).as_map();
        let prior = original.map(|id| self.original.aspects(id).as_map());
        let correlation = correlate(aspects, prior);

        for entry in &correlation.matched {
            let paired = entry.paired_with.map(|aspect| &**aspect);
            entry.item.record_changes(paired, changes);
        }
        for orphan in &correlation.orphaned {
            orphan.item.remove_all(changes);
        }
    }

    /// Adopt the working copy as the new snapshot
    ///
    /// Call once the recorded changes have been applied.
    pub fn commit(&mut self) {
        self.original = self.current.clone();
        self.original_root = self.current_root;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkgmgr_scope::{ChangeOp, VariableSet};
    use pkgmgr_vars::Variable;
    use pretty_assertions::assert_eq;

    fn empty_root() -> StateCache {
        let mut tree = ScopeTree::new();
        let root = tree.create_scope("Pkg", None);
        StateCache::new(tree, root)
    }

    #[test]
    fn persist_then_delete() {
        let mut cache = empty_root();
        let (tree, root) = cache.current_mut();
        tree.store_variable(root, Variable::new("Pkg", "x").with_value("1"));

        let changes = cache.record_changes();
        assert_eq!(
            changes.ops(),
            &[ChangeOp::Persist(Variable::new("Pkg", "x").with_value("1"))]
        );

        cache.commit();
        let (tree, root) = cache.current_mut();
        tree.get_aspect::<VariableSet>(root).remove("x");

        let changes = cache.record_changes();
        assert_eq!(changes.persisted().count(), 0);
        assert_eq!(changes.deleted_ids().collect::<Vec<_>>(), vec!["Pkg::x"]);
    }

    #[test]
    fn identical_clone_has_no_changes() {
        let mut tree = ScopeTree::new();
        let root = tree.create_scope("Pkg", None);
        let inner = tree.create_scope("Pkg.inner", Some(root));
        tree.store_variable(root, Variable::new("Pkg", "a").with_value("1"));
        tree.store_variable(inner, Variable::new("Pkg.inner", "b").with_default("2"));

        let cache = StateCache::new(tree, root);

        assert!(cache.record_changes().is_empty());
    }

    #[test]
    fn changed_variable_persisted() {
        let mut tree = ScopeTree::new();
        let root = tree.create_scope("Pkg", None);
        tree.store_variable(root, Variable::new("Pkg", "a").with_value("1"));
        let mut cache = StateCache::new(tree, root);

        let (tree, root) = cache.current_mut();
        tree.try_find_variable_mut(root, "Pkg::a").unwrap().value = Some("2".into());

        let changes = cache.record_changes();
        let persisted: Vec<_> = changes.persisted().collect();
        assert_eq!(persisted.len(), 1);
        assert_eq!(persisted[0].value.as_deref(), Some("2"));
        // snapshot untouched
        let (original, root) = cache.original();
        assert_eq!(
            original.try_find_variable(root, "Pkg::a").unwrap().value.as_deref(),
            Some("1")
        );
    }

    #[test]
    fn new_scope_persists_everything() {
        let mut cache = empty_root();
        let (tree, root) = cache.current_mut();
        let child = tree.create_scope("Pkg.child", Some(root));
        tree.store_variable(child, Variable::new("Pkg.child", "a"));
        tree.store_variable(child, Variable::new("Pkg.child", "b"));

        assert_eq!(cache.record_changes().persisted().count(), 2);
    }

    #[test]
    fn removed_scope_deletes_everything() {
        let mut tree = ScopeTree::new();
        let root = tree.create_scope("Pkg", None);
        let child = tree.create_scope("Pkg.child", Some(root));
        tree.store_variable(child, Variable::new("Pkg.child", "a"));
        tree.store_variable(child, Variable::new("Pkg.child", "b"));
        let mut cache = StateCache::new(tree, root);

        let (tree, root) = cache.current_mut();
        let child = tree.children(root)[0];
        tree.detach(child);

        let changes = cache.record_changes();
        assert_eq!(
            changes.deleted_ids().collect::<Vec<_>>(),
            vec!["Pkg.child::a", "Pkg.child::b"]
        );
        assert_eq!(changes.persisted().count(), 0);
    }

    #[test]
    fn set_original_state_resets_working_copy() {
        let mut cache = empty_root();
        let (tree, root) = cache.current_mut();
        tree.store_variable(root, Variable::new("Pkg", "x"));

        let mut fresh = ScopeTree::new();
        let fresh_root = fresh.create_scope("Pkg", None);
        cache.set_original_state(fresh, fresh_root);

        assert!(cache.record_changes().is_empty());
    }
}
