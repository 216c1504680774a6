//! Scope arena
//!
//! Scopes live in a single `Vec`, addressed by [`ScopeId`]. A scope owns
//! its children (listed in creation order) and refers to its parent by id,
//! so walking up or down never needs shared ownership.

use crate::aspect::{Aspect, AspectRegistry};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fmt;

/// Index of a scope inside its [`ScopeTree`]
///
/// Ids are only meaningful for the tree that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(usize);

impl ScopeId {
    /// Raw arena index
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scope#{}", self.0)
    }
}

#[derive(Debug)]
struct ScopeNode {
    name: String,
    parent: Option<ScopeId>,
    children: Vec<ScopeId>,
    aspects: AspectRegistry,
}

/// Forest of named scopes
///
/// Any scope without a parent is topmost. Several independent roots may
/// share one arena.
#[derive(Debug, Default)]
pub struct ScopeTree {
    nodes: Vec<ScopeNode>,
}

impl ScopeTree {
    /// Create empty tree
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scope, appending it to `parent`'s children if given
    pub fn create_scope(&mut self, name: impl Into<String>, parent: Option<ScopeId>) -> ScopeId {
        let id = ScopeId(self.nodes.len());
        self.nodes.push(ScopeNode {
            name: name.into(),
            parent,
            children: Vec::new(),
            aspects: AspectRegistry::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        tracing::trace!(scope = %self.nodes[id.0].name, ?parent, "created scope");
        id
    }

    /// Number of scopes in the arena (detached ones included)
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when no scope was ever created
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Scope name
    #[inline]
    #[must_use]
    pub fn name(&self, id: ScopeId) -> &str {
        &self.nodes[id.0].name
    }

    /// Enclosing scope
    #[inline]
    #[must_use]
    pub fn parent(&self, id: ScopeId) -> Option<ScopeId> {
        self.nodes[id.0].parent
    }

    /// Direct children in creation order
    #[inline]
    #[must_use]
    pub fn children(&self, id: ScopeId) -> &[ScopeId] {
        &self.nodes[id.0].children
    }

    /// True when the scope has no parent
    #[inline]
    #[must_use]
    pub fn is_topmost(&self, id: ScopeId) -> bool {
        self.nodes[id.0].parent.is_none()
    }

    /// Topmost ancestor (the scope itself when already topmost)
    #[must_use]
    pub fn root_of(&self, id: ScopeId) -> ScopeId {
        self.ancestors(id).last().unwrap_or(id)
    }

    /// The scope followed by each enclosing scope, innermost first
    #[must_use]
    pub fn ancestors(&self, id: ScopeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: Some(id),
        }
    }

    /// Lazy pre-order walk of the subtree rooted at `id`
    #[must_use]
    pub fn flatten(&self, id: ScopeId) -> Flatten<'_> {
        Flatten {
            tree: self,
            stack: vec![id],
        }
    }

    /// Name to scope over the subtree rooted at `id`
    ///
    /// Later scopes in pre-order win on duplicate names.
    #[must_use]
    pub fn to_dictionary(&self, id: ScopeId) -> IndexMap<String, ScopeId> {
        self.flatten(id)
            .map(|scope| (self.name(scope).to_string(), scope))
            .collect()
    }

    /// Unlink a scope from its parent, making it topmost
    ///
    /// The scope and its subtree stay in the arena.
    pub fn detach(&mut self, id: ScopeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|child| *child != id);
        }
    }

    /// Deep copy of the tree containing `id`, starting from its root
    ///
    /// Returns the new tree and the copy of `id` inside it. Aspects are
    /// cloned and re-attached to their new scopes.
    #[must_use]
    pub fn clone_from_root(&self, id: ScopeId) -> (ScopeTree, ScopeId) {
        let root = self.root_of(id);
        let mut copy = ScopeTree::new();
        let mut mapping: HashMap<ScopeId, ScopeId> = HashMap::new();

        for scope in self.flatten(root) {
            let parent = self.parent(scope).and_then(|p| mapping.get(&p).copied());
            let new_id = copy.create_scope(self.name(scope), parent);
            copy.nodes[new_id.0].aspects = self.nodes[scope.0].aspects.clone_for(new_id);
            mapping.insert(scope, new_id);
        }

        let mapped = mapping.get(&id).copied().unwrap_or(ScopeId(0));
        (copy, mapped)
    }

    /// Aspect registry of a scope
    #[inline]
    #[must_use]
    pub fn aspects(&self, id: ScopeId) -> &AspectRegistry {
        &self.nodes[id.0].aspects
    }

    /// Typed aspect, if attached
    #[must_use]
    pub fn aspect<T: Aspect>(&self, id: ScopeId) -> Option<&T> {
        self.nodes[id.0].aspects.get::<T>()
    }

    /// Mutable typed aspect, if attached
    pub fn aspect_mut<T: Aspect>(&mut self, id: ScopeId) -> Option<&mut T> {
        self.nodes[id.0].aspects.get_mut::<T>()
    }

    /// Typed aspect, created from `T::default()` on first request
    pub fn get_aspect<T: Aspect + Default>(&mut self, id: ScopeId) -> &mut T {
        self.nodes[id.0].aspects.get_or_default::<T>(id)
    }

    /// Attach an aspect, replacing any existing one of the same type
    pub fn set_aspect<T: Aspect>(&mut self, id: ScopeId, aspect: T) -> &mut T {
        self.nodes[id.0].aspects.set(id, aspect)
    }
}

impl Clone for ScopeTree {
    /// Copy of the whole arena; ids stay valid in the copy
    fn clone(&self) -> Self {
        let nodes = self
            .nodes
            .iter()
            .enumerate()
            .map(|(index, node)| ScopeNode {
                name: node.name.clone(),
                parent: node.parent,
                children: node.children.clone(),
                aspects: node.aspects.clone_for(ScopeId(index)),
            })
            .collect();
        Self { nodes }
    }
}

/// Iterator over a scope and its enclosing scopes
#[derive(Debug)]
pub struct Ancestors<'a> {
    tree: &'a ScopeTree,
    next: Option<ScopeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = ScopeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}

/// Pre-order depth-first walk
///
/// Children are visited in creation order. Nothing is computed until the
/// iterator is advanced; calling [`ScopeTree::flatten`] again restarts.
#[derive(Debug)]
pub struct Flatten<'a> {
    tree: &'a ScopeTree,
    stack: Vec<ScopeId>,
}

impl Iterator for Flatten<'_> {
    type Item = ScopeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(current).iter().rev().copied());
        Some(current)
    }
}
