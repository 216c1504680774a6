//! Scope aspects
//!
//! An aspect is a pluggable data module hanging off a scope. Each scope
//! holds at most one aspect per concrete type, keyed by [`TypeId`].

use crate::changes::ChangeSet;
use crate::tree::ScopeId;
use indexmap::IndexMap;
use std::any::{Any, TypeId};
use std::fmt::Debug;

/// Per-scope data module
///
/// Implementors know how to copy themselves onto another scope and how to
/// express their difference from a prior snapshot as store operations.
pub trait Aspect: Any + Debug + Send + Sync {
    /// Scope this aspect is attached to
    fn scope(&self) -> Option<ScopeId>;

    /// Record the owning scope
    fn attach(&mut self, scope: ScopeId);

    /// Boxed copy of this aspect
    fn clone_aspect(&self) -> Box<dyn Aspect>;

    /// Append operations that turn `prior` into `self`
    ///
    /// `prior` is `None` when the scope had no aspect of this type.
    fn record_changes(&self, prior: Option<&dyn Aspect>, changes: &mut ChangeSet);

    /// Append operations deleting everything this aspect holds
    fn remove_all(&self, changes: &mut ChangeSet);

    /// Upcast for downcasting
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for downcasting
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Aspects of one scope, keyed by concrete type
#[derive(Debug, Default)]
pub struct AspectRegistry {
    aspects: IndexMap<TypeId, Box<dyn Aspect>>,
}

impl AspectRegistry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Typed aspect
    #[must_use]
    pub fn get<T: Aspect>(&self) -> Option<&T> {
        self.aspects
            .get(&TypeId::of::<T>())
            .and_then(|aspect| aspect.as_any().downcast_ref::<T>())
    }

    /// Mutable typed aspect
    pub fn get_mut<T: Aspect>(&mut self) -> Option<&mut T> {
        self.aspects
            .get_mut(&TypeId::of::<T>())
            .and_then(|aspect| aspect.as_any_mut().downcast_mut::<T>())
    }

    /// Typed aspect, created and attached to `scope` on first request
    pub fn get_or_default<T: Aspect + Default>(&mut self, scope: ScopeId) -> &mut T {
        let aspect = self.aspects.entry(TypeId::of::<T>()).or_insert_with(|| {
            let mut aspect = T::default();
            aspect.attach(scope);
            Box::new(aspect)
        });
        downcast(aspect)
    }

    /// Attach `aspect` to `scope`, replacing one of the same type
    pub fn set<T: Aspect>(&mut self, scope: ScopeId, mut aspect: T) -> &mut T {
        aspect.attach(scope);
        let key = TypeId::of::<T>();
        self.aspects.insert(key, Box::new(aspect));
        match self.aspects.get_mut(&key) {
            Some(stored) => downcast(stored),
            None => unreachable!("aspect was just inserted"),
        }
    }

    /// Number of attached aspects
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.aspects.len()
    }

    /// True when no aspect is attached
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.aspects.is_empty()
    }

    /// Underlying map, for correlating against a prior registry
    #[inline]
    #[must_use]
    pub fn as_map(&self) -> &IndexMap<TypeId, Box<dyn Aspect>> {
        &self.aspects
    }

    /// Copy every aspect, re-attaching the copies to `scope`
    #[must_use]
    pub fn clone_for(&self, scope: ScopeId) -> Self {
        let aspects = self
            .aspects
            .iter()
            .map(|(key, aspect)| {
                let mut copy = aspect.clone_aspect();
                copy.attach(scope);
                (*key, copy)
            })
            .collect();
        Self { aspects }
    }
}

fn downcast<T: Aspect>(aspect: &mut Box<dyn Aspect>) -> &mut T {
    match aspect.as_any_mut().downcast_mut::<T>() {
        Some(typed) => typed,
        None => unreachable!("aspects are keyed by their own TypeId"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default)]
    struct Counter {
        scope: Option<ScopeId>,
        hits: u32,
    }

    impl Aspect for Counter {
        fn scope(&self) -> Option<ScopeId> {
            self.scope
        }

        fn attach(&mut self, scope: ScopeId) {
            self.scope = Some(scope);
        }

        fn clone_aspect(&self) -> Box<dyn Aspect> {
            Box::new(self.clone())
        }

        fn record_changes(&self, _prior: Option<&dyn Aspect>, _changes: &mut ChangeSet) {}

        fn remove_all(&self, _changes: &mut ChangeSet) {}

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    fn scope_ids() -> (ScopeId, ScopeId) {
        let mut tree = crate::ScopeTree::new();
        let first = tree.create_scope("first", None);
        let second = tree.create_scope("second", None);
        (first, second)
    }

    #[test]
    fn get_or_default_creates_once() {
        let (scope, _) = scope_ids();
        let mut registry = AspectRegistry::new();

        registry.get_or_default::<Counter>(scope).hits += 1;
        registry.get_or_default::<Counter>(scope).hits += 1;

        assert_eq!(registry.len(), 1);
        let counter = registry.get::<Counter>().unwrap();
        assert_eq!(counter.hits, 2);
        assert_eq!(counter.scope(), Some(scope));
    }

    #[test]
    fn get_missing_is_none() {
        let registry = AspectRegistry::new();
        assert!(registry.get::<Counter>().is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn set_replaces_and_attaches() {
        let (scope, _) = scope_ids();
        let mut registry = AspectRegistry::new();
        registry.get_or_default::<Counter>(scope).hits = 5;

        registry.set(
            scope,
            Counter {
                scope: None,
                hits: 9,
            },
        );

        let counter = registry.get::<Counter>().unwrap();
        assert_eq!(counter.hits, 9);
        assert_eq!(counter.scope(), Some(scope));
    }

    #[test]
    fn clone_for_reattaches() {
        let (first, second) = scope_ids();
        let mut registry = AspectRegistry::new();
        registry.get_or_default::<Counter>(first).hits = 3;

        let copy = registry.clone_for(second);

        assert_eq!(copy.get::<Counter>().unwrap().scope(), Some(second));
        assert_eq!(copy.get::<Counter>().unwrap().hits, 3);
        // original untouched
        assert_eq!(registry.get::<Counter>().unwrap().scope(), Some(first));
    }
}
