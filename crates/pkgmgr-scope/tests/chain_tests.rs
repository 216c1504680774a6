//! Lookups and walks along long scope chains.
//!
//! Chains come from the shared `nested_scopes` fixture: `S`, `S.1`,
//! `S.1.2`, ... with ids listed outermost first.

use pkgmgr_scope::ScopeTree;
use pkgmgr_test_utils::{nested_scopes, sample_variable};
use pkgmgr_vars::{ErrorSink, TypedValue};
use pretty_assertions::assert_eq;

#[test]
fn chain_fixture_links_each_level() {
    let (tree, ids) = nested_scopes(3);

    let names: Vec<&str> = ids.iter().map(|id| tree.name(*id)).collect();
    assert_eq!(names, vec!["S", "S.1", "S.1.2"]);
    assert!(tree.is_topmost(ids[0]));
    assert_eq!(tree.parent(ids[2]), Some(ids[1]));
    assert_eq!(tree.root_of(ids[2]), ids[0]);
}

#[test]
fn middle_declaration_shadows_outer_from_innermost() {
    let (mut tree, ids) = nested_scopes(3);
    tree.store_variable(ids[0], sample_variable("Shared", "limit", 1));
    tree.store_variable(ids[1], sample_variable("Shared", "limit", 2));
    let mut errors = ErrorSink::new();

    let found = tree
        .try_find_variable(ids[2], "Shared::limit")
        .expect("visible from innermost");
    assert_eq!(found.value.as_deref(), Some("2"));

    let info = tree
        .first_var_of_name(ids[2], "limit", &mut errors)
        .expect("visible by local name");
    assert_eq!(info.value(), Some(&TypedValue::Integer(2)));
    assert!(errors.is_empty(), "{errors}");

    // the outer declaration is still what the outermost scope sees
    let outer = tree
        .try_find_variable(ids[0], "Shared::limit")
        .expect("declared at the top");
    assert_eq!(outer.value.as_deref(), Some("1"));
}

#[test]
fn deep_chain_walks_without_recursion() {
    const DEPTH: usize = 1_000;
    let (mut tree, ids) = nested_scopes(DEPTH);
    let innermost = ids[DEPTH - 1];
    tree.store_variable(ids[0], sample_variable("Shared", "top", 7));

    let ancestors: Vec<_> = tree.ancestors(innermost).collect();
    let mut innermost_first = ids.clone();
    innermost_first.reverse();
    assert_eq!(ancestors, innermost_first);

    assert_eq!(tree.flatten(ids[0]).collect::<Vec<_>>(), ids);
    assert_eq!(tree.to_dictionary(ids[0]).len(), DEPTH);
    assert_eq!(tree.variables(ids[0], true).len(), 1);

    let found = tree.try_find_variable(innermost, "Shared::top");
    assert_eq!(found.and_then(|v| v.value.as_deref()), Some("7"));
}

#[test]
fn cloned_chain_keeps_shape() {
    let (tree, ids) = nested_scopes(50);

    let (copy, copied_leaf): (ScopeTree, _) = tree.clone_from_root(ids[49]);

    assert_eq!(copy.ancestors(copied_leaf).count(), 50);
    assert_eq!(copy.name(copied_leaf), tree.name(ids[49]));
}
