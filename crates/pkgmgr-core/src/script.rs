//! Variable substitution in scripts
//!
//! `@@name@@` tokens are replaced with the JSON rendering of the nearest
//! variable called `name`.

use once_cell::sync::Lazy;
use pkgmgr_scope::{ScopeId, ScopeTree};
use pkgmgr_vars::ErrorSink;
use regex::{Captures, Regex};
use serde_json::Value;

static VARIABLE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@@(\w+)@@").expect("variable token pattern is valid"));

/// Replace every `@@name@@` token in `script`
///
/// A token whose variable cannot be found is left as is; the lookup
/// records the error. A variable with neither value nor default renders
/// as `null`.
pub fn substitute_variables(
    tree: &ScopeTree,
    scope: ScopeId,
    script: &str,
    errors: &mut ErrorSink,
) -> String {
    VARIABLE_TOKEN
        .replace_all(script, |captures: &Captures<'_>| {
            match tree.first_var_of_name(scope, &captures[1], errors) {
                Some(info) => info
                    .value_or_default()
                    .map_or(Value::Null, |value| value.to_json())
                    .to_string(),
                None => captures[0].to_string(),
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkgmgr_vars::Variable;

    fn scope() -> (ScopeTree, ScopeId) {
        let mut tree = ScopeTree::new();
        let scope = tree.create_scope("Global.v1", None);
        tree.store_variable(
            scope,
            Variable::new("Global.v1", "var1")
                .with_default("1")
                .with_type("integer")
                .with_units("none"),
        );
        tree.store_variable(
            scope,
            Variable::new("Global.v1", "var_2")
                .with_default("60s")
                .with_type("string")
                .with_units("none"),
        );
        (tree, scope)
    }

    #[test]
    fn substitutes_json_values() {
        let (tree, scope) = scope();
        let mut errors = ErrorSink::new();

        let result = substitute_variables(
            &tree,
            scope,
            "abc: @@var1@@,\nnumber_of_shards = @@var_2@@",
            &mut errors,
        );

        assert_eq!(result, "abc: 1,\nnumber_of_shards = \"60s\"");
        assert!(errors.is_empty());
    }

    #[test]
    fn unknown_token_left_in_place() {
        let (tree, scope) = scope();
        let mut errors = ErrorSink::new();

        let result = substitute_variables(&tree, scope, "x = @@nope@@", &mut errors);

        assert_eq!(result, "x = @@nope@@");
        assert!(errors.contains("Could not find a variable called nope in any enclosing scope"));
    }

    #[test]
    fn script_without_tokens_unchanged() {
        let (tree, scope) = scope();
        let mut errors = ErrorSink::new();
        assert_eq!(substitute_variables(&tree, scope, "plain @text@", &mut errors), "plain @text@");
    }
}
