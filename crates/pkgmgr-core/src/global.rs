//! Global variables
//!
//! Loads global variables back from storage and merges the declarative
//! defaults document into a scope tree. The document nests like this:
//!
//! ```yaml
//! variables:
//!   number_of_shards: 3
//!   refresh_interval: 60s
//! scoped:
//!   timeseries:
//!     variables:
//!       number_of_replicas: 1
//! ```
//!
//! Scope `timeseries` under package `P` becomes package `P.timeseries`.

use crate::config::ManagerConfig;
use crate::error::LoaderError;
use indexmap::IndexMap;
use pkgmgr_scope::{build_hierarchy, ScopeIndex, ScopeTree};
use pkgmgr_vars::{Constant, ErrorSink, SupportedType, Units, Variable};
use serde::Deserialize;
use serde_yaml::Value;

#[derive(Debug, Default, Deserialize)]
struct NestedData {
    #[serde(default)]
    variables: IndexMap<String, Value>,
    #[serde(default)]
    scoped: IndexMap<String, NestedData>,
}

/// Loads global variables into a scope tree
#[derive(Debug, Clone)]
pub struct GlobalLoader {
    identity: String,
}

impl GlobalLoader {
    /// Loader placing defaults under the configured identity
    #[must_use]
    pub fn new(config: &ManagerConfig) -> Self {
        Self {
            identity: config.identity(),
        }
    }

    /// Rebuild scopes for stored variables and store each one
    ///
    /// # Errors
    /// Returns [`LoaderError::Scope`] if a variable's scope is missing after
    /// building the hierarchy
    pub fn load_from_storage(
        &self,
        tree: &mut ScopeTree,
        variables: Vec<Variable>,
        errors: &mut ErrorSink,
        existing: Option<ScopeIndex>,
    ) -> Result<ScopeIndex, LoaderError> {
        let index = build_hierarchy(
            tree,
            variables.iter().map(|v| v.package_id.as_str()),
            errors,
            existing,
        );
        let count = variables.len();
        for variable in variables {
            let scope = index.require(&variable.package_id)?;
            tree.store_variable(scope, variable);
        }
        tracing::debug!(variables = count, scopes = index.len(), "loaded stored variables");
        Ok(index)
    }

    /// Parse a defaults document into variables
    ///
    /// Values of an unsupported kind are reported and skipped.
    ///
    /// # Errors
    /// Returns [`LoaderError::MalformedDefaults`] if the document does not
    /// parse
    pub fn parse_defaults(
        &self,
        document: &str,
        errors: &mut ErrorSink,
    ) -> Result<Vec<Variable>, LoaderError> {
        let data: NestedData = if document.trim().is_empty() {
            NestedData::default()
        } else {
            serde_yaml::from_str(document)?
        };

        let mut variables = Vec::new();
        let mut pending = vec![(self.identity.clone(), &data)];
        while let Some((package_id, data)) = pending.pop() {
            for (name, value) in &data.variables {
                if let Some(variable) = variable_from_value(&package_id, name, value, errors) {
                    variables.push(variable);
                }
            }
            // reversed so scopes come out in document order
            for (child, nested) in data.scoped.iter().rev() {
                pending.push((format!("{package_id}.{child}"), nested));
            }
        }
        Ok(variables)
    }

    /// Merge a defaults document into the tree indexed by `existing`
    ///
    /// A default matching a reachable variable updates its default and
    /// units; when the type changes the type is replaced and the live value
    /// cleared. Other defaults are stored as new variables.
    ///
    /// # Errors
    /// Returns [`LoaderError::MalformedDefaults`] for an unparseable document
    pub fn merge_defaults(
        &self,
        tree: &mut ScopeTree,
        document: &str,
        errors: &mut ErrorSink,
        existing: ScopeIndex,
    ) -> Result<ScopeIndex, LoaderError> {
        let variables = self.parse_defaults(document, errors)?;
        let index = build_hierarchy(
            tree,
            variables.iter().map(|v| v.package_id.as_str()),
            errors,
            Some(existing),
        );

        let (mut updated, mut added) = (0_usize, 0_usize);
        for variable in variables {
            let scope = index.require(&variable.package_id)?;
            let full_name = variable.full_name();
            if let Some(found) = tree.try_find_variable_mut(scope, &full_name) {
                found.default = variable.default;
                found.units = variable.units;
                if found.var_type != variable.var_type {
                    found.var_type = variable.var_type;
                    found.value = None;
                }
                updated += 1;
            } else {
                tree.store_variable(scope, variable);
                added += 1;
            }
        }
        tracing::info!(updated, added, "merged global defaults");
        Ok(index)
    }
}

fn variable_from_value(
    package_id: &str,
    name: &str,
    value: &Value,
    errors: &mut ErrorSink,
) -> Option<Variable> {
    match value {
        Value::Number(number) if number.as_i64().is_some() => {
            let literal = number.as_i64()?;
            Some(
                Variable::new(package_id, name)
                    .with_default(literal.to_string())
                    .with_units(Units::None.as_str())
                    .with_type(SupportedType::Integer.as_str()),
            )
        }
        Value::String(text) => match Constant::try_parse_encoded(text) {
            Some(constant) => {
                let mut variable = constant.to_variable();
                variable.value = None;
                variable.package_id = package_id.to_string();
                variable.name = name.to_string();
                variable.ensure_id();
                Some(variable)
            }
            None => Some(
                Variable::new(package_id, name)
                    .with_default(text.as_str())
                    .with_units(Units::None.as_str())
                    .with_type(SupportedType::String.as_str()),
            ),
        },
        other => {
            errors.add_error(format!(
                "Unhandled value kind '{}' for '{package_id}::{name}' in defaults document",
                value_kind(other)
            ));
            None
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        // integers that fit i64 never get here
        Value::Number(number) if number.as_u64().is_some() => "integer out of range",
        Value::Number(_) => "float",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged",
    }
}
