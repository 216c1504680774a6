//! Index settings for time-series datasets
//!
//! Nodes are tagged with a `timeSeriesRole` attribute and shard allocation
//! filtering places active (changing) and stable indexes accordingly. The
//! remaining settings come from the nearest variable of the same name.

use crate::model::setting_names;
use indexmap::IndexMap;
use pkgmgr_scope::{ScopeId, ScopeTree};
use pkgmgr_vars::ErrorSink;
use serde_json::Value;

/// Node attribute used for allocation filtering
pub const ROLE_TAG: &str = "timeSeriesRole";

/// Prefix of shard allocation include settings
pub const INDEX_ROUTING_ALLOCATION_INCLUDE: &str = "index.routing.allocation.include.";

/// Lifecycle stage of a time-series index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifestage {
    /// Data still changing
    Active,
    /// Data no longer changing
    Stable,
}

impl Lifestage {
    /// Role tag value
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Stable => "stable",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Fixed(&'static str),
    Integer(&'static str),
    Text(&'static str),
}

/// One template setting and where its value comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSetting {
    key: String,
    source: Source,
}

impl TemplateSetting {
    /// Setting key
    #[inline]
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Value for this setting as seen from `scope`
    ///
    /// Missing or mistyped variables are reported to `errors`.
    pub fn resolve(
        &self,
        tree: &ScopeTree,
        scope: ScopeId,
        errors: &mut ErrorSink,
    ) -> Option<Value> {
        match self.source {
            Source::Fixed(value) => Some(Value::from(value)),
            Source::Integer(name) => {
                let info = tree.first_var_of_name(scope, name, errors)?;
                match info.integer_or_default() {
                    Ok(value) => Some(Value::from(value)),
                    Err(e) => {
                        errors.add_error(e.to_string());
                        None
                    }
                }
            }
            Source::Text(name) => {
                let info = tree.first_var_of_name(scope, name, errors)?;
                match info.string_or_default() {
                    Ok(value) => Some(Value::from(value)),
                    Err(e) => {
                        errors.add_error(e.to_string());
                        None
                    }
                }
            }
        }
    }
}

/// Settings an index at `lifestage` needs
///
/// Shard count only applies to active indexes.
#[must_use]
pub fn settings_for_lifestage(lifestage: Lifestage) -> Vec<TemplateSetting> {
    let mut settings = vec![TemplateSetting {
        key: format!("{INDEX_ROUTING_ALLOCATION_INCLUDE}{ROLE_TAG}"),
        source: Source::Fixed(lifestage.as_str()),
    }];
    if lifestage == Lifestage::Active {
        settings.push(TemplateSetting {
            key: setting_names::NUMBER_OF_SHARDS.to_string(),
            source: Source::Integer(setting_names::NUMBER_OF_SHARDS),
        });
    }
    settings.push(TemplateSetting {
        key: setting_names::NUMBER_OF_REPLICAS.to_string(),
        source: Source::Integer(setting_names::NUMBER_OF_REPLICAS),
    });
    settings.push(TemplateSetting {
        key: setting_names::REFRESH_INTERVAL.to_string(),
        source: Source::Text(setting_names::REFRESH_INTERVAL),
    });
    settings
}

/// Resolve every setting for `lifestage`, skipping those that fail
pub fn resolve_settings(
    tree: &ScopeTree,
    scope: ScopeId,
    lifestage: Lifestage,
    errors: &mut ErrorSink,
) -> IndexMap<String, Value> {
    settings_for_lifestage(lifestage)
        .into_iter()
        .filter_map(|setting| {
            let value = setting.resolve(tree, scope, errors)?;
            Some((setting.key, value))
        })
        .collect()
}
