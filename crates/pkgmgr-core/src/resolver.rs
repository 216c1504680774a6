//! Setting resolution
//!
//! A dataset setting is declared as nothing, a constant, or a reference to
//! a variable. [`SettingResolver`] turns it into a concrete variable on
//! behalf of the owning package:
//!
//! 1. Reference: the package defaults to the owning package, then the
//!    variable is looked up through the enclosing scopes. A miss is an
//!    error; there is no further fallback.
//! 2. Constant: a generated `constant.<setting>` variable is created, or
//!    updated in place when it already exists, and stored in the scope.
//! 3. Nothing: the global default `<identity>::<setting>` is used. A miss
//!    is an error.

use crate::config::ManagerConfig;
use crate::jobs::{JobBase, ScheduledJob};
use crate::model::{setting_names, DataSet, PartitionGrain};
use crate::timeseries::{settings_for_lifestage, Lifestage};
use chrono::{DateTime, Utc};
use pkgmgr_scope::{ScopeId, ScopeTree};
use pkgmgr_vars::{Constant, ErrorSink, SettingValue, Variable, VariableInfo, VariableRef};

/// Resolves settings for one package against a scope
#[derive(Debug)]
pub struct SettingResolver<'a> {
    tree: &'a mut ScopeTree,
    scope: ScopeId,
    package_id: &'a str,
    config: &'a ManagerConfig,
    errors: &'a mut ErrorSink,
}

impl<'a> SettingResolver<'a> {
    /// Create resolver for `package_id`, looking up from `scope`
    pub fn new(
        tree: &'a mut ScopeTree,
        scope: ScopeId,
        package_id: &'a str,
        config: &'a ManagerConfig,
        errors: &'a mut ErrorSink,
    ) -> Self {
        Self {
            tree,
            scope,
            package_id,
            config,
            errors,
        }
    }

    /// Resolve `setting` declared for `setting_name`
    pub fn locate_setting_variable(
        &mut self,
        setting: &SettingValue,
        setting_name: &str,
    ) -> Option<VariableInfo> {
        match setting {
            SettingValue::Variable(var_ref) => {
                let mut var_ref = var_ref.clone();
                if !var_ref.has_package() {
                    var_ref.package_id = self.package_id.to_string();
                }
                self.lookup_referenced_variable(&var_ref)
            }
            SettingValue::Constant(constant) => {
                Some(self.load_constant_setting(constant, setting_name))
            }
            SettingValue::None => self.lookup_global_default_setting(setting_name),
        }
    }

    /// Generated variable holding `constant` for `setting_name`
    ///
    /// An existing `constant.<setting>` variable is updated in place so its
    /// id stays stable; otherwise a new one is stored in the scope.
    pub fn load_constant_setting(
        &mut self,
        constant: &Constant,
        setting_name: &str,
    ) -> VariableInfo {
        let name = format!("constant.{setting_name}");
        let full_name = VariableRef::new(self.package_id, name.as_str()).to_full_name();
        let literal = constant.to_variable();
        let apply = |variable: &mut Variable| {
            variable.value.clone_from(&literal.value);
            variable.default.clone_from(&literal.default);
            variable.units.clone_from(&literal.units);
            variable.var_type.clone_from(&literal.var_type);
            variable.is_generated = Some(true);
        };

        let found = self.tree.try_find_variable_mut(self.scope, &full_name);
        let variable = if let Some(existing) = found {
            apply(existing);
            existing.clone()
        } else {
            let mut created = Variable::new(self.package_id, name);
            apply(&mut created);
            tracing::debug!(variable = %full_name, "generated constant variable");
            self.tree.store_variable(self.scope, created.clone());
            created
        };

        VariableInfo::extract(&variable, self.package_id, self.errors)
    }

    /// Variable addressed by `var_ref`, searching outward from the scope
    pub fn lookup_referenced_variable(&mut self, var_ref: &VariableRef) -> Option<VariableInfo> {
        match self.tree.try_find_ref(self.scope, var_ref) {
            Some(variable) => Some(VariableInfo::extract(
                variable,
                &var_ref.package_id,
                self.errors,
            )),
            None => {
                self.errors
                    .add_error(format!("Could not find variable: '{}'", var_ref.to_full_name()));
                None
            }
        }
    }

    /// Global default variable named `setting_name`
    pub fn lookup_global_default_setting(&mut self, setting_name: &str) -> Option<VariableInfo> {
        let global_ref = VariableRef::new(self.config.identity(), setting_name);
        match self.tree.try_find_ref(self.scope, &global_ref) {
            Some(variable) => Some(VariableInfo::extract(
                variable,
                &global_ref.package_id,
                self.errors,
            )),
            None => {
                self.errors.add_error(format!(
                    "Could not find global default variable: '{}'",
                    global_ref.to_full_name()
                ));
                None
            }
        }
    }

    /// Maintenance jobs for a dataset's lifecycle settings
    ///
    /// Nothing is derived for unpartitioned datasets. A setting that fails
    /// to resolve yields no job; the others are still derived.
    pub fn determine_jobs(&mut self, data_set: &DataSet, now: DateTime<Utc>) -> Vec<ScheduledJob> {
        if data_set.grain == PartitionGrain::None {
            return Vec::new();
        }

        let manage = &data_set.manage;
        [
            (&manage.active_age, setting_names::ACTIVE_AGE),
            (&manage.retention_period, setting_names::RETENTION_PERIOD),
        ]
        .into_iter()
        .filter_map(|(setting, setting_name)| {
            self.create_scheduled_job(data_set, setting, setting_name, now)
        })
        .collect()
    }

    fn create_scheduled_job(
        &mut self,
        data_set: &DataSet,
        setting: &SettingValue,
        setting_name: &str,
        now: DateTime<Utc>,
    ) -> Option<ScheduledJob> {
        let info = self.locate_setting_variable(setting, setting_name)?;
        let identity = self.config.identity();
        Some(ScheduledJob {
            base: JobBase::new(
                setting_name,
                self.package_id,
                data_set.name.as_str(),
                &identity,
                now,
            ),
            setting_name: setting_name.to_string(),
            variable_name: info.var_ref().to_full_name(),
            next_execution: now + self.config.job_start_delay(),
        })
    }

    /// Fill index template settings the dataset leaves unset
    ///
    /// Only time-series datasets get defaults. Explicit settings are kept
    /// and not looked up.
    pub fn apply_template_settings(&mut self, data_set: &mut DataSet) {
        match data_set.grain {
            PartitionGrain::PerDay => {
                for setting in settings_for_lifestage(Lifestage::Active) {
                    if data_set.template.settings.contains_key(setting.key()) {
                        continue;
                    }
                    if let Some(value) = setting.resolve(self.tree, self.scope, self.errors) {
                        data_set
                            .template
                            .settings
                            .insert(setting.key().to_string(), value);
                    }
                }
            }
            PartitionGrain::None => {}
        }
    }
}
