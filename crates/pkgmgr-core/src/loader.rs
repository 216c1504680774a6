//! Package validation and loading
//!
//! [`PackageLoader`] checks a submitted package, stores its variables into
//! the package scope and derives its maintenance jobs. A loader is bound to
//! the first package it validates.

use crate::config::ManagerConfig;
use crate::error::LoaderError;
use crate::jobs::ScheduledJob;
use crate::model::Package;
use crate::resolver::SettingResolver;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use pkgmgr_scope::{ScopeId, ScopeTree};
use pkgmgr_vars::ErrorSink;

/// Validates and loads one package into a scope
#[derive(Debug)]
pub struct PackageLoader {
    scope: ScopeId,
    config: ManagerConfig,
    validated: Option<Validated>,
    jobs: Vec<ScheduledJob>,
}

#[derive(Debug)]
struct Validated {
    package_id: String,
    verdict: bool,
}

impl PackageLoader {
    /// Loader storing into `scope`
    #[must_use]
    pub fn new(scope: ScopeId, config: ManagerConfig) -> Self {
        Self {
            scope,
            config,
            validated: None,
            jobs: Vec::new(),
        }
    }

    /// Jobs derived by the last validation
    #[inline]
    #[must_use]
    pub fn jobs(&self) -> &[ScheduledJob] {
        &self.jobs
    }

    /// Validate `package` and load it into the scope
    ///
    /// Returns `Ok(true)` when `errors` is empty afterwards. Validating the
    /// same package id again returns the earlier verdict without reloading.
    ///
    /// # Errors
    /// Returns [`LoaderError::AlreadyValidated`] when this loader already
    /// validated a different package
    pub fn validate_package_to_load(
        &mut self,
        tree: &mut ScopeTree,
        package: &Package,
        errors: &mut ErrorSink,
        now: DateTime<Utc>,
    ) -> Result<bool, LoaderError> {
        if let Some(validated) = &self.validated {
            if validated.package_id == package.id {
                return Ok(validated.verdict);
            }
            return Err(LoaderError::AlreadyValidated {
                existing: validated.package_id.clone(),
                requested: package.id.clone(),
            });
        }

        tracing::info!(package = %package.id, "validating package");
        self.check_reserved_id(&package.id, errors);

        check_for_duplicate_names(
            package.variables.iter().map(|v| v.name.as_str()),
            "Variables",
            errors,
        );
        for variable in &package.variables {
            let mut variable = variable.clone();
            let derived_id = variable.id == variable.full_name();
            variable.package_id.clone_from(&package.id);
            if derived_id {
                variable.id.clear();
            }
            tree.store_variable(self.scope, variable);
        }

        check_for_duplicate_names(
            package.data_sets.iter().map(|d| d.name.as_str()),
            "Datasets",
            errors,
        );
        let mut resolver =
            SettingResolver::new(tree, self.scope, &package.id, &self.config, errors);
        for data_set in &package.data_sets {
            let jobs = resolver.determine_jobs(data_set, now);
            self.jobs.extend(jobs);
        }

        let verdict = errors.is_empty();
        tracing::info!(
            package = %package.id,
            jobs = self.jobs.len(),
            verdict,
            "validated package"
        );
        self.validated = Some(Validated {
            package_id: package.id.clone(),
            verdict,
        });
        Ok(verdict)
    }

    fn check_reserved_id(&self, package_id: &str, errors: &mut ErrorSink) {
        let lower = package_id.to_lowercase();
        for reserved in [self.config.global_package_id.clone(), self.config.identity()] {
            if lower.starts_with(&reserved.to_lowercase()) {
                errors.add_error(format!("Package can't start with the reserved name {reserved}"));
            }
        }
    }
}

/// Report names used more than once, ignoring case
///
/// Returns true when any duplicate was found.
pub fn check_for_duplicate_names<'n>(
    names: impl IntoIterator<Item = &'n str>,
    what_items_are: &str,
    errors: &mut ErrorSink,
) -> bool {
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for name in names {
        *counts.entry(name.to_lowercase()).or_default() += 1;
    }

    let mut any = false;
    for (name, count) in counts.into_iter().filter(|(_, count)| *count > 1) {
        any = true;
        errors.add_error(format!("There are {count} {what_items_are} with name '{name}'"));
    }
    any
}
