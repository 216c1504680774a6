//! Bootstrap against an in-memory store.
//!
//! Covers the three phases end to end:
//! - schema setup creates desired templates, drops stale ones and creates
//!   the control index once
//! - global defaults land in the store and a second run applies nothing
//! - collected errors, rejected applies and store outages stop the run

use pkgmgr_core::{Bootstrap, BootstrapError, LoaderError, ManagerConfig, RepositoryError};
use pkgmgr_test_utils::{
    sample_template, sample_variable, InMemoryRepository, StaticDefaults, SAMPLE_DEFAULTS,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn make_bootstrap(repository: &Arc<InMemoryRepository>, defaults: StaticDefaults) -> Bootstrap {
    Bootstrap::new(ManagerConfig::default(), repository.clone(), Arc::new(defaults))
}

#[tokio::test]
async fn first_run_persists_global_defaults() {
    let repository = Arc::new(InMemoryRepository::new());
    let mut bootstrap = make_bootstrap(&repository, StaticDefaults::new(SAMPLE_DEFAULTS));

    let changes = bootstrap.run().await.expect("bootstrap succeeds");

    assert!(bootstrap.errors().is_empty(), "{}", bootstrap.errors());
    assert_eq!(changes.persisted().count(), 5);
    assert_eq!(changes.deleted_ids().count(), 0);
    assert_eq!(repository.variables().len(), 5);

    let shards = repository
        .variable("PackageManager.v1::number_of_shards")
        .expect("root default stored");
    assert_eq!(shards.default.as_deref(), Some("3"));
    assert_eq!(shards.var_type.as_deref(), Some("integer"));
    assert_eq!(shards.value, None);

    let refresh = repository
        .variable("PackageManager.v1.timeseries::refresh_interval")
        .expect("nested default stored");
    assert_eq!(refresh.default.as_deref(), Some("60s"));
    assert_eq!(refresh.var_type.as_deref(), Some("string"));
}

#[tokio::test]
async fn repeated_run_applies_nothing() {
    let repository = Arc::new(InMemoryRepository::new());
    make_bootstrap(&repository, StaticDefaults::new(SAMPLE_DEFAULTS))
        .run()
        .await
        .expect("first run");
    let stored = repository.variables();

    let changes = make_bootstrap(&repository, StaticDefaults::new(SAMPLE_DEFAULTS))
        .run()
        .await
        .expect("second run");

    assert!(changes.is_empty(), "{changes:?}");
    assert_eq!(repository.applied().len(), 2);
    assert_eq!(repository.variables(), stored);
}

#[tokio::test]
async fn stored_value_survives_new_default() {
    let repository = Arc::new(InMemoryRepository::new().with_variables([sample_variable(
        "PackageManager.v1",
        "number_of_shards",
        8,
    )]));
    let mut bootstrap = make_bootstrap(&repository, StaticDefaults::new(SAMPLE_DEFAULTS));

    let changes = bootstrap.run().await.expect("bootstrap succeeds");

    // four new defaults plus the refreshed default of the stored one
    assert_eq!(changes.persisted().count(), 5);
    let shards = repository
        .variable("PackageManager.v1::number_of_shards")
        .expect("still stored");
    assert_eq!(shards.value.as_deref(), Some("8"));
    assert_eq!(shards.default.as_deref(), Some("3"));
}

#[tokio::test]
async fn other_packages_are_ignored() {
    let repository = Arc::new(InMemoryRepository::new().with_variables([
        sample_variable("PackageManager.v10", "stray", 1),
        sample_variable("Acme", "keep", 2),
    ]));
    let mut bootstrap = make_bootstrap(&repository, StaticDefaults::new(SAMPLE_DEFAULTS));

    bootstrap.run().await.expect("bootstrap succeeds");

    assert!(bootstrap.errors().is_empty(), "{}", bootstrap.errors());
    assert_eq!(repository.variables().len(), 7);
}

#[tokio::test]
async fn pending_errors_block_apply() {
    let repository = Arc::new(InMemoryRepository::new());
    let defaults = StaticDefaults::new("variables:\n  ratio: 0.5\n  number_of_shards: 3\n");
    let mut bootstrap = make_bootstrap(&repository, defaults);

    let result = bootstrap.run().await;

    match result {
        Err(BootstrapError::PendingErrors { count, messages }) => {
            assert_eq!(count, 1);
            assert!(messages.contains("ratio"), "{messages}");
        }
        other => panic!("expected PendingErrors, got {other:?}"),
    }
    assert!(repository.applied().is_empty());
    assert!(repository.variables().is_empty());
}

#[tokio::test]
async fn rejected_apply_can_be_retried() {
    let repository = Arc::new(InMemoryRepository::new());
    repository.set_reject_changes(true);
    let mut bootstrap = make_bootstrap(&repository, StaticDefaults::new(SAMPLE_DEFAULTS));

    let result = bootstrap.run().await;
    assert!(matches!(result, Err(BootstrapError::ApplyRejected)), "{result:?}");
    assert!(repository.variables().is_empty());

    // nothing was committed, so the same changes are recorded again
    repository.set_reject_changes(false);
    let changes = bootstrap.load_global_package_data().await.expect("retry succeeds");
    assert_eq!(changes.persisted().count(), 5);
    assert_eq!(repository.variables().len(), 5);

    // committed now
    let changes = bootstrap.load_global_package_data().await.expect("nothing left");
    assert!(changes.is_empty());
}

#[tokio::test]
async fn load_before_prepare_is_refused() {
    let repository = Arc::new(InMemoryRepository::new());
    let mut bootstrap = make_bootstrap(&repository, StaticDefaults::new(SAMPLE_DEFAULTS));

    let result = bootstrap.load_global_package_data().await;

    assert!(matches!(result, Err(BootstrapError::NotPrepared)));
}

#[tokio::test]
async fn malformed_defaults_are_fatal() {
    let repository = Arc::new(InMemoryRepository::new());
    let mut bootstrap = make_bootstrap(&repository, StaticDefaults::new("variables: [1, 2"));

    let result = bootstrap.prepare_global_package_data().await;

    assert!(matches!(
        result,
        Err(BootstrapError::Loader(LoaderError::MalformedDefaults(_)))
    ));
    assert!(bootstrap.state().is_none());
}

#[tokio::test]
async fn unavailable_store_is_fatal() {
    let repository = Arc::new(InMemoryRepository::new());
    repository.set_unavailable(true);
    let mut bootstrap = make_bootstrap(&repository, StaticDefaults::new(SAMPLE_DEFAULTS));

    let result = bootstrap.run().await;

    assert!(matches!(
        result,
        Err(BootstrapError::Repository(RepositoryError::Unavailable(_)))
    ));
}

#[tokio::test]
async fn schema_setup_syncs_templates() {
    let repository = Arc::new(
        InMemoryRepository::new()
            .with_template("PackageManager.old", sample_template("old", 1))
            .with_template("Other.template", sample_template("other", 1))
            .with_template("PackageManager.timeseries", sample_template("ts", 1)),
    );
    let defaults = StaticDefaults::new(SAMPLE_DEFAULTS)
        .with_template("PackageManager.timeseries", sample_template("ts", 4))
        .with_template("PackageManager.audit", sample_template("audit", 1));
    let bootstrap = make_bootstrap(&repository, defaults);

    bootstrap.setup_schema().await.expect("schema setup");

    let mut names = repository.template_names();
    names.sort();
    assert_eq!(
        names,
        vec!["Other.template", "PackageManager.audit", "PackageManager.timeseries"]
    );
    assert_eq!(repository.index_names(), vec!["PackageManager.v1.Control"]);

    // a second pass must not try to create the control index again
    bootstrap.setup_schema().await.expect("second schema setup");
    assert_eq!(repository.index_names().len(), 1);
}

#[tokio::test]
async fn control_index_prefix_counts_as_existing() {
    let repository =
        Arc::new(InMemoryRepository::new().with_index("PackageManager.v1.Control-000001"));
    let bootstrap = make_bootstrap(&repository, StaticDefaults::new(SAMPLE_DEFAULTS));

    bootstrap.setup_schema().await.expect("schema setup");

    assert_eq!(repository.index_names(), vec!["PackageManager.v1.Control-000001"]);
}
