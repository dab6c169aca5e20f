//! End-to-end reconciliation scenarios
//!
//! Full flow: YAML document -> runner -> store/version assertions, the way
//! an external driver would wire the engine up.

use std::fs;

use conf_core::{
    ApplyMode, ComponentProfile, EntityReconciler, FileContentResolver, ReconciliationRunner,
    ScopeResolver, VersionStore,
};
use conf_model::{AttrValue, DesiredStateDocument};
use conf_test_utils::{MemoryScopeDirectory, MemoryStore, MemoryVersionBacking, RecordingReporter};
use tempfile::TempDir;

fn directory() -> MemoryScopeDirectory {
    MemoryScopeDirectory::new()
        .with_group("europe", 10)
        .with_leaf("uk", 1)
        .with_leaf("de", 2)
}

fn runner_with(
    profile: ComponentProfile,
    store: MemoryStore,
    backing: MemoryVersionBacking,
) -> (ReconciliationRunner<MemoryStore>, RecordingReporter) {
    let reporter = RecordingReporter::new();
    let reconciler = EntityReconciler::new(
        profile,
        store,
        ScopeResolver::new(Box::new(directory())),
        VersionStore::new(Box::new(backing)),
    )
    .with_reporter(Box::new(reporter.clone()));
    (ReconciliationRunner::new(reconciler), reporter)
}

#[test]
fn first_run_converges_and_second_run_is_stable() {
    let document = DesiredStateDocument::from_yaml_str(
        r#"
home:
  title: Home
  version: 1
footer:
  - content: English footer
    stores: [uk]
  - content: German footer
    stores: [de]
"#,
    )
    .unwrap();

    let backing = MemoryVersionBacking::new();
    let (mut runner, _) = runner_with(
        ComponentProfile::new("blocks"),
        MemoryStore::new(),
        backing.clone(),
    );

    let first = runner.run(&document, ApplyMode::Maintain);
    assert_eq!(first.processed, 3);
    assert_eq!(first.saved, 3);
    assert!(first.is_clean());
    assert_eq!(backing.get("version_blocks_home").as_deref(), Some("1"));

    let second = runner.run(&document, ApplyMode::Maintain);
    assert_eq!(second.saved, 0);
    assert_eq!(second.skipped, 3);

    let store = runner.reconciler().adapter();
    assert_eq!(store.len(), 3);
    let footers = store.entities("footer");
    assert_eq!(footers[0].scope_ids(), [conf_core::ScopeId(1)]);
    assert_eq!(footers[1].scope_ids(), [conf_core::ScopeId(2)]);
}

#[test]
fn version_bump_pushes_changes_through_create_only() {
    let v1 = DesiredStateDocument::from_yaml_str("home: { title: Home, version: 1 }").unwrap();
    let v2 =
        DesiredStateDocument::from_yaml_str("home: { title: New home, version: 2 }").unwrap();

    let (mut runner, _) = runner_with(
        ComponentProfile::new("blocks"),
        MemoryStore::new(),
        MemoryVersionBacking::new(),
    );
    runner.run(&v1, ApplyMode::Maintain);

    // Without a bump, create-only leaves the entity alone.
    let unbumped =
        DesiredStateDocument::from_yaml_str("home: { title: New home, version: 1 }").unwrap();
    let report = runner.run(&unbumped, ApplyMode::CreateOnly);
    assert_eq!(report.saved, 0);
    assert_eq!(report.skipped, 1);

    // The bump overrides the gate.
    let report = runner.run(&v2, ApplyMode::CreateOnly);
    assert_eq!(report.saved, 1);
    assert_eq!(
        runner.reconciler().adapter().entity("home").unwrap().attribute("title"),
        Some(&AttrValue::Str("New home".to_string()))
    );

    // And the new stamp is sticky: the same document skips again.
    let report = runner.run(&v2, ApplyMode::CreateOnly);
    assert_eq!(report.saved, 0);
    assert_eq!(report.skipped, 1);
}

#[test]
fn content_sources_resolve_from_disk() {
    let content_dir = TempDir::new().unwrap();
    fs::write(content_dir.path().join("home.html"), "<h1>Welcome</h1>").unwrap();

    let document = DesiredStateDocument::from_yaml_str(
        r#"
home:
  title: Home
  source: home.html
"#,
    )
    .unwrap();

    let reporter = RecordingReporter::new();
    let reconciler = EntityReconciler::new(
        ComponentProfile::new("pages").with_required(["title"]),
        MemoryStore::new(),
        ScopeResolver::new(Box::new(directory())),
        VersionStore::new(Box::new(MemoryVersionBacking::new())),
    )
    .with_content_resolver(Box::new(FileContentResolver::new(content_dir.path())))
    .with_reporter(Box::new(reporter));
    let mut runner = ReconciliationRunner::new(reconciler);

    let report = runner.run(&document, ApplyMode::Maintain);
    assert_eq!(report.saved, 1);
    assert_eq!(
        runner.reconciler().adapter().entity("home").unwrap().attribute("content"),
        Some(&AttrValue::Str("<h1>Welcome</h1>".to_string()))
    );

    // Unchanged file, unchanged entity.
    let report = runner.run(&document, ApplyMode::Maintain);
    assert_eq!(report.saved, 0);

    // Edited file shows up as a normal attribute change.
    fs::write(content_dir.path().join("home.html"), "<h1>Hello</h1>").unwrap();
    let report = runner.run(&document, ApplyMode::Maintain);
    assert_eq!(report.saved, 1);
}

#[test]
fn page_defaults_and_required_attributes_apply_end_to_end() {
    let profile = ComponentProfile::new("pages")
        .with_required(["title"])
        .with_defaults([("page_layout", "empty"), ("is_active", "1")]);

    let document = DesiredStateDocument::from_yaml_str(
        r#"
about:
  title: About us
no-title:
  page_layout: two-columns
"#,
    )
    .unwrap();

    let (mut runner, _) = runner_with(profile, MemoryStore::new(), MemoryVersionBacking::new());
    let report = runner.run(&document, ApplyMode::Maintain);

    assert_eq!(report.saved, 1);
    assert_eq!(report.errored, 1);
    assert!(report.errors[0].starts_with("no-title: "));

    let about = runner.reconciler().adapter().entity("about").unwrap();
    assert_eq!(
        about.attribute("page_layout"),
        Some(&AttrValue::Str("empty".to_string()))
    );
    assert_eq!(
        about.attribute("is_active"),
        Some(&AttrValue::Str("1".to_string()))
    );
}

#[test]
fn grouped_scopes_resolve_like_leaves() {
    let document = DesiredStateDocument::from_yaml_str(
        r#"
banner:
  title: Europe banner
  stores: [europe]
"#,
    )
    .unwrap();

    let (mut runner, _) = runner_with(
        ComponentProfile::new("blocks"),
        MemoryStore::new(),
        MemoryVersionBacking::new(),
    );
    let report = runner.run(&document, ApplyMode::Maintain);

    assert!(report.is_clean());
    assert_eq!(
        runner.reconciler().adapter().entity("banner").unwrap().scope_ids(),
        [conf_core::ScopeId(10)]
    );
}

#[test]
fn default_tracing_reporter_works_end_to_end() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let document = DesiredStateDocument::from_yaml_str("home: { title: Home }").unwrap();
    let reconciler = EntityReconciler::new(
        ComponentProfile::new("blocks"),
        MemoryStore::new(),
        ScopeResolver::new(Box::new(directory())),
        VersionStore::new(Box::new(MemoryVersionBacking::new())),
    );
    let mut runner = ReconciliationRunner::new(reconciler);

    let report = runner.run(&document, ApplyMode::Maintain);
    assert_eq!(report.saved, 1);
}

#[test]
fn report_round_trips_through_json() {
    let document = DesiredStateDocument::from_yaml_str("home: { title: Home }").unwrap();
    let (mut runner, _) = runner_with(
        ComponentProfile::new("blocks"),
        MemoryStore::new(),
        MemoryVersionBacking::new(),
    );
    let report = runner.run(&document, ApplyMode::Maintain);

    let json = serde_json::to_string(&report).unwrap();
    let back: conf_core::RunReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back.processed, 1);
    assert_eq!(back.saved, 1);
    assert!(back.started_at <= back.finished_at);
}
