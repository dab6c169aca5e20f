//! Version persistence and fail-open behavior across runs

use conf_core::{
    ApplyMode, ComponentProfile, EntityReconciler, FileVersionBacking, ReconciliationRunner,
    ScopeId, ScopeResolver, VersionStore,
};
use conf_model::{AttrValue, DesiredStateDocument};
use conf_test_utils::{MemoryScopeDirectory, MemoryStore, MemoryVersionBacking, RecordingReporter};
use tempfile::TempDir;

fn engine_over(
    store: MemoryStore,
    backing: Box<dyn conf_core::VersionBacking>,
) -> ReconciliationRunner<MemoryStore> {
    let directory = MemoryScopeDirectory::new()
        .with_leaf("uk", 1)
        .with_leaf("de", 2);
    let reconciler = EntityReconciler::new(
        ComponentProfile::new("blocks"),
        store,
        ScopeResolver::new(Box::new(directory)),
        VersionStore::new(backing),
    )
    .with_reporter(Box::new(RecordingReporter::new()));
    ReconciliationRunner::new(reconciler)
}

#[test]
fn file_backed_stamps_survive_engine_restarts() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("versions.toml");
    let document =
        DesiredStateDocument::from_yaml_str("home: { title: Home, version: 2 }").unwrap();

    let mut first = engine_over(MemoryStore::new(), Box::new(FileVersionBacking::new(&path)));
    let report = first.run(&document, ApplyMode::Maintain);
    assert_eq!(report.saved, 1);

    // The persisted table uses the two-column record layout.
    let raw = std::fs::read_to_string(&path).unwrap();
    let table: toml::Value = toml::from_str(&raw).unwrap();
    let records = table["records"].as_array().unwrap();
    assert_eq!(records[0]["version_key"].as_str(), Some("version_blocks_home"));
    assert_eq!(records[0]["version_value"].as_str(), Some("2"));

    // A brand-new engine over the same file still sees version 2, so an
    // existing entity is skipped under create-only.
    let mut seeded = MemoryStore::new();
    seeded.seed("home", [("title", "Stale title")], vec![ScopeId::GLOBAL]);
    let mut second = engine_over(seeded, Box::new(FileVersionBacking::new(&path)));
    let report = second.run(&document, ApplyMode::CreateOnly);
    assert_eq!(report.saved, 0);
    assert_eq!(report.skipped, 1);

    // Bumping the stamp reopens the gate.
    let bumped =
        DesiredStateDocument::from_yaml_str("home: { title: Home, version: 3 }").unwrap();
    let report = second.run(&bumped, ApplyMode::CreateOnly);
    assert_eq!(report.saved, 1);
}

#[test]
fn version_key_signature_separates_scope_variants() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("versions.toml");
    let document = DesiredStateDocument::from_yaml_str(
        r#"
footer:
  - content: English footer
    stores: [uk]
    version: 1
  - content: German footer
    stores: [de]
    version: 5
"#,
    )
    .unwrap();

    let mut runner = engine_over(MemoryStore::new(), Box::new(FileVersionBacking::new(&path)));
    runner.run(&document, ApplyMode::Maintain);

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("version_blocks_footeruk"));
    assert!(raw.contains("version_blocks_footerde"));
}

#[test]
fn offline_version_backing_never_aborts_a_run() {
    let backing = MemoryVersionBacking::new();
    backing.set_fail(true);

    let document =
        DesiredStateDocument::from_yaml_str("home: { title: Home, version: 1 }").unwrap();
    let mut runner = engine_over(MemoryStore::new(), Box::new(backing.clone()));

    // Reads default to 0 and failed writes are swallowed.
    let report = runner.run(&document, ApplyMode::Maintain);
    assert!(report.is_clean());
    assert_eq!(report.saved, 1);
    assert!(backing.is_empty());
    assert_eq!(
        runner.reconciler().adapter().entity("home").unwrap().attribute("title"),
        Some(&AttrValue::Str("Home".to_string()))
    );

    // With the backing offline, every run sees version 0 and a stamped
    // document keeps applying under maintain mode without ever erroring.
    let report = runner.run(&document, ApplyMode::Maintain);
    assert!(report.is_clean());
    assert_eq!(report.saved, 0, "attributes already converged");
}
