//! Integration tests for snapshot files and the snapshot manager.

use std::error::Error as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::json;
use snapstore_core::{Error, RunMode};
use snapstore_manager::{SnapshotManager, SnapshotManagerConfig, TestInfo};
use snapstore_serialize::{SerializerChain, Stage};
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn test_generates_ids_from_name() {
    let manager = SnapshotManager::new(RunMode::Verify);
    let file = manager.resolve_snapshot_file(&fixture("simple.rs")).unwrap();
    let mut file = file.lock();

    assert_eq!(file.next_id("foo"), "foo 1");
    assert_eq!(file.next_id("foo"), "foo 2");
    assert_eq!(file.next_id("bar"), "bar 1");
    assert_eq!(file.next_id("baz"), "baz 1");
    assert_eq!(file.next_id("foo"), "foo 3");
    assert_eq!(file.next_id("foo`"), "foo` 1");
    assert_eq!(file.next_id("foo\\"), "foo\\ 1");
    assert_eq!(file.next_id("foo`${x}`"), "foo`${x}` 1");
}

#[test]
fn test_malformed_exports() {
    let manager = SnapshotManager::new(RunMode::Verify);
    let file = manager
        .resolve_snapshot_file(&fixture("malformed-exports.rs"))
        .unwrap();
    let mut file = file.lock();

    let err = file.read_file().unwrap_err();
    assert_eq!(err.code(), "ERR_INVALID_STATE");
    assert!(err.to_string().contains("Cannot read snapshot"));
    assert_eq!(err.filename(), Some(file.snapshot_path()));
    let cause = err.source().expect("read error should carry a cause");
    assert!(cause.to_string().contains("Malformed snapshot file"));
}

#[test]
fn test_missing_file_tip() {
    let manager = SnapshotManager::new(RunMode::Verify);
    let file = manager
        .resolve_snapshot_file(&fixture("this-file-should-not-exist.rs"))
        .unwrap();

    let err = file.lock().read_file().unwrap_err();
    assert!(err.is_missing_snapshot());
    assert!(err
        .to_string()
        .contains("Missing snapshots can be generated by rerunning the command"));
}

#[test]
fn test_serializer_without_string_output() {
    let manager = SnapshotManager::new(RunMode::Verify);
    let chain = SerializerChain::new().then("boom", |_| Err("boom".into()));

    let err = manager
        .serialize(&json!({"foo": 1}), Some(&chain))
        .unwrap_err();
    assert_eq!(err.code(), "ERR_INVALID_STATE");
    assert!(err
        .to_string()
        .contains("The provided serializers did not generate a string"));
    match &err {
        Error::SerializerOutput { input, .. } => assert_eq!(input, &json!({"foo": 1})),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.source().map(|e| e.to_string()), Some("boom".to_string()));
}

#[test]
fn test_serializes_with_provided_functions() {
    let manager = SnapshotManager::new(RunMode::Verify);
    let chain = SerializerChain::new()
        .then("stringify", |stage| match stage {
            Stage::Value(value) => Ok(Stage::Text(serde_json::to_string(&value)?)),
            text => Ok(text),
        })
        .then("suffix", |stage| Ok(Stage::Text(stage.into_text() + "424242")));

    let output = manager.serialize(&json!({"foo": 1}), Some(&chain)).unwrap();
    assert_eq!(output, "\n{\"foo\":1}424242\n");
}

#[test]
fn test_serialized_values_cast_and_escaped() {
    let manager = SnapshotManager::new(RunMode::Verify);
    let empty = SerializerChain::new();

    assert_eq!(manager.serialize(&5, Some(&empty)).unwrap(), "\n5\n");
    assert_eq!(
        manager.serialize("fo\\o`${x}`", Some(&empty)).unwrap(),
        "\nfo\\\\o\\`\\${x}\\`\n"
    );
}

#[test]
fn test_reads_individual_snapshots() {
    let manager = SnapshotManager::new(RunMode::Verify);
    let file = manager.resolve_snapshot_file(&fixture("simple.rs")).unwrap();
    let mut file = file.lock();

    file.read_file().unwrap();
    assert_eq!(
        file.get_snapshot("foo 1").unwrap(),
        "\n{\n  \"bar\": 1,\n  \"baz\": 2\n}\n"
    );
}

#[test]
fn test_not_read_in_record_mode() {
    let manager = SnapshotManager::new(RunMode::Record);
    let file = manager.resolve_snapshot_file(&fixture("simple.rs")).unwrap();
    let mut file = file.lock();

    file.read_file().unwrap();
    let err = file.get_snapshot("foo 1").unwrap_err();
    assert!(err.to_string().contains("Snapshot 'foo 1' not found"));
}

#[test]
fn test_requested_snapshot_missing() {
    let manager = SnapshotManager::new(RunMode::Verify);
    let file = manager.resolve_snapshot_file(&fixture("simple.rs")).unwrap();
    let file = file.lock();

    let err = file.get_snapshot("does not exist 1").unwrap_err();
    assert_eq!(err.code(), "ERR_INVALID_STATE");
    assert!(err
        .to_string()
        .contains("Snapshot 'does not exist 1' not found"));
    assert_eq!(err.snapshot_id(), Some("does not exist 1"));
    assert_eq!(err.filename(), Some(file.snapshot_path()));
}

#[test]
fn test_unresolvable_snapshot_file() {
    let manager = Arc::new(SnapshotManager::new(RunMode::Verify));
    let err = manager
        .create_assert()
        .assert(&TestInfo::without_file("foo"), "foo")
        .unwrap_err();

    assert_eq!(err.code(), "ERR_INVALID_STATE");
    assert!(err.to_string().contains("Invalid snapshot filename"));
    assert_eq!(err.filename(), None);
}

#[test]
fn test_writes_snapshot_files() {
    let dir = TempDir::new().unwrap();
    let manager = SnapshotManager::new(RunMode::Record);
    let file1 = manager
        .resolve_snapshot_file(&dir.path().join("test1.rs"))
        .unwrap();
    let file2 = manager
        .resolve_snapshot_file(&dir.path().join("test2.rs"))
        .unwrap();
    file1.lock().set_snapshot("foo 1", "foo 1 value");
    file2.lock().set_snapshot("foo 2", "foo 2 value");

    let path1 = file1.lock().snapshot_path().to_path_buf();
    let path2 = file2.lock().snapshot_path().to_path_buf();
    assert!(!path1.exists());
    assert!(!path2.exists());

    manager.write_snapshot_files().unwrap();
    assert_eq!(
        fs::read_to_string(&path1).unwrap(),
        "exports[`foo 1`] = `foo 1 value`;\n"
    );
    assert!(path2.exists());
}

#[test]
fn test_creates_snapshot_directory() {
    let dir = TempDir::new().unwrap();
    let manager = SnapshotManager::new(RunMode::Record);
    let file = manager
        .resolve_snapshot_file(&dir.path().join("foo/bar/baz/test2.rs"))
        .unwrap();
    file.lock().set_snapshot("foo 1", "foo value");

    let path = file.lock().snapshot_path().to_path_buf();
    assert!(!path.exists());
    manager.write_snapshot_files().unwrap();
    assert!(path.exists());
}

#[test]
fn test_no_write_in_verify_mode() {
    let dir = TempDir::new().unwrap();
    let manager = SnapshotManager::new(RunMode::Verify);
    let file = manager
        .resolve_snapshot_file(&dir.path().join("test3.rs"))
        .unwrap();
    file.lock().set_snapshot("foo 1", "foo value");

    manager.write_snapshot_files().unwrap();
    assert!(!file.lock().snapshot_path().exists());
}

#[test]
fn test_write_failure() {
    let dir = TempDir::new().unwrap();
    let manager = SnapshotManager::new(RunMode::Record);
    let file = manager
        .resolve_snapshot_file(&dir.path().join("test4.rs"))
        .unwrap();
    file.lock()
        .snapshots_mut()
        .insert("foo 1".to_string(), "${broken}".to_string());

    let path = file.lock().snapshot_path().to_path_buf();
    let err = manager.write_snapshot_files().unwrap_err();
    assert_eq!(err.code(), "ERR_INVALID_STATE");
    assert!(err.to_string().contains("Cannot write snapshot file"));
    assert_eq!(err.filename(), Some(path.as_path()));
    assert!(err.source().is_some());
    assert!(!path.exists());
}

#[test]
fn test_write_failure_leaves_previous_artifact() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("test5.rs");

    let manager = SnapshotManager::new(RunMode::Record);
    let file = manager.resolve_snapshot_file(&source).unwrap();
    file.lock().set_snapshot("foo 1", "\nfirst\n");
    manager.write_snapshot_files().unwrap();
    let path = file.lock().snapshot_path().to_path_buf();
    let before = fs::read_to_string(&path).unwrap();
    assert_eq!(before, "exports[`foo 1`] = `\nfirst\n`;\n");

    let manager = SnapshotManager::new(RunMode::Record);
    let file = manager.resolve_snapshot_file(&source).unwrap();
    file.lock().set_snapshot("foo 1", "\nsecond\n");
    file.lock()
        .snapshots_mut()
        .insert("foo 2".to_string(), "un`escaped".to_string());

    let err = manager.write_snapshot_files().unwrap_err();
    assert!(err.to_string().contains("Cannot write snapshot file"));
    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn test_crlf_artifact_verifies() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("crlf.rs");
    fs::write(
        dir.path().join("crlf.rs.snapshot"),
        "\u{feff}exports[`value 1`] = `\r\n{\r\n  \"v\": 1\r\n}\r\n`;\r\n",
    )
    .unwrap();

    let manager = Arc::new(SnapshotManager::new(RunMode::Verify));
    let assert = manager.create_assert();
    assert
        .assert(&TestInfo::new(&source, "value"), &json!({"v": 1}))
        .unwrap();
}

#[test]
fn test_changes_snapshot_output_path() {
    let mut config = SnapshotManagerConfig::new(RunMode::Verify);
    config.set_resolve_snapshot_path(|_| Some(PathBuf::from("foobarbaz")));

    let manager = SnapshotManager::with_config(config);
    let file = manager.resolve_snapshot_file(&fixture("simple.rs")).unwrap();
    assert_eq!(file.lock().snapshot_path(), Path::new("foobarbaz"));
}

#[test]
fn test_invalid_path_template() {
    let mut config = SnapshotManagerConfig::new(RunMode::Verify);
    let err = config
        .set_resolve_snapshot_path_template("{nope}.snap")
        .unwrap_err();
    assert_eq!(err.code(), "ERR_INVALID_ARG_VALUE");
}

#[test]
fn test_changes_default_serializers() {
    let mut config = SnapshotManagerConfig::new(RunMode::Verify);
    config.set_default_snapshot_serializers(
        SerializerChain::new().then("fixed", |_| Ok(Stage::from("foobarbaz"))),
    );

    let manager = SnapshotManager::with_config(config);
    assert_eq!(
        manager.serialize(&json!({"foo": 1}), None).unwrap(),
        "\nfoobarbaz\n"
    );
}
