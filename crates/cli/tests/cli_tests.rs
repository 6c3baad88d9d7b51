//! Tests for the probecache binary
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const SNAPSHOT: &str = "L|TypeA|loaderX|77\nE|a/B.class|3|file:/lib/a.jar\nE|a/C.class|-1\nL|TypeB|<null>|0\n";

fn probecache() -> Command {
    let mut cmd = Command::cargo_bin("probecache").unwrap();
    for var in [
        "PROBECACHE_ENABLED",
        "PROBECACHE_DUMP_PATH",
        "PROBECACHE_LOAD_PATH",
        "PROBECACHE_MAX_ENTRIES",
        "PROBECACHE_VERBOSE",
    ] {
        cmd.env_remove(var);
    }
    cmd.env("RUST_LOG", "off");
    cmd
}

fn snapshot(content: &str) -> (std::path::PathBuf, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("app.snapshot");
    fs::write(&path, content).unwrap();
    (path, temp_dir)
}

#[test]
fn test_check_valid_snapshot() {
    let (path, _temp_dir) = snapshot(SNAPSHOT);
    probecache()
        .arg("check")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("ok (2 buckets, 2 entries)"));
}

#[test]
fn test_check_corrupt_snapshot_fails() {
    let (path, _temp_dir) = snapshot("X|garbage\n");
    probecache()
        .arg("check")
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("line 1"));
}

#[test]
fn test_check_missing_snapshot_fails() {
    let temp_dir = TempDir::new().unwrap();
    probecache()
        .arg("check")
        .arg(temp_dir.path().join("absent"))
        .assert()
        .code(1);
}

#[test]
fn test_inspect_table() {
    let (path, _temp_dir) = snapshot(SNAPSHOT);
    probecache()
        .arg("inspect")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("TypeA (loaderX) #77: 2 entries"))
        .stdout(predicate::str::contains("TypeB #0: 0 entries"))
        .stdout(predicate::str::contains("file:/lib/a.jar"))
        .stdout(predicate::str::contains("missing"));
}

#[test]
fn test_inspect_json() {
    let (path, _temp_dir) = snapshot(SNAPSHOT);
    let output = probecache()
        .arg("inspect")
        .arg(&path)
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let buckets: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let buckets = buckets.as_array().unwrap();
    assert_eq!(buckets.len(), 2);
    assert_eq!(buckets[0]["owner_type_name"], "TypeA");
    assert_eq!(buckets[0]["owner_instance_name"], "loaderX");
    assert_eq!(buckets[0]["entries"][0]["name"], "a/B.class");
    assert_eq!(buckets[0]["entries"][0]["location_token"], "file:/lib/a.jar");
    assert_eq!(buckets[0]["entries"][1]["index"], -1);
    assert!(buckets[1]["owner_instance_name"].is_null());
}

#[test]
fn test_config_from_file_and_flags() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("config.json");
    fs::write(
        &config_file,
        r#"{"cache": {"enabled": true, "max_entries": 10}}"#,
    )
    .unwrap();

    let output = probecache()
        .arg("config")
        .arg("--config-file")
        .arg(&config_file)
        .arg("--max-entries")
        .arg("25")
        .output()
        .unwrap();
    assert!(output.status.success());

    let config: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(config["enabled"], true);
    assert_eq!(config["max_entries"], 25);
}

#[test]
fn test_config_contradiction_exits_with_config_code() {
    let temp_dir = TempDir::new().unwrap();
    probecache()
        .arg("config")
        .arg("--config-file")
        .arg(temp_dir.path().join("none.json"))
        .arg("--dump-path")
        .arg(temp_dir.path().join("out.snapshot"))
        .assert()
        .code(2);
}
