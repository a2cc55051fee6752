// VDB - Verification Debugger
// Copyright (C) 2024 Zhuo Zhang and Wuqi Zhang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Command-line interface tests

use assert_cmd::Command;
use predicates::prelude::*;
use tracing::info;

const PROOF_LOG: &str = r#"{
    "steps": [
        { "verifiable": 0, "methodType": "method", "methodName": "swap", "fileName": "swap.vpr",
          "canBeShownAsDecoration": true, "position": { "line": 1, "character": 2 } },
        { "verifiable": 0, "parent": 0, "methodType": "method", "methodName": "swap", "fileName": "swap.vpr",
          "canBeShownAsDecoration": true, "pathConditions": ["x != y"],
          "position": { "line": 2, "character": 2 } }
    ]
}"#;

fn write_log(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("swap.vpr.proof.json");
    std::fs::write(&path, PROOF_LOG).unwrap();
    path
}

fn vdb(dir: &tempfile::TempDir) -> Command {
    let config = dir.path().join("vdb.toml");
    std::fs::write(&config, format!("heap_image_dir = {:?}\n", dir.path().display().to_string()))
        .unwrap();
    let mut cmd = Command::cargo_bin("vdb").unwrap();
    cmd.arg("--config").arg(config);
    cmd
}

#[test]
fn test_help_command() {
    vdb_common::logging::ensure_test_logging(None);
    info!("Running test");
    let mut cmd = Command::cargo_bin("vdb").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Verification Debugger"));
}

#[test]
fn test_version_command() {
    vdb_common::logging::ensure_test_logging(None);
    info!("Running test");
    let mut cmd = Command::cargo_bin("vdb").unwrap();
    cmd.arg("--version").assert().success().stdout(predicate::str::contains("vdb"));
}

#[test]
fn test_trace_subcommand_help() {
    vdb_common::logging::ensure_test_logging(None);
    info!("Running test");
    let mut cmd = Command::cargo_bin("vdb").unwrap();
    cmd.arg("trace")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Print the execution trace"));
}

#[test]
fn test_missing_subcommand() {
    vdb_common::logging::ensure_test_logging(None);
    info!("Running test");
    let mut cmd = Command::cargo_bin("vdb").unwrap();
    cmd.assert().failure().stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_trace_prints_json() {
    vdb_common::logging::ensure_test_logging(None);
    info!("Running test");
    let dir = tempfile::tempdir().unwrap();
    let log = write_log(&dir);

    let output = vdb(&dir)
        .args(["trace", "--state", "1", "--log"])
        .arg(&log)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let trace: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let states: Vec<_> =
        trace.as_array().unwrap().iter().map(|entry| entry["state"].as_u64().unwrap()).collect();
    assert_eq!(states, vec![1, 0]);
}

#[test]
fn test_trace_state_out_of_range() {
    vdb_common::logging::ensure_test_logging(None);
    info!("Running test");
    let dir = tempfile::tempdir().unwrap();
    let log = write_log(&dir);

    vdb(&dir)
        .args(["trace", "--state", "7", "--log"])
        .arg(&log)
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
}

#[test]
fn test_heap_comparison_html() {
    vdb_common::logging::ensure_test_logging(None);
    info!("Running test");
    let dir = tempfile::tempdir().unwrap();
    let log = write_log(&dir);

    vdb(&dir)
        .args(["heap", "--state", "1", "--previous", "0", "--log"])
        .arg(&log)
        .assert()
        .success()
        .stdout(predicate::str::contains("Current State"))
        .stdout(predicate::str::contains("Previous State"))
        .stdout(predicate::str::contains("<b>x != y</b>"));
}

#[test]
fn test_heap_image_written_on_request() {
    vdb_common::logging::ensure_test_logging(None);
    info!("Running test");
    let dir = tempfile::tempdir().unwrap();
    let log = write_log(&dir);
    let image = dir.path().join("heap_0.svg");

    vdb(&dir)
        .args(["heap", "--state", "1", "--with-heap", "--log"])
        .arg(&log)
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("<img src=\"{}\">", image.display())));
    assert!(std::fs::read_to_string(&image).unwrap().starts_with("<svg"));
}

#[test]
fn test_missing_proof_log() {
    vdb_common::logging::ensure_test_logging(None);
    info!("Running test");
    let dir = tempfile::tempdir().unwrap();

    vdb(&dir)
        .args(["heap", "--state", "0", "--log"])
        .arg(dir.path().join("absent.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read proof log"));
}
