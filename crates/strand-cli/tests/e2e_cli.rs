//! E2E tests for the `strand` binary: documents in, JSON and text out.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn strand_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("strand"));
    cmd.current_dir(dir);
    cmd.env("STRAND_LOG", "error");
    cmd
}

fn write_doc(dir: &Path, name: &str, json: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, json).expect("write document");
    path
}

fn run_json(dir: &Path, args: &[&str]) -> Value {
    let output = strand_cmd(dir).args(args).arg("--json").output().expect("strand should not crash");
    assert!(
        output.status.success(),
        "strand {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid JSON")
}

const PATH_DOC: &str = r#"{
  "nodes": ["A", "B", "C", "D"],
  "edges": [
    { "id": "AB", "from": "A", "to": "B" },
    { "id": "BC", "from": "B", "to": "C" },
    { "id": "CD", "from": "C", "to": "D" }
  ]
}"#;

const SQUARE_DOC: &str = r#"{
  "edges": [
    { "id": "AB", "from": "A", "to": "B" },
    { "id": "BC", "from": "B", "to": "C" },
    { "id": "CD", "from": "C", "to": "D" },
    { "id": "DA", "from": "D", "to": "A" }
  ]
}"#;

const TRIANGLES_DOC: &str = r#"{
  "edges": [
    { "id": "AB", "from": "A", "to": "B" },
    { "id": "BC", "from": "B", "to": "C" },
    { "id": "CA", "from": "C", "to": "A" },
    { "id": "XY", "from": "X", "to": "Y" },
    { "id": "YZ", "from": "Y", "to": "Z" },
    { "id": "ZX", "from": "Z", "to": "X" }
  ]
}"#;

// ---------------------------------------------------------------------------
// cycles
// ---------------------------------------------------------------------------

#[test]
fn cycles_on_path_reports_none() {
    let dir = TempDir::new().expect("temp dir");
    write_doc(dir.path(), "path.json", PATH_DOC);
    let json = run_json(dir.path(), &["cycles", "path.json"]);
    assert_eq!(json["contains_cycle"], false);
    assert_eq!(json["cyclic_nodes"], serde_json::json!([]));
}

#[test]
fn cycles_on_square_lists_every_node() {
    let dir = TempDir::new().expect("temp dir");
    write_doc(dir.path(), "square.json", SQUARE_DOC);
    let json = run_json(dir.path(), &["cycles", "square.json"]);
    assert_eq!(json["contains_cycle"], true);
    assert_eq!(json["cyclic_nodes"], serde_json::json!(["A", "B", "C", "D"]));
}

#[test]
fn directed_cycles_follow_edge_direction() {
    let dir = TempDir::new().expect("temp dir");
    write_doc(
        dir.path(),
        "dag.json",
        r#"{"edges":[{"id":"ab","from":"A","to":"B"},{"id":"bc","from":"B","to":"C"},{"id":"ac","from":"A","to":"C"}]}"#,
    );
    let undirected = run_json(dir.path(), &["cycles", "dag.json"]);
    assert_eq!(undirected["contains_cycle"], true);
    let directed = run_json(dir.path(), &["cycles", "dag.json", "--directed"]);
    assert_eq!(directed["contains_cycle"], false);
}

#[test]
fn cycles_human_output() {
    let dir = TempDir::new().expect("temp dir");
    write_doc(dir.path(), "path.json", PATH_DOC);
    strand_cmd(dir.path())
        .args(["cycles", "path.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No cycles found."));
}

// ---------------------------------------------------------------------------
// partition
// ---------------------------------------------------------------------------

#[test]
fn partition_splits_two_triangles() {
    let dir = TempDir::new().expect("temp dir");
    write_doc(dir.path(), "triangles.json", TRIANGLES_DOC);
    let json = run_json(dir.path(), &["partition", "triangles.json"]);
    let parts = json.as_array().expect("array of partitions");
    assert_eq!(parts.len(), 2);
    let mut first: Vec<&str> = parts[0]["nodes"]
        .as_array()
        .expect("nodes")
        .iter()
        .filter_map(Value::as_str)
        .collect();
    first.sort_unstable();
    assert_eq!(first, vec!["A", "B", "C"]);
    assert_eq!(parts[0]["edges"], serde_json::json!(["AB", "BC", "CA"]));
    assert_eq!(parts[1]["nodes"].as_array().map(Vec::len), Some(3));
}

// ---------------------------------------------------------------------------
// fuse
// ---------------------------------------------------------------------------

#[test]
fn fuse_path_prints_single_edge() {
    let dir = TempDir::new().expect("temp dir");
    write_doc(dir.path(), "path.json", PATH_DOC);
    let json = run_json(dir.path(), &["fuse", "path.json"]);

    assert_eq!(json["summary"]["runs_fused"], 1);
    assert_eq!(json["summary"]["nodes_removed"], 2);
    assert_eq!(json["graph"]["nodes"], serde_json::json!(["A", "D"]));
    let edges = json["graph"]["edges"].as_array().expect("edges");
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0]["id"], "AB+BC+CD");
    assert_eq!(edges[0]["from"], "A");
    assert_eq!(edges[0]["to"], "D");
    assert_eq!(edges[0]["parts"], serde_json::json!(["AB", "BC", "CD"]));
}

#[test]
fn fuse_writes_output_file_that_fuses_again_as_a_no_op() {
    let dir = TempDir::new().expect("temp dir");
    write_doc(dir.path(), "path.json", PATH_DOC);
    let json = run_json(dir.path(), &["fuse", "path.json", "--output", "fused.json"]);
    assert_eq!(json["written_to"], "fused.json");
    assert!(json.get("graph").is_none());
    assert!(dir.path().join("fused.json").exists());

    let again = run_json(dir.path(), &["fuse", "fused.json"]);
    assert_eq!(again["summary"]["runs_fused"], 0);
    assert_eq!(again["graph"]["edges"][0]["id"], "AB+BC+CD");
}

#[test]
fn fuse_square_collapses_by_default() {
    let dir = TempDir::new().expect("temp dir");
    write_doc(dir.path(), "square.json", SQUARE_DOC);
    let json = run_json(dir.path(), &["fuse", "square.json"]);
    assert_eq!(json["summary"]["isolated_cycles"], 1);
    assert_eq!(json["graph"]["nodes"], serde_json::json!(["A"]));
    let edge = &json["graph"]["edges"][0];
    assert_eq!(edge["from"], "A");
    assert_eq!(edge["to"], "A");
    assert_eq!(edge["parts"].as_array().map(Vec::len), Some(4));
}

#[test]
fn fuse_respects_config_in_working_directory() {
    let dir = TempDir::new().expect("temp dir");
    write_doc(dir.path(), "square.json", SQUARE_DOC);
    std::fs::write(dir.path().join("strand.toml"), "[fuse]\nisolated_cycles = \"preserve\"\n")
        .expect("write config");
    let json = run_json(dir.path(), &["fuse", "square.json"]);
    assert_eq!(json["summary"]["isolated_cycles"], 1);
    assert_eq!(json["summary"]["runs_fused"], 0);
    assert_eq!(json["graph"]["edges"].as_array().map(Vec::len), Some(4));
}

#[test]
fn fuse_human_output_shows_summary() {
    let dir = TempDir::new().expect("temp dir");
    write_doc(dir.path(), "path.json", PATH_DOC);
    strand_cmd(dir.path())
        .args(["fuse", "path.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Fuse summary"))
        .stdout(predicate::str::contains("A -- D  AB+BC+CD"));
}

// ---------------------------------------------------------------------------
// failures
// ---------------------------------------------------------------------------

#[test]
fn missing_document_fails_with_path() {
    let dir = TempDir::new().expect("temp dir");
    strand_cmd(dir.path())
        .args(["cycles", "absent.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("absent.json"));
}

#[test]
fn malformed_document_fails() {
    let dir = TempDir::new().expect("temp dir");
    write_doc(dir.path(), "bad.json", "{ \"edges\": 3 }");
    strand_cmd(dir.path())
        .args(["partition", "bad.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse"));
}

#[test]
fn bad_config_fails_fuse() {
    let dir = TempDir::new().expect("temp dir");
    write_doc(dir.path(), "path.json", PATH_DOC);
    std::fs::write(dir.path().join("strand.toml"), "[fuse]\nisolated_cycles = 7\n").expect("write config");
    strand_cmd(dir.path())
        .args(["fuse", "path.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration"));
}

#[test]
fn separator_in_edge_id_is_rejected() {
    let dir = TempDir::new().expect("temp dir");
    write_doc(
        dir.path(),
        "plus.json",
        r#"{"edges":[{"id":"A+B","from":"A","to":"B"},{"id":"BC","from":"B","to":"C"}]}"#,
    );
    strand_cmd(dir.path())
        .args(["fuse", "plus.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("edge id 'A+B'"));
}
