// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 mp-builder contributors

//! End-to-end tests for the mp-builder binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

const TWO_STEPS: &str = r#"
config_version: "0.1.0"
workflows:
  - id: qc
    name: fastqc
    version: "1.0"
    pipeline_location: ./pipelines/fastqc
  - id: align
    name: rnaseq
    version: "3.14.0"
    pipeline_location: https://github.com/nf-core/rnaseq
transitions:
  - run: qc
  - run: align
    from: qc
    adapter: fastq
"#;

/// The binary, run offline inside `dir` with a private config home
fn mp_builder(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("mp-builder").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env("XDG_CACHE_HOME", dir.join(".cache"))
        .env("NO_COLOR", "1")
        .env_remove("MP_BUILDER_CATALOG_URL")
        .env_remove("RUST_LOG")
        .arg("--offline");
    cmd
}

fn workspace(document: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("metaworkflow.yaml"), document).unwrap();
    dir
}

#[test]
fn init_then_validate() {
    let dir = TempDir::new().unwrap();

    mp_builder(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created metaworkflow.yaml"));

    assert!(dir.path().join("metaworkflow.yaml").exists());

    mp_builder(dir.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 step(s), 2 transition(s)"));
}

#[test]
fn init_refuses_to_overwrite() {
    let dir = workspace(TWO_STEPS);

    mp_builder(dir.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    mp_builder(dir.path()).args(["init", "--force"]).assert().success();
}

#[test]
fn validate_reports_missing_document() {
    let dir = TempDir::new().unwrap();

    mp_builder(dir.path())
        .args(["validate", "nope.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn validate_warns_when_catalog_is_unavailable() {
    let dir = workspace(TWO_STEPS);

    mp_builder(dir.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("pipeline catalog"))
        .stdout(predicate::str::contains("valid but has warnings"));
}

#[test]
fn validate_reports_every_schema_issue() {
    let dir = workspace(
        r#"
config_version: "0.1.0"
workflows:
  - id: qc
    version: 1
transitions:
  - from: qc
"#,
    );

    mp_builder(dir.path())
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("workflows[0].name"))
        .stderr(predicate::str::contains("workflows[0].version"))
        .stderr(predicate::str::contains("transitions[0].run"));
}

#[test]
fn validate_rejects_cycles() {
    let dir = workspace(
        r#"
config_version: "0.1.0"
workflows:
  - id: a
    name: a
    version: "1"
    pipeline_location: ./a
  - id: b
    name: b
    version: "1"
    pipeline_location: ./b
transitions:
  - run: a
  - run: b
    from: a
  - run: a
    from: b
"#,
    );

    mp_builder(dir.path())
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cycle"));
}

#[test]
fn order_lists_steps() {
    let dir = workspace(TWO_STEPS);

    mp_builder(dir.path())
        .arg("order")
        .assert()
        .success()
        .stdout(predicate::str::ends_with("qc\nalign\n"));
}

#[test]
fn graph_formats() {
    let dir = workspace(TWO_STEPS);

    mp_builder(dir.path())
        .args(["graph", "--format", "mermaid"])
        .assert()
        .success()
        .stdout(predicate::str::contains("graph LR"))
        .stdout(predicate::str::contains("qc -->|fastq| align"));

    mp_builder(dir.path())
        .args(["graph", "--format", "dot"])
        .assert()
        .success()
        .stdout(predicate::str::contains("digraph metapipeline"));

    mp_builder(dir.path())
        .args(["graph", "--format", "ascii"])
        .assert()
        .success()
        .stdout(predicate::str::contains("START"))
        .stdout(predicate::str::contains("────→"))
        .stdout(predicate::str::contains("rnaseq 3.14.0"));

    mp_builder(dir.path())
        .arg("graph")
        .assert()
        .success()
        .stdout(predicate::str::contains("2. align (rnaseq 3.14.0) [after: qc]"));
}

#[test]
fn add_and_remove_steps() {
    let dir = workspace(TWO_STEPS);

    mp_builder(dir.path())
        .args(["add-step", "--parent", "align"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added node1 after align"));

    mp_builder(dir.path())
        .args(["add-step", "--parent", "node0", "--id", "side"])
        .args(["--pipeline", "sarek", "--pipeline-version", "3.4.0", "--location", "./sarek"])
        .assert()
        .success();

    let document = std::fs::read_to_string(dir.path().join("metaworkflow.yaml")).unwrap();
    assert!(document.contains("id: node1"));
    assert!(document.contains("name: sarek"));

    mp_builder(dir.path())
        .args(["remove-step", "qc"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed qc, align, node1"));

    mp_builder(dir.path())
        .arg("order")
        .assert()
        .success()
        .stdout(predicate::str::contains("side"))
        .stdout(predicate::str::contains("qc").not());
}

#[test]
fn root_cannot_be_removed() {
    let dir = workspace(TWO_STEPS);

    mp_builder(dir.path())
        .args(["remove-step", "node0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("start node"));

    let document = std::fs::read_to_string(dir.path().join("metaworkflow.yaml")).unwrap();
    assert_eq!(document, TWO_STEPS);
}

#[test]
fn snapshot_round_trip() {
    let dir = workspace(TWO_STEPS);

    mp_builder(dir.path())
        .args(["snapshot", "save", "graph.json"])
        .assert()
        .success();

    let json = std::fs::read_to_string(dir.path().join("graph.json")).unwrap();
    assert!(json.contains("\"adjacency\""));

    mp_builder(dir.path())
        .args(["snapshot", "load", "graph.json", "--output", "restored.yaml"])
        .assert()
        .success();

    mp_builder(dir.path())
        .args(["order", "restored.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("qc\nalign"));
}

#[test]
fn catalog_offline() {
    let dir = TempDir::new().unwrap();

    mp_builder(dir.path())
        .arg("catalog")
        .assert()
        .success()
        .stdout(predicate::str::contains("unavailable"));
}
