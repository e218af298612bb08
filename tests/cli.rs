//! End-to-end CLI tests
//!
//! Each test runs the binary against an isolated data directory via the
//! LABBOOK_DATA_DIR override.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn labbook(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("labbook").unwrap();
    cmd.env("LABBOOK_DATA_DIR", dir.path());
    cmd.env("LABBOOK_ACTOR", "alice");
    cmd
}

/// Pull the first whitespace-separated token with the given prefix out of
/// command output (ids are printed as e.g. "pro-<uuid>").
fn extract_id(output: &[u8], prefix: &str) -> String {
    let text = String::from_utf8_lossy(output);
    text.split_whitespace()
        .find(|token| token.starts_with(prefix))
        .unwrap_or_else(|| panic!("no {} id in output: {}", prefix, text))
        .to_string()
}

#[test]
fn protocol_edit_and_restore_build_a_forward_chain() {
    let dir = TempDir::new().unwrap();

    let output = labbook(&dir)
        .args(["protocol", "create", "PCR Setup", "--content", "A"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Version:  1"))
        .get_output()
        .stdout
        .clone();
    let group = extract_id(&output, "pro-");

    labbook(&dir)
        .args(["protocol", "edit", group.as_str(), "--content", "B"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Committed version 2"));

    // Version 1 is still retrievable with its original content
    labbook(&dir)
        .args(["protocol", "show", group.as_str(), "--version", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("A"))
        .stdout(predicate::str::contains("superseded"));

    labbook(&dir)
        .args(["protocol", "restore", group.as_str(), "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Restored version 1 as new version 3"));

    // The current version is 3 with version 1's content
    labbook(&dir)
        .args(["protocol", "show", group.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Version:   3"))
        .stdout(predicate::str::contains("current"))
        .stdout(predicate::str::contains("A"));

    // History shows the whole chain with exactly one current marker
    let history = labbook(&dir)
        .args(["protocol", "history", group.as_str()])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let history = String::from_utf8_lossy(&history);
    assert_eq!(history.matches("current").count(), 1);
}

#[test]
fn protocol_diff_marks_added_and_removed_lines() {
    let dir = TempDir::new().unwrap();

    let output = labbook(&dir)
        .args([
            "protocol",
            "create",
            "PCR Setup",
            "--content",
            "step 1\nstep 2",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let group = extract_id(&output, "pro-");

    labbook(&dir)
        .args([
            "protocol",
            "edit",
            group.as_str(),
            "--content",
            "step 1\nstep 2b\nstep 3",
        ])
        .assert()
        .success();

    labbook(&dir)
        .args(["protocol", "diff", group.as_str(), "1", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-step 2"))
        .stdout(predicate::str::contains("+step 2b"))
        .stdout(predicate::str::contains("+2 -1 lines"));
}

#[test]
fn unknown_protocol_fails_with_not_found() {
    let dir = TempDir::new().unwrap();

    labbook(&dir)
        .args([
            "protocol",
            "show",
            "pro-00000000-0000-4000-8000-000000000000",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn signed_entry_rejects_edits_until_unlocked() {
    let dir = TempDir::new().unwrap();

    let output = labbook(&dir)
        .args(["entry", "create", "Gel run", "--content", "draft text"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let entry = extract_id(&output, "ent-");

    labbook(&dir)
        .args(["entry", "sign", entry.as_str(), "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("locked"));

    // Edits against the locked entry fail and change nothing
    labbook(&dir)
        .args(["entry", "edit", entry.as_str(), "--content", "tampered"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("locked"));

    labbook(&dir)
        .args(["entry", "show", entry.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("draft text"))
        .stdout(predicate::str::contains("Signed by: alice"));

    labbook(&dir)
        .args(["entry", "unlock", entry.as_str()])
        .assert()
        .success();

    labbook(&dir)
        .args(["entry", "edit", entry.as_str(), "--content", "corrected"])
        .assert()
        .success();

    labbook(&dir)
        .args(["entry", "show", entry.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("corrected"))
        .stdout(predicate::str::contains("Draft"));
}

#[test]
fn sign_requires_explicit_confirmation() {
    let dir = TempDir::new().unwrap();

    let output = labbook(&dir)
        .args(["entry", "create", "Gel run"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let entry = extract_id(&output, "ent-");

    labbook(&dir)
        .args(["entry", "sign", entry.as_str()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("confirmation"));

    labbook(&dir)
        .args(["entry", "show", entry.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Draft"));
}

#[test]
fn audit_trail_records_the_custody_chain_in_order() {
    let dir = TempDir::new().unwrap();

    let output = labbook(&dir)
        .args(["entry", "create", "Gel run", "--content", "draft text"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let entry = extract_id(&output, "ent-");

    labbook(&dir)
        .args(["entry", "sign", entry.as_str(), "--yes"])
        .assert()
        .success();
    labbook(&dir)
        .args(["entry", "unlock", entry.as_str()])
        .assert()
        .success();
    labbook(&dir)
        .args(["entry", "edit", entry.as_str(), "--content", "corrected"])
        .assert()
        .success();

    let trail = labbook(&dir)
        .args(["audit", "--id", entry.as_str()])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let trail = String::from_utf8_lossy(&trail);

    let create = trail.find("CREATE").expect("CREATE event");
    let lock = trail.find("LOCK").expect("LOCK event");
    let unlock = trail.find("UNLOCK").expect("UNLOCK event");
    let update = trail.find("UPDATE").expect("UPDATE event");
    assert!(create < lock && lock < unlock && unlock < update);
    assert!(trail.contains("alice"));
}

#[test]
fn audit_filters_by_entity_kind() {
    let dir = TempDir::new().unwrap();

    labbook(&dir)
        .args(["protocol", "create", "PCR Setup", "--content", "A"])
        .assert()
        .success();
    labbook(&dir)
        .args(["entry", "create", "Gel run"])
        .assert()
        .success();

    labbook(&dir)
        .args(["audit", "--kind", "protocol"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Protocol"))
        .stdout(predicate::str::contains("Entry").not());

    // Every kind the filter accepts is queryable, even ones no command
    // writes yet
    labbook(&dir)
        .args(["audit", "--kind", "sample"])
        .assert()
        .success();
    labbook(&dir)
        .args(["audit", "--kind", "equipment"])
        .assert()
        .success();

    labbook(&dir)
        .args(["audit", "--kind", "widget"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown entity kind"))
        .stderr(predicate::str::contains("sample"))
        .stderr(predicate::str::contains("equipment"));
}

#[test]
fn audit_json_output_is_parseable() {
    let dir = TempDir::new().unwrap();

    labbook(&dir)
        .args(["entry", "create", "Gel run"])
        .assert()
        .success();

    let output = labbook(&dir)
        .args(["audit", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let line = String::from_utf8_lossy(&output);
    let event: serde_json::Value = serde_json::from_str(line.trim()).unwrap();
    assert_eq!(event["action"], "create");
    assert_eq!(event["actor"], "alice");
}

#[test]
fn mutations_require_an_actor_identity() {
    let dir = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("labbook").unwrap();
    cmd.env("LABBOOK_DATA_DIR", dir.path());
    cmd.args(["entry", "create", "Gel run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("actor"));

    // The --actor flag works in place of the environment variable
    let mut cmd = Command::cargo_bin("labbook").unwrap();
    cmd.env("LABBOOK_DATA_DIR", dir.path());
    cmd.args(["entry", "create", "Gel run", "--actor", "bob"])
        .assert()
        .success();

    labbook(&dir)
        .args(["audit"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bob"));
}

#[test]
fn linked_reagent_blocks_deletion() {
    let dir = TempDir::new().unwrap();

    let output = labbook(&dir)
        .args(["reagent", "add", "Taq polymerase", "--catalog", "EP0402"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let reagent = extract_id(&output, "rgt-");

    let output = labbook(&dir)
        .args(["entry", "create", "Gel run"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let entry = extract_id(&output, "ent-");

    labbook(&dir)
        .args([
            "entry", "link", entry.as_str(), reagent.as_str(), "--quantity", "2.5", "--unit", "uL",
        ])
        .assert()
        .success();

    labbook(&dir)
        .args(["reagent", "delete", reagent.as_str()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("linked"));

    labbook(&dir)
        .args(["entry", "unlink", entry.as_str(), reagent.as_str()])
        .assert()
        .success();
    labbook(&dir)
        .args(["reagent", "delete", reagent.as_str()])
        .assert()
        .success();
}

#[test]
fn project_delete_cascades_to_experiments() {
    let dir = TempDir::new().unwrap();

    let output = labbook(&dir)
        .args(["project", "create", "FEL beamtime"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let project = extract_id(&output, "prj-");

    labbook(&dir)
        .args(["project", "add-experiment", project.as_str(), "Run 1"])
        .assert()
        .success();
    labbook(&dir)
        .args(["project", "add-experiment", project.as_str(), "Run 2"])
        .assert()
        .success();

    labbook(&dir)
        .args(["project", "delete", project.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 experiment(s)"));

    // One Delete event per experiment plus one for the project
    let trail = labbook(&dir)
        .args(["audit"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let trail = String::from_utf8_lossy(&trail);
    assert_eq!(trail.matches("DELETE").count(), 3);
}

#[test]
fn state_survives_process_restarts() {
    let dir = TempDir::new().unwrap();

    let output = labbook(&dir)
        .args(["protocol", "create", "PCR Setup", "--content", "A"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let group = extract_id(&output, "pro-");

    // Every command is a fresh process; the chain and audit ids persist
    labbook(&dir)
        .args(["protocol", "edit", group.as_str(), "--content", "B"])
        .assert()
        .success();

    labbook(&dir)
        .args(["protocol", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PCR Setup"));

    let trail = labbook(&dir)
        .args(["audit", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let ids: Vec<u64> = String::from_utf8_lossy(&trail)
        .lines()
        .map(|l| serde_json::from_str::<serde_json::Value>(l).unwrap()["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2]);
}
