//! `twr alert` specs

use crate::prelude::*;

#[test]
fn alert_without_execute_fails() {
    Workspace::empty()
        .twr()
        .arg("alert")
        .write_stdin("{}")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Unsupported execution mode (expected --execute flag)",
        ));
}

#[test]
fn alert_with_malformed_payload_fails() {
    Workspace::empty()
        .twr()
        .args(["alert", "--execute"])
        .write_stdin("not json")
        .assert()
        .failure()
        .code(1);
}

#[test]
fn alert_with_unknown_realm_fails() {
    let payload = r#"{
        "configuration": {
            "hostname": "tower.example.com",
            "job_id": 12,
            "realm": "ops",
            "var_name": "host",
            "var_field": "src"
        },
        "result": {"src": "10.0.0.1"}
    }"#;

    Workspace::empty()
        .twr()
        .args(["alert", "--execute"])
        .write_stdin(payload)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("no realm `ops` is configured"));
}
