//! Usage error specs

use crate::prelude::*;

#[test]
fn no_arguments_prints_usage_and_fails() {
    Workspace::empty()
        .twr()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn unknown_resource_fails() {
    Workspace::empty()
        .twr()
        .args(["widget", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("widget"));
}

#[test]
fn disabled_operation_is_not_a_command() {
    Workspace::empty()
        .twr()
        .args(["setting", "create"])
        .assert()
        .failure();
}

#[test]
fn missing_required_positional_fails() {
    Workspace::empty()
        .twr()
        .args(["organization", "copy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("<ID>"));
}

#[test]
fn unknown_output_format_fails() {
    Workspace::empty()
        .twr()
        .args(["user", "list", "--format", "xml"])
        .assert()
        .failure();
}
