//! Help output specs

use crate::prelude::*;

#[test]
fn help_lists_resources_and_commands() {
    Workspace::empty()
        .twr()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("organization"))
        .stdout(predicate::str::contains("job_template"))
        .stdout(predicate::str::contains("notification_template"))
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("alert"));
}

#[test]
fn resource_help_lists_its_operations() {
    Workspace::empty()
        .twr()
        .args(["job", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("launch"))
        .stdout(predicate::str::contains("monitor"))
        .stdout(predicate::str::contains("relaunch"));
}

#[test]
fn command_help_lists_field_options() {
    Workspace::empty()
        .twr()
        .args(["user", "create", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--username"))
        .stdout(predicate::str::contains("--fail-on-found"))
        .stdout(predicate::str::contains("--tower-host"));
}

#[test]
fn version_is_printed() {
    Workspace::empty()
        .twr()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("twr "));
}
