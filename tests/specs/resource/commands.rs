//! Resource command specs that stop before, or fail at, the network

use crate::prelude::*;

#[test]
fn invalid_field_value_fails_before_connecting() {
    Workspace::empty()
        .twr()
        .args(["user", "create", "--username", "al", "--is-superuser", "maybe"])
        .args(["--tower-host", CLOSED_HOST])
        .assert()
        .failure()
        .code(64)
        .stderr(predicate::str::contains("is not a valid boolean"));
}

#[test]
fn plain_http_requires_insecure() {
    Workspace::empty()
        .twr()
        .args(["user", "list", "--tower-host", "http://127.0.0.1:9"])
        .assert()
        .failure()
        .code(1);
}

#[test]
fn unreachable_server_is_a_connection_error() {
    Workspace::empty()
        .twr()
        .args(["user", "list", "--insecure", "--tower-host", CLOSED_HOST])
        .assert()
        .failure()
        .code(120)
        .stderr(predicate::str::contains("Connection error"));
}

#[test]
fn relation_command_requires_both_sides() {
    Workspace::empty()
        .twr()
        .args(["organization", "associate", "--organization", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--user"));
}
