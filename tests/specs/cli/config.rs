//! `twr config` specs: files, environment and flag precedence

use crate::prelude::*;

#[test]
fn set_then_get_a_local_key() {
    let ws = Workspace::empty();

    ws.twr()
        .args(["config", "host", "files.example.com", "--scope", "local"])
        .assert()
        .success()
        .stdout("Configuration updated successfully.\n");
    assert!(ws.read(".twr.toml").contains("files.example.com"));

    ws.twr()
        .args(["config", "host"])
        .assert()
        .success()
        .stdout("files.example.com\n");
}

#[test]
fn environment_overrides_files() {
    let ws = Workspace::empty();
    ws.file(".twr.toml", "host = \"files.example.com\"\n");

    ws.twr()
        .env("TWR_HOST", "env.example.com")
        .args(["config", "host"])
        .assert()
        .success()
        .stdout("env.example.com\n");
}

#[test]
fn flags_override_environment() {
    let ws = Workspace::empty();

    ws.twr()
        .env("TWR_HOST", "env.example.com")
        .args(["config", "host", "--tower-host", "flag.example.com"])
        .assert()
        .success()
        .stdout("flag.example.com\n");
}

#[test]
fn nearer_local_file_wins() {
    let ws = Workspace::empty();
    ws.file(".twr.toml", "host = \"outer.example.com\"\nformat = \"yaml\"\n");
    ws.file("project/.twr.toml", "host = \"inner.example.com\"\n");

    ws.twr()
        .current_dir(ws.path().join("project"))
        .args(["config", "host"])
        .assert()
        .success()
        .stdout("inner.example.com\n");
    ws.twr()
        .current_dir(ws.path().join("project"))
        .args(["config", "format"])
        .assert()
        .success()
        .stdout("yaml\n");
}

#[test]
fn unset_removes_a_key() {
    let ws = Workspace::empty();
    ws.file(".twr.toml", "host = \"files.example.com\"\nusername = \"admin\"\n");

    ws.twr()
        .args(["config", "host", "--unset", "--scope", "local"])
        .assert()
        .success();

    let content = ws.read(".twr.toml");
    assert!(!content.contains("host"));
    assert!(content.contains("admin"));
}

#[test]
fn unknown_key_fails() {
    Workspace::empty()
        .twr()
        .args(["config", "colour", "true", "--scope", "local"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("unknown setting `colour`"));
}

#[test]
fn password_is_masked() {
    let ws = Workspace::empty();
    ws.file(".twr.toml", "password = \"s3cret\"\n");

    ws.twr()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("password: ********"))
        .stdout(predicate::str::contains("s3cret").not());
}
