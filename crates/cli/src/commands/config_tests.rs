// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::tempdir;

fn args(key: Option<&str>, value: Option<&str>, unset: bool) -> ConfigArgs {
    ConfigArgs {
        key: key.map(str::to_string),
        value: value.map(str::to_string),
        scope: Scope::Local,
        unset,
    }
}

fn run(args: &ConfigArgs, settings: &Settings, cwd: &Path) -> Result<String> {
    let mut out = Vec::new();
    handle(args, settings, cwd, &mut out)?;
    Ok(String::from_utf8(out)?)
}

#[test]
fn lists_every_key_with_secrets_masked() {
    let dir = tempdir().unwrap();
    let settings = Settings {
        password: "s3cret".to_string(),
        ..Settings::default()
    };

    let output = run(&args(None, None, false), &settings, dir.path()).unwrap();

    assert_eq!(output.lines().count(), config::KEYS.len());
    assert!(output.contains("host: 127.0.0.1\n"));
    assert!(output.contains("password: ********\n"));
    assert!(!output.contains("s3cret"));
}

#[test]
fn reads_one_key() {
    let dir = tempdir().unwrap();
    let output = run(&args(Some("format"), None, false), &Settings::default(), dir.path()).unwrap();
    assert_eq!(output, "human\n");
}

#[test]
fn writes_then_unsets_a_local_key() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(config::FILE_NAME);

    run(&args(Some("host"), Some("tower.example.com"), false), &Settings::default(), dir.path())
        .unwrap();
    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("host = \"tower.example.com\""));

    run(&args(Some("host"), None, true), &Settings::default(), dir.path()).unwrap();
    let written = std::fs::read_to_string(&path).unwrap();
    assert!(!written.contains("host"));
}

#[test]
fn unknown_key_is_rejected_without_writing() {
    let dir = tempdir().unwrap();

    let err = run(&args(Some("colour"), Some("true"), false), &Settings::default(), dir.path())
        .unwrap_err();

    assert!(err.to_string().starts_with("unknown setting `colour`"));
    assert!(!dir.path().join(config::FILE_NAME).exists());
}

#[test]
fn invalid_value_is_rejected() {
    let dir = tempdir().unwrap();
    let result = run(&args(Some("verify_ssl"), Some("sometimes"), false), &Settings::default(), dir.path());
    assert!(result.is_err());
}
