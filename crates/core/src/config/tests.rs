// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::TempDir;
use yare::parameterized;

fn env(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn defaults_without_any_source() {
    let settings = Settings::load_from(&[], env(&[])).unwrap();
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.host, "127.0.0.1");
    assert!(settings.verify_ssl);
    assert_eq!(settings.format, OutputFormat::Human);
}

#[test]
fn later_files_win() {
    let dir = TempDir::new().unwrap();
    let global = write(&dir, "global.toml", "host = \"global.example\"\nusername = \"admin\"\n");
    let local = write(&dir, "local.toml", "host = \"local.example\"\n");

    let settings = Settings::load_from(&[global, local], env(&[])).unwrap();
    assert_eq!(settings.host, "local.example");
    assert_eq!(settings.username, "admin");
}

#[test]
fn env_overrides_files() {
    let dir = TempDir::new().unwrap();
    let file = write(&dir, "user.toml", "host = \"file.example\"\nverify_ssl = true\n");

    let settings = Settings::load_from(
        &[file],
        env(&[
            ("TWR_HOST", "env.example"),
            ("TWR_VERIFY_SSL", "false"),
            ("TWR_LOG", "debug"),
            ("HOME", "/nowhere"),
        ]),
    )
    .unwrap();
    assert_eq!(settings.host, "env.example");
    assert!(!settings.verify_ssl);
}

#[test]
fn runtime_overrides_env() {
    let settings = Settings::load_from(&[], env(&[("TWR_HOST", "env.example")])).unwrap();
    let scoped = settings.with_overrides(&SettingsLayer {
        host: Some("flag.example".into()),
        format: Some(OutputFormat::Json),
        ..SettingsLayer::default()
    });

    assert_eq!(scoped.host, "flag.example");
    assert_eq!(scoped.format, OutputFormat::Json);
    assert_eq!(settings.host, "env.example");
}

#[test]
fn missing_file_is_empty_layer() {
    let dir = TempDir::new().unwrap();
    let layer = SettingsLayer::from_file(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(layer, SettingsLayer::default());
}

#[test]
fn malformed_file_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "bad.toml", "host = [unterminated");
    let err = SettingsLayer::from_file(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("bad.toml"));
}

#[test]
fn invalid_env_boolean_is_rejected() {
    let err = Settings::load_from(&[], env(&[("TWR_VERBOSE", "sometimes")])).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "verbose"));
}

#[parameterized(
    human = { "human", OutputFormat::Human },
    json = { "json", OutputFormat::Json },
    yaml = { "YAML", OutputFormat::Yaml },
    id = { "id", OutputFormat::Id },
)]
fn parses_output_format(text: &str, expected: OutputFormat) {
    assert_eq!(text.parse::<OutputFormat>().unwrap(), expected);
}

#[test]
fn rejects_unknown_format() {
    assert!("table".parse::<OutputFormat>().is_err());
}

#[test]
fn set_rejects_unknown_key() {
    let mut layer = SettingsLayer::default();
    let err = layer.set("hostname", "x").unwrap_err();
    assert!(matches!(err, ConfigError::UnknownKey(ref k) if k == "hostname"));
}

#[test]
fn write_key_then_unset() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join(FILE_NAME);

    write_key(&path, "host", Some("tower.example")).unwrap();
    write_key(&path, "verify_ssl", Some("no")).unwrap();
    let layer = SettingsLayer::from_file(&path).unwrap();
    assert_eq!(layer.host.as_deref(), Some("tower.example"));
    assert_eq!(layer.verify_ssl, Some(false));

    write_key(&path, "host", None).unwrap();
    let layer = SettingsLayer::from_file(&path).unwrap();
    assert_eq!(layer.host, None);
    assert_eq!(layer.verify_ssl, Some(false));
}

#[test]
fn local_files_apply_outermost_first() {
    let dir = TempDir::new().unwrap();
    let inner = dir.path().join("project").join("sub");
    std::fs::create_dir_all(&inner).unwrap();
    std::fs::write(dir.path().join(FILE_NAME), "host = \"outer\"\n").unwrap();
    std::fs::write(inner.join(FILE_NAME), "host = \"inner\"\n").unwrap();

    let paths = file_paths(&inner);
    let outer_at = paths.iter().position(|p| p == &dir.path().join(FILE_NAME)).unwrap();
    let inner_at = paths.iter().position(|p| p == &inner.join(FILE_NAME)).unwrap();
    assert!(outer_at < inner_at);
    assert_eq!(paths[0], PathBuf::from(GLOBAL_PATH));
}

#[test]
fn realm_credentials_override_base() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "realms.toml",
        r#"
host = "default.example"
username = "admin"

[realms.prod]
host = "prod.example"
username = "alerts"
password = "secret"
"#,
    );
    let settings = Settings::load_from(&[path], env(&[])).unwrap();
    let prod = settings.for_realm("prod").unwrap();
    assert_eq!(prod.host, "prod.example");
    assert_eq!(prod.username, "alerts");
    assert_eq!(prod.password, "secret");

    assert!(matches!(
        settings.for_realm("staging"),
        Err(ConfigError::UnknownRealm(_))
    ));
}

#[test]
fn get_renders_each_key() {
    let settings = Settings::default();
    for key in KEYS {
        settings.get(key).unwrap();
    }
    assert_eq!(settings.get("verify_ssl").unwrap(), "true");
    assert!(settings.get("nope").is_err());
}
