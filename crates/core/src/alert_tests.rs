// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::config::Realm;
use crate::transport::{FakeTransport, Method};

const PAYLOAD: &str = r#"{
    "session_key": "abc",
    "configuration": {
        "hostname": "tower.example",
        "job_id": "12",
        "realm": "ops",
        "var_name": "target_host",
        "var_field": "host"
    },
    "result": {"host": "web-01", "count": "3"}
}"#;

fn payload() -> AlertPayload {
    AlertPayload::from_json(PAYLOAD).unwrap()
}

#[test]
fn extra_vars_come_from_the_result_field() {
    assert_eq!(payload().extra_vars(), "target_host: web-01");
}

#[test]
fn missing_result_field_gives_empty_value() {
    let mut alert = payload();
    alert.result.clear();
    assert_eq!(alert.extra_vars(), "target_host: ");
}

#[test]
fn settings_use_realm_credentials_and_payload_host() {
    let mut base = Settings::default();
    base.realms.insert(
        "ops".into(),
        Realm {
            host: Some("realm.example".into()),
            username: Some("svc".into()),
            password: Some("pw".into()),
            ..Realm::default()
        },
    );

    let settings = payload().settings(&base).unwrap();

    assert_eq!(settings.host, "tower.example");
    assert_eq!(settings.username, "svc");
    assert_eq!(settings.password, "pw");
}

#[test]
fn unknown_realm_is_an_error() {
    let err = payload().settings(&Settings::default()).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn launch_posts_extra_vars_and_returns_job() {
    let fake = FakeTransport::new();
    fake.respond(Method::Post, "/job_templates/12/launch/", 201, json!({"job": 88, "id": 88}));
    let api = ApiClient::new(fake.clone());

    let job = launch(&api, &payload()).unwrap();

    assert_eq!(job, json!(88));
    let post = &fake.calls()[0];
    assert_eq!(post.body, Some(json!({"extra_vars": "target_host: web-01"})));
}

#[test]
fn launch_failure_is_reported() {
    let fake = FakeTransport::new();
    let api = ApiClient::new(fake.clone());

    let err = launch(&api, &payload()).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn payload_without_configuration_is_rejected() {
    assert!(AlertPayload::from_json(r#"{"result": {}}"#).is_err());
}
