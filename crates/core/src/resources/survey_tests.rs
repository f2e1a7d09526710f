// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::record::record;
use crate::test_support::{context, page};
use crate::transport::{FakeTransport, Method};

fn deploy_fields() -> Record {
    record([
        ("name", json!("Deploy")),
        ("project", json!(1)),
        ("playbook", json!("site.yml")),
    ])
}

#[test]
fn create_saves_survey_and_defaults_job_type() {
    let fake = FakeTransport::new();
    fake.respond(Method::Get, "/job_templates/", 200, page(vec![]));
    fake.respond(
        Method::Post,
        "/job_templates/",
        201,
        json!({"id": 4, "name": "Deploy", "survey_enabled": true}),
    );
    fake.respond(Method::Post, "/job_templates/4/survey_spec/", 200, json!({}));
    let ctx = context(&fake);
    let templates = ctx.resource("job_template").unwrap();

    let mut fields = deploy_fields();
    fields.insert("survey_spec".into(), json!(r#"{"name": "s", "spec": []}"#));
    let outcome = templates.create(WriteOptions::default(), fields).unwrap();

    assert!(outcome.changed);
    let posts = fake.calls_with(Method::Post);
    assert_eq!(posts.len(), 2);
    let body = posts[0].body.clone().unwrap();
    assert_eq!(body["job_type"], json!("run"));
    assert!(body.get("survey_spec").is_none());
    assert_eq!(posts[1].path, "/job_templates/4/survey_spec/");
    assert_eq!(posts[1].body, Some(json!({"name": "s", "spec": []})));
}

#[test]
fn modify_with_create_on_missing_keeps_existing_job_type() {
    let fake = FakeTransport::new();
    fake.respond(
        Method::Get,
        "/job_templates/",
        200,
        page(vec![json!({"id": 4, "name": "Deploy", "job_type": "check", "description": "old"})]),
    );
    fake.respond(
        Method::Patch,
        "/job_templates/4/",
        200,
        json!({"id": 4, "name": "Deploy", "job_type": "check", "description": "new"}),
    );
    let ctx = context(&fake);
    let templates = ctx.resource("job_template").unwrap();

    let outcome = templates
        .modify(
            None,
            true,
            record([("name", json!("Deploy")), ("description", json!("new"))]),
        )
        .unwrap();

    assert!(outcome.changed);
    assert!(fake.calls_with(Method::Post).is_empty());
    let body = fake.calls_with(Method::Patch)[0].body.clone().unwrap();
    assert!(body.get("job_type").is_none());
    assert_eq!(body["description"], json!("new"));
}

#[test]
fn empty_survey_spec_deletes_the_survey() {
    let fake = FakeTransport::new();
    fake.respond(Method::Get, "/job_templates/4/", 200, json!({"id": 4, "name": "Deploy"}));
    fake.respond(Method::Delete, "/job_templates/4/survey_spec/", 200, json!({}));
    let ctx = context(&fake);
    let templates = ctx.resource("job_template").unwrap();

    let outcome = templates
        .modify(Some(json!(4)), false, record([("survey_spec", json!("{}"))]))
        .unwrap();

    assert!(outcome.changed);
    assert_eq!(fake.calls_with(Method::Delete).len(), 1);
    assert!(fake.calls_with(Method::Patch).is_empty());
}

#[test]
fn invalid_survey_spec_is_rejected_before_any_request() {
    let fake = FakeTransport::new();
    let ctx = context(&fake);
    let templates = ctx.resource("job_template").unwrap();

    let mut fields = deploy_fields();
    fields.insert("survey_spec".into(), json!("{not json"));
    let err = templates.create(WriteOptions::default(), fields).unwrap_err();

    assert!(matches!(err, Error::Validation(_)));
    assert!(fake.calls().is_empty());
}

#[test]
fn several_extra_vars_blocks_are_merged() {
    let fake = FakeTransport::new();
    fake.respond(Method::Get, "/job_templates/", 200, page(vec![]));
    fake.respond(Method::Post, "/job_templates/", 201, json!({"id": 4}));
    let ctx = context(&fake);
    let templates = ctx.resource("job_template").unwrap();

    let mut fields = deploy_fields();
    fields.insert("extra_vars".into(), json!(["a: 1", "b: 2"]));
    templates.create(WriteOptions::default(), fields).unwrap();

    let body = fake.calls_with(Method::Post)[0].body.clone().unwrap();
    let vars: Value = serde_json::from_str(body["extra_vars"].as_str().unwrap()).unwrap();
    assert_eq!(vars, json!({"a": 1, "b": 2}));
}

#[test]
fn single_extra_vars_block_keeps_its_text() {
    let fake = FakeTransport::new();
    fake.respond(Method::Get, "/job_templates/", 200, page(vec![]));
    fake.respond(Method::Post, "/job_templates/", 201, json!({"id": 4}));
    let ctx = context(&fake);
    let templates = ctx.resource("job_template").unwrap();

    let mut fields = deploy_fields();
    fields.insert("extra_vars".into(), json!(["# rollout\nbatch: 5"]));
    templates.create(WriteOptions::default(), fields).unwrap();

    let body = fake.calls_with(Method::Post)[0].body.clone().unwrap();
    assert_eq!(body["extra_vars"], json!("# rollout\nbatch: 5"));
}

#[test]
fn survey_fetches_the_spec() {
    let fake = FakeTransport::new();
    fake.respond(Method::Get, "/job_templates/", 200, page(vec![json!({"id": 4, "name": "Deploy"})]));
    fake.respond(
        Method::Get,
        "/job_templates/4/survey_spec/",
        200,
        json!({"name": "s", "spec": [{"variable": "batch"}]}),
    );
    let ctx = context(&fake);
    let templates = ctx.resource("job_template").unwrap();

    let spec = survey(&templates, None, record([("name", json!("Deploy"))])).unwrap();
    assert_eq!(spec["spec"][0]["variable"], json!("batch"));
}

#[test]
fn survey_on_kind_without_surveys_is_unsupported() {
    let fake = FakeTransport::new();
    let ctx = context(&fake);
    let projects = ctx.resource("project").unwrap();

    let err = survey(&projects, Some(&json!(1)), Record::new()).unwrap_err();
    assert!(matches!(err, Error::UnsupportedOperation { .. }));
}
