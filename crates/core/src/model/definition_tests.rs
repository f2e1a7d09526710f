// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::model::command::{read_only, resource};
use serde_json::json;
use yare::parameterized;

fn label_builder() -> ResourceBuilder {
    ResourceBuilder::new("label")
        .endpoint("/labels/")
        .inherit(resource())
        .field(Field::new("name").unique())
        .field(Field::new("organization").related("organization"))
}

#[parameterized(
    bare = { "projects", "/projects/" },
    leading = { "/projects", "/projects/" },
    trailing = { "projects/", "/projects/" },
    nested = { "settings/all", "/settings/all/" },
)]
fn endpoints_are_normalized(input: &str, expected: &str) {
    let def = ResourceBuilder::new("x")
        .endpoint(input)
        .identity(&["id"])
        .build()
        .unwrap();
    assert_eq!(def.endpoint(), expected);
}

#[test]
fn missing_endpoint_fails_at_build_time() {
    let err = ResourceBuilder::new("orphan").build().unwrap_err();
    assert_eq!(err, DefinitionError::MissingEndpoint("orphan".into()));

    let err = ResourceBuilder::new("orphan").endpoint("//").build().unwrap_err();
    assert_eq!(err, DefinitionError::MissingEndpoint("orphan".into()));
}

#[test]
fn duplicate_fields_are_rejected() {
    let err = label_builder().field(Field::new("name")).build().unwrap_err();
    assert!(matches!(err, DefinitionError::DuplicateField { .. }));
}

#[test]
fn identity_must_be_declared() {
    let err = ResourceBuilder::new("thing")
        .endpoint("things")
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        DefinitionError::UnknownIdentity {
            kind: "thing".into(),
            field: "name".into()
        }
    );

    let err = ResourceBuilder::new("thing")
        .endpoint("things")
        .identity(&[])
        .build()
        .unwrap_err();
    assert_eq!(err, DefinitionError::NoIdentity("thing".into()));
}

#[test]
fn fields_keep_declaration_order() {
    let def = label_builder().build().unwrap();
    let names: Vec<&str> = def.fields().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["name", "organization"]);
}

#[test]
fn relations_synthesize_commands_but_not_fields() {
    let def = ResourceBuilder::new("job_template")
        .endpoint("job_templates")
        .inherit(resource())
        .field(Field::new("name").unique())
        .relation(Relation::new("labels", "label"))
        .build()
        .unwrap();

    assert!(def.supports("associate_label"));
    assert!(def.supports("disassociate_label"));
    assert!(def.field("labels").is_none());

    let (relation, associate) = def.relation_for("disassociate_label").unwrap();
    assert_eq!(relation.relationship, "labels");
    assert!(!associate);

    let command = def.command("associate_label").unwrap();
    let options: Vec<&str> = command.options.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(options, vec!["job_template", "label"]);
    assert!(command.options.iter().all(|o| o.required));
}

#[test]
fn disabled_commands_are_absent_and_unsupported() {
    let def = ResourceBuilder::new("setting")
        .endpoint("settings/all")
        .identity(&["id"])
        .inherit(resource())
        .disable("create")
        .disable("delete")
        .build()
        .unwrap();

    assert!(!def.supports("create"));
    assert!(def.supports("modify"));
    let err = def.ensure_supports("delete").unwrap_err();
    assert!(matches!(err, Error::UnsupportedOperation { .. }));
    assert_eq!(err.to_string(), "setting does not support `delete`");
}

#[test]
fn inherited_disabled_commands_stay_disabled() {
    let def = ResourceBuilder::new("role")
        .endpoint("roles")
        .identity(&["id"])
        .inherit(read_only())
        .build()
        .unwrap();
    assert!(!def.supports("delete"));
    assert!(def.disabled().contains("delete"));
}

#[test]
fn missing_required_ignores_optional_and_read_only() {
    let def = ResourceBuilder::new("host")
        .endpoint("hosts")
        .field(Field::new("name").unique())
        .field(Field::new("inventory").related("inventory"))
        .field(Field::new("description").optional())
        .field(Field::new("last_job").read_only())
        .build()
        .unwrap();

    let mut fields = Record::new();
    fields.insert("name".into(), json!("web1"));
    assert_eq!(def.missing_required(&fields), vec!["inventory".to_string()]);
}

#[test]
fn unique_fields_include_identity() {
    let def = label_builder().build().unwrap();
    let unique: Vec<&str> = def.unique_fields().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(unique, vec!["name"]);
}

#[test]
fn scoped_endpoint_copy_leaves_original_untouched() {
    let def = label_builder().build().unwrap();
    let scoped = def.with_endpoint("job_templates/4/labels");
    assert_eq!(scoped.endpoint(), "/job_templates/4/labels/");
    assert_eq!(def.endpoint(), "/labels/");
    assert_eq!(scoped.kind(), "label");
}

#[test]
fn job_endpoint_prefers_unified_job_type() {
    let def = ResourceBuilder::new("project")
        .endpoint("projects")
        .field(Field::new("name"))
        .unified_job_type("project_updates")
        .build()
        .unwrap();
    assert_eq!(def.job_endpoint(), "/project_updates/");
    assert_eq!(label_builder().build().unwrap().job_endpoint(), "/labels/");
}
