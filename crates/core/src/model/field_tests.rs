// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;
use std::io::Write;
use yare::parameterized;

#[test]
fn new_fields_are_required_and_displayed() {
    let field = Field::new("name");
    assert!(field.required);
    assert!(field.display);
    assert!(!field.unique);
    assert_eq!(field.kind, FieldType::Text);
}

#[test]
fn builder_methods_compose() {
    let field = Field::new("job_template")
        .related("job_template")
        .optional()
        .short('J')
        .no_lookup();
    assert_eq!(field.related_kind(), Some("job_template"));
    assert_eq!(field.key, Some('J'));
    assert!(!field.required);
    assert!(field.no_lookup);
    assert_eq!(field.option_name(), "job-template");
}

#[parameterized(
    int = { FieldType::Integer, "42", json!(42) },
    negative_int = { FieldType::Integer, " -3 ", json!(-3) },
    bool_true = { FieldType::Boolean, "yes", json!(true) },
    bool_false = { FieldType::Boolean, "False", json!(false) },
    related_id = { FieldType::Related("inventory".into()), "7", json!(7) },
    related_name = { FieldType::Related("inventory".into()), "prod", json!("prod") },
    text = { FieldType::Text, "hello", json!("hello") },
    mapped_by_code = { FieldType::MappedChoice(vec![(0, "normal".into()), (1, "verbose".into())]), "1", json!(1) },
    mapped_by_label = { FieldType::MappedChoice(vec![(0, "normal".into()), (1, "verbose".into())]), "verbose", json!(1) },
    null_sentinel = { FieldType::Integer, "null", json!("null") },
)]
fn coerces_input(kind: FieldType, raw: &str, expected: Value) {
    let field = Field::new("f").typed(kind);
    assert_eq!(field.coerce(raw).unwrap(), expected);
}

#[parameterized(
    bad_int = { FieldType::Integer, "ten" },
    bad_bool = { FieldType::Boolean, "maybe" },
    bad_choice = { FieldType::Choice(vec!["run".into(), "check".into()]), "scan" },
    bad_mapped = { FieldType::MappedChoice(vec![(0, "normal".into())]), "5" },
)]
fn rejects_invalid_input(kind: FieldType, raw: &str) {
    let field = Field::new("f").typed(kind);
    let err = field.coerce(raw).unwrap_err();
    assert_eq!(err.exit_code(), 64);
    assert!(err.to_string().starts_with("--f:"));
}

#[test]
fn variables_read_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "foo: bar").unwrap();
    let field = Field::new("extra_vars").typed(FieldType::Variables);
    let raw = format!("@{}", file.path().display());
    assert_eq!(field.coerce(&raw).unwrap(), json!("foo: bar\n"));
}

#[test]
fn relation_suffix_defaults_to_singular() {
    let relation = Relation::new("labels", "label");
    assert_eq!(relation.associate_command(), "associate_label");
    assert_eq!(relation.disassociate_command(), "disassociate_label");

    let relation = Relation::new("instance_groups", "instance_group").suffix("ig");
    assert_eq!(relation.associate_command(), "associate_ig");
}

#[test]
fn empty_suffix_gives_plain_commands() {
    let relation = Relation::new("users", "user").suffix("");
    assert_eq!(relation.associate_command(), "associate");
    assert_eq!(relation.disassociate_command(), "disassociate");
}
