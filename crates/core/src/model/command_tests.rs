// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn names(set: &CommandSet) -> Vec<&str> {
    set.commands.iter().map(|c| c.name.as_str()).collect()
}

#[test]
fn base_sets_compose_in_order() {
    assert_eq!(names(&base()), vec!["get", "list", "delete"]);
    assert_eq!(
        names(&resource()),
        vec!["get", "list", "delete", "create", "modify", "copy"]
    );
    assert_eq!(
        names(&executable()),
        vec![
            "get", "list", "delete", "create", "modify", "copy", "stdout", "monitor", "wait",
            "status", "cancel", "relaunch"
        ]
    );
}

#[test]
fn read_only_drops_delete_and_remembers_it() {
    let set = read_only();
    assert_eq!(names(&set), vec!["get", "list"]);
    assert!(set.disabled.contains("delete"));

    let child = CommandSet::derive("child", &[set], Vec::new(), &[]);
    assert!(!names(&child).contains(&"delete"));
}

#[test]
fn own_declaration_re_enables_a_disabled_command() {
    let child = CommandSet::derive(
        "child",
        &[read_only()],
        vec![CommandSpec::new("delete", "Really delete.")],
        &[],
    );
    assert!(names(&child).contains(&"delete"));
    assert!(!child.disabled.contains("delete"));
}

#[test]
fn options_from_several_parents_are_unioned_first_wins() {
    let left = CommandSet::derive(
        "left",
        &[],
        vec![CommandSpec::new("launch", "Left.")
            .option(OptionSpec::flag("monitor", "left monitor"))
            .option(OptionSpec::value("timeout", "left timeout"))],
        &[],
    );
    let right = CommandSet::derive(
        "right",
        &[],
        vec![CommandSpec::new("launch", "Right.")
            .option(OptionSpec::value("timeout", "right timeout"))
            .option(OptionSpec::flag("wait", "right wait"))],
        &[],
    );

    let merged = CommandSet::derive("both", &[left, right], Vec::new(), &[]);
    let launch = &merged.commands[0];
    let options: Vec<&str> = launch.options.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(options, vec!["monitor", "timeout", "wait"]);
    assert_eq!(launch.find_option("timeout").unwrap().help, "left timeout");
    assert_eq!(launch.help, "Left.");
}

#[test]
fn child_option_takes_precedence_over_inherited() {
    let child = CommandSet::derive(
        "project",
        &[resource()],
        vec![CommandSpec::new("create", "")
            .option(OptionSpec::flag("fail_on_found", "Child help"))
            .option(OptionSpec::flag("monitor", "Monitor the first update"))],
        &[],
    );
    let create = child.commands.iter().find(|c| c.name == "create").unwrap();
    assert_eq!(create.find_option("fail_on_found").unwrap().help, "Child help");
    assert!(create.find_option("force_on_exists").is_some());
    assert!(create.find_option("monitor").is_some());
    assert_eq!(
        create.help,
        "Create a record, or report it unchanged if it exists."
    );
}

#[test]
fn option_names_use_dashes() {
    assert_eq!(
        OptionSpec::flag("fail_on_found", "").option_name(),
        "fail-on-found"
    );
}

#[test]
fn child_inherits_unset_args_and_field_options() {
    let child = CommandSet::derive(
        "node",
        &[resource()],
        vec![CommandSpec::new("modify", "").option(OptionSpec::flag("extra", "Extra"))],
        &[],
    );
    let modify = child.commands.iter().find(|c| c.name == "modify").unwrap();
    assert_eq!(modify.fields, FieldOptions::All);
    assert_eq!(modify.args[0].name, "id");
    assert_eq!(modify.options[0].name, "extra");
}

#[test]
fn explicit_no_fields_is_not_overridden() {
    let child = CommandSet::derive(
        "setting",
        &[resource()],
        vec![CommandSpec::new("modify", "Set a value.").fields(FieldOptions::None)],
        &[],
    );
    let modify = child.commands.iter().find(|c| c.name == "modify").unwrap();
    assert_eq!(modify.fields, FieldOptions::None);
}

#[test]
fn unresolved_inherit_becomes_none() {
    let set = CommandSet::derive("x", &[], vec![CommandSpec::new("launch", "Go.")], &[]);
    assert_eq!(set.commands[0].fields, FieldOptions::None);
}
