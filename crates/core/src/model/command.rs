// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command metadata: the operations a resource exposes and their options.
//!
//! Resources inherit commands from [`CommandSet`]s. Merging is explicit:
//! options for a command named in several parents are unioned in parent
//! order, and a child's own declaration wins on any name conflict.

use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// Boolean switch
    Flag,
    /// Single value
    Value,
    /// Repeatable value
    Multiple,
    /// Repeatable `KEY VALUE` pair
    Pair,
}

/// One non-field option of a command, e.g. `--fail-on-found`
#[derive(Debug, Clone, PartialEq)]
pub struct OptionSpec {
    pub name: String,
    pub short: Option<char>,
    pub help: String,
    pub kind: OptionKind,
    pub default: Option<String>,
    pub required: bool,
}

impl OptionSpec {
    fn new(name: &str, kind: OptionKind, help: &str) -> Self {
        Self {
            name: name.to_string(),
            short: None,
            help: help.to_string(),
            kind,
            default: None,
            required: false,
        }
    }

    pub fn flag(name: &str, help: &str) -> Self {
        Self::new(name, OptionKind::Flag, help)
    }

    pub fn value(name: &str, help: &str) -> Self {
        Self::new(name, OptionKind::Value, help)
    }

    pub fn multiple(name: &str, help: &str) -> Self {
        Self::new(name, OptionKind::Multiple, help)
    }

    pub fn pair(name: &str, help: &str) -> Self {
        Self::new(name, OptionKind::Pair, help)
    }

    pub fn short(mut self, key: char) -> Self {
        self.short = Some(key);
        self
    }

    pub fn default_value(mut self, value: &str) -> Self {
        self.default = Some(value.to_string());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Long CLI option name
    pub fn option_name(&self) -> String {
        self.name.replace('_', "-")
    }
}

/// Positional argument
#[derive(Debug, Clone, PartialEq)]
pub struct ArgSpec {
    pub name: String,
    pub help: String,
    pub required: bool,
}

impl ArgSpec {
    pub fn optional(name: &str, help: &str) -> Self {
        Self {
            name: name.to_string(),
            help: help.to_string(),
            required: false,
        }
    }

    pub fn required(name: &str, help: &str) -> Self {
        Self {
            required: true,
            ..Self::optional(name, help)
        }
    }
}

/// Which resource fields a command accepts as options
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOptions {
    /// Take whatever the inherited declaration uses; `None` if nothing
    Inherit,
    None,
    /// Only fields marked unique, for identifying a single record
    Unique,
    All,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommandSpec {
    pub name: String,
    pub help: String,
    pub args: Vec<ArgSpec>,
    pub options: Vec<OptionSpec>,
    pub fields: FieldOptions,
}

impl CommandSpec {
    pub fn new(name: &str, help: &str) -> Self {
        Self {
            name: name.to_string(),
            help: help.to_string(),
            args: Vec::new(),
            options: Vec::new(),
            fields: FieldOptions::Inherit,
        }
    }

    pub fn arg(mut self, arg: ArgSpec) -> Self {
        self.args.push(arg);
        self
    }

    /// Optional positional primary key
    pub fn pk(self) -> Self {
        self.arg(ArgSpec::optional("id", "Primary key of the record"))
    }

    pub fn option(mut self, option: OptionSpec) -> Self {
        self.options.push(option);
        self
    }

    pub fn fields(mut self, fields: FieldOptions) -> Self {
        self.fields = fields;
        self
    }

    pub fn find_option(&self, name: &str) -> Option<&OptionSpec> {
        self.options.iter().find(|o| o.name == name)
    }

    /// Fold another declaration of the same command into this one.
    ///
    /// Options already present are kept; new ones are appended.
    fn absorb(&mut self, other: &CommandSpec) {
        for option in &other.options {
            if self.find_option(&option.name).is_none() {
                self.options.push(option.clone());
            }
        }
    }

    /// Layer a child's declaration over this inherited one.
    ///
    /// Help, positionals and field options left empty by the child are
    /// inherited.
    fn overridden_by(&self, child: &CommandSpec) -> CommandSpec {
        let mut merged = child.clone();
        if merged.help.is_empty() {
            merged.help = self.help.clone();
        }
        if merged.args.is_empty() {
            merged.args = self.args.clone();
        }
        if merged.fields == FieldOptions::Inherit {
            merged.fields = self.fields.clone();
        }
        merged.absorb(self);
        merged
    }
}

/// A named, reusable bundle of commands, such as "executable resources"
#[derive(Debug, Clone, PartialEq)]
pub struct CommandSet {
    pub name: String,
    pub commands: Vec<CommandSpec>,
    pub disabled: BTreeSet<String>,
}

impl CommandSet {
    /// Merge parents, then own commands, then drop disabled names
    pub fn derive(name: &str, parents: &[CommandSet], own: Vec<CommandSpec>, disabled: &[&str]) -> Self {
        let mut disabled: BTreeSet<String> = parents
            .iter()
            .flat_map(|p| p.disabled.iter().cloned())
            .chain(disabled.iter().map(|d| d.to_string()))
            .collect();
        for command in &own {
            disabled.remove(&command.name);
        }
        let commands = merge_commands(parents, &own, &disabled);
        Self {
            name: name.to_string(),
            commands,
            disabled,
        }
    }
}

/// Union the parents' commands in order, then layer `own` on top
pub(crate) fn merge_commands(
    parents: &[CommandSet],
    own: &[CommandSpec],
    disabled: &BTreeSet<String>,
) -> Vec<CommandSpec> {
    let mut merged: Vec<CommandSpec> = Vec::new();
    for command in parents.iter().flat_map(|p| p.commands.iter()) {
        match merged.iter_mut().find(|c| c.name == command.name) {
            Some(existing) => existing.absorb(command),
            None => merged.push(command.clone()),
        }
    }
    for command in own {
        match merged.iter_mut().find(|c| c.name == command.name) {
            Some(existing) => *existing = existing.overridden_by(command),
            None => merged.push(command.clone()),
        }
    }
    merged.retain(|c| !disabled.contains(&c.name));
    for command in &mut merged {
        if command.fields == FieldOptions::Inherit {
            command.fields = FieldOptions::None;
        }
    }
    merged
}

/// get, list, delete
pub fn base() -> CommandSet {
    CommandSet::derive(
        "base",
        &[],
        vec![
            CommandSpec::new("get", "Return one record.")
                .pk()
                .fields(FieldOptions::All),
            CommandSpec::new("list", "Return a list of records.")
                .option(OptionSpec::flag("all_pages", "Collect all pages of results").short('a'))
                .option(OptionSpec::value("page", "Page number to return"))
                .option(OptionSpec::value("page_size", "Number of records per page"))
                .option(
                    OptionSpec::pair("query", "Extra KEY VALUE filter sent as-is").short('Q'),
                )
                .fields(FieldOptions::All),
            CommandSpec::new("delete", "Remove the given record.")
                .pk()
                .option(OptionSpec::flag(
                    "fail_on_missing",
                    "Fail if the record does not exist",
                ))
                .fields(FieldOptions::Unique),
        ],
        &[],
    )
}

/// base plus create, modify, copy
pub fn resource() -> CommandSet {
    CommandSet::derive(
        "resource",
        &[base()],
        vec![
            CommandSpec::new("create", "Create a record, or report it unchanged if it exists.")
                .option(OptionSpec::flag(
                    "fail_on_found",
                    "Fail if a matching record already exists",
                ))
                .option(OptionSpec::flag(
                    "force_on_exists",
                    "Update the matching record instead of leaving it alone",
                ))
                .fields(FieldOptions::All),
            CommandSpec::new("modify", "Modify an existing record.")
                .pk()
                .option(OptionSpec::flag(
                    "create_on_missing",
                    "Create the record if it does not exist",
                ))
                .fields(FieldOptions::All),
            CommandSpec::new("copy", "Copy a record, optionally overriding fields.")
                .arg(ArgSpec::required("id", "Primary key of the record to copy"))
                .option(OptionSpec::value(
                    "new_name",
                    "Name of the copy; uses the server-side copy endpoint",
                ))
                .fields(FieldOptions::All),
        ],
        &[],
    )
}

/// base without delete
pub fn read_only() -> CommandSet {
    CommandSet::derive("read_only", &[base()], Vec::new(), &["delete"])
}

/// resource plus stdout, monitor, wait
pub fn monitorable() -> CommandSet {
    CommandSet::derive(
        "monitorable",
        &[resource()],
        vec![
            CommandSpec::new("stdout", "Print the standard output of a job.")
                .pk()
                .option(OptionSpec::value("start_line", "First line to print"))
                .option(OptionSpec::value("end_line", "Line to stop before"))
                .fields(FieldOptions::Unique),
            CommandSpec::new("monitor", "Stream job output until it finishes.")
                .pk()
                .option(OptionSpec::value("interval", "Seconds between output fetches").default_value("0.5"))
                .option(OptionSpec::value("timeout", "Give up after this many seconds"))
                .fields(FieldOptions::Unique),
            CommandSpec::new("wait", "Wait for a job to finish.")
                .pk()
                .option(OptionSpec::value("min_interval", "Initial seconds between polls").default_value("1"))
                .option(OptionSpec::value("max_interval", "Longest seconds between polls").default_value("30"))
                .option(OptionSpec::value("timeout", "Give up after this many seconds"))
                .fields(FieldOptions::Unique),
        ],
        &[],
    )
}

/// monitorable plus status, cancel, relaunch
pub fn executable() -> CommandSet {
    CommandSet::derive(
        "executable",
        &[monitorable()],
        vec![
            CommandSpec::new("status", "Print the current job status.")
                .pk()
                .option(OptionSpec::flag("detail", "Print the full job record")),
            CommandSpec::new("cancel", "Cancel a running job.")
                .pk()
                .option(OptionSpec::flag(
                    "fail_if_not_running",
                    "Fail if the job is not running",
                )),
            CommandSpec::new("relaunch", "Relaunch a finished job.").pk(),
        ],
        &[],
    )
}

/// resource plus survey
pub fn survey() -> CommandSet {
    CommandSet::derive(
        "survey",
        &[resource()],
        vec![CommandSpec::new("survey", "Print the survey specification.")
            .pk()
            .fields(FieldOptions::Unique)],
        &[],
    )
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
