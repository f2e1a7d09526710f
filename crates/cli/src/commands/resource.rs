// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resource subcommands built from the catalog.
//!
//! Every resource kind becomes `twr <kind> <command>`. Positionals, command
//! options and resource fields are all registered on the clap command with
//! prefixed ids (`arg:`, `opt:`, `field:`) so they never collide while
//! parsing; the long names shown to users stay unprefixed.

use anyhow::{anyhow, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use serde_json::Value;
use std::collections::HashSet;
use std::io::Write;
use std::time::Duration;

use twr_core::model::{CommandSpec, FieldOptions, OptionKind};
use twr_core::monitor::{MonitorOptions, WaitOptions};
use twr_core::record::Record;
use twr_core::resources::job::LaunchOptions;
use twr_core::resources::node::EdgeKind;
use twr_core::resources::project::UpdateOptions;
use twr_core::resources::{job, node, notification, project, survey, workflow_job};
use twr_core::{
    Behavior, Clock, Field, ListOptions, ListPage, Outcome, Resource, ResourceDefinition,
    Transport, WriteOptions,
};

/// Options consumed by the CLI itself rather than passed on as fields.
///
/// Any other command option (`--job-template` on a node, `--category` on
/// settings) is folded into the record handed to the operation.
const CONTROL_OPTIONS: &[&str] = &[
    "all_pages",
    "page",
    "page_size",
    "query",
    "fail_on_missing",
    "fail_on_found",
    "force_on_exists",
    "create_on_missing",
    "new_name",
    "start_line",
    "end_line",
    "interval",
    "min_interval",
    "max_interval",
    "timeout",
    "detail",
    "fail_if_not_running",
    "monitor",
    "wait",
    "no_input",
    "extra_vars",
];

/// Taken by global flags and clap's own help and version
const RESERVED_LONGS: &[&str] = &[
    "tower-host",
    "tower-username",
    "tower-password",
    "format",
    "verbose",
    "insecure",
    "help",
    "version",
];
const RESERVED_SHORTS: &[char] = &['f', 'v', 'h', 'V'];

/// What a resource command produced, before formatting
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    Record(Record),
    Page(ListPage),
    Outcome(Outcome),
    /// Already printed while running, e.g. streamed job output
    Nothing,
    Value(Value),
}

/// `twr <kind>` with one subcommand per supported command
pub fn resource_command(def: &ResourceDefinition) -> Command {
    let mut cmd = Command::new(def.kind().to_string())
        .about(def.help().to_string())
        .subcommand_required(true)
        .arg_required_else_help(true);
    for spec in def.commands() {
        cmd = cmd.subcommand(subcommand(def, spec));
    }
    cmd
}

fn subcommand(def: &ResourceDefinition, spec: &CommandSpec) -> Command {
    let mut cmd = Command::new(spec.name.clone()).about(spec.help.clone());
    let mut longs: HashSet<String> = RESERVED_LONGS.iter().map(|l| l.to_string()).collect();
    let mut shorts: HashSet<char> = RESERVED_SHORTS.iter().copied().collect();

    for arg in &spec.args {
        longs.insert(arg.name.clone());
        cmd = cmd.arg(
            Arg::new(format!("arg:{}", arg.name))
                .value_name(arg.name.to_uppercase())
                .help(arg.help.clone())
                .required(arg.required),
        );
    }

    for option in &spec.options {
        longs.insert(option.option_name());
        let mut arg = Arg::new(format!("opt:{}", option.name))
            .long(option.option_name())
            .help(option.help.clone())
            .required(option.required);
        if let Some(short) = option.short.filter(|s| shorts.insert(*s)) {
            arg = arg.short(short);
        }
        arg = match option.kind {
            OptionKind::Flag => arg.action(ArgAction::SetTrue),
            OptionKind::Value => arg.action(ArgAction::Set).value_name("VALUE"),
            OptionKind::Multiple => arg.action(ArgAction::Append).value_name("VALUE"),
            OptionKind::Pair => arg
                .action(ArgAction::Append)
                .num_args(2)
                .value_names(["KEY", "VALUE"]),
        };
        if let Some(default) = &option.default {
            arg = arg.default_value(default.clone());
        }
        cmd = cmd.arg(arg);
    }

    for field in command_fields(def, spec) {
        if !longs.insert(field.option_name()) {
            continue;
        }
        let mut arg = Arg::new(format!("field:{}", field.name))
            .long(field.option_name())
            .value_name(field.name.to_uppercase())
            .action(if field.multiple {
                ArgAction::Append
            } else {
                ArgAction::Set
            });
        if let Some(help) = &field.help {
            arg = arg.help(help.clone());
        }
        if let Some(short) = field.key.filter(|s| shorts.insert(*s)) {
            arg = arg.short(short);
        }
        cmd = cmd.arg(arg);
    }
    cmd
}

/// Fields a command accepts as `--<field>` options
fn command_fields<'d>(def: &'d ResourceDefinition, spec: &CommandSpec) -> Vec<&'d Field> {
    let writes = matches!(spec.name.as_str(), "create" | "modify" | "copy");
    match spec.fields {
        FieldOptions::All => def
            .fields()
            .iter()
            .filter(|f| !(writes && f.read_only))
            .collect(),
        FieldOptions::Unique => def.unique_fields(),
        FieldOptions::None | FieldOptions::Inherit => Vec::new(),
    }
}

/// Parsed values of one resource command
struct Invocation<'m> {
    matches: &'m ArgMatches,
    spec: &'m CommandSpec,
}

impl<'m> Invocation<'m> {
    fn arg(&self, name: &str) -> Option<&'m String> {
        self.matches
            .try_get_one::<String>(&format!("arg:{}", name))
            .ok()
            .flatten()
    }

    /// Positional primary key: numbers stay numbers, names stay text
    fn pk(&self, name: &str) -> Option<Value> {
        self.arg(name).map(|raw| pk_value(raw))
    }

    fn has_option(&self, name: &str) -> bool {
        self.spec.find_option(name).is_some()
    }

    fn flag(&self, name: &str) -> bool {
        self.has_option(name) && self.matches.get_flag(&format!("opt:{}", name))
    }

    fn value(&self, name: &str) -> Option<&'m String> {
        if !self.has_option(name) {
            return None;
        }
        self.matches.get_one::<String>(&format!("opt:{}", name))
    }

    fn values(&self, name: &str) -> Vec<String> {
        if !self.has_option(name) {
            return Vec::new();
        }
        self.matches
            .get_many::<String>(&format!("opt:{}", name))
            .map(|values| values.cloned().collect())
            .unwrap_or_default()
    }

    fn pairs(&self, name: &str) -> Vec<(String, String)> {
        if !self.has_option(name) {
            return Vec::new();
        }
        let Some(occurrences) = self.matches.get_occurrences::<String>(&format!("opt:{}", name))
        else {
            return Vec::new();
        };
        occurrences
            .filter_map(|mut pair| Some((pair.next()?.clone(), pair.next()?.clone())))
            .collect()
    }

    fn number<N: std::str::FromStr>(&self, name: &str) -> Result<Option<N>> {
        match self.value(name) {
            Some(raw) => raw
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| anyhow!("--{}: {:?} is not a valid number", name.replace('_', "-"), raw)),
            None => Ok(None),
        }
    }

    fn seconds(&self, name: &str) -> Result<Option<Duration>> {
        match self.number::<f64>(name)? {
            Some(secs) if secs.is_finite() && secs >= 0.0 => Ok(Some(Duration::from_secs_f64(secs))),
            Some(_) => Err(anyhow!("--{} must not be negative", name.replace('_', "-"))),
            None => Ok(None),
        }
    }

    /// Field options plus non-control command options, coerced to JSON.
    ///
    /// Field defaults only apply when `defaults` is set (creating).
    fn fields(&self, def: &ResourceDefinition, defaults: bool) -> Result<Record> {
        let mut record = Record::new();
        for field in command_fields(def, self.spec) {
            let id = format!("field:{}", field.name);
            let Ok(Some(raw)) = self.matches.try_get_many::<String>(&id) else {
                if defaults {
                    if let Some(default) = &field.default {
                        record.insert(field.name.clone(), default.clone());
                    }
                }
                continue;
            };
            let raw: Vec<&String> = raw.collect();
            let value = if field.multiple {
                Value::Array(
                    raw.iter()
                        .map(|r| field.coerce(r))
                        .collect::<twr_core::Result<Vec<_>>>()?,
                )
            } else {
                match raw.last() {
                    Some(r) => field.coerce(r)?,
                    None => continue,
                }
            };
            record.insert(field.name.clone(), value);
        }
        for option in &self.spec.options {
            if CONTROL_OPTIONS.contains(&option.name.as_str()) || option.kind != OptionKind::Value {
                continue;
            }
            if let Some(raw) = self.value(&option.name) {
                record.insert(option.name.clone(), Value::String(raw.clone()));
            }
        }
        Ok(record)
    }
}

/// `"42"` is the record with id 42; anything else is a name
pub fn pk_value(raw: &str) -> Value {
    raw.trim()
        .parse::<i64>()
        .map(Value::from)
        .unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Run the parsed command against `res`, streaming progress to `out`
pub fn run<T: Transport, C: Clock>(
    res: &Resource<'_, T, C>,
    command: &str,
    matches: &ArgMatches,
    out: &mut dyn Write,
) -> Result<Rendered> {
    let def = res.definition();
    let spec = def.command(command)?;
    let inv = Invocation { matches, spec };
    tracing::debug!(kind = def.kind(), command, "running resource command");

    let rendered = match command {
        "get" => Rendered::Record(res.get(inv.pk("id").as_ref(), inv.fields(def, false)?)?),
        "list" => {
            let opts = ListOptions {
                all_pages: inv.flag("all_pages"),
                page: inv.number("page")?,
                page_size: inv.number("page_size")?,
                query: inv.pairs("query"),
            };
            Rendered::Page(res.list(&opts, inv.fields(def, false)?)?)
        }
        "delete" => Rendered::Outcome(res.delete(
            inv.pk("id"),
            inv.flag("fail_on_missing"),
            inv.fields(def, false)?,
        )?),
        "create" => {
            let opts = WriteOptions {
                create_on_missing: true,
                fail_on_found: inv.flag("fail_on_found"),
                force_on_exists: inv.flag("force_on_exists"),
            };
            let fields = inv.fields(def, true)?;
            if def.behavior() == Behavior::Project {
                Rendered::Outcome(project::create(res, opts, fields, &update_options(&inv)?, out)?)
            } else {
                Rendered::Outcome(res.create(opts, fields)?)
            }
        }
        "modify" => {
            let mut fields = inv.fields(def, false)?;
            if def.behavior() == Behavior::Setting {
                if let Some(value) = inv.arg("value") {
                    let value = twr_core::model::read_variables(value)?;
                    fields.insert("value".into(), Value::String(value));
                }
            }
            Rendered::Outcome(res.modify(inv.pk("id"), inv.flag("create_on_missing"), fields)?)
        }
        "copy" => {
            let pk = inv
                .pk("id")
                .ok_or_else(|| anyhow!("copy needs the primary key of the record to copy"))?;
            let new_name = inv.value("new_name").map(String::as_str);
            Rendered::Outcome(res.copy(&pk, new_name, inv.fields(def, false)?)?)
        }
        "stdout" => {
            res.stdout(
                inv.pk("id"),
                inv.number("start_line")?,
                inv.number("end_line")?,
                inv.fields(def, false)?,
                out,
            )?;
            Rendered::Nothing
        }
        "monitor" => {
            let opts = MonitorOptions {
                interval: inv
                    .seconds("interval")?
                    .unwrap_or(MonitorOptions::default().interval),
                timeout: inv.seconds("timeout")?,
            };
            let (pk, parent) = job_target(def, inv.pk("id"));
            Rendered::Outcome(res.monitor(pk, parent, &opts, inv.fields(def, false)?, out)?)
        }
        "wait" => {
            let defaults = WaitOptions::default();
            let opts = WaitOptions {
                min_interval: inv.seconds("min_interval")?.unwrap_or(defaults.min_interval),
                max_interval: inv.seconds("max_interval")?.unwrap_or(defaults.max_interval),
                timeout: inv.seconds("timeout")?,
                ..defaults
            };
            let (pk, parent) = job_target(def, inv.pk("id"));
            Rendered::Outcome(res.wait(pk, parent, &opts, inv.fields(def, false)?, out)?)
        }
        "status" => Rendered::Record(res.status(
            inv.pk("id"),
            inv.flag("detail"),
            inv.fields(def, false)?,
        )?),
        "cancel" => Rendered::Outcome(res.cancel(
            inv.pk("id"),
            inv.flag("fail_if_not_running"),
            inv.fields(def, false)?,
        )?),
        "relaunch" => Rendered::Outcome(res.relaunch(inv.pk("id"), inv.fields(def, false)?)?),
        "survey" => Rendered::Value(survey::survey(res, inv.pk("id").as_ref(), inv.fields(def, false)?)?),
        "launch" => launch(res, &inv, out)?,
        "update" => Rendered::Outcome(project::update(
            res,
            inv.pk("id"),
            inv.fields(def, false)?,
            &update_options(&inv)?,
            out,
        )?),
        "summary" => {
            let pk = inv
                .pk("id")
                .ok_or_else(|| anyhow!("summary needs the primary key of a workflow job"))?;
            let table = res.lookup_stdout(&pk, inv.number("start_line")?, inv.number("end_line")?)?;
            write!(out, "{}", table)?;
            Rendered::Nothing
        }
        other => edge_command(res, &inv, other)?,
    };
    Ok(rendered)
}

/// Templates are monitored through their latest job; jobs directly
fn job_target(def: &ResourceDefinition, pk: Option<Value>) -> (Option<Value>, Option<Value>) {
    if def.unified_job_type().is_some() {
        (None, pk)
    } else {
        (pk, None)
    }
}

fn update_options(inv: &Invocation<'_>) -> Result<UpdateOptions> {
    Ok(UpdateOptions {
        monitor: inv.flag("monitor"),
        wait: inv.flag("wait"),
        timeout: inv.seconds("timeout")?,
    })
}

fn launch<T: Transport, C: Clock>(
    res: &Resource<'_, T, C>,
    inv: &Invocation<'_>,
    out: &mut dyn Write,
) -> Result<Rendered> {
    let mut prompts = Record::new();
    for prompt in job::PROMPTS {
        if let Some(value) = inv.value(prompt) {
            prompts.insert(prompt.to_string(), Value::String(value.clone()));
        }
    }
    let opts = LaunchOptions {
        monitor: inv.flag("monitor"),
        wait: inv.flag("wait"),
        timeout: inv.seconds("timeout")?,
        no_input: inv.flag("no_input"),
        extra_vars: inv.values("extra_vars"),
        prompts,
    };

    let outcome = match res.definition().behavior() {
        Behavior::WorkflowJob => {
            let workflow = inv
                .value("workflow_job_template")
                .ok_or_else(|| anyhow!("--workflow-job-template is required"))?;
            workflow_job::launch(res, &pk_value(workflow), &opts, out)?
        }
        _ => {
            let template = inv
                .value("job_template")
                .ok_or_else(|| anyhow!("--job-template is required"))?;
            job::launch(res, &pk_value(template), &opts, out)?
        }
    };
    Ok(Rendered::Outcome(outcome))
}

/// Association commands: relations, node edges and notification links
fn edge_command<T: Transport, C: Clock>(
    res: &Resource<'_, T, C>,
    inv: &Invocation<'_>,
    command: &str,
) -> Result<Rendered> {
    let def = res.definition();

    if let Some((kind, associate)) = EdgeKind::from_command(command) {
        let parent = inv
            .pk("parent")
            .ok_or_else(|| anyhow!("{} needs a parent node", command))?;
        let child = inv.pk("child");
        let outcome = if associate {
            node::associate(res, kind, &parent, child.as_ref(), inv.fields(def, false)?)?
        } else {
            let child = child.ok_or_else(|| anyhow!("{} needs a child node", command))?;
            node::disassociate(res, kind, &parent, &child)?
        };
        return Ok(Rendered::Outcome(outcome));
    }

    if let Some(verb) = command
        .strip_suffix("_notification_template")
        .filter(|verb| matches!(*verb, "associate" | "disassociate"))
    {
        let owner = required_value(inv, def.kind())?;
        let template = required_value(inv, "notification_template")?;
        let status = inv.value("status").map(String::as_str).unwrap_or("any");
        return Ok(Rendered::Outcome(notification::link(
            res,
            &owner,
            &template,
            status,
            verb == "associate",
        )?));
    }

    let (relation, _) = def
        .relation_for(command)
        .ok_or_else(|| anyhow!("{} does not support `{}`", def.kind(), command))?;
    let owner = required_value(inv, def.kind())?;
    let target = required_value(inv, &relation.other)?;
    Ok(Rendered::Outcome(res.associate(command, &owner, &target)?))
}

fn required_value(inv: &Invocation<'_>, name: &str) -> Result<Value> {
    inv.value(name)
        .map(|raw| pk_value(raw))
        .ok_or_else(|| anyhow!("--{} is required", name.replace('_', "-")))
}

#[cfg(test)]
#[path = "resource_tests.rs"]
mod tests;
