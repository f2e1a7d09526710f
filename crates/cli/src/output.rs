// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output formatting for resource commands

use anyhow::Result;
use serde_json::Value;
use std::io::Write;

use twr_core::record::{text, Record};
use twr_core::table::render_table;
use twr_core::{OutputFormat, ResourceDefinition};

use crate::commands::resource::Rendered;

/// How to print a result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    pub format: OutputFormat,
    /// Color the changed marker; only honoured on a terminal
    pub color: bool,
}

/// Print `rendered` for a command on `def` in the chosen format
pub fn print(
    rendered: &Rendered,
    def: &ResourceDefinition,
    style: Style,
    out: &mut dyn Write,
) -> Result<()> {
    let value = match rendered {
        Rendered::Nothing => return Ok(()),
        Rendered::Record(record) => Value::Object(record.clone()),
        Rendered::Page(page) => serde_json::to_value(page)?,
        Rendered::Outcome(outcome) => serde_json::to_value(outcome)?,
        Rendered::Value(value) => value.clone(),
    };

    match style.format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?,
        OutputFormat::Yaml => write!(out, "{}", serde_yaml::to_string(&value)?)?,
        OutputFormat::Id => {
            for id in ids(rendered, &value) {
                writeln!(out, "{}", id)?;
            }
        }
        OutputFormat::Human => human(rendered, &value, def, style.color, out)?,
    }
    Ok(())
}

/// Primary keys in the result, one per record
fn ids(rendered: &Rendered, value: &Value) -> Vec<String> {
    match rendered {
        Rendered::Page(page) => page
            .results
            .iter()
            .filter_map(|r| r.get("id"))
            .map(text)
            .collect(),
        _ => value.get("id").map(text).into_iter().collect(),
    }
}

fn human(
    rendered: &Rendered,
    value: &Value,
    def: &ResourceDefinition,
    color: bool,
    out: &mut dyn Write,
) -> Result<()> {
    match rendered {
        Rendered::Page(page) => {
            if page.results.is_empty() {
                writeln!(out, "No records found.")?;
                return Ok(());
            }
            writeln!(out, "{}", table(def, &page.results))?;
            if let Some(next) = page.next {
                writeln!(out, "(next page: {})", next)?;
            }
        }
        Rendered::Outcome(outcome) if outcome.id.is_none() && outcome.record.is_empty() => {
            let marker = if color {
                "\x1b[32mOK.\x1b[0m".to_string()
            } else {
                "OK.".to_string()
            };
            writeln!(out, "{} (changed: {})", marker, outcome.changed)?;
        }
        Rendered::Record(_) | Rendered::Outcome(_) => match value {
            Value::Object(record) => writeln!(out, "{}", table(def, std::slice::from_ref(record)))?,
            other => writeln!(out, "{}", text(other))?,
        },
        Rendered::Value(Value::String(s)) => writeln!(out, "{}", s)?,
        Rendered::Value(other) => writeln!(out, "{}", serde_json::to_string_pretty(other)?)?,
        Rendered::Nothing => {}
    }
    Ok(())
}

/// `id` plus the resource's display fields present in the rows; rows
/// with none of those fields (a setting, a status summary) show their
/// own keys instead
fn table(def: &ResourceDefinition, rows: &[Record]) -> String {
    let mut columns = vec!["id".to_string()];
    columns.extend(
        def.display_fields()
            .into_iter()
            .filter(|f| rows.iter().any(|row| row.contains_key(&f.name)))
            .map(|f| f.name.clone()),
    );
    if columns.len() == 1 && !rows.iter().any(|row| row.contains_key("id")) {
        columns = rows
            .first()
            .map(|row| row.keys().cloned().collect())
            .unwrap_or_default();
    }
    render_table(&columns, rows)
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
