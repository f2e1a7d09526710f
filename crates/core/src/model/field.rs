// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Field and relation descriptors

use serde_json::Value;

use crate::error::{Error, Result};

/// Value type of a field, used to coerce CLI text into JSON
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    Text,
    Integer,
    Boolean,
    /// Free-form variables text; `@path` reads the file
    Variables,
    /// Primary key of another resource kind, or its name
    Related(String),
    Choice(Vec<String>),
    /// Integer codes with labels, e.g. verbosity `0 (normal)`
    MappedChoice(Vec<(i64, String)>),
}

/// Declarative metadata for one attribute of a resource
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    /// Single-letter CLI alias
    pub key: Option<char>,
    pub kind: FieldType,
    pub required: bool,
    pub unique: bool,
    pub default: Option<Value>,
    pub multiple: bool,
    pub read_only: bool,
    /// Never used as a lookup filter
    pub no_lookup: bool,
    /// Shown as a column in human output
    pub display: bool,
    pub help: Option<String>,
}

impl Field {
    /// A required, displayed text field
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: None,
            kind: FieldType::Text,
            required: true,
            unique: false,
            default: None,
            multiple: false,
            read_only: false,
            no_lookup: false,
            display: true,
            help: None,
        }
    }

    pub fn typed(mut self, kind: FieldType) -> Self {
        self.kind = kind;
        self
    }

    pub fn related(self, kind: impl Into<String>) -> Self {
        self.typed(FieldType::Related(kind.into()))
    }

    pub fn choice(self, choices: &[&str]) -> Self {
        self.typed(FieldType::Choice(
            choices.iter().map(|c| c.to_string()).collect(),
        ))
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.display = false;
        self
    }

    pub fn short(mut self, key: char) -> Self {
        self.key = Some(key);
        self
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn no_lookup(mut self) -> Self {
        self.no_lookup = true;
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Long CLI option name, e.g. `job_type` → `job-type`
    pub fn option_name(&self) -> String {
        self.name.replace('_', "-")
    }

    /// Related resource kind, if this field references one
    pub fn related_kind(&self) -> Option<&str> {
        match &self.kind {
            FieldType::Related(kind) => Some(kind),
            _ => None,
        }
    }

    /// Convert CLI text into the JSON value sent to the server.
    ///
    /// The literal `null` passes through untouched for every type; it is
    /// translated to JSON null just before a write.
    pub fn coerce(&self, raw: &str) -> Result<Value> {
        if raw == "null" {
            return Ok(Value::String(raw.to_string()));
        }
        match &self.kind {
            FieldType::Text => Ok(Value::String(raw.to_string())),
            FieldType::Variables => Ok(Value::String(read_variables(raw)?)),
            FieldType::Integer => raw
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| self.invalid(raw, "is not a valid integer")),
            FieldType::Boolean => parse_bool(raw)
                .map(Value::Bool)
                .ok_or_else(|| self.invalid(raw, "is not a valid boolean")),
            FieldType::Related(_) => Ok(raw
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .unwrap_or_else(|_| Value::String(raw.to_string()))),
            FieldType::Choice(choices) => {
                if choices.iter().any(|c| c == raw) {
                    Ok(Value::String(raw.to_string()))
                } else {
                    Err(self.invalid(raw, &format!("is not one of: {}", choices.join(", "))))
                }
            }
            FieldType::MappedChoice(choices) => {
                let found = choices.iter().find(|(code, label)| {
                    raw.trim().parse::<i64>().ok() == Some(*code) || label == raw
                });
                found.map(|(code, _)| Value::from(*code)).ok_or_else(|| {
                    let labels: Vec<String> = choices
                        .iter()
                        .map(|(code, label)| format!("{} ({})", code, label))
                        .collect();
                    self.invalid(raw, &format!("is not one of: {}", labels.join(", ")))
                })
            }
        }
    }

    fn invalid(&self, raw: &str, reason: &str) -> Error {
        Error::Validation(format!("--{}: {:?} {}", self.option_name(), raw, reason))
    }
}

/// Read `@path` variables from disk, pass anything else through
pub fn read_variables(raw: &str) -> Result<String> {
    match raw.strip_prefix('@') {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => Ok(raw.to_string()),
    }
}

/// Truthy and falsy spellings accepted for boolean input
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" | "t" | "true" | "on" | "1" => Some(true),
        "n" | "no" | "f" | "false" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Many-to-many association with another resource kind.
///
/// Generates `associate_<suffix>` and `disassociate_<suffix>` commands on
/// the owning resource; an empty suffix gives plain `associate`.
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    /// Edge collection name under the owner, e.g. `labels`
    pub relationship: String,
    /// Kind of the records on the other end
    pub other: String,
    pub suffix: String,
}

impl Relation {
    pub fn new(relationship: impl Into<String>, other: impl Into<String>) -> Self {
        let relationship = relationship.into();
        let suffix = relationship
            .strip_suffix('s')
            .unwrap_or(&relationship)
            .to_string();
        Self {
            relationship,
            other: other.into(),
            suffix,
        }
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn associate_command(&self) -> String {
        self.command_name("associate")
    }

    pub fn disassociate_command(&self) -> String {
        self.command_name("disassociate")
    }

    fn command_name(&self, verb: &str) -> String {
        if self.suffix.is_empty() {
            verb.to_string()
        } else {
            format!("{}_{}", verb, self.suffix)
        }
    }
}

#[cfg(test)]
#[path = "field_tests.rs"]
mod tests;
