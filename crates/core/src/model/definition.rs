// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resource definitions and the builder that produces them

use std::collections::BTreeSet;
use thiserror::Error;

use super::command::{merge_commands, CommandSet, CommandSpec, OptionSpec};
use super::field::{Field, Relation};
use crate::error::Error;
use crate::record::Record;

/// Resource-specific refinements layered over the generic CRUD core
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    Standard,
    /// Writes carry an optional survey spec and extra vars
    Survey,
    /// Survey behaviour plus launch defaults
    JobTemplate,
    NotificationTemplate,
    Setting,
    WorkflowNode,
    Job,
    WorkflowJob,
    Project,
}

#[derive(Debug, Error, PartialEq)]
pub enum DefinitionError {
    #[error("resource `{0}` has no endpoint")]
    MissingEndpoint(String),

    #[error("resource `{0}` has no identity fields")]
    NoIdentity(String),

    #[error("resource `{kind}` declares field `{field}` twice")]
    DuplicateField { kind: String, field: String },

    #[error("resource `{kind}` identifies records by undeclared field `{field}`")]
    UnknownIdentity { kind: String, field: String },
}

/// Immutable description of one resource kind
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceDefinition {
    kind: String,
    endpoint: String,
    identity: Vec<String>,
    fields: Vec<Field>,
    relations: Vec<Relation>,
    commands: Vec<CommandSpec>,
    disabled: BTreeSet<String>,
    dependencies: Vec<String>,
    unified_job_type: Option<String>,
    behavior: Behavior,
    help: String,
}

impl ResourceDefinition {
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn identity(&self) -> &[String] {
        &self.identity
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    pub fn commands(&self) -> &[CommandSpec] {
        &self.commands
    }

    pub fn disabled(&self) -> &BTreeSet<String> {
        &self.disabled
    }

    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    pub fn unified_job_type(&self) -> Option<&str> {
        self.unified_job_type.as_deref()
    }

    /// Endpoint jobs of this resource live under
    pub fn job_endpoint(&self) -> &str {
        self.unified_job_type.as_deref().unwrap_or(&self.endpoint)
    }

    pub fn behavior(&self) -> Behavior {
        self.behavior
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn supports(&self, command: &str) -> bool {
        self.commands.iter().any(|c| c.name == command)
    }

    pub fn command(&self, name: &str) -> Result<&CommandSpec, Error> {
        self.commands
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| self.unsupported(name))
    }

    pub fn ensure_supports(&self, command: &str) -> Result<(), Error> {
        self.command(command).map(|_| ())
    }

    pub(crate) fn unsupported(&self, command: &str) -> Error {
        Error::UnsupportedOperation {
            kind: self.kind.clone(),
            operation: command.to_string(),
        }
    }

    /// Fields that can identify a single record: unique ones and identity
    pub fn unique_fields(&self) -> Vec<&Field> {
        self.fields
            .iter()
            .filter(|f| f.unique || self.identity.contains(&f.name))
            .collect()
    }

    pub fn display_fields(&self) -> Vec<&Field> {
        self.fields.iter().filter(|f| f.display).collect()
    }

    /// Required fields absent from `fields`, in declaration order
    pub fn missing_required(&self, fields: &Record) -> Vec<String> {
        self.fields
            .iter()
            .filter(|f| f.required && !f.read_only && !fields.contains_key(&f.name))
            .map(|f| f.name.clone())
            .collect()
    }

    /// Relation behind a synthesized command; `true` means associate
    pub fn relation_for(&self, command: &str) -> Option<(&Relation, bool)> {
        self.relations.iter().find_map(|r| {
            if r.associate_command() == command {
                Some((r, true))
            } else if r.disassociate_command() == command {
                Some((r, false))
            } else {
                None
            }
        })
    }

    /// Copy of this definition rooted at another endpoint
    pub fn with_endpoint(&self, endpoint: &str) -> Self {
        Self {
            endpoint: normalize_endpoint(endpoint),
            ..self.clone()
        }
    }
}

/// Builds a [`ResourceDefinition`], validating it eagerly
pub struct ResourceBuilder {
    kind: String,
    endpoint: Option<String>,
    identity: Vec<String>,
    fields: Vec<Field>,
    relations: Vec<Relation>,
    parents: Vec<CommandSet>,
    commands: Vec<CommandSpec>,
    disabled: Vec<String>,
    dependencies: Vec<String>,
    unified_job_type: Option<String>,
    behavior: Behavior,
    help: String,
}

impl ResourceBuilder {
    /// Start a definition; identity defaults to `name`
    pub fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            endpoint: None,
            identity: vec!["name".to_string()],
            fields: Vec::new(),
            relations: Vec::new(),
            parents: Vec::new(),
            commands: Vec::new(),
            disabled: Vec::new(),
            dependencies: Vec::new(),
            unified_job_type: None,
            behavior: Behavior::Standard,
            help: String::new(),
        }
    }

    pub fn endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = Some(endpoint.to_string());
        self
    }

    pub fn identity(mut self, names: &[&str]) -> Self {
        self.identity = names.iter().map(|n| n.to_string()).collect();
        self
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn relation(mut self, relation: Relation) -> Self {
        self.relations.push(relation);
        self
    }

    pub fn inherit(mut self, parent: CommandSet) -> Self {
        self.parents.push(parent);
        self
    }

    pub fn command(mut self, command: CommandSpec) -> Self {
        self.commands.push(command);
        self
    }

    pub fn disable(mut self, command: &str) -> Self {
        self.disabled.push(command.to_string());
        self
    }

    pub fn depends_on(mut self, kind: &str) -> Self {
        self.dependencies.push(kind.to_string());
        self
    }

    pub fn unified_job_type(mut self, endpoint: &str) -> Self {
        self.unified_job_type = Some(normalize_endpoint(endpoint));
        self
    }

    pub fn behavior(mut self, behavior: Behavior) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn help(mut self, help: &str) -> Self {
        self.help = help.to_string();
        self
    }

    pub fn build(self) -> Result<ResourceDefinition, DefinitionError> {
        let endpoint = match self.endpoint.as_deref().map(str::trim) {
            Some(e) if !e.trim_matches('/').is_empty() => normalize_endpoint(e),
            _ => return Err(DefinitionError::MissingEndpoint(self.kind)),
        };

        let mut seen = BTreeSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(DefinitionError::DuplicateField {
                    kind: self.kind.clone(),
                    field: field.name.clone(),
                });
            }
        }

        if self.identity.is_empty() {
            return Err(DefinitionError::NoIdentity(self.kind));
        }
        if let Some(unknown) = self
            .identity
            .iter()
            .find(|name| *name != "id" && !seen.contains(name.as_str()))
        {
            return Err(DefinitionError::UnknownIdentity {
                kind: self.kind.clone(),
                field: unknown.clone(),
            });
        }

        let mut own = self.commands;
        for relation in &self.relations {
            own.push(relation_command(&self.kind, relation, true));
            own.push(relation_command(&self.kind, relation, false));
        }

        let mut disabled: BTreeSet<String> = self
            .parents
            .iter()
            .flat_map(|p| p.disabled.iter().cloned())
            .chain(self.disabled.iter().cloned())
            .collect();
        for command in &own {
            if !self.disabled.contains(&command.name) {
                disabled.remove(&command.name);
            }
        }
        let commands = merge_commands(&self.parents, &own, &disabled);

        Ok(ResourceDefinition {
            kind: self.kind,
            endpoint,
            identity: self.identity,
            fields: self.fields,
            relations: self.relations,
            commands,
            disabled,
            dependencies: self.dependencies,
            unified_job_type: self.unified_job_type,
            behavior: self.behavior,
            help: self.help,
        })
    }
}

fn relation_command(kind: &str, relation: &Relation, associate: bool) -> CommandSpec {
    let (name, verb) = if associate {
        (relation.associate_command(), "Associate")
    } else {
        (relation.disassociate_command(), "Disassociate")
    };
    let preposition = if associate { "with" } else { "from" };
    CommandSpec::new(
        &name,
        &format!("{} a {} {} this {}.", verb, relation.other, preposition, kind),
    )
    .option(OptionSpec::value(kind, &format!("The {}", kind)).required())
    .option(OptionSpec::value(&relation.other, &format!("The {}", relation.other)).required())
}

/// Force a leading and trailing `/`
pub fn normalize_endpoint(endpoint: &str) -> String {
    format!("/{}/", endpoint.trim().trim_matches('/'))
}

#[cfg(test)]
#[path = "definition_tests.rs"]
mod tests;
