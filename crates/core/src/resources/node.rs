// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workflow nodes and the success/failure/always edges between them

use serde_json::Value;

use crate::clock::Clock;
use crate::context::Resource;
use crate::crud::{ListOptions, ReadOptions, WriteOptions};
use crate::error::{Error, Result};
use crate::record::{pk_segment, pop_none, ListPage, Outcome, Record};
use crate::transport::Transport;

/// Fields naming the template a node runs, by kind
const TEMPLATE_KINDS: &[&str] = &["job_template", "project", "inventory_source"];

/// Which outcome of the parent runs the child
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    Success,
    Failure,
    Always,
}

impl EdgeKind {
    pub const ALL: [EdgeKind; 3] = [EdgeKind::Success, EdgeKind::Failure, EdgeKind::Always];

    pub fn as_str(self) -> &'static str {
        match self {
            EdgeKind::Success => "success",
            EdgeKind::Failure => "failure",
            EdgeKind::Always => "always",
        }
    }

    pub fn associate_command(self) -> String {
        format!("associate_{}_node", self.as_str())
    }

    pub fn disassociate_command(self) -> String {
        format!("disassociate_{}_node", self.as_str())
    }

    /// Edge kind behind a node command; `true` means associate
    pub fn from_command(command: &str) -> Option<(EdgeKind, bool)> {
        Self::ALL.into_iter().find_map(|kind| {
            if command == kind.associate_command() {
                Some((kind, true))
            } else if command == kind.disassociate_command() {
                Some((kind, false))
            } else {
                None
            }
        })
    }

    /// Collection of children under a parent node
    fn forward(self) -> String {
        format!("{}_nodes", self.as_str())
    }

    /// Filter selecting nodes that are children of a given parent
    fn reverse(self) -> String {
        format!("workflowjobtemplatenodes_{}", self.as_str())
    }
}

/// Replace `job_template`/`project`/`inventory_source` with the
/// `unified_job_template` primary key they name
fn translate_template<T: Transport, C: Clock>(
    res: &Resource<'_, T, C>,
    fields: &mut Record,
) -> Result<()> {
    for kind in TEMPLATE_KINDS {
        match fields.remove(*kind) {
            Some(Value::Null) | None => {}
            Some(value) => {
                let pk = res.related(kind)?.resolve(&value)?;
                fields.insert("unified_job_template".into(), pk);
            }
        }
    }
    Ok(())
}

pub(crate) fn write<T: Transport, C: Clock>(
    res: &Resource<'_, T, C>,
    pk: Option<Value>,
    opts: WriteOptions,
    mut fields: Record,
) -> Result<Outcome> {
    translate_template(res, &mut fields)?;
    res.write_record(pk, opts, fields)
}

pub(crate) fn list<T: Transport, C: Clock>(
    res: &Resource<'_, T, C>,
    opts: &ListOptions,
    mut filters: Record,
) -> Result<ListPage> {
    translate_template(res, &mut filters)?;
    res.list_records(opts, filters)
}

/// Run `child` after `parent` on `kind`.
///
/// Without a child, an existing child of `parent` matching `fields` is
/// reused, or a new one is created under the parent.
pub fn associate<T: Transport, C: Clock>(
    res: &Resource<'_, T, C>,
    kind: EdgeKind,
    parent: &Value,
    child: Option<&Value>,
    fields: Record,
) -> Result<Outcome> {
    res.definition().ensure_supports(&kind.associate_command())?;
    let parent = res.resolve(parent)?;
    match child {
        Some(child) => {
            let child = res.resolve(child)?;
            res.assoc(&kind.forward(), &parent, &child)
        }
        None => child_of(res, kind, &parent, fields),
    }
}

/// Detach `child` from `parent`; both become root nodes
pub fn disassociate<T: Transport, C: Clock>(
    res: &Resource<'_, T, C>,
    kind: EdgeKind,
    parent: &Value,
    child: &Value,
) -> Result<Outcome> {
    res.definition().ensure_supports(&kind.disassociate_command())?;
    let parent = res.resolve(parent)?;
    let child = res.resolve(child)?;
    res.disassoc(&kind.forward(), &parent, &child)
}

fn child_of<T: Transport, C: Clock>(
    res: &Resource<'_, T, C>,
    kind: EdgeKind,
    parent: &Value,
    mut fields: Record,
) -> Result<Outcome> {
    pop_none(&mut fields);
    translate_template(res, &mut fields)?;
    if !fields.contains_key("unified_job_template") {
        return Err(Error::BadRequest(
            "A child node must be specified by one of the options unified-job-template, \
             job-template, project, or inventory-source"
                .into(),
        ));
    }

    if !fields.contains_key("workflow_job_template") {
        let parent_node = res.get_record(Some(parent), Record::new())?;
        if let Some(workflow) = parent_node.get("workflow_job_template") {
            fields.insert("workflow_job_template".into(), workflow.clone());
        }
    }

    let opts = ReadOptions {
        query: vec![(kind.reverse(), pk_segment(parent))],
        ..ReadOptions::default()
    };
    let page = res.read(None, &opts, fields.clone())?;
    if let Some(existing) = page.results.into_iter().next() {
        let id = existing.get("id").cloned();
        return Ok(Outcome::unchanged(id, existing));
    }

    tracing::debug!(parent = %parent, edge = kind.as_str(), "creating new workflow node");
    let path = format!("{}{}/{}/", res.endpoint(), pk_segment(parent), kind.forward());
    let record = res.api().post(&path, &Value::Object(fields))?.into_record();
    let id = record.get("id").cloned();
    Ok(Outcome::changed(id, record))
}

#[cfg(test)]
#[path = "node_tests.rs"]
mod tests;
