// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Projects and the source-control updates they run

use serde_json::{json, Value};
use std::io::Write;
use std::time::Duration;

use crate::clock::Clock;
use crate::context::Resource;
use crate::crud::WriteOptions;
use crate::error::{Error, Result};
use crate::monitor::{job_id, MonitorOptions, WaitOptions};
use crate::record::{Outcome, Record};
use crate::transport::Transport;

/// What to do with the update a create or update starts
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateOptions {
    pub monitor: bool,
    pub wait: bool,
    pub timeout: Option<Duration>,
}

impl UpdateOptions {
    fn follow<T: Transport, C: Clock>(
        &self,
        res: &Resource<'_, T, C>,
        pk: Option<Value>,
        project: Value,
        out: &mut dyn Write,
    ) -> Result<Option<Outcome>> {
        if self.monitor {
            let opts = MonitorOptions {
                timeout: self.timeout,
                ..MonitorOptions::default()
            };
            res.monitor(pk, Some(project), &opts, Record::new(), out).map(Some)
        } else if self.wait {
            let opts = WaitOptions {
                timeout: self.timeout,
                ..WaitOptions::default()
            };
            res.wait(pk, Some(project), &opts, Record::new(), out).map(Some)
        } else {
            Ok(None)
        }
    }
}

/// `job_timeout` is sent to the server as `timeout`
pub(crate) fn write<T: Transport, C: Clock>(
    res: &Resource<'_, T, C>,
    pk: Option<Value>,
    opts: WriteOptions,
    mut fields: Record,
) -> Result<Outcome> {
    if let Some(timeout) = fields.remove("job_timeout") {
        fields.entry("timeout").or_insert(timeout);
    }
    res.write_record(pk, opts, fields)
}

/// Create a project, then optionally follow its first update.
///
/// Servers whose project form has no `organization` field get the
/// organization associated after the project is created.
pub fn create<T: Transport, C: Clock>(
    res: &Resource<'_, T, C>,
    opts: WriteOptions,
    mut fields: Record,
    update: &UpdateOptions,
    out: &mut dyn Write,
) -> Result<Outcome> {
    res.definition().ensure_supports("create")?;
    let mut post_associate = None;
    if let Some(organization) = fields.remove("organization").filter(|o| !o.is_null()) {
        tracing::debug!("checking organization relationship");
        let org_pk = res.related("organization")?.resolve(&organization)?;
        let schema = res.api().options(res.endpoint())?.body;
        if schema.pointer("/actions/POST/organization").is_some() {
            fields.insert("organization".into(), org_pk);
        } else {
            post_associate = Some(org_pk);
        }
    }

    let opts = WriteOptions {
        create_on_missing: true,
        ..opts
    };
    let answer = write(res, None, opts, fields)?;
    let project_id = answer
        .id
        .clone()
        .ok_or_else(|| Error::General("Record has no id.".into()))?;

    if let Some(org_pk) = post_associate {
        tracing::debug!("associating the project with its organization");
        res.related("organization")?
            .assoc("projects", &org_pk, &project_id)?;
    }

    if answer.changed {
        if let Some(followed) = update.follow(res, None, project_id, out)? {
            return Ok(followed);
        }
    }
    Ok(answer)
}

/// Start an update of a project from source control
pub fn update<T: Transport, C: Clock>(
    res: &Resource<'_, T, C>,
    pk: Option<Value>,
    filters: Record,
    opts: &UpdateOptions,
    out: &mut dyn Write,
) -> Result<Outcome> {
    res.definition().ensure_supports("update")?;
    let project = res.get(pk.as_ref(), filters)?;
    let pk = job_id(&project)?;
    let path = format!("{}update/", res.record_path(&pk));

    tracing::debug!(project = %pk, "asking whether the project can be updated");
    let check = res.api().get(&path, &[])?.body;
    if !check.get("can_update").and_then(Value::as_bool).unwrap_or(false) {
        return Err(Error::CannotStartJob("Cannot update project.".into()));
    }

    tracing::debug!(project = %pk, "updating the project");
    let started = res.api().post(&path, &json!({}))?.body;
    let update_id = started
        .get("project_update")
        .or_else(|| started.get("id"))
        .cloned()
        .ok_or_else(|| Error::General("Server did not report the project update.".into()))?;

    match opts.follow(res, Some(update_id.clone()), pk, out)? {
        Some(followed) => Ok(followed),
        None => Ok(Outcome::changed(Some(update_id), Record::new())),
    }
}

#[cfg(test)]
#[path = "project_tests.rs"]
mod tests;
