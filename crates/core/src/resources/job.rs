// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Launching jobs from job templates

use serde_json::{json, Value};
use std::io::Write;
use std::time::Duration;

use crate::clock::Clock;
use crate::context::Resource;
use crate::error::{Error, Result};
use crate::monitor::{job_id, MonitorOptions, WaitOptions};
use crate::parser::process_extra_vars;
use crate::record::{pk_segment, text, Outcome, Record};
use crate::transport::Transport;

/// Values a template may ask for at launch, in the order they are checked
pub const PROMPTS: &[&str] = &[
    "diff_mode",
    "limit",
    "tags",
    "skip_tags",
    "job_type",
    "verbosity",
    "inventory",
    "credential",
];

#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    /// Stream output until the job finishes
    pub monitor: bool,
    /// Block until the job finishes
    pub wait: bool,
    pub timeout: Option<Duration>,
    /// Never send values for prompts the template asks for
    pub no_input: bool,
    /// Variable blocks merged into `extra_vars`
    pub extra_vars: Vec<String>,
    /// Launch-time values keyed by prompt name, e.g. `limit`
    pub prompts: Record,
}

impl LaunchOptions {
    pub(crate) fn follow<T: Transport, C: Clock>(
        &self,
        res: &Resource<'_, T, C>,
        id: Value,
        launched: Record,
        out: &mut dyn Write,
    ) -> Result<Outcome> {
        if self.monitor {
            let opts = MonitorOptions {
                timeout: self.timeout,
                ..MonitorOptions::default()
            };
            res.monitor(Some(id), None, &opts, Record::new(), out)
        } else if self.wait {
            let opts = WaitOptions {
                timeout: self.timeout,
                ..WaitOptions::default()
            };
            res.wait(Some(id), None, &opts, Record::new(), out)
        } else {
            Ok(Outcome::changed(Some(id), launched))
        }
    }
}

/// Launch a job from `job_template` and report on it.
///
/// Prompted values are only sent for prompts the template enables. A
/// template that needs passwords to start cannot be launched here.
pub fn launch<T: Transport, C: Clock>(
    res: &Resource<'_, T, C>,
    job_template: &Value,
    opts: &LaunchOptions,
    out: &mut dyn Write,
) -> Result<Outcome> {
    res.definition().ensure_supports("launch")?;
    let templates = res.related("job_template")?;
    let template_id = templates.resolve(job_template)?;
    let template = templates.get_record(Some(&template_id), Record::new())?;

    let mut data = Record::new();
    if let Some(tags) = opts.prompts.get("tags").filter(|t| !t.is_null()) {
        data.insert("job_tags".into(), tags.clone());
    }
    if !opts.extra_vars.is_empty() {
        let vars = process_extra_vars(&opts.extra_vars, true)?;
        if !vars.is_empty() {
            data.insert("extra_vars".into(), json!(vars));
        }
    }

    for prompt in PROMPTS {
        let asked = template
            .get(&format!("ask_{}_on_launch", prompt))
            .and_then(Value::as_bool)
            .unwrap_or(false);
        if !asked || opts.no_input {
            continue;
        }
        let value = match opts.prompts.get(*prompt).filter(|v| !v.is_null()) {
            Some(value) if matches!(*prompt, "inventory" | "credential") => {
                res.related(prompt)?.resolve(value)?
            }
            Some(value) => value.clone(),
            None => {
                tracing::warn!("{} is asked at launch but not provided", prompt);
                continue;
            }
        };
        if *prompt != "tags" {
            data.insert(prompt.to_string(), value);
        }
    }

    let path = format!("/job_templates/{}/launch/", pk_segment(&template_id));
    tracing::debug!(template = %template_id, "asking for information necessary to start the job");
    let start_info = res.api().get(&path, &[])?.body;
    let passwords: Vec<String> = start_info
        .get("passwords_needed_to_start")
        .and_then(Value::as_array)
        .map(|items| items.iter().map(text).collect())
        .unwrap_or_default();
    if !passwords.is_empty() {
        return Err(Error::CannotStartJob(format!(
            "Job template requires passwords to start: {}",
            passwords.join(", ")
        )));
    }

    tracing::debug!(template = %template_id, "launching the job");
    let started = res.api().post(&path, &Value::Object(data))?.into_record();
    let id = job_id(&started)?;
    if let Some(Value::Object(ignored)) = started.get("ignored_fields") {
        for (key, value) in ignored {
            let shown = text(value);
            if !shown.is_empty() && shown != "{}" {
                tracing::warn!(field = %key, value = %value, "ignored by the server at launch");
            }
        }
    }

    if opts.monitor || opts.wait {
        return opts.follow(res, id, started, out);
    }
    let status = res.status(Some(id.clone()), true, Record::new())?;
    Ok(Outcome::changed(Some(id), status))
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
