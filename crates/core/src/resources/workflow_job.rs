// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workflow jobs: launching, and a summary table in place of stdout

use serde_json::{json, Value};
use std::io::Write;

use crate::clock::Clock;
use crate::context::Resource;
use crate::crud::ListOptions;
use crate::error::Result;
use crate::monitor::job_id;
use crate::parser::process_extra_vars;
use crate::record::{pk_segment, Outcome, Record};
use crate::table::render_table;
use crate::transport::Transport;

use super::job::LaunchOptions;

/// Table of the finished jobs a workflow job has run, sliced by line
pub(crate) fn summary<T: Transport, C: Clock>(
    res: &Resource<'_, T, C>,
    pk: &Value,
    start_line: Option<usize>,
    end_line: Option<usize>,
) -> Result<String> {
    let jobs = res.related("unified_job")?;
    let opts = ListOptions {
        all_pages: true,
        query: vec![
            ("unified_job_node__workflow_job".to_string(), pk_segment(pk)),
            ("order_by".to_string(), "finished".to_string()),
            ("status__in".to_string(), "successful,failed,error".to_string()),
        ],
        ..ListOptions::default()
    };
    let page = jobs.list_records(&opts, Record::new())?;
    if page.count == 0 || page.results.is_empty() {
        return Ok(String::new());
    }

    let mut columns = vec!["id".to_string()];
    columns.extend(
        jobs.definition()
            .display_fields()
            .into_iter()
            .map(|f| f.name.clone()),
    );
    let table = render_table(&columns, &page.results);
    let lines: Vec<&str> = table.lines().collect();
    let end = end_line.unwrap_or(lines.len()).min(lines.len());
    let start = start_line.unwrap_or(0).min(end);
    let mut content = lines[start..end].join("\n");
    content.push('\n');
    Ok(content)
}

/// Launch a workflow job from `workflow`
pub fn launch<T: Transport, C: Clock>(
    res: &Resource<'_, T, C>,
    workflow: &Value,
    opts: &LaunchOptions,
    out: &mut dyn Write,
) -> Result<Outcome> {
    res.definition().ensure_supports("launch")?;
    let workflow_id = res.related("workflow")?.resolve(workflow)?;

    let mut data = Record::new();
    if !opts.extra_vars.is_empty() {
        let vars = process_extra_vars(&opts.extra_vars, false)?;
        if !vars.is_empty() {
            data.insert("extra_vars".into(), json!(vars));
        }
    }

    tracing::debug!(workflow = %workflow_id, "launching the workflow job");
    let path = format!("/workflow_job_templates/{}/launch/", pk_segment(&workflow_id));
    let started = res.api().post(&path, &Value::Object(data))?.into_record();
    let id = job_id(&started)?;
    opts.follow(res, id, started, out)
}

#[cfg(test)]
#[path = "workflow_job_tests.rs"]
mod tests;
