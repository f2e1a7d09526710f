// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Templates that carry a survey spec and extra variables

use serde_json::{json, Value};

use crate::clock::Clock;
use crate::context::Resource;
use crate::crud::WriteOptions;
use crate::error::{Error, Result};
use crate::model::Behavior;
use crate::parser::process_extra_vars;
use crate::record::{pk_segment, Outcome, Record};
use crate::transport::Transport;

/// Write the template, then save or delete its survey spec.
///
/// An empty spec object deletes the survey. The outcome is `changed`
/// whenever the survey endpoint answers 200.
pub(crate) fn write<T: Transport, C: Clock>(
    res: &Resource<'_, T, C>,
    pk: Option<Value>,
    opts: WriteOptions,
    mut fields: Record,
) -> Result<Outcome> {
    let survey = match fields.remove("survey_spec") {
        Some(Value::Null) | None => None,
        Some(raw) => Some(survey_spec(raw)?),
    };

    if let Some(vars) = fields.get("extra_vars").cloned() {
        let inputs = extra_var_inputs(&vars);
        if !inputs.is_empty() {
            fields.insert("extra_vars".into(), json!(process_extra_vars(&inputs, false)?));
        }
    }

    let mut outcome = res.write_record(pk, opts, fields)?;
    let (Some(spec), Some(id)) = (survey, outcome.id.clone()) else {
        return Ok(outcome);
    };

    let path = survey_path(res, &id);
    let empty = spec.as_object().is_some_and(|m| m.is_empty());
    let response = if empty {
        tracing::debug!(id = %id, "deleting the survey spec");
        res.api().delete(&path)?
    } else {
        tracing::debug!(id = %id, "saving the survey spec");
        res.api().post(&path, &spec)?
    };
    if response.status == 200 {
        outcome.changed = true;
    }
    if !empty && outcome.record.get("survey_enabled") != Some(&Value::Bool(true)) {
        tracing::warn!("for the survey to take effect, set survey_enabled to true");
    }
    Ok(outcome)
}

/// Fill fields a new record needs but the caller left out.
///
/// Only called once the lookup has settled on a POST, so existing
/// templates never have their `job_type` reset.
pub(crate) fn creation_defaults(behavior: Behavior, fields: &mut Record) {
    if behavior == Behavior::JobTemplate
        && fields.get("job_type").map_or(true, |v| v.is_null() || v.as_str() == Some(""))
    {
        fields.insert("job_type".into(), json!("run"));
    }
}

/// Survey spec of one template
pub fn survey<T: Transport, C: Clock>(
    res: &Resource<'_, T, C>,
    pk: Option<&Value>,
    filters: Record,
) -> Result<Value> {
    res.definition().ensure_supports("survey")?;
    let template = res.get(pk, filters)?;
    let id = template
        .get("id")
        .ok_or_else(|| Error::General("Record has no id.".into()))?;
    Ok(res.api().get(&survey_path(res, id), &[])?.body)
}

fn survey_path<T: Transport, C: Clock>(res: &Resource<'_, T, C>, id: &Value) -> String {
    format!("{}{}/survey_spec/", res.endpoint(), pk_segment(id))
}

fn survey_spec(raw: Value) -> Result<Value> {
    match raw {
        Value::String(text) => serde_json::from_str(text.trim()).map_err(|e| {
            Error::Validation(format!("--survey-spec: not valid JSON: {}", e))
        }),
        other => Ok(other),
    }
}

fn extra_var_inputs(vars: &Value) -> Vec<String> {
    match vars {
        Value::String(s) if !s.trim().is_empty() => vec![s.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
#[path = "survey_tests.rs"]
mod tests;
