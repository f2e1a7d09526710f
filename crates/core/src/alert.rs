// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Alert webhook: turn an alert payload into a job template launch

use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::ApiClient;
use crate::config::{Settings, SettingsLayer};
use crate::error::{Error, Result};
use crate::record::{pk_segment, text, Record};
use crate::transport::Transport;

/// Alert delivered on stdin by the alerting system
#[derive(Debug, Clone, Deserialize)]
pub struct AlertPayload {
    pub configuration: AlertConfiguration,
    /// Fields of the search result that fired the alert
    #[serde(default)]
    pub result: Record,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlertConfiguration {
    /// Server to launch on; falls back to the realm's or configured host
    #[serde(default)]
    pub hostname: Option<String>,
    /// Job template to launch
    pub job_id: Value,
    /// Names the `[realms.<realm>]` credentials to use
    #[serde(default)]
    pub realm: Option<String>,
    /// Variable name passed to the job
    pub var_name: String,
    /// Result field whose value becomes the variable's value
    pub var_field: String,
}

impl AlertPayload {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// `"<var_name>: <value of result.<var_field>>"`
    pub fn extra_vars(&self) -> String {
        let value = self
            .result
            .get(&self.configuration.var_field)
            .map(text)
            .unwrap_or_default();
        format!("{}: {}", self.configuration.var_name, value)
    }

    /// Connection settings: the realm's credentials, then the payload's
    /// hostname
    pub fn settings(&self, base: &Settings) -> Result<Settings> {
        let settings = match &self.configuration.realm {
            Some(realm) => base.for_realm(realm)?,
            None => base.clone(),
        };
        Ok(settings.with_overrides(&SettingsLayer {
            host: self.configuration.hostname.clone(),
            ..SettingsLayer::default()
        }))
    }
}

/// Launch the payload's job template; returns the new job's id
pub fn launch<T: Transport>(api: &ApiClient<T>, payload: &AlertPayload) -> Result<Value> {
    let template = &payload.configuration.job_id;
    if text(template).trim().is_empty() {
        return Err(Error::Validation("Alert payload has no job_id.".into()));
    }

    let path = format!("/job_templates/{}/launch/", pk_segment(template));
    let body = json!({ "extra_vars": payload.extra_vars() });
    let started = api.post(&path, &body)?.into_record();
    let job = started
        .get("job")
        .or_else(|| started.get("id"))
        .cloned()
        .ok_or_else(|| Error::General("Launch response has no job id.".into()))?;
    tracing::info!("Job ID: {} submitted successfully.", text(&job));
    Ok(job)
}

#[cfg(test)]
#[path = "alert_tests.rs"]
mod tests;
