// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notification templates.
//!
//! The server keeps per-type settings in one `notification_configuration`
//! object, but they are accepted as individual fields. Every operation
//! separates those fields from the body first; writes then fold the ones
//! the chosen `notification_type` needs back into the configuration.

use serde_json::Value;

use crate::clock::Clock;
use crate::context::Resource;
use crate::crud::{ListOptions, WriteOptions};
use crate::error::{Error, Result};
use crate::model::FieldType;
use crate::record::{pop_none, text, ListPage, Outcome, Record};
use crate::transport::Transport;

pub(crate) const NOTIFICATION_TYPES: &[&str] = &[
    "email",
    "slack",
    "twilio",
    "pagerduty",
    "hipchat",
    "webhook",
    "irc",
];

/// Statuses a template can be notified on
pub const NOTIFY_ON: &[&str] = &["any", "error", "success"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConfigKind {
    Text,
    Integer,
    Boolean,
    /// JSON text, parsed before it is sent
    Json,
}

impl ConfigKind {
    pub(crate) fn field_type(self) -> FieldType {
        match self {
            ConfigKind::Text => FieldType::Text,
            ConfigKind::Integer => FieldType::Integer,
            ConfigKind::Boolean => FieldType::Boolean,
            ConfigKind::Json => FieldType::Variables,
        }
    }
}

pub(crate) struct ConfigField {
    pub name: &'static str,
    pub help: &'static str,
    pub kind: ConfigKind,
    pub multiple: bool,
    pub default: Option<bool>,
}

const fn config(name: &'static str, kind: ConfigKind, help: &'static str) -> ConfigField {
    ConfigField {
        name,
        help,
        kind,
        multiple: false,
        default: None,
    }
}

const fn many(name: &'static str, help: &'static str) -> ConfigField {
    ConfigField {
        multiple: true,
        ..config(name, ConfigKind::Text, help)
    }
}

const fn switch(name: &'static str, help: &'static str) -> ConfigField {
    ConfigField {
        default: Some(false),
        ..config(name, ConfigKind::Boolean, help)
    }
}

use ConfigKind::{Boolean, Integer, Json, Text};

pub(crate) const CONFIG_FIELDS: &[ConfigField] = &[
    config(
        "notification_configuration",
        Json,
        "Whole configuration as JSON; replaces the individual fields",
    ),
    many("channels", "[slack] Channels to post to"),
    config("token", Text, "[slack, pagerduty, hipchat] API token"),
    config("username", Text, "[email] Username"),
    config("sender", Text, "[email] Sender address"),
    many("recipients", "[email] Recipient addresses"),
    switch("use_tls", "[email] Use TLS"),
    config("host", Text, "[email] Mail server host"),
    switch("use_ssl", "[email, irc] Use SSL"),
    config("password", Text, "[email, irc] Password"),
    config("port", Integer, "[email, irc] Server port"),
    config("account_token", Text, "[twilio] Account token"),
    config("from_number", Text, "[twilio] Source phone number"),
    many("to_numbers", "[twilio] Destination phone numbers"),
    config("account_sid", Text, "[twilio] Account SID"),
    config("subdomain", Text, "[pagerduty] Subdomain"),
    config("service_key", Text, "[pagerduty] API service key"),
    config("client_name", Text, "[pagerduty] Client identifier"),
    config("message_from", Text, "[hipchat] Label shown as the sender"),
    config("api_url", Text, "[hipchat] API URL"),
    config("color", Text, "[hipchat] Notification color"),
    config("notify", Boolean, "[hipchat] Notify channel members"),
    many("rooms", "[hipchat] Rooms to post to"),
    config("url", Text, "[webhook] Target URL"),
    config("headers", Json, "[webhook] HTTP headers as JSON"),
    config("server", Text, "[irc] Server address"),
    config("nickname", Text, "[irc] Nickname"),
    many("targets", "[irc] Channels or users to message"),
];

/// Configuration fields each notification type requires
const REQUIRED: &[(&str, &[&str])] = &[
    ("slack", &["channels", "token"]),
    (
        "email",
        &[
            "username",
            "sender",
            "recipients",
            "use_tls",
            "host",
            "use_ssl",
            "password",
            "port",
        ],
    ),
    (
        "twilio",
        &["account_token", "from_number", "to_numbers", "account_sid"],
    ),
    (
        "pagerduty",
        &["token", "subdomain", "service_key", "client_name"],
    ),
    (
        "hipchat",
        &["message_from", "api_url", "color", "token", "notify", "rooms"],
    ),
    ("webhook", &["url", "headers"]),
    (
        "irc",
        &["server", "port", "use_ssl", "password", "nickname", "targets"],
    ),
];

/// Fields the server masks as `$encrypted$` when read back
const ENCRYPTED: &[&str] = &["password", "token", "account_token"];

const ENCRYPTED_MARKER: &str = "$encrypted$";

/// Move configuration fields out of `fields`, parsing the JSON-typed ones
fn separate(fields: &mut Record) -> Result<Record> {
    pop_none(fields);
    let mut config = Record::new();
    for spec in CONFIG_FIELDS {
        let Some(value) = fields.remove(spec.name) else {
            continue;
        };
        let value = match (spec.kind, value) {
            (Json, Value::String(raw)) => serde_json::from_str(&raw).map_err(|_| {
                Error::General("Provided json file format invalid. Please recheck.".into())
            })?,
            (_, value) => value,
        };
        config.insert(spec.name.to_string(), value);
    }
    Ok(config)
}

/// Fold `config` into `fields` as `notification_configuration`
fn configuration(fields: &mut Record, config: &Record) -> Result<()> {
    if let Some(whole) = config.get("notification_configuration") {
        fields.insert("notification_configuration".into(), whole.clone());
        return Ok(());
    }
    let Some(kind) = fields.get("notification_type").map(text) else {
        return Ok(());
    };
    let required = REQUIRED
        .iter()
        .find(|(name, _)| *name == kind)
        .map(|(_, required)| *required)
        .ok_or_else(|| Error::General(format!("Unknown notification type {}.", kind)))?;

    let mut combined = Record::new();
    for name in required {
        let value = config.get(*name).ok_or_else(|| {
            Error::General(format!("Required config field {} not provided.", name))
        })?;
        combined.insert(name.to_string(), value.clone());
    }
    fields.insert("notification_configuration".into(), Value::Object(combined));
    Ok(())
}

/// Create a template, optionally attached to a job template.
///
/// `job_template` and `status` in `fields` select the
/// `/job_templates/<id>/notification_templates_<status>/` collection. A
/// template that already exists is associated instead of re-created.
pub(crate) fn create<T: Transport, C: Clock>(
    res: &Resource<'_, T, C>,
    opts: WriteOptions,
    mut fields: Record,
) -> Result<Outcome> {
    let config = separate(&mut fields)?;
    let job_template = fields.remove("job_template");
    let status = fields
        .remove("status")
        .map(|s| text(&s))
        .unwrap_or_else(|| "any".to_string());
    ensure_status(&status)?;

    let mut body = fields.clone();
    configuration(&mut body, &config)?;

    let Some(job_template) = job_template else {
        return res.write_record(None, opts, body);
    };

    let templates = res.related("job_template")?;
    let jt_id = templates.resolve(&job_template)?;
    templates.get_record(Some(&jt_id), Record::new())?;

    match res.get_record(None, fields) {
        Ok(existing) => {
            if opts.fail_on_found {
                return Err(Error::Found(
                    "Notification template already exists and fail-on-found is switched on. \
                     Please use \"associate_notification_template\" of job_template instead."
                        .into(),
                ));
            }
            tracing::debug!("notification template already exists; associating with job template");
            let nt_id = existing
                .get("id")
                .cloned()
                .ok_or_else(|| Error::General("Record has no id.".into()))?;
            templates.assoc(&format!("notification_templates_{}", status), &jt_id, &nt_id)
        }
        Err(Error::NotFound(_)) => {
            let scoped = res.scoped(&format!(
                "/job_templates/{}/notification_templates_{}/",
                text(&jt_id),
                status
            ));
            scoped.write_record(None, opts, body)
        }
        Err(err) => Err(err),
    }
}

/// Two-phase modify: plain fields first, then type and configuration
/// merged with the stored configuration.
pub(crate) fn modify<T: Transport, C: Clock>(
    res: &Resource<'_, T, C>,
    pk: Option<Value>,
    create_on_missing: bool,
    mut fields: Record,
) -> Result<Outcome> {
    if pk.is_none() && create_on_missing {
        let mut lookup = fields.clone();
        separate(&mut lookup)?;
        lookup.remove("job_template");
        lookup.remove("status");
        match res.get_record(None, lookup) {
            Err(Error::NotFound(_)) => return create(res, WriteOptions::create(), fields),
            Err(err) => return Err(err),
            Ok(_) => {}
        }
    }

    let mut config = separate(&mut fields)?;
    let notification_type = fields.remove("notification_type");
    let opts = WriteOptions::modify(create_on_missing);

    tracing::debug!("modifying everything except notification type and configuration");
    let part = res.write_record(pk.clone(), opts, fields.clone())?;

    let stored_type = part.record.get("notification_type").cloned();
    if notification_type.is_none() || notification_type == stored_type {
        if let Some(Value::Object(stored)) = part.record.get("notification_configuration") {
            for (key, value) in stored {
                if config.get(key).is_some_and(truthy) {
                    continue;
                }
                let masked = value.as_str() == Some(ENCRYPTED_MARKER)
                    && ENCRYPTED.contains(&key.as_str());
                if !masked {
                    config.insert(key.clone(), value.clone());
                }
            }
        }
    }
    if let Some(kind) = notification_type.or(stored_type) {
        fields.insert("notification_type".into(), kind);
    }
    configuration(&mut fields, &config)?;

    tracing::debug!("modifying notification type and configuration");
    let mut result = res.write_record(pk.or_else(|| part.id.clone()), opts, fields)?;
    result.changed |= part.changed;
    Ok(result)
}

pub(crate) fn get<T: Transport, C: Clock>(
    res: &Resource<'_, T, C>,
    pk: Option<&Value>,
    mut filters: Record,
) -> Result<Record> {
    separate(&mut filters)?;
    res.get_record(pk, filters)
}

pub(crate) fn list<T: Transport, C: Clock>(
    res: &Resource<'_, T, C>,
    opts: &ListOptions,
    mut filters: Record,
) -> Result<ListPage> {
    separate(&mut filters)?;
    res.list_records(opts, filters)
}

pub(crate) fn delete<T: Transport, C: Clock>(
    res: &Resource<'_, T, C>,
    pk: Option<Value>,
    fail_on_missing: bool,
    mut filters: Record,
) -> Result<Outcome> {
    separate(&mut filters)?;
    res.delete_record(pk, fail_on_missing, filters)
}

/// Attach a notification template to (or detach it from) a job template
/// or workflow for jobs ending in `status`
pub fn link<T: Transport, C: Clock>(
    res: &Resource<'_, T, C>,
    owner: &Value,
    template: &Value,
    status: &str,
    associate: bool,
) -> Result<Outcome> {
    let command = if associate {
        "associate_notification_template"
    } else {
        "disassociate_notification_template"
    };
    res.definition().ensure_supports(command)?;
    ensure_status(status)?;

    let owner = res.resolve(owner)?;
    let template = res.related("notification_template")?.resolve(template)?;
    let edge = format!("notification_templates_{}", status);
    if associate {
        res.assoc(&edge, &owner, &template)
    } else {
        res.disassoc(&edge, &owner, &template)
    }
}

fn ensure_status(status: &str) -> Result<()> {
    if NOTIFY_ON.contains(&status) {
        Ok(())
    } else {
        Err(Error::Validation(format!(
            "--status: {:?} is not one of: {}",
            status,
            NOTIFY_ON.join(", ")
        )))
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

#[cfg(test)]
#[path = "notification_tests.rs"]
mod tests;
