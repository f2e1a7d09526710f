// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Server settings.
//!
//! Settings are one flat object per category rather than a collection, so
//! they are presented as `{id: <key>, value}` records and written with a
//! single-key PATCH.

use serde_json::{json, Value};

use crate::clock::Clock;
use crate::context::Resource;
use crate::error::{Error, Result};
use crate::model::parse_bool;
use crate::record::{text, ListPage, Outcome, Record};
use crate::transport::Transport;

const ENCRYPTED_MARKER: &str = "$encrypted$";

/// Every setting in `category` (all categories by default)
pub(crate) fn list<T: Transport, C: Clock>(
    res: &Resource<'_, T, C>,
    category: Option<&str>,
) -> Result<ListPage> {
    let endpoint = format!("/settings/{}/", category.unwrap_or("all"));
    let body = match res.api().get(&endpoint, &[]) {
        Ok(response) => response.body,
        Err(Error::NotFound(message)) => {
            return Err(match category {
                Some(category) => invalid_category(res, category)?,
                None => Error::NotFound(message),
            });
        }
        Err(err) => return Err(err),
    };

    let results: Vec<Record> = match body {
        Value::Object(map) => map
            .into_iter()
            .map(|(key, value)| setting(&key, value))
            .collect(),
        _ => Vec::new(),
    };
    Ok(ListPage {
        count: results.len() as u64,
        next: None,
        previous: None,
        results,
    })
}

fn invalid_category<T: Transport, C: Clock>(res: &Resource<'_, T, C>, category: &str) -> Result<Error> {
    let body = res.api().get("/settings/", &[])?.body;
    let slugs: Vec<String> = body
        .get("results")
        .and_then(Value::as_array)
        .map(|results| {
            results
                .iter()
                .filter_map(|r| r.get("slug").map(text))
                .collect()
        })
        .unwrap_or_default();
    Ok(Error::NotFound(format!(
        "{} is not a valid category.  Choose from [{}]",
        category,
        slugs.join(", ")
    )))
}

/// One setting by key
pub(crate) fn get<T: Transport, C: Clock>(
    res: &Resource<'_, T, C>,
    pk: Option<&Value>,
) -> Result<Record> {
    let key = setting_key(pk)?;
    list(res, None)?
        .results
        .into_iter()
        .find(|s| s.get("id").map(text).as_deref() == Some(key.as_str()))
        .ok_or_else(|| Error::NotFound("The requested object could not be found.".into()))
}

/// Set one setting from text, coerced to the type the server declares.
///
/// A value the server reports as `$encrypted$` cannot be compared, so
/// writing it always counts as a change.
pub(crate) fn modify<T: Transport, C: Clock>(
    res: &Resource<'_, T, C>,
    pk: Option<Value>,
    fields: Record,
) -> Result<Outcome> {
    let key = setting_key(pk.as_ref())?;
    let raw = fields
        .get("value")
        .map(text)
        .ok_or_else(|| Error::BadRequest("A value for the setting is required.".into()))?;

    let previous = get(res, Some(&json!(key)))?
        .remove("value")
        .unwrap_or(Value::Null);
    let encrypted = text(&previous).contains(ENCRYPTED_MARKER);
    let value = coerce(res, &key, &raw)?;

    if !encrypted && value == previous {
        tracing::debug!(setting = %key, "setting already has this value; doing nothing");
        return Ok(Outcome::unchanged(Some(json!(key)), setting(&key, previous)));
    }

    let (mut record, current) = if key == "LICENSE" {
        let record = res.api().post("/config/", &value)?.into_record();
        let current = Value::Object(record.clone());
        (record, current)
    } else {
        let body = json!({ key.clone(): value });
        let record = res.api().patch(res.endpoint(), &body)?.into_record();
        let current = record.get(&key).cloned().unwrap_or(Value::Null);
        (record, current)
    };

    let changed = encrypted || current != previous;
    record.insert("value".into(), current);
    Ok(Outcome::new(changed, Some(json!(key)), record))
}

/// Convert text to the type the server's `OPTIONS` schema declares for
/// `key`; `LICENSE` is always JSON
fn coerce<T: Transport, C: Clock>(res: &Resource<'_, T, C>, key: &str, raw: &str) -> Result<Value> {
    if key == "LICENSE" {
        return serde_json::from_str(raw)
            .map_err(|e| Error::Validation(format!("LICENSE: not valid JSON: {}", e)));
    }

    let schema = res.api().options(res.endpoint())?.body;
    let kind = schema
        .pointer(&format!("/actions/PUT/{}/type", key))
        .and_then(Value::as_str)
        .unwrap_or("string");
    match kind {
        "integer" => raw
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| Error::Validation(format!("{}: {:?} is not a valid integer", key, raw))),
        "boolean" => parse_bool(raw)
            .map(Value::Bool)
            .ok_or_else(|| Error::Validation(format!("{}: {:?} is not a valid boolean", key, raw))),
        "list" | "nested object" => serde_json::from_str::<Value>(raw)
            .or_else(|_| serde_yaml::from_str(raw))
            .map_err(|e| Error::Validation(format!("{}: could not parse {:?}: {}", key, raw, e))),
        _ => Ok(Value::String(raw.to_string())),
    }
}

fn setting_key(pk: Option<&Value>) -> Result<String> {
    match pk.map(text) {
        Some(key) if !key.is_empty() => Ok(key),
        _ => Err(Error::BadRequest("A setting name is required.".into())),
    }
}

fn setting(key: &str, value: Value) -> Record {
    let mut record = Record::new();
    record.insert("id".into(), json!(key));
    record.insert("value".into(), value);
    record
}

#[cfg(test)]
#[path = "setting_tests.rs"]
mod tests;
