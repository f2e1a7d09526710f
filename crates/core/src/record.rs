// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote records, list pages and the output envelope

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::LazyLock;

/// A remote record: JSON object with server-defined key order
pub type Record = Map<String, Value>;

/// Result of every mutating operation: `{changed, id, ..fields}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    pub changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(flatten)]
    pub record: Record,
}

impl Outcome {
    pub fn new(changed: bool, id: Option<Value>, mut record: Record) -> Self {
        record.remove("id");
        record.remove("changed");
        Self {
            changed,
            id,
            record,
        }
    }

    pub fn changed(id: Option<Value>, record: Record) -> Self {
        Self::new(true, id, record)
    }

    pub fn unchanged(id: Option<Value>, record: Record) -> Self {
        Self::new(false, id, record)
    }

    /// Bare `{changed}` with no record attached
    pub fn bare(changed: bool) -> Self {
        Self::new(changed, None, Record::new())
    }
}

/// One page of a collection fetch as the server returns it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default)]
    pub results: Vec<Record>,
}

impl Page {
    /// Wrap a single record so detail and list fetches share one shape
    pub fn single(record: Record) -> Self {
        Self {
            count: 1,
            next: None,
            previous: None,
            results: vec![record],
        }
    }
}

/// A list result with `next`/`previous` reduced to page numbers
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListPage {
    pub count: u64,
    pub next: Option<u32>,
    pub previous: Option<u32>,
    pub results: Vec<Record>,
}

impl From<Page> for ListPage {
    fn from(page: Page) -> Self {
        Self {
            count: page.count,
            next: page.next.as_deref().map(page_number),
            previous: page.previous.as_deref().map(page_number),
            results: page.results,
        }
    }
}

#[allow(clippy::expect_used)]
static PAGE_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"page=(\d+)").expect("constant regex pattern is valid"));

/// Page number carried by a cursor URL; a URL without `page=` is page 1
pub fn page_number(url: &str) -> u32 {
    PAGE_PARAM
        .captures(url)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(1)
}

/// Render a primary key as a URL path segment
pub fn pk_segment(pk: &Value) -> String {
    match pk {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Render a value as query parameter text; arrays repeat the key
pub fn param_values(value: &Value) -> Vec<String> {
    match value {
        Value::Null => Vec::new(),
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items.iter().flat_map(param_values).collect(),
        other => vec![other.to_string()],
    }
}

/// Drop keys whose value is null
pub fn pop_none(record: &mut Record) {
    record.retain(|_, v| !v.is_null());
}

/// Whether a supplied value already matches the server's value.
///
/// The string `"null"` asks for a cleared value and so matches null.
pub fn values_match(supplied: &Value, existing: Option<&Value>) -> bool {
    let existing = existing.unwrap_or(&Value::Null);
    match supplied {
        Value::String(s) if s == "null" => existing.is_null(),
        other => other == existing,
    }
}

/// Translate the `"null"` sentinel into JSON null before sending
pub fn translate_null(record: &mut Record) {
    for value in record.values_mut() {
        if value.as_str() == Some("null") {
            *value = Value::Null;
        }
    }
}

/// Convert a record into query parameters, skipping null values
pub fn to_params(record: &Record) -> Vec<(String, String)> {
    record
        .iter()
        .flat_map(|(k, v)| param_values(v).into_iter().map(move |s| (k.clone(), s)))
        .collect()
}

/// Text form of a value for messages and comparisons
pub fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Build a record from `(key, value)` pairs
pub fn record<I, K>(pairs: I) -> Record
where
    I: IntoIterator<Item = (K, Value)>,
    K: Into<String>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v)).collect::<Map<_, _>>()
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
