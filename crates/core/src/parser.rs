// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parsing of extra variables given as JSON, YAML or `key=value` text

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::model::read_variables;

/// Parse one block of variables into a map.
///
/// JSON is tried first, then YAML, then whitespace-separated `key=value`
/// pairs. Empty input yields an empty map.
pub fn parse_vars(text: &str) -> Result<Map<String, Value>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(Map::new());
    }

    if trimmed.starts_with('{') {
        return match serde_json::from_str::<Value>(trimmed)? {
            Value::Object(map) => Ok(map),
            _ => Err(not_a_mapping(trimmed)),
        };
    }

    if let Ok(value) = serde_yaml::from_str::<Value>(trimmed) {
        match value {
            Value::Object(map) => return Ok(map),
            Value::Null => return Ok(Map::new()),
            _ => {}
        }
    }

    parse_key_values(trimmed)
}

fn parse_key_values(text: &str) -> Result<Map<String, Value>> {
    let mut map = Map::new();
    for token in text.split_whitespace() {
        let (key, value) = token.split_once('=').ok_or_else(|| not_a_mapping(text))?;
        if key.is_empty() {
            return Err(not_a_mapping(text));
        }
        let value = value.trim_matches(|c| c == '"' || c == '\'');
        let value = serde_yaml::from_str::<Value>(value)
            .ok()
            .filter(|v| !v.is_object() && !v.is_array() && !v.is_null())
            .unwrap_or_else(|| Value::String(value.to_string()));
        map.insert(key.to_string(), value);
    }
    Ok(map)
}

fn not_a_mapping(text: &str) -> Error {
    Error::Validation(format!(
        "Could not parse variables as JSON, YAML or key=value pairs: {}",
        text
    ))
}

/// Combine several variable blocks into the text sent as `extra_vars`.
///
/// Each input may be `@path`. Later blocks override earlier keys. A single
/// block is passed through untouched (keeping YAML comments) unless
/// `force_json`; otherwise the merged map is serialized as JSON. Nothing
/// to send yields an empty string.
pub fn process_extra_vars(inputs: &[String], force_json: bool) -> Result<String> {
    let mut merged = Map::new();
    let mut texts = Vec::with_capacity(inputs.len());
    for input in inputs {
        let text = read_variables(input.trim())?;
        merged.extend(parse_vars(&text)?);
        texts.push(text);
    }

    if !force_json && texts.len() == 1 {
        return Ok(texts[0].trim_end().to_string());
    }
    if merged.is_empty() {
        return Ok(String::new());
    }
    Ok(serde_json::to_string(&Value::Object(merged))?)
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
