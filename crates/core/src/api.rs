// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON client over a [`Transport`], mapping HTTP status codes to [`Error`]s

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

use crate::error::{Error, Result};
use crate::record::Record;
use crate::transport::{ApiRequest, Method, Transport};

/// A successful (non-error status) response with a decoded body
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn json(&self) -> &Value {
        &self.body
    }

    /// The body as an object; anything else becomes an empty record
    pub fn into_record(self) -> Record {
        match self.body {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }
}

pub struct ApiClient<T: Transport> {
    transport: T,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn get(&self, path: &str, params: &[(String, String)]) -> Result<ApiResponse> {
        self.request(Method::Get, path, params, None)
    }

    pub fn post(&self, path: &str, body: &Value) -> Result<ApiResponse> {
        self.request(Method::Post, path, &[], Some(body))
    }

    pub fn patch(&self, path: &str, body: &Value) -> Result<ApiResponse> {
        self.request(Method::Patch, path, &[], Some(body))
    }

    pub fn delete(&self, path: &str) -> Result<ApiResponse> {
        self.request(Method::Delete, path, &[], None)
    }

    pub fn options(&self, path: &str) -> Result<ApiResponse> {
        self.request(Method::Options, path, &[], None)
    }

    pub fn request(
        &self,
        method: Method,
        path: &str,
        params: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<ApiResponse> {
        let mut request = ApiRequest::new(method, normalize_path(path)).with_params(params.to_vec());
        if let Some(body) = body {
            request = request.with_body(body.clone());
        }

        tracing::debug!(
            method = %request.method,
            path = %request.path,
            params = ?request.params,
            data = %request.body.as_ref().map(|b| b.to_string()).unwrap_or_default(),
            "api request"
        );

        let raw = self.transport.send(&request)?;
        tracing::debug!(status = raw.status, "api response");

        if let Some(err) = status_error(&request, raw.status, &raw.body) {
            return Err(err);
        }

        let body = if raw.body.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&raw.body)?
        };
        Ok(ApiResponse {
            status: raw.status,
            body,
        })
    }
}

// Versioned API root carried by related links, e.g. `/api/v2/`
#[allow(clippy::expect_used)]
static VERSION_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/?api/v[0-9]+/").expect("constant regex pattern is valid"));

/// Strip any `api/vN/` prefix (related links carry one) and force a leading `/`
pub fn normalize_path(path: &str) -> String {
    let stripped = VERSION_PREFIX.replace(path, "");
    if stripped.starts_with('/') {
        stripped.into_owned()
    } else {
        format!("/{}", stripped)
    }
}

fn status_error(request: &ApiRequest, status: u16, body: &str) -> Option<Error> {
    let err = match status {
        500.. => Error::ServerError(
            "The server sent back a server error. Please try again later.".into(),
        ),
        401 => Error::AuthError("Invalid authentication credentials (HTTP 401).".into()),
        403 => Error::Forbidden(format!(
            "You don't have permission to do that (HTTP 403).{}",
            detail_suffix(body)
        )),
        404 => Error::NotFound("The requested object could not be found.".into()),
        405 => Error::MethodNotAllowed(format!(
            "The server says you can't make a request with the {} method to that URL ({}).",
            request.method, request.path
        )),
        400..=499 => Error::BadRequest(format!(
            "The server claims it was sent a bad request.\n\n{} {}\nParams: {:?}\nData: {}\n\nResponse: {}",
            request.method,
            request.path,
            request.params,
            request
                .body
                .as_ref()
                .map(|b| b.to_string())
                .unwrap_or_default(),
            body
        )),
        _ => return None,
    };
    Some(err)
}

fn detail_suffix(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("detail").and_then(Value::as_str).map(str::to_string))
        .map(|d| format!(" {}", d))
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "api_tests.rs"]
mod tests;
