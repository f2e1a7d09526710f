// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Transport seam between the resource layer and the REST API.
//!
//! The resource layer never touches HTTP directly. It builds an
//! [`ApiRequest`] and hands it to a [`Transport`]; [`HttpTransport`] talks to
//! a real server, [`FakeTransport`] replays canned responses in tests.

mod fake;
mod http;

pub use fake::FakeTransport;
pub use http::HttpTransport;

use serde_json::Value;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
    Put,
    Delete,
    Options,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request relative to the API root, e.g. `GET /job_templates/?name=x`
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path with leading and trailing `/`, without the `/api/v2` prefix
    pub path: String,
    pub params: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: Vec::new(),
            body: None,
        }
    }

    pub fn with_params(mut self, params: Vec<(String, String)>) -> Self {
        self.params = params;
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Value of a query parameter, if present
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Undecoded response: status plus body text
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn json(status: u16, body: &Value) -> Self {
        Self::new(status, body.to_string())
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("could not connect to host: {0}")]
    Connection(String),

    #[error("invalid response body: {0}")]
    Body(String),

    #[error("{0}")]
    InvalidHost(String),
}

/// Sends one request and returns the raw response, whatever its status
pub trait Transport {
    fn send(&self, request: &ApiRequest) -> Result<RawResponse, TransportError>;
}
