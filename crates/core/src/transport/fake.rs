// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake transport for testing

use super::{ApiRequest, Method, RawResponse, Transport, TransportError};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// A canned route. Responses are replayed in order; the last one repeats.
struct Route {
    method: Method,
    path: String,
    params: Vec<(String, String)>,
    responses: VecDeque<RawResponse>,
}

impl Route {
    fn matches(&self, request: &ApiRequest) -> bool {
        self.method == request.method
            && self.path == request.path
            && self
                .params
                .iter()
                .all(|(k, v)| request.params.iter().any(|(rk, rv)| rk == k && rv == v))
    }

    fn next_response(&mut self) -> Option<RawResponse> {
        if self.responses.len() > 1 {
            self.responses.pop_front()
        } else {
            self.responses.front().cloned()
        }
    }
}

#[derive(Default)]
struct FakeState {
    routes: Vec<Route>,
    calls: Vec<ApiRequest>,
    offline: Option<String>,
}

/// In-memory transport that records every request.
///
/// Unrouted requests get a 404 `{"detail": "Not found."}`, matching the
/// server's answer for unknown paths.
#[derive(Clone, Default)]
pub struct FakeTransport {
    state: Arc<Mutex<FakeState>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for `method path`, regardless of query parameters
    pub fn respond(&self, method: Method, path: &str, status: u16, body: Value) -> &Self {
        self.respond_with_params(method, path, &[], status, body)
    }

    /// Queue a response only for requests carrying all of `params`.
    ///
    /// When several routes match, the one with the most parameters wins.
    pub fn respond_with_params(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, &str)],
        status: u16,
        body: Value,
    ) -> &Self {
        let params: Vec<(String, String)> = params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let response = if body.is_null() {
            RawResponse::new(status, "")
        } else {
            RawResponse::json(status, &body)
        };

        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        match state
            .routes
            .iter_mut()
            .find(|r| r.method == method && r.path == path && r.params == params)
        {
            Some(route) => route.responses.push_back(response),
            None => state.routes.push(Route {
                method,
                path: path.to_string(),
                params,
                responses: VecDeque::from([response]),
            }),
        }
        self
    }

    /// Make every subsequent request fail as if the host were unreachable
    pub fn go_offline(&self, reason: &str) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.offline = Some(reason.to_string());
    }

    /// All requests sent so far
    pub fn calls(&self) -> Vec<ApiRequest> {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .calls
            .clone()
    }

    /// Requests sent with the given method
    pub fn calls_with(&self, method: Method) -> Vec<ApiRequest> {
        self.calls()
            .into_iter()
            .filter(|c| c.method == method)
            .collect()
    }

    /// Number of requests that could change server state
    pub fn mutation_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| {
                matches!(
                    c.method,
                    Method::Post | Method::Patch | Method::Put | Method::Delete
                )
            })
            .count()
    }
}

impl Transport for FakeTransport {
    fn send(&self, request: &ApiRequest) -> Result<RawResponse, TransportError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.calls.push(request.clone());

        if let Some(reason) = &state.offline {
            return Err(TransportError::Connection(reason.clone()));
        }

        let route = state
            .routes
            .iter_mut()
            .filter(|r| r.matches(request))
            .max_by_key(|r| r.params.len());

        Ok(route.and_then(Route::next_response).unwrap_or_else(|| {
            RawResponse::json(404, &json!({"detail": "Not found."}))
        }))
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
