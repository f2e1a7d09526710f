// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Blocking HTTP transport backed by ureq

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use ureq::tls::TlsConfig;
use ureq::Agent;

use super::{ApiRequest, Method, RawResponse, Transport, TransportError};
use crate::config::Settings;

const API_PREFIX: &str = "/api/v2/";

pub struct HttpTransport {
    agent: Agent,
    prefix: String,
    authorization: Option<String>,
}

impl HttpTransport {
    /// Build a transport for the host and credentials in `settings`
    pub fn from_settings(settings: &Settings) -> Result<Self, TransportError> {
        let prefix = api_prefix(&settings.host, settings.verify_ssl)?;

        let config = Agent::config_builder()
            .http_status_as_error(false)
            .tls_config(
                TlsConfig::builder()
                    .disable_verification(!settings.verify_ssl)
                    .build(),
            )
            .build();

        let authorization = match (&settings.oauth_token, settings.username.is_empty()) {
            (Some(token), _) => Some(format!("Bearer {}", token)),
            (None, false) => {
                let pair = format!("{}:{}", settings.username, settings.password);
                Some(format!("Basic {}", STANDARD.encode(pair)))
            }
            (None, true) => None,
        };

        Ok(Self {
            agent: Agent::new_with_config(config),
            prefix,
            authorization,
        })
    }

    /// Absolute URL for a path relative to the API root
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.prefix, path.trim_start_matches('/'))
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &ApiRequest) -> Result<RawResponse, TransportError> {
        let url = self.url(&request.path);

        let result = match request.method {
            Method::Get | Method::Delete | Method::Options => {
                let mut builder = match request.method {
                    Method::Get => self.agent.get(&url),
                    Method::Delete => self.agent.delete(&url),
                    _ => self.agent.options(&url),
                };
                for (key, value) in &request.params {
                    builder = builder.query(key, value);
                }
                if let Some(auth) = &self.authorization {
                    builder = builder.header("Authorization", auth);
                }
                builder.call()
            }
            Method::Post | Method::Patch | Method::Put => {
                let mut builder = match request.method {
                    Method::Post => self.agent.post(&url),
                    Method::Patch => self.agent.patch(&url),
                    _ => self.agent.put(&url),
                };
                for (key, value) in &request.params {
                    builder = builder.query(key, value);
                }
                if let Some(auth) = &self.authorization {
                    builder = builder.header("Authorization", auth);
                }
                let body = request
                    .body
                    .as_ref()
                    .map(|b| b.to_string())
                    .unwrap_or_else(|| "{}".to_string());
                builder
                    .header("Content-Type", "application/json")
                    .send(body)
            }
        };

        let mut response = result.map_err(|e| TransportError::Connection(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| TransportError::Body(e.to_string()))?;
        Ok(RawResponse { status, body })
    }
}

/// `https://host/api/v2/`, adding a scheme when the host has none.
///
/// Plain `http://` is only accepted with certificate verification off.
pub(crate) fn api_prefix(host: &str, verify_ssl: bool) -> Result<String, TransportError> {
    let host = host.trim().trim_end_matches('/');
    if host.is_empty() {
        return Err(TransportError::InvalidHost("No host configured.".into()));
    }
    let url = if host.starts_with("http://") {
        if verify_ssl {
            return Err(TransportError::InvalidHost(format!(
                "Cannot use plain http with certificate verification enabled: {}. \
                 Use https or pass --insecure.",
                host
            )));
        }
        host.to_string()
    } else if host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    };
    Ok(format!("{}{}", url, API_PREFIX))
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
