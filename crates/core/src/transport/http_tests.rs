// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    bare_host = { "tower.example.com", true, "https://tower.example.com/api/v2/" },
    https = { "https://tower.example.com", true, "https://tower.example.com/api/v2/" },
    trailing_slash = { "https://tower.example.com/", true, "https://tower.example.com/api/v2/" },
    insecure_http = { "http://10.0.0.1:8052", false, "http://10.0.0.1:8052/api/v2/" },
)]
fn builds_api_prefix(host: &str, verify: bool, expected: &str) {
    assert_eq!(api_prefix(host, verify).unwrap(), expected);
}

#[test]
fn plain_http_requires_disabled_verification() {
    let err = api_prefix("http://tower.example.com", true).unwrap_err();
    assert!(err.to_string().contains("plain http"));
}

#[test]
fn empty_host_is_rejected() {
    assert!(matches!(
        api_prefix("  ", true),
        Err(TransportError::InvalidHost(_))
    ));
}

#[test]
fn url_joins_paths_onto_prefix() {
    let settings = Settings {
        host: "tower.example.com".into(),
        username: "admin".into(),
        password: "secret".into(),
        ..Settings::default()
    };
    let transport = HttpTransport::from_settings(&settings).unwrap();
    assert_eq!(
        transport.url("/job_templates/4/launch/"),
        "https://tower.example.com/api/v2/job_templates/4/launch/"
    );
    assert_eq!(
        transport.authorization.as_deref(),
        Some("Basic YWRtaW46c2VjcmV0")
    );
}

#[test]
fn oauth_token_takes_precedence_over_basic_auth() {
    let settings = Settings {
        host: "tower.example.com".into(),
        username: "admin".into(),
        oauth_token: Some("abc".into()),
        ..Settings::default()
    };
    let transport = HttpTransport::from_settings(&settings).unwrap();
    assert_eq!(transport.authorization.as_deref(), Some("Bearer abc"));
}
