// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn run(execute: bool, input: &str) -> Result<String> {
    let mut out = Vec::new();
    handle(
        &AlertArgs { execute },
        &Settings::default(),
        &mut input.as_bytes(),
        &mut out,
    )?;
    Ok(String::from_utf8(out)?)
}

#[test]
fn requires_execute_flag() {
    let err = run(false, "{}").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Unsupported execution mode (expected --execute flag)"
    );
}

#[test]
fn malformed_payload_fails_before_connecting() {
    let err = run(true, "{\"result\": {}}").unwrap_err();
    assert!(matches!(
        err.downcast_ref::<twr_core::Error>(),
        Some(twr_core::Error::Json(_))
    ));
}

#[test]
fn plain_http_host_is_refused_while_verifying() {
    let payload = r#"{
        "configuration": {
            "hostname": "http://tower.local",
            "job_id": 12,
            "var_name": "host",
            "var_field": "src"
        },
        "result": {"src": "10.0.0.1"}
    }"#;

    let err = run(true, payload).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<twr_core::Error>(),
        Some(twr_core::Error::General(_))
    ));
}
