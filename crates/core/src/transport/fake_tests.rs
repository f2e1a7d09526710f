// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn unrouted_requests_get_404() {
    let fake = FakeTransport::new();
    let response = fake
        .send(&ApiRequest::new(Method::Get, "/nowhere/"))
        .unwrap();
    assert_eq!(response.status, 404);
}

#[test]
fn queued_responses_replay_in_order_and_last_repeats() {
    let fake = FakeTransport::new();
    fake.respond(Method::Get, "/jobs/1/", 200, json!({"status": "pending"}))
        .respond(Method::Get, "/jobs/1/", 200, json!({"status": "successful"}));

    let request = ApiRequest::new(Method::Get, "/jobs/1/");
    let statuses: Vec<String> = (0..3)
        .map(|_| fake.send(&request).unwrap().body)
        .collect();
    assert!(statuses[0].contains("pending"));
    assert!(statuses[1].contains("successful"));
    assert!(statuses[2].contains("successful"));
}

#[test]
fn most_specific_param_route_wins() {
    let fake = FakeTransport::new();
    fake.respond(Method::Get, "/users/", 200, json!({"count": 0}));
    fake.respond_with_params(Method::Get, "/users/", &[("username", "bob")], 200, json!({"count": 1}));

    let bob = ApiRequest::new(Method::Get, "/users/")
        .with_params(vec![("username".into(), "bob".into())]);
    let alice = ApiRequest::new(Method::Get, "/users/")
        .with_params(vec![("username".into(), "alice".into())]);

    assert!(fake.send(&bob).unwrap().body.contains("\"count\":1"));
    assert!(fake.send(&alice).unwrap().body.contains("\"count\":0"));
}

#[test]
fn records_calls_and_counts_mutations() {
    let fake = FakeTransport::new();
    fake.send(&ApiRequest::new(Method::Get, "/a/")).unwrap();
    fake.send(&ApiRequest::new(Method::Post, "/a/").with_body(json!({}))).unwrap();
    fake.send(&ApiRequest::new(Method::Delete, "/a/1/")).unwrap();

    assert_eq!(fake.calls().len(), 3);
    assert_eq!(fake.calls_with(Method::Post).len(), 1);
    assert_eq!(fake.mutation_count(), 2);
}

#[test]
fn offline_transport_fails_with_connection_error() {
    let fake = FakeTransport::new();
    fake.go_offline("connection refused");
    let err = fake.send(&ApiRequest::new(Method::Get, "/")).unwrap_err();
    assert!(matches!(err, TransportError::Connection(_)));
}

#[test]
fn null_body_produces_empty_response() {
    let fake = FakeTransport::new();
    fake.respond(Method::Delete, "/hosts/3/", 204, Value::Null);
    let response = fake.send(&ApiRequest::new(Method::Delete, "/hosts/3/")).unwrap();
    assert_eq!(response, RawResponse::new(204, ""));
}
