// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fixtures shared by unit tests

use serde_json::{json, Value};

use crate::api::ApiClient;
use crate::clock::FakeClock;
use crate::context::Context;
use crate::resources::Catalog;
use crate::transport::FakeTransport;

pub(crate) type FakeContext = Context<FakeTransport, FakeClock>;

/// Context over the built-in catalog with a fake server and clock
pub(crate) fn context(fake: &FakeTransport) -> FakeContext {
    Context::new(
        ApiClient::new(fake.clone()),
        Catalog::builtin().unwrap(),
        FakeClock::new(),
    )
}

/// A single-page list response
pub(crate) fn page(results: Vec<Value>) -> Value {
    json!({
        "count": results.len(),
        "next": null,
        "previous": null,
        "results": results,
    })
}
