// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! twr-core: client library for an automation server's REST API
//!
//! This crate provides:
//! - Declarative resource definitions and the built-in catalog
//! - Generic CRUD, association and job monitoring over any definition
//! - Specialized behaviour for surveys, notifications, settings and nodes
//! - A pluggable transport with an HTTP implementation and a fake
//! - Layered configuration

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod alert;
pub mod api;
pub mod clock;
pub mod config;
pub mod context;
pub mod crud;
pub mod error;
pub mod model;
pub mod monitor;
pub mod parser;
pub mod record;
pub mod resources;
pub mod table;
pub mod transport;

#[cfg(test)]
mod test_support;

pub use api::{ApiClient, ApiResponse};
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{OutputFormat, Settings, SettingsLayer};
pub use context::{Context, Resource, Terminal};
pub use crud::{ListOptions, ReadOptions, WriteOptions};
pub use error::{Error, Result};
pub use model::{Behavior, Field, FieldType, ResourceDefinition};
pub use monitor::{MonitorOptions, WaitOptions};
pub use record::{ListPage, Outcome, Page, Record};
pub use resources::Catalog;
pub use transport::{FakeTransport, HttpTransport, Method, Transport};
