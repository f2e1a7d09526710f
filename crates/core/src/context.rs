// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Context wiring an API client, the resource catalog and a clock together

use serde_json::Value;
use std::borrow::Cow;

use crate::api::ApiClient;
use crate::clock::{Clock, SystemClock};
use crate::error::Result;
use crate::model::ResourceDefinition;
use crate::record::pk_segment;
use crate::resources::Catalog;
use crate::transport::Transport;

/// How job progress is rendered while waiting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Terminal {
    /// Output is an interactive terminal: draw a spinner
    pub tty: bool,
    /// Print every poll even on a terminal
    pub verbose: bool,
}

impl Terminal {
    pub(crate) fn spinner(&self) -> bool {
        self.tty && !self.verbose
    }
}

pub struct Context<T: Transport, C: Clock = SystemClock> {
    api: ApiClient<T>,
    catalog: Catalog,
    clock: C,
    terminal: Terminal,
}

impl<T: Transport, C: Clock> Context<T, C> {
    pub fn new(api: ApiClient<T>, catalog: Catalog, clock: C) -> Self {
        Self {
            api,
            catalog,
            clock,
            terminal: Terminal::default(),
        }
    }

    pub fn with_terminal(mut self, terminal: Terminal) -> Self {
        self.terminal = terminal;
        self
    }

    pub fn api(&self) -> &ApiClient<T> {
        &self.api
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn terminal(&self) -> Terminal {
        self.terminal
    }

    /// Handle for operating on one resource kind
    pub fn resource(&self, kind: &str) -> Result<Resource<'_, T, C>> {
        Ok(Resource {
            ctx: self,
            def: Cow::Borrowed(self.catalog.get(kind)?),
        })
    }
}

/// A resource definition bound to a context; CRUD, association and
/// monitoring operations hang off this handle.
pub struct Resource<'a, T: Transport, C: Clock = SystemClock> {
    ctx: &'a Context<T, C>,
    def: Cow<'a, ResourceDefinition>,
}

impl<'a, T: Transport, C: Clock> Resource<'a, T, C> {
    pub fn definition(&self) -> &ResourceDefinition {
        &self.def
    }

    pub fn endpoint(&self) -> &str {
        self.def.endpoint()
    }

    pub(crate) fn ctx(&self) -> &'a Context<T, C> {
        self.ctx
    }

    pub(crate) fn api(&self) -> &'a ApiClient<T> {
        &self.ctx.api
    }

    /// Handle for another kind sharing this context
    pub fn related(&self, kind: &str) -> Result<Resource<'a, T, C>> {
        self.ctx.resource(kind)
    }

    /// The same resource rooted at another endpoint
    pub(crate) fn scoped(&self, endpoint: &str) -> Resource<'a, T, C> {
        Resource {
            ctx: self.ctx,
            def: Cow::Owned(self.def.with_endpoint(endpoint)),
        }
    }

    /// `<endpoint><pk>/`
    pub(crate) fn record_path(&self, pk: &Value) -> String {
        format!("{}{}/", self.def.endpoint(), pk_segment(pk))
    }
}
