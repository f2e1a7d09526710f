// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Built-in resource kinds and their specialized behaviour

mod catalog;
pub mod job;
pub mod node;
pub mod notification;
pub mod project;
pub mod setting;
pub mod survey;
pub mod workflow_job;

use crate::error::{Error, Result};
use crate::model::{DefinitionError, ResourceDefinition};

/// Every resource kind known to the client, in display order
#[derive(Debug, Clone)]
pub struct Catalog {
    definitions: Vec<ResourceDefinition>,
}

impl Catalog {
    /// The built-in resource kinds
    pub fn builtin() -> Result<Self, DefinitionError> {
        Ok(Self {
            definitions: catalog::definitions()?,
        })
    }

    pub fn from_definitions(definitions: Vec<ResourceDefinition>) -> Self {
        Self { definitions }
    }

    pub fn definitions(&self) -> &[ResourceDefinition] {
        &self.definitions
    }

    pub fn get(&self, kind: &str) -> Result<&ResourceDefinition> {
        self.definitions
            .iter()
            .find(|d| d.kind() == kind)
            .ok_or_else(|| Error::General(format!("Unknown resource kind: {}", kind)))
    }
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;
