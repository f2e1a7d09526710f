// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Many-to-many edges between records.
//!
//! An edge lives at `<endpoint><owner>/<edge>/`. Both directions check the
//! current membership first, so repeating a call reports `changed: false`.

use serde_json::{json, Value};

use crate::clock::Clock;
use crate::context::Resource;
use crate::error::Result;
use crate::record::{pk_segment, Outcome};
use crate::transport::Transport;

impl<'a, T: Transport, C: Clock> Resource<'a, T, C> {
    /// Add `target` to `owner`'s `edge` collection
    pub fn assoc(&self, edge: &str, owner: &Value, target: &Value) -> Result<Outcome> {
        let path = self.edge_path(edge, owner);
        if self.edge_contains(&path, target)? {
            tracing::debug!(edge, owner = %owner, target = %target, "already associated");
            return Ok(Outcome::bare(false));
        }
        self.api()
            .post(&path, &json!({ "associate": true, "id": target }))?;
        Ok(Outcome::bare(true))
    }

    /// Remove `target` from `owner`'s `edge` collection
    pub fn disassoc(&self, edge: &str, owner: &Value, target: &Value) -> Result<Outcome> {
        let path = self.edge_path(edge, owner);
        if !self.edge_contains(&path, target)? {
            tracing::debug!(edge, owner = %owner, target = %target, "not associated");
            return Ok(Outcome::bare(false));
        }
        self.api()
            .post(&path, &json!({ "disassociate": true, "id": target }))?;
        Ok(Outcome::bare(true))
    }

    /// Run a synthesized `associate_*`/`disassociate_*` command
    pub fn associate(&self, command: &str, owner: &Value, target: &Value) -> Result<Outcome> {
        self.definition().ensure_supports(command)?;
        let (relation, associate) = self
            .definition()
            .relation_for(command)
            .ok_or_else(|| self.definition().unsupported(command))?;
        let owner = self.resolve(owner)?;
        let target = self.related(&relation.other)?.resolve(target)?;
        if associate {
            self.assoc(&relation.relationship, &owner, &target)
        } else {
            self.disassoc(&relation.relationship, &owner, &target)
        }
    }

    fn edge_path(&self, edge: &str, owner: &Value) -> String {
        format!("{}{}/{}/", self.endpoint(), pk_segment(owner), edge)
    }

    fn edge_contains(&self, path: &str, target: &Value) -> Result<bool> {
        let params = vec![("id".to_string(), pk_segment(target))];
        let body = self.api().get(path, &params)?.body;
        Ok(body.get("count").and_then(Value::as_u64).unwrap_or(0) > 0)
    }
}
