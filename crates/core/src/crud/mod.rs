// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Generic CRUD over any resource definition.
//!
//! `read` is the only collection fetch; `get`, `list` and the identity
//! lookup behind `write`/`delete` are all layered on it. Writes are
//! idempotent: a record found by identity is left alone unless the caller
//! forces an update, and an update whose values already match is skipped.
//!
//! The public operations dispatch on [`Behavior`] so resources with
//! special wire handling (surveys, notification configuration, settings)
//! get their refinements; the `*_record` variants are the plain versions
//! those refinements build on.

mod assoc;

use chrono::Local;
use serde_json::{json, Value};

use crate::clock::Clock;
use crate::context::Resource;
use crate::error::{Error, Result};
use crate::model::Behavior;
use crate::record::{
    pop_none, text, to_params, translate_null, values_match, ListPage, Outcome, Page, Record,
};
use crate::resources::{node, notification, project, setting, survey};
use crate::transport::Transport;

#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
    pub fail_on_no_results: bool,
    pub fail_on_multiple_results: bool,
    /// Extra `(key, value)` pairs sent verbatim
    pub query: Vec<(String, String)>,
}

impl ReadOptions {
    /// Exactly one result or an error
    pub fn single() -> Self {
        Self {
            fail_on_no_results: true,
            fail_on_multiple_results: true,
            query: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOptions {
    pub create_on_missing: bool,
    pub fail_on_found: bool,
    pub force_on_exists: bool,
}

impl WriteOptions {
    pub fn create() -> Self {
        Self {
            create_on_missing: true,
            ..Self::default()
        }
    }

    pub fn modify(create_on_missing: bool) -> Self {
        Self {
            create_on_missing,
            fail_on_found: false,
            force_on_exists: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub all_pages: bool,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub query: Vec<(String, String)>,
}

impl<'a, T: Transport, C: Clock> Resource<'a, T, C> {
    /// Fetch one record by primary key, or a page of records by filter.
    ///
    /// A detail fetch is wrapped as a one-result page.
    pub fn read(&self, pk: Option<&Value>, opts: &ReadOptions, filters: Record) -> Result<Page> {
        let filters = self.lookup_filters(filters);
        for (key, _) in &opts.query {
            if filters.contains_key(key) {
                return Err(Error::BadRequest(format!("Attempted to set {} twice.", key)));
            }
        }

        let page = match pk {
            Some(pk) => Page::single(self.api().get(&self.record_path(pk), &[])?.into_record()),
            None => {
                let mut params = to_params(&filters);
                params.extend(opts.query.iter().cloned());
                serde_json::from_value(self.api().get(self.endpoint(), &params)?.body)?
            }
        };

        if opts.fail_on_no_results && page.count == 0 {
            return Err(Error::NotFound(
                "The requested object could not be found.".into(),
            ));
        }
        if opts.fail_on_multiple_results && page.count >= 2 {
            return Err(Error::MultipleResults(format!(
                "Expected one result, got {}. Possibly caused by not providing \
                 required fields. Please tighten your criteria.",
                page.count
            )));
        }
        Ok(page)
    }

    /// Null values and `no_lookup` fields never become filters
    fn lookup_filters(&self, mut filters: Record) -> Record {
        pop_none(&mut filters);
        filters.retain(|key, _| !self.definition().field(key).is_some_and(|f| f.no_lookup));
        filters
    }

    /// Resolve an existing record from the identity subset of `filters`.
    ///
    /// Resources identified only by `id` skip the lookup entirely; the
    /// caller is expected to supply a primary key.
    pub fn lookup(
        &self,
        fail_on_missing: bool,
        fail_on_found: bool,
        filters: &Record,
    ) -> Result<Option<Record>> {
        let identity = self.definition().identity();
        if identity.len() == 1 && identity[0] == "id" {
            return Ok(None);
        }

        let params: Record = filters
            .iter()
            .filter(|(key, value)| identity.contains(key) && !value.is_null())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        if params.is_empty() {
            return Err(Error::BadRequest(
                "Cannot reliably determine which record to write. Include an ID or unique fields."
                    .into(),
            ));
        }

        match self.get_record(None, params.clone()) {
            Ok(_) if fail_on_found => Err(Error::Found(format!(
                "A record matching {} already exists, and you requested a failure in that case.",
                describe(&params)
            ))),
            Ok(existing) => Ok(Some(existing)),
            Err(Error::NotFound(_)) if fail_on_missing => Err(Error::NotFound(format!(
                "A record matching {} does not exist.",
                describe(&params)
            ))),
            Err(Error::NotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }

    pub fn get(&self, pk: Option<&Value>, filters: Record) -> Result<Record> {
        self.definition().ensure_supports("get")?;
        match self.definition().behavior() {
            Behavior::NotificationTemplate => notification::get(self, pk, filters),
            Behavior::Setting => setting::get(self, pk),
            _ => self.get_record(pk, filters),
        }
    }

    /// `read` that insists on exactly one result
    pub fn get_record(&self, pk: Option<&Value>, filters: Record) -> Result<Record> {
        let page = self.read(pk, &ReadOptions::single(), filters)?;
        page.results.into_iter().next().ok_or_else(|| {
            Error::NotFound("The requested object could not be found.".into())
        })
    }

    pub fn list(&self, opts: &ListOptions, filters: Record) -> Result<ListPage> {
        self.definition().ensure_supports("list")?;
        match self.definition().behavior() {
            Behavior::NotificationTemplate => notification::list(self, opts, filters),
            Behavior::Setting => setting::list(self, filters.get("category").map(text).as_deref()),
            Behavior::WorkflowNode => node::list(self, opts, filters),
            _ => self.list_records(opts, filters),
        }
    }

    /// Fetch one page, or every page following `next` cursors
    pub fn list_records(&self, opts: &ListOptions, mut filters: Record) -> Result<ListPage> {
        if !opts.all_pages {
            if let Some(page) = opts.page {
                filters.insert("page".into(), json!(page));
            }
        }
        if let Some(size) = opts.page_size {
            filters.insert("page_size".into(), json!(size));
        }

        let read_opts = ReadOptions {
            query: opts.query.clone(),
            ..ReadOptions::default()
        };
        let mut result = ListPage::from(self.read(None, &read_opts, filters.clone())?);
        if !opts.all_pages {
            return Ok(result);
        }

        let mut seen = vec![1];
        while let Some(next) = result.next.take() {
            if seen.contains(&next) {
                tracing::warn!(page = next, "server repeated a page cursor; stopping");
                break;
            }
            seen.push(next);
            filters.insert("page".into(), json!(next));
            let page = ListPage::from(self.read(None, &read_opts, filters.clone())?);
            result.results.extend(page.results);
            result.next = page.next;
        }
        result.previous = None;
        Ok(result)
    }

    pub fn write(&self, pk: Option<Value>, opts: WriteOptions, fields: Record) -> Result<Outcome> {
        match self.definition().behavior() {
            Behavior::Survey | Behavior::JobTemplate => survey::write(self, pk, opts, fields),
            Behavior::WorkflowNode => node::write(self, pk, opts, fields),
            Behavior::Project => project::write(self, pk, opts, fields),
            _ => self.write_record(pk, opts, fields),
        }
    }

    /// Create or update one record, skipping the request when nothing
    /// would change
    pub fn write_record(
        &self,
        pk: Option<Value>,
        opts: WriteOptions,
        mut fields: Record,
    ) -> Result<Outcome> {
        pop_none(&mut fields);

        let (pk, existing) = match pk {
            Some(pk) => {
                let existing = self.get_record(Some(&pk), Record::new())?;
                (Some(pk), existing)
            }
            None => match self.lookup(!opts.create_on_missing, opts.fail_on_found, &fields)? {
                Some(existing) => (existing.get("id").cloned(), existing),
                None => (None, Record::new()),
            },
        };

        if pk.is_none() {
            survey::creation_defaults(self.definition().behavior(), &mut fields);
            let missing = self.definition().missing_required(&fields);
            if !missing.is_empty() {
                return Err(Error::BadRequest(format!(
                    "Missing required fields: {}",
                    missing.join(", ")
                )));
            }
        }

        if let Some(pk) = &pk {
            if !opts.force_on_exists {
                tracing::debug!(kind = self.definition().kind(), id = %pk, "record already exists; doing nothing");
                return Ok(Outcome::unchanged(Some(pk.clone()), existing));
            }
        }

        if fields.iter().all(|(k, v)| values_match(v, existing.get(k))) {
            tracing::debug!(kind = self.definition().kind(), "record already up to date; doing nothing");
            return Ok(Outcome::unchanged(pk, existing));
        }

        translate_null(&mut fields);
        let body = Value::Object(fields);
        let response = match &pk {
            Some(pk) => {
                tracing::debug!(kind = self.definition().kind(), id = %pk, "modifying record");
                self.api().patch(&self.record_path(pk), &body)?
            }
            None => {
                tracing::debug!(kind = self.definition().kind(), "creating record");
                self.api().post(self.endpoint(), &body)?
            }
        };

        let record = response.into_record();
        let id = record.get("id").cloned().or(pk);
        Ok(Outcome::changed(id, record))
    }

    pub fn create(&self, opts: WriteOptions, fields: Record) -> Result<Outcome> {
        self.definition().ensure_supports("create")?;
        let opts = WriteOptions {
            create_on_missing: true,
            ..opts
        };
        match self.definition().behavior() {
            Behavior::NotificationTemplate => notification::create(self, opts, fields),
            Behavior::Project => project::create(
                self,
                opts,
                fields,
                &project::UpdateOptions::default(),
                &mut std::io::sink(),
            ),
            _ => self.write(None, opts, fields),
        }
    }

    pub fn modify(
        &self,
        pk: Option<Value>,
        create_on_missing: bool,
        fields: Record,
    ) -> Result<Outcome> {
        self.definition().ensure_supports("modify")?;
        match self.definition().behavior() {
            Behavior::NotificationTemplate => {
                notification::modify(self, pk, create_on_missing, fields)
            }
            Behavior::Setting => setting::modify(self, pk, fields),
            _ => self.write(pk, WriteOptions::modify(create_on_missing), fields),
        }
    }

    pub fn delete(&self, pk: Option<Value>, fail_on_missing: bool, filters: Record) -> Result<Outcome> {
        self.definition().ensure_supports("delete")?;
        match self.definition().behavior() {
            Behavior::NotificationTemplate => {
                notification::delete(self, pk, fail_on_missing, filters)
            }
            _ => self.delete_record(pk, fail_on_missing, filters),
        }
    }

    /// Delete one record; a record that is already gone is not an error
    /// unless `fail_on_missing`
    pub fn delete_record(
        &self,
        pk: Option<Value>,
        fail_on_missing: bool,
        filters: Record,
    ) -> Result<Outcome> {
        let pk = match pk {
            Some(pk) => pk,
            None => match self.lookup(fail_on_missing, false, &filters)? {
                Some(existing) => match existing.get("id") {
                    Some(id) => id.clone(),
                    None => return Ok(Outcome::bare(false)),
                },
                None => return Ok(Outcome::bare(false)),
            },
        };

        match self.api().delete(&self.record_path(&pk)) {
            Ok(_) => Ok(Outcome::bare(true)),
            Err(Error::NotFound(_)) if !fail_on_missing => Ok(Outcome::bare(false)),
            Err(err) => Err(err),
        }
    }

    /// Copy a record.
    ///
    /// With `new_name` the server copies it via `<pk>/copy/`; otherwise the
    /// record is re-created client-side as `"<name> @ <HH:MM:SS>"` with
    /// `overrides` applied. A copy already made under that name in the same
    /// second is returned unchanged.
    pub fn copy(&self, pk: &Value, new_name: Option<&str>, mut overrides: Record) -> Result<Outcome> {
        self.definition().ensure_supports("copy")?;
        pop_none(&mut overrides);

        if let Some(name) = new_name {
            if !overrides.is_empty() {
                let keys: Vec<&str> = overrides.keys().map(String::as_str).collect();
                return Err(Error::General(format!(
                    "Cannot override {} and also use --new-name.",
                    keys.join(", ")
                )));
            }
            let path = format!("{}copy/", self.record_path(pk));
            let record = self.api().post(&path, &json!({ "name": name }))?.into_record();
            let id = record.get("id").cloned();
            return Ok(Outcome::changed(id, record));
        }

        let original = self.get(Some(pk), Record::new())?;
        let mut fields: Record = original
            .iter()
            .filter(|(key, _)| self.definition().field(key).is_some_and(|f| !f.read_only))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        pop_none(&mut fields);

        if let Some(name) = original.get("name").and_then(Value::as_str) {
            let base = name.split('@').next().unwrap_or(name).trim();
            fields.insert(
                "name".into(),
                json!(format!("{} @ {}", base, Local::now().format("%H:%M:%S"))),
            );
        }
        fields.extend(overrides);

        self.write(
            None,
            WriteOptions {
                create_on_missing: true,
                ..WriteOptions::default()
            },
            fields,
        )
    }

    /// Primary key for a value that may be a name.
    ///
    /// Numbers (and numeric strings) are taken as keys; anything else is
    /// looked up by the last identity field, which is the record's own name.
    pub fn resolve(&self, value: &Value) -> Result<Value> {
        match value {
            Value::Number(_) => Ok(value.clone()),
            Value::String(s) => {
                if let Ok(n) = s.trim().parse::<i64>() {
                    return Ok(json!(n));
                }
                let key = self
                    .definition()
                    .identity()
                    .last()
                    .cloned()
                    .unwrap_or_else(|| "name".to_string());
                let mut filters = Record::new();
                filters.insert(key, value.clone());
                let record = self.get_record(None, filters).map_err(|err| match err {
                    Error::NotFound(_) => Error::RelatedError(format!(
                        "{} {:?} could not be found.",
                        self.definition().kind(),
                        s
                    )),
                    other => other,
                })?;
                record.get("id").cloned().ok_or_else(|| {
                    Error::RelatedError(format!("{} {:?} has no id.", self.definition().kind(), s))
                })
            }
            other => Err(Error::Validation(format!(
                "Cannot use {} as a {} reference.",
                other,
                self.definition().kind()
            ))),
        }
    }
}

fn describe(params: &Record) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", k, text(v)))
        .collect::<Vec<_>>()
        .join(", ")
}
