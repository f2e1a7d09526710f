// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job lifecycle: status, cancel, relaunch, and polling until done.
//!
//! `wait` is a single loop driven by the context's [`Clock`]. It sleeps in
//! short ticks (to animate a spinner) and polls the server only when the
//! current poll interval has elapsed; each poll stretches the interval by
//! 1.5x up to a cap. The timeout is checked once per tick.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::{json, Value};
use std::io::Write;
use std::time::Duration;

use crate::clock::Clock;
use crate::context::{Resource, Terminal};
use crate::error::{Error, Result};
use crate::model::Behavior;
use crate::record::{pk_segment, Outcome, Record};
use crate::resources::workflow_job;
use crate::transport::Transport;

/// Statuses after which a job never changes again
pub const FINISHED: &[&str] = &["successful", "failed", "error", "canceled"];

const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

#[derive(Debug, Clone, PartialEq)]
pub struct WaitOptions {
    pub min_interval: Duration,
    pub max_interval: Duration,
    pub timeout: Option<Duration>,
    /// Statuses that end the wait successfully
    pub exit_on: Vec<String>,
    /// Sleep granularity between timeout checks
    pub tick: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            min_interval: Duration::from_secs(1),
            max_interval: Duration::from_secs(30),
            timeout: None,
            exit_on: vec!["successful".to_string()],
            tick: Duration::from_millis(200),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonitorOptions {
    /// Pause between output fetches
    pub interval: Duration,
    pub timeout: Option<Duration>,
}

impl Default for MonitorOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(500),
            timeout: None,
        }
    }
}

impl<'a, T: Transport, C: Clock> Resource<'a, T, C> {
    /// Most recent job launched from a template (`current_update`, falling
    /// back to `last_update`)
    pub fn last_job_data(&self, parent_pk: Option<&Value>, filters: Record) -> Result<Record> {
        let parent = self.get_record(parent_pk, filters)?;
        let related = parent.get("related");
        let url = ["current_update", "last_update"]
            .iter()
            .find_map(|key| related.and_then(|r| r.get(*key)).and_then(Value::as_str));
        match url {
            Some(url) => Ok(self.api().get(url, &[])?.into_record()),
            None => Err(Error::NotFound("No related jobs or updates exist.".into())),
        }
    }

    /// Decoded standard output of a job, optionally sliced by line
    pub fn lookup_stdout(
        &self,
        pk: &Value,
        start_line: Option<usize>,
        end_line: Option<usize>,
    ) -> Result<String> {
        if self.definition().behavior() == Behavior::WorkflowJob {
            return workflow_job::summary(self, pk, start_line, end_line);
        }

        let path = format!("{}{}/stdout/", self.definition().job_endpoint(), pk_segment(pk));
        let mut params = vec![
            ("format".to_string(), "json".to_string()),
            ("content_encoding".to_string(), "base64".to_string()),
            ("content_format".to_string(), "ansi".to_string()),
        ];
        if let Some(start) = start_line.filter(|n| *n > 0) {
            params.push(("start_line".to_string(), start.to_string()));
        }
        if let Some(end) = end_line.filter(|n| *n > 0) {
            params.push(("end_line".to_string(), end.to_string()));
        }

        let body = self.api().get(&path, &params)?.body;
        let encoded = body.get("content").and_then(Value::as_str).unwrap_or("");
        let decoded = STANDARD
            .decode(encoded.trim())
            .map_err(|e| Error::General(format!("Could not decode job output: {}", e)))?;
        Ok(String::from_utf8_lossy(&decoded).into_owned())
    }

    /// Print a job's standard output.
    ///
    /// On a template resource the most recent job is used.
    pub fn stdout(
        &self,
        pk: Option<Value>,
        start_line: Option<usize>,
        end_line: Option<usize>,
        filters: Record,
        out: &mut dyn Write,
    ) -> Result<Outcome> {
        self.definition().ensure_supports("stdout")?;
        let pk = if self.definition().unified_job_type().is_some() {
            job_id(&self.last_job_data(pk.as_ref(), filters)?)?
        } else {
            match pk {
                Some(pk) => pk,
                None => job_id(&self.get_record(None, filters)?)?,
            }
        };

        let content = self.lookup_stdout(&pk, start_line, end_line)?;
        write!(out, "{}", content)?;
        if !content.is_empty() && !content.ends_with('\n') {
            writeln!(out)?;
        }
        Ok(Outcome::bare(false))
    }

    /// Poll a job until its status is in `exit_on`.
    ///
    /// Without `pk`, waits on the latest job of template `parent_pk`.
    pub fn wait(
        &self,
        pk: Option<Value>,
        parent_pk: Option<Value>,
        opts: &WaitOptions,
        filters: Record,
        out: &mut dyn Write,
    ) -> Result<Outcome> {
        let pk = match pk {
            Some(pk) => pk,
            None => job_id(&self.last_job_data(parent_pk.as_ref(), filters)?)?,
        };
        let job_path = self.job_path(&pk);
        let clock = self.ctx().clock();
        let mut spinner = Spinner::new(self.ctx().terminal());

        let start = clock.now();
        let mut job = self.api().get(&job_path, &[])?.into_record();
        let mut last_poll = clock.now();
        let mut checked_at = start;
        let mut interval = opts.min_interval;

        loop {
            let status = job_status(&job);
            if opts.exit_on.iter().any(|s| s == status) {
                break;
            }
            if job_failed(&job) {
                spinner.clear(out)?;
                return Err(Error::JobFailure("Job failed.".into()));
            }
            if let Some(timeout) = opts.timeout {
                if checked_at.duration_since(start) > timeout {
                    spinner.clear(out)?;
                    return Err(Error::Timeout("Monitoring aborted due to timeout.".into()));
                }
            }

            spinner.draw(out, status)?;
            clock.sleep(opts.tick);
            checked_at = clock.now();

            let overdue = opts
                .timeout
                .is_some_and(|t| checked_at.duration_since(start) > t);
            if overdue || checked_at.duration_since(last_poll) > interval {
                job = self.api().get(&job_path, &[])?.into_record();
                last_poll = clock.now();
                interval = interval.mul_f64(1.5).min(opts.max_interval);
                tracing::debug!(id = %pk, status = job_status(&job), next_poll = ?interval, "polled job");
                if !spinner.enabled() {
                    writeln!(out, "Current status: {}", job_status(&job))?;
                }
            }
        }

        spinner.clear(out)?;
        Ok(Outcome::changed(Some(parent_pk.unwrap_or(pk)), job))
    }

    /// Wait for a job to start, then stream its output until it finishes
    pub fn monitor(
        &self,
        pk: Option<Value>,
        parent_pk: Option<Value>,
        opts: &MonitorOptions,
        filters: Record,
        out: &mut dyn Write,
    ) -> Result<Outcome> {
        let pk = match pk {
            Some(pk) => pk,
            None => job_id(&self.last_job_data(parent_pk.as_ref(), filters)?)?,
        };
        let clock = self.ctx().clock();
        let start = clock.now();

        let started = WaitOptions {
            exit_on: vec!["running".to_string(), "successful".to_string()],
            timeout: opts.timeout,
            ..WaitOptions::default()
        };
        self.wait(Some(pk.clone()), None, &started, Record::new(), out)?;

        let job_path = self.job_path(&pk);
        let workflow = self.definition().behavior() == Behavior::WorkflowJob;
        let mut job = self.api().get(&job_path, &[])?.into_record();
        let mut next_line = 0usize;

        writeln!(out, "------Starting Standard Out Stream------")?;
        while !job_finished(&job) {
            job = self.api().get(&job_path, &[])?.into_record();
            clock.sleep(opts.interval);

            if !workflow {
                let content = self.lookup_stdout(&pk, Some(next_line), None)?;
                if !content.is_empty() && !content.starts_with("Waiting for results") {
                    next_line += content.lines().count();
                    write!(out, "{}", content)?;
                }
            }

            if let Some(timeout) = opts.timeout {
                if clock.now().duration_since(start) > timeout {
                    return Err(Error::Timeout("Monitoring aborted due to timeout.".into()));
                }
            }
        }
        if workflow {
            write!(out, "{}", self.lookup_stdout(&pk, None, None)?)?;
        }
        writeln!(out, "------End of Standard Out Stream--------")?;

        if job_failed(&job) || job_status(&job) != "successful" {
            return Err(Error::JobFailure("Job failed.".into()));
        }
        Ok(Outcome::changed(Some(parent_pk.unwrap_or(pk)), job))
    }

    /// Current job state: the full record with `detail`, otherwise
    /// `{elapsed, failed, status}`
    pub fn status(&self, pk: Option<Value>, detail: bool, filters: Record) -> Result<Record> {
        self.definition().ensure_supports("status")?;
        let job = if self.definition().unified_job_type().is_some() {
            self.last_job_data(pk.as_ref(), filters)?
        } else {
            match pk {
                Some(pk) => self.api().get(&self.record_path(&pk), &[])?.into_record(),
                None => self.get_record(None, filters)?,
            }
        };

        if detail {
            return Ok(job);
        }
        let mut summary = Record::new();
        for key in ["elapsed", "failed", "status"] {
            summary.insert(key.to_string(), job.get(key).cloned().unwrap_or(Value::Null));
        }
        Ok(summary)
    }

    /// Cancel a job; one that is not running reports `changed: false`
    pub fn cancel(&self, pk: Option<Value>, fail_if_not_running: bool, filters: Record) -> Result<Outcome> {
        self.definition().ensure_supports("cancel")?;
        let pk = match pk {
            Some(pk) => pk,
            None => job_id(&self.get_record(None, filters)?)?,
        };

        let path = format!("{}cancel/", self.record_path(&pk));
        let changed = match self.api().post(&path, &json!({})) {
            Ok(_) => true,
            Err(Error::MethodNotAllowed(_)) if fail_if_not_running => {
                return Err(Error::General("Job not running.".into()));
            }
            Err(Error::MethodNotAllowed(_)) => false,
            Err(err) => return Err(err),
        };

        let mut record = Record::new();
        record.insert("status".into(), json!("canceled"));
        Ok(Outcome::new(changed, None, record))
    }

    /// Relaunch a finished job; a refusal reports `changed: false`
    pub fn relaunch(&self, pk: Option<Value>, filters: Record) -> Result<Outcome> {
        self.definition().ensure_supports("relaunch")?;
        let pk = match pk {
            Some(pk) => pk,
            None => job_id(&self.get_record(None, filters)?)?,
        };

        let path = format!("{}relaunch/", self.record_path(&pk));
        match self.api().post(&path, &json!({})) {
            Ok(response) => {
                let record = response.into_record();
                let id = record.get("id").cloned();
                Ok(Outcome::changed(id, record))
            }
            Err(Error::MethodNotAllowed(_)) => Ok(Outcome::bare(false)),
            Err(err) => Err(err),
        }
    }

    fn job_path(&self, pk: &Value) -> String {
        format!("{}{}/", self.definition().job_endpoint(), pk_segment(pk))
    }
}

pub(crate) fn job_id(record: &Record) -> Result<Value> {
    record
        .get("id")
        .cloned()
        .ok_or_else(|| Error::General("Record has no id.".into()))
}

fn job_status(job: &Record) -> &str {
    job.get("status").and_then(Value::as_str).unwrap_or("")
}

fn job_failed(job: &Record) -> bool {
    job.get("failed").and_then(Value::as_bool).unwrap_or(false)
}

fn job_finished(job: &Record) -> bool {
    job_failed(job) || FINISHED.contains(&job_status(job))
}

/// One-line progress indicator redrawn in place
struct Spinner {
    enabled: bool,
    frame: usize,
    drawn: bool,
}

impl Spinner {
    fn new(terminal: Terminal) -> Self {
        Self {
            enabled: terminal.spinner(),
            frame: 0,
            drawn: false,
        }
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn draw(&mut self, out: &mut dyn Write, status: &str) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        write!(out, "\r\x1b[K{} Current status: {}", SPINNER[self.frame % SPINNER.len()], status)?;
        out.flush()?;
        self.frame += 1;
        self.drawn = true;
        Ok(())
    }

    fn clear(&mut self, out: &mut dyn Write) -> Result<()> {
        if self.drawn {
            write!(out, "\r\x1b[K")?;
            out.flush()?;
            self.drawn = false;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "monitor_tests.rs"]
mod tests;
