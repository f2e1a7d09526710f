// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `twr alert --execute`: launch a job template from an alert on stdin

use anyhow::{bail, Context as _, Result};
use clap::Args;
use std::io::{Read, Write};

use twr_core::alert::{self, AlertPayload};
use twr_core::record::text;
use twr_core::{ApiClient, HttpTransport, Settings};

#[derive(Args, Debug, Clone, PartialEq)]
pub struct AlertArgs {
    /// Read the alert payload from stdin and launch its job template
    #[arg(long)]
    pub execute: bool,
}

pub fn handle(
    args: &AlertArgs,
    settings: &Settings,
    input: &mut dyn Read,
    out: &mut dyn Write,
) -> Result<()> {
    if !args.execute {
        bail!("Unsupported execution mode (expected --execute flag)");
    }

    let mut raw = String::new();
    input
        .read_to_string(&mut raw)
        .context("could not read the alert payload from stdin")?;
    tracing::info!("Job Started");

    let payload = AlertPayload::from_json(&raw)?;
    let settings = payload.settings(settings)?;
    let transport = HttpTransport::from_settings(&settings).map_err(twr_core::Error::from)?;
    let api = ApiClient::new(transport);
    let job = alert::launch(&api, &payload)?;
    writeln!(out, "Job ID: {} submitted successfully.", text(&job))?;
    Ok(())
}

#[cfg(test)]
#[path = "alert_tests.rs"]
mod tests;
