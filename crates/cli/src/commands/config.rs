// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `twr config`: read and write settings files

use anyhow::{bail, Result};
use clap::Args;
use std::io::Write;
use std::path::Path;

use twr_core::config::{self, Scope};
use twr_core::Settings;

#[derive(Args, Debug, Clone, PartialEq)]
pub struct ConfigArgs {
    /// Setting to read or write; all settings are printed when omitted
    pub key: Option<String>,

    /// New value for the setting
    pub value: Option<String>,

    /// Settings file to write: user, local or global
    #[arg(long, default_value = "user")]
    pub scope: Scope,

    /// Remove the setting from the file instead of setting it
    #[arg(long, conflicts_with = "value")]
    pub unset: bool,
}

pub fn handle(args: &ConfigArgs, settings: &Settings, cwd: &Path, out: &mut dyn Write) -> Result<()> {
    let Some(key) = args.key.as_deref() else {
        for key in config::KEYS {
            writeln!(out, "{}: {}", key, display(settings, key)?)?;
        }
        return Ok(());
    };

    if !config::KEYS.contains(&key) {
        bail!(config::ConfigError::UnknownKey(key.to_string()));
    }

    let path = args.scope.path(cwd)?;
    match (&args.value, args.unset) {
        (Some(value), _) => {
            config::write_key(&path, key, Some(value))?;
            tracing::info!(key, path = %path.display(), "setting written");
            writeln!(out, "Configuration updated successfully.")?;
        }
        (None, true) => {
            config::write_key(&path, key, None)?;
            tracing::info!(key, path = %path.display(), "setting removed");
            writeln!(out, "Configuration updated successfully.")?;
        }
        (None, false) => writeln!(out, "{}", display(settings, key)?)?,
    }
    Ok(())
}

/// Secrets are never echoed back
fn display(settings: &Settings, key: &str) -> Result<String> {
    let value = settings.get(key)?;
    if matches!(key, "password" | "oauth_token") && !value.is_empty() {
        return Ok("********".to_string());
    }
    Ok(value)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
