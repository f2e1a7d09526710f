// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-facing error display with exit codes and suggestions.
//!
//! Errors from the core keep their exit code; anything else (usage
//! mistakes, unreadable input) exits with 1.

use std::fmt;

use twr_core::Error;

/// Error ready to be shown to the user
#[derive(Debug)]
pub struct CliError {
    pub title: String,
    pub message: String,
    /// How to fix it
    pub suggestions: Vec<String>,
    pub exit_code: i32,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            title: "Error".to_string(),
            message: message.into(),
            suggestions: Vec::new(),
            exit_code: 1,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Classify an error bubbling out of a command
    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<Error>() {
            Some(core) => Self::from_core(core),
            None => Self::new(format!("{:#}", err)),
        }
    }

    fn from_core(err: &Error) -> Self {
        let cli = Self {
            title: err.title().to_string(),
            exit_code: err.exit_code(),
            ..Self::new(err.to_string())
        };
        match err {
            Error::AuthError(_) => cli
                .with_suggestion("Check the configured credentials: twr config username")
                .with_suggestion("Pass them for one call with --tower-username and --tower-password"),
            Error::Connection(_) => cli
                .with_suggestion("Check the configured host: twr config host")
                .with_suggestion("For a self-signed certificate, retry with --insecure"),
            Error::MultipleResults(_) => {
                cli.with_suggestion("Pass the primary key, or more fields to narrow the match")
            }
            Error::Found(_) => {
                cli.with_suggestion("Drop --fail-on-found, or pass --force-on-exists to update it")
            }
            _ => cli,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}: {}", self.title, self.message)?;

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "suggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for CliError {}
