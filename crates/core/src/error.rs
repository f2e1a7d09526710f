// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy shared by every resource operation.
//!
//! Each variant carries the human-readable message shown to the user and
//! maps to a stable process exit code, so scripts can tell a missing record
//! (44) from a failed job (99) without parsing output.

use thiserror::Error;

use crate::config::ConfigError;
use crate::model::DefinitionError;
use crate::transport::TransportError;

#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or ambiguous caller input, or a 4xx the server rejected
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    AuthError(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    MethodNotAllowed(String),

    #[error("{0}")]
    MultipleResults(String),

    #[error("{0}")]
    ServerError(String),

    /// A record matched where the caller asked for none
    #[error("{0}")]
    Found(String),

    #[error("{0}")]
    RelatedError(String),

    /// A CLI string could not be coerced into the field's type
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    CannotStartJob(String),

    #[error("{0}")]
    Timeout(String),

    #[error("{0}")]
    JobFailure(String),

    #[error("{0}")]
    Connection(String),

    #[error("{kind} does not support `{operation}`")]
    UnsupportedOperation { kind: String, operation: String },

    #[error("{0}")]
    General(String),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Definition(#[from] DefinitionError),
}

impl Error {
    /// Process exit code for this error kind
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::BadRequest(_) => 40,
            Error::AuthError(_) => 41,
            Error::Forbidden(_) => 43,
            Error::NotFound(_) => 44,
            Error::MethodNotAllowed(_) => 45,
            Error::MultipleResults(_) => 49,
            Error::ServerError(_) => 50,
            Error::Found(_) => 60,
            Error::RelatedError(_) => 61,
            Error::Validation(_) => 64,
            Error::CannotStartJob(_) => 97,
            Error::Timeout(_) => 98,
            Error::JobFailure(_) => 99,
            Error::Connection(_) => 120,
            Error::UnsupportedOperation { .. }
            | Error::General(_)
            | Error::Json(_)
            | Error::Io(_)
            | Error::Config(_)
            | Error::Definition(_) => 1,
        }
    }

    /// Short label used as the heading when the CLI prints this error
    pub fn title(&self) -> &'static str {
        match self {
            Error::BadRequest(_) => "Bad request",
            Error::AuthError(_) => "Authentication error",
            Error::Forbidden(_) => "Forbidden",
            Error::NotFound(_) => "Not found",
            Error::MethodNotAllowed(_) => "Method not allowed",
            Error::MultipleResults(_) => "Multiple results",
            Error::ServerError(_) => "Server error",
            Error::Found(_) => "Found",
            Error::RelatedError(_) => "Related error",
            Error::Validation(_) => "Invalid value",
            Error::CannotStartJob(_) => "Cannot start job",
            Error::Timeout(_) => "Timeout",
            Error::JobFailure(_) => "Job failed",
            Error::Connection(_) => "Connection error",
            _ => "Error",
        }
    }
}

impl From<TransportError> for Error {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::InvalidHost(msg) => Error::General(msg),
            other => Error::Connection(other.to_string()),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
