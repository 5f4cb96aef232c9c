// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Error taxonomy for the request protocol
//!
//! Every variant here is fatal for the invocation: it is rendered as
//! `{"error": <message>}` and the process exits 1. An unrecognized command
//! is deliberately absent, it is a handled outcome (see `Outcome`).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Standard input was not a well-formed request
    #[error("{0}")]
    ParseError(#[from] serde_json::Error),

    /// Operation precondition failed
    #[error("{0}")]
    ValidationError(String),

    /// The model capability failed or returned an unusable vector
    #[error("{0}")]
    ModelError(String),

    /// Standard input could not be read
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// Short machine-friendly name of the error kind, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::ParseError(_) => "parse_error",
            ApiError::ValidationError(_) => "validation_error",
            ApiError::ModelError(_) => "model_error",
            ApiError::Io(_) => "io_error",
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        // Alternate formatting keeps the whole context chain on one line
        ApiError::ModelError(format!("{:#}", err))
    }
}
