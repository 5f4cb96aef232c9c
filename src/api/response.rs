// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Outcome of one invocation and its JSON rendering
//!
//! The exit status is a property of the variant:
//! - `Success`: operation result printed as-is, exit 0
//! - `HandledFailure`: `{"error": ...}`, exit 0 (unknown command)
//! - `FatalFailure`: `{"error": ...}`, exit 1

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::{self, Write};

/// Error body written to standard output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Raw operation result (for vectorize: the bare array of numbers)
    Success(Value),
    HandledFailure(String),
    FatalFailure(String),
}

impl Outcome {
    /// Process exit status for this outcome
    pub fn exit_code(&self) -> u8 {
        match self {
            Outcome::Success(_) | Outcome::HandledFailure(_) => 0,
            Outcome::FatalFailure(_) => 1,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// Error message, if this is a failure of either kind
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Outcome::Success(_) => None,
            Outcome::HandledFailure(message) | Outcome::FatalFailure(message) => Some(message),
        }
    }

    /// JSON document for this outcome
    pub fn to_json(&self) -> serde_json::Result<Value> {
        match self {
            Outcome::Success(payload) => Ok(payload.clone()),
            Outcome::HandledFailure(message) | Outcome::FatalFailure(message) => {
                serde_json::to_value(ErrorResponse::new(message.as_str()))
            }
        }
    }

    /// Writes the outcome as one compact, newline-terminated JSON document
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        let document = serde_json::to_string(&self.to_json()?)?;
        writeln!(writer, "{}", document)?;
        writer.flush()
    }
}
