// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Request type read from standard input
//!
//! ```json
//! { "command": "vectorize", "text": "connection refused on port 5432" }
//! ```
//!
//! Both keys are optional and unknown keys are ignored, so callers can send
//! extra fields without breaking older builds.
//!
//! Fields are kept as raw JSON values: an absent `command` means
//! "vectorize", but a present one of any other value (including `null` or
//! a number) is an unrecognized command rather than a malformed request.

use crate::api::ApiError;
use serde::{de::Error as _, Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;

/// Command used when a request omits `command`
pub const DEFAULT_COMMAND: &str = "vectorize";

/// One request, as read from standard input
///
/// `None` means the key was absent; an explicit `null` is `Some(Value::Null)`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Request {
    /// Operation name (default: "vectorize")
    #[serde(default, deserialize_with = "present")]
    pub command: Option<Value>,

    /// Payload for the vectorize operation (default: "")
    #[serde(default, deserialize_with = "present")]
    pub text: Option<Value>,
}

/// Operation selected by a request
///
/// Matched exhaustively by the dispatcher, so a new operation is a new
/// variant here plus one match arm there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Vectorize,
    /// Anything else, carried verbatim for the error message
    Unrecognized(String),
}

impl Request {
    /// Parses a request document
    ///
    /// Fails with `ApiError::ParseError` if the input is not JSON or is not
    /// a JSON object.
    pub fn from_json(input: &str) -> Result<Self, ApiError> {
        let value: Value = serde_json::from_str(input)?;

        if !value.is_object() {
            return Err(ApiError::ParseError(serde_json::Error::custom(format!(
                "request must be a JSON object, got {}",
                json_type_name(&value)
            ))));
        }

        Ok(serde_json::from_value(value)?)
    }

    /// Resolved command, defaulting to vectorize when absent
    ///
    /// Non-string values are rendered as JSON text (`null`, `5`,
    /// `["vectorize"]`) and never match a known command.
    pub fn command(&self) -> Command {
        match &self.command {
            None => Command::Vectorize,
            Some(Value::String(name)) => Command::from(name.as_str()),
            Some(other) => Command::Unrecognized(other.to_string()),
        }
    }

    /// Text payload, defaulting to the empty string
    ///
    /// Empty-ish values (`null`, `false`, `0`, `[]`, `{}`) read as the empty
    /// string so they get the usual empty-text rejection. Any other
    /// non-string value is a `ValidationError`.
    pub fn text(&self) -> Result<&str, ApiError> {
        match &self.text {
            None => Ok(""),
            Some(Value::String(text)) => Ok(text.as_str()),
            Some(value) if is_empty_value(value) => Ok(""),
            Some(value) => Err(ApiError::ValidationError(format!(
                "text must be a string, got {}",
                json_type_name(value)
            ))),
        }
    }
}

impl Command {
    pub fn name(&self) -> &str {
        match self {
            Command::Vectorize => "vectorize",
            Command::Unrecognized(name) => name,
        }
    }
}

impl From<&str> for Command {
    fn from(name: &str) -> Self {
        // Exact match only: no trimming, no case folding, no aliases
        match name {
            "vectorize" => Command::Vectorize,
            other => Command::Unrecognized(other.to_string()),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Runs only for keys that are present, so `null` survives as Some(Null)
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
