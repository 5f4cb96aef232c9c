// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Request dispatcher
//!
//! Owns the process-boundary protocol: one JSON request in, exactly one
//! JSON document out. This is the only place errors are recovered;
//! operations return `ApiError` and the dispatcher turns it into an
//! `Outcome::FatalFailure`.

use crate::api::{vectorize, ApiError, Command, Outcome, Request};
use crate::embeddings::Encoder;
use serde_json::Value;
use std::io::{self, Read, Write};
use tracing::{debug, error, warn};

pub struct Dispatcher<E> {
    encoder: E,
}

impl<E: Encoder> Dispatcher<E> {
    pub fn new(encoder: E) -> Self {
        Self { encoder }
    }

    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    /// Routes an already-parsed request
    pub fn dispatch(&self, request: &Request) -> Outcome {
        match self.execute(request) {
            Ok(outcome) => outcome,
            Err(err) => fatal(err),
        }
    }

    /// Parses `input` as a request, then dispatches it
    pub fn handle(&self, input: &str) -> Outcome {
        match Request::from_json(input) {
            Ok(request) => self.dispatch(&request),
            Err(err) => fatal(err),
        }
    }

    /// Reads all of `input`, handles it, and writes exactly one
    /// newline-terminated JSON document to `output`
    ///
    /// Only a failure to write the response is returned as `Err`.
    pub fn run<R: Read, W: Write>(&self, mut input: R, output: W) -> io::Result<Outcome> {
        let mut buffer = String::new();
        let outcome = match input.read_to_string(&mut buffer) {
            Ok(_) => self.handle(&buffer),
            Err(err) => fatal(ApiError::Io(err)),
        };

        outcome.write_to(output)?;
        Ok(outcome)
    }

    fn execute(&self, request: &Request) -> Result<Outcome, ApiError> {
        let command = request.command();
        debug!(%command, "Dispatching request");

        match command {
            Command::Vectorize => {
                let embedding = vectorize(&self.encoder, request.text()?)?;
                Ok(Outcome::Success(Value::from(embedding)))
            }
            Command::Unrecognized(name) => {
                warn!(command = %name, "Unknown command");
                Ok(Outcome::HandledFailure(format!("Unknown command: {}", name)))
            }
        }
    }
}

fn fatal(err: ApiError) -> Outcome {
    error!(kind = err.kind(), "Request failed: {}", err);
    Outcome::FatalFailure(err.to_string())
}
