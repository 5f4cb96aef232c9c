// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Command protocol: one JSON request on stdin, one JSON document on stdout
//!
//! | Request                               | Response                         | Exit |
//! |---------------------------------------|----------------------------------|------|
//! | `{"command":"vectorize","text":"…"}`  | `[0.01, -0.04, …]` (384 numbers) | 0    |
//! | `{"command":"frobnicate"}`            | `{"error":"Unknown command: …"}` | 0    |
//! | `{"command":5}` / `{"command":null}`  | `{"error":"Unknown command: 5"}` | 0    |
//! | `{}` / `{"text":""}`                  | `{"error":"Text cannot be empty"}` | 1  |
//! | `not json`                            | `{"error":"<parser message>"}`   | 1    |

pub mod dispatcher;
pub mod errors;
pub mod request;
pub mod response;
pub mod vectorize;

pub use dispatcher::Dispatcher;
pub use errors::ApiError;
pub use request::{Command, Request, DEFAULT_COMMAND};
pub use response::{ErrorResponse, Outcome};
pub use vectorize::{vectorize, EMPTY_TEXT_MESSAGE};
