// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod cli;
pub mod embeddings;

pub use api::{ApiError, Command, Dispatcher, ErrorResponse, Outcome, Request};
pub use embeddings::{Encoder, EncoderConfig, LazyEncoder, OnnxEmbeddingModel};
