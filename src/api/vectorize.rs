// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Vectorize operation: text in, embedding vector out

use crate::api::ApiError;
use crate::embeddings::Encoder;
use tracing::debug;

/// Message returned for an empty `text`
pub const EMPTY_TEXT_MESSAGE: &str = "Text cannot be empty";

/// Turns `text` into an embedding vector
///
/// Only the empty string is rejected: whitespace-only text is encoded as
/// is and there is no length ceiling (the model truncates).
///
/// The model produces `f32`; values are widened to `f64` so they print
/// exactly as the underlying single-precision numbers.
///
/// # Errors
/// - `ValidationError` if `text` is empty (the encoder is not called)
/// - `ModelError` if the encoder fails, returns no vector, returns a vector
///   of the wrong length, or returns a NaN/infinite value
pub fn vectorize<E: Encoder + ?Sized>(encoder: &E, text: &str) -> Result<Vec<f64>, ApiError> {
    if text.is_empty() {
        return Err(ApiError::ValidationError(EMPTY_TEXT_MESSAGE.to_string()));
    }

    debug!(chars = text.chars().count(), "Vectorizing text");

    let embedding = encoder
        .encode(&[text.to_string()])?
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::ModelError("Model returned no embedding".to_string()))?;

    let expected = encoder.dimension();
    if embedding.len() != expected {
        return Err(ApiError::ModelError(format!(
            "Unexpected embedding dimension: {} (expected {})",
            embedding.len(),
            expected
        )));
    }

    if let Some(index) = embedding.iter().position(|value| !value.is_finite()) {
        return Err(ApiError::ModelError(format!(
            "Embedding contains a non-finite value at index {}",
            index
        )));
    }

    Ok(embedding.into_iter().map(f64::from).collect())
}
