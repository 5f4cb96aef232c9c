// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Vectorize operation tests

use super::fake_encoder::{FailingEncoder, HashEncoder};
use overpass_ai::api::{vectorize, EMPTY_TEXT_MESSAGE};
use overpass_ai::Encoder;

#[test]
fn test_vector_matches_encoder_output() {
    let encoder = HashEncoder::new(384);

    let vector = vectorize(&encoder, "database connection lost").unwrap();
    let raw = encoder
        .encode(&["database connection lost".to_string()])
        .unwrap()
        .remove(0);

    assert_eq!(vector.len(), 384);
    for (widened, original) in vector.iter().zip(raw.iter()) {
        assert_eq!(*widened, *original as f64);
    }
}

#[test]
fn test_empty_text_never_reaches_encoder() {
    let encoder = HashEncoder::new(384);

    let err = vectorize(&encoder, "").unwrap_err();

    assert_eq!(err.to_string(), EMPTY_TEXT_MESSAGE);
    assert_eq!(encoder.calls(), 0);
}

#[test]
fn test_long_text_has_no_ceiling() {
    let encoder = HashEncoder::new(384);
    let text = "stack trace line\n".repeat(10_000);

    let vector = vectorize(&encoder, &text).unwrap();
    assert_eq!(vector.len(), 384);
}

#[test]
fn test_works_through_trait_object() {
    let encoder: Box<dyn Encoder> = Box::new(HashEncoder::new(16));

    let vector = vectorize(encoder.as_ref(), "boxed").unwrap();
    assert_eq!(vector.len(), 16);
}

#[test]
fn test_model_error_is_reported() {
    let err = vectorize(&FailingEncoder, "text").unwrap_err();

    assert_eq!(err.kind(), "model_error");
    assert!(err.to_string().starts_with("ONNX model file not found"));
}
