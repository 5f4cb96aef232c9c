// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Embedding model capability
//!
//! The protocol layer only ever sees the [`Encoder`] trait. The production
//! implementation is [`OnnxEmbeddingModel`] (all-MiniLM-L6-v2 on ONNX
//! Runtime), usually wrapped in a [`LazyEncoder`] so that requests which
//! never reach the model do not pay for loading it.

pub mod lazy;
pub mod onnx_model;

pub use lazy::LazyEncoder;
pub use onnx_model::{l2_normalize, mean_pool, OnnxEmbeddingModel};

use anyhow::Result;
use std::path::PathBuf;

/// Name of the default sentence encoder
pub const DEFAULT_MODEL_NAME: &str = "all-MiniLM-L6-v2";

/// Output dimension of the default sentence encoder
pub const DEFAULT_DIMENSION: usize = 384;

/// Maximum sequence length of the default sentence encoder, in tokens
pub const DEFAULT_MAX_LENGTH: usize = 256;

/// Text-to-vector capability
///
/// `encode` returns one vector per input, in input order, each exactly
/// `dimension()` long. Implementations only need `&self`; any interior
/// state (a loaded session) must tolerate shared reads.
#[cfg_attr(test, mockall::automock)]
pub trait Encoder {
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    fn dimension(&self) -> usize;
}

impl<T: Encoder + ?Sized> Encoder for &T {
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        (**self).encode(texts)
    }

    fn dimension(&self) -> usize {
        (**self).dimension()
    }
}

impl<T: Encoder + ?Sized> Encoder for Box<T> {
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        (**self).encode(texts)
    }

    fn dimension(&self) -> usize {
        (**self).dimension()
    }
}

/// Where to find an ONNX sentence encoder and how to run it
#[derive(Debug, Clone, PartialEq)]
pub struct EncoderConfig {
    /// Model name (e.g., "all-MiniLM-L6-v2"), used in logs and errors
    pub name: String,
    /// Path to ONNX model file
    pub model_path: PathBuf,
    /// Path to tokenizer JSON file
    pub tokenizer_path: PathBuf,
    /// Expected embedding dimension, checked at load time
    pub dimension: usize,
    /// Inputs longer than this many tokens are truncated
    pub max_length: usize,
    /// ONNX Runtime intra-op thread count
    pub intra_threads: usize,
    /// L2-normalize pooled vectors
    pub normalize: bool,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_MODEL_NAME.to_string(),
            model_path: PathBuf::from("./models/all-MiniLM-L6-v2-onnx/model.onnx"),
            tokenizer_path: PathBuf::from("./models/all-MiniLM-L6-v2-onnx/tokenizer.json"),
            dimension: DEFAULT_DIMENSION,
            max_length: DEFAULT_MAX_LENGTH,
            intra_threads: 4,
            normalize: true,
        }
    }
}
