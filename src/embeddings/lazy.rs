// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Encoder that loads its ONNX model on first use
//!
//! Malformed requests, unknown commands and empty texts never reach the
//! model, so they should not pay for loading it either.

use crate::embeddings::{Encoder, EncoderConfig, OnnxEmbeddingModel};
use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use tracing::info;

#[derive(Debug)]
pub struct LazyEncoder {
    config: EncoderConfig,
    model: OnceCell<OnnxEmbeddingModel>,
}

impl LazyEncoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self {
            config,
            model: OnceCell::new(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.model.get().is_some()
    }

    /// Returns the loaded model, loading it on the first call
    ///
    /// A failed load is not cached; the next call retries.
    pub fn model(&self) -> Result<&OnnxEmbeddingModel> {
        self.model.get_or_try_init(|| {
            info!(
                model = %self.config.name,
                path = %self.config.model_path.display(),
                "Loading embedding model"
            );
            OnnxEmbeddingModel::new(self.config.clone()).with_context(|| {
                format!("Failed to load embedding model {}", self.config.name)
            })
        })
    }
}

impl Encoder for LazyEncoder {
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.model()?.encode(texts)
    }

    /// Answered from configuration, without loading the model
    fn dimension(&self) -> usize {
        self.config.dimension
    }
}
