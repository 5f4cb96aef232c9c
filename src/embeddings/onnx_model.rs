// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! ONNX Embedding Model Wrapper
//!
//! Runs the all-MiniLM-L6-v2 sentence transformer on ONNX Runtime and
//! reproduces the sentence-transformers pipeline around it:
//! - BERT tokenization, truncated to the model's max sequence length
//! - GPU acceleration via CUDA (with automatic CPU fallback)
//! - Attention-masked mean pooling over token embeddings
//! - L2 normalization
//! - 384-dimensional output vectors

use crate::embeddings::{Encoder, EncoderConfig};
use anyhow::{anyhow, bail, Context, Result};
use ndarray::{Array2, ArrayView2, Axis, Ix2};
use ort::execution_providers::{CPUExecutionProvider, CUDAExecutionProvider};
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::Mutex;
use tokenizers::{Tokenizer, TruncationParams};
use tracing::{debug, info, warn};

/// ONNX-based sentence encoder (all-MiniLM-L6-v2 by default)
///
/// The session needs `&mut` to run, so it sits behind a `Mutex`; the
/// model is otherwise read-only after construction.
pub struct OnnxEmbeddingModel {
    session: Mutex<Session>,

    tokenizer: Tokenizer,

    /// Model name (e.g., "all-MiniLM-L6-v2")
    model_name: String,

    /// Output dimension (384 for all-MiniLM-L6-v2)
    dimension: usize,

    /// Maximum sequence length (256 for all-MiniLM-L6-v2)
    max_length: usize,

    normalize: bool,
}

impl std::fmt::Debug for OnnxEmbeddingModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxEmbeddingModel")
            .field("model_name", &self.model_name)
            .field("dimension", &self.dimension)
            .field("max_length", &self.max_length)
            .field("normalize", &self.normalize)
            .finish_non_exhaustive()
    }
}

impl OnnxEmbeddingModel {
    /// Loads the model and tokenizer described by `config`
    ///
    /// # Errors
    /// Returns error if:
    /// - Model or tokenizer file not found or invalid
    /// - ONNX Runtime initialization fails
    /// - A validation inference does not produce `[batch, seq_len, dimension]`
    ///
    /// # Example
    /// ```ignore
    /// let model = OnnxEmbeddingModel::new(EncoderConfig::default())?;
    /// assert_eq!(model.dimension(), 384);
    /// ```
    pub fn new(config: EncoderConfig) -> Result<Self> {
        let model_path = config.model_path.as_path();
        let tokenizer_path = config.tokenizer_path.as_path();

        if !model_path.exists() {
            bail!("ONNX model file not found: {}", model_path.display());
        }
        if !tokenizer_path.exists() {
            bail!("Tokenizer file not found: {}", tokenizer_path.display());
        }

        info!(model = %config.name, "Initializing ONNX embedding model");

        // Try CUDA first, fall back to CPU if unavailable
        let session = match build_session(model_path, config.intra_threads, true) {
            Ok(session) => {
                info!("CUDA execution provider initialized");
                session
            }
            Err(e) => {
                warn!("CUDA execution provider failed: {:#}", e);
                warn!("Falling back to CPU execution provider");
                build_session(model_path, config.intra_threads, false).with_context(|| {
                    format!("Failed to load ONNX model from {}", model_path.display())
                })?
            }
        };

        let mut tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| anyhow!("Failed to load tokenizer: {}", e))?;
        tokenizer.with_padding(None);
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: config.max_length,
                ..Default::default()
            }))
            .map_err(|e| anyhow!("Failed to configure tokenizer truncation: {}", e))?;

        let model = Self {
            session: Mutex::new(session),
            tokenizer,
            model_name: config.name,
            dimension: config.dimension,
            max_length: config.max_length,
            normalize: config.normalize,
        };

        // Output shape is checked on every run, so one probe validates the dimension
        model
            .embed("validation test")
            .context("Model validation inference failed")?;

        info!(
            model = %model.model_name,
            dimension = model.dimension,
            "ONNX embedding model loaded"
        );

        Ok(model)
    }

    /// Generates the embedding for a single text
    pub fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[text.to_string()])?
            .pop()
            .context("Model returned no embedding")
    }

    /// Generates embeddings for multiple texts in one inference
    ///
    /// Tokenizes all texts, pads to the longest, runs the session once and
    /// pools each row with its own attention mask.
    pub fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let encodings = texts
            .iter()
            .map(|text| {
                self.tokenizer
                    .encode(text.as_str(), true)
                    .map_err(|e| anyhow!("Tokenization failed: {}", e))
            })
            .collect::<Result<Vec<_>>>()?;

        let batch = texts.len();
        let max_len = encodings
            .iter()
            .map(|enc| enc.get_ids().len())
            .max()
            .unwrap_or(0);

        let mut input_ids = Vec::with_capacity(batch * max_len);
        let mut attention_mask = Vec::with_capacity(batch * max_len);

        for encoding in &encodings {
            let ids = encoding.get_ids();
            let padding = max_len - ids.len();

            input_ids.extend(ids.iter().map(|&id| id as i64));
            input_ids.extend(std::iter::repeat(0i64).take(padding));

            attention_mask.extend(encoding.get_attention_mask().iter().map(|&m| m as i64));
            attention_mask.extend(std::iter::repeat(0i64).take(padding));
        }

        debug!(batch, seq_len = max_len, "Running ONNX inference");

        let input_ids_array = Array2::from_shape_vec((batch, max_len), input_ids)
            .context("Failed to create input_ids array")?;
        let attention_mask_array =
            Array2::from_shape_vec((batch, max_len), attention_mask.clone())
                .context("Failed to create attention_mask array")?;
        let token_type_ids_array = Array2::<i64>::zeros((batch, max_len));

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow!("ONNX session lock poisoned"))?;
        let outputs = session.run(ort::inputs![
            "input_ids" => Value::from_array(input_ids_array)?,
            "attention_mask" => Value::from_array(attention_mask_array)?,
            "token_type_ids" => Value::from_array(token_type_ids_array)?
        ])?;

        // Index [0] rather than a name: exports differ in output naming
        let output = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract output tensor")?;

        // Token-level embeddings: [batch, seq_len, hidden_dim]
        let shape = output.shape();
        if shape.len() != 3 || shape[0] != batch || shape[2] != self.dimension {
            bail!(
                "Model outputs unexpected dimensions: {:?} (expected [{}, seq_len, {}])",
                shape,
                batch,
                self.dimension
            );
        }

        let mut embeddings = Vec::with_capacity(batch);
        for row in 0..batch {
            let tokens = output
                .index_axis(Axis(0), row)
                .into_dimensionality::<Ix2>()
                .context("Failed to view token embeddings")?;
            let mask = &attention_mask[row * max_len..(row + 1) * max_len];

            let mut pooled = mean_pool(tokens, mask);
            if self.normalize {
                l2_normalize(&mut pooled);
            }
            embeddings.push(pooled);
        }

        Ok(embeddings)
    }

    /// Counts non-padding tokens (including special tokens) after truncation
    pub fn count_tokens(&self, text: &str) -> Result<usize> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| anyhow!("Tokenization failed: {}", e))?;

        Ok(encoding
            .get_attention_mask()
            .iter()
            .map(|&m| m as usize)
            .sum())
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }
}

impl Encoder for OnnxEmbeddingModel {
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.embed_batch(texts)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

fn build_session(model_path: &Path, intra_threads: usize, cuda: bool) -> Result<Session> {
    let builder = Session::builder().context("Failed to create session builder")?;
    let builder = if cuda {
        builder.with_execution_providers([CUDAExecutionProvider::default().build()])
    } else {
        builder.with_execution_providers([CPUExecutionProvider::default().build()])
    }
    .context("Failed to set execution provider")?;

    builder
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .context("Failed to set optimization level")?
        .with_intra_threads(intra_threads)
        .context("Failed to set intra threads")?
        .commit_from_file(model_path)
        .with_context(|| format!("Failed to load ONNX model from {}", model_path.display()))
}

/// Averages token embeddings over the positions where `mask` is non-zero
///
/// `tokens` is `[seq_len, hidden_dim]`; positions beyond `mask` count as padding.
pub fn mean_pool(tokens: ArrayView2<f32>, mask: &[i64]) -> Vec<f32> {
    let mut pooled = vec![0.0f32; tokens.ncols()];
    let mut sum_mask = 0.0f32;

    for (i, token) in tokens.outer_iter().enumerate() {
        let weight = mask.get(i).copied().unwrap_or(0) as f32;
        if weight == 0.0 {
            continue;
        }
        sum_mask += weight;
        for (acc, &value) in pooled.iter_mut().zip(token.iter()) {
            *acc += value * weight;
        }
    }

    for value in &mut pooled {
        *value /= sum_mask.max(1e-9);
    }

    pooled
}

/// Scales `vector` to unit L2 norm in place
pub fn l2_normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm = norm.max(1e-12);
    for value in vector.iter_mut() {
        *value /= norm;
    }
}
