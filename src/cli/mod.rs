// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use crate::embeddings::{EncoderConfig, DEFAULT_DIMENSION, DEFAULT_MAX_LENGTH, DEFAULT_MODEL_NAME};
use clap::Parser;
use std::path::PathBuf;

/// Overpass AI vectorizer
///
/// Reads one JSON request from stdin and writes one JSON document to stdout.
/// The options below only locate and tune the embedding model; a plain
/// invocation with none of them uses all-MiniLM-L6-v2 from ./models.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "overpass-ai")]
#[command(version)]
#[command(about = "Turn text into sentence embeddings over a JSON stdin/stdout protocol", long_about = None)]
pub struct Cli {
    /// Embedding model name
    #[arg(long, env = "OVERPASS_MODEL_NAME", default_value = DEFAULT_MODEL_NAME)]
    pub model_name: String,

    /// Path to the ONNX model file
    #[arg(
        long,
        env = "OVERPASS_MODEL_PATH",
        default_value = "./models/all-MiniLM-L6-v2-onnx/model.onnx"
    )]
    pub model_path: PathBuf,

    /// Path to the tokenizer JSON file
    #[arg(
        long,
        env = "OVERPASS_TOKENIZER_PATH",
        default_value = "./models/all-MiniLM-L6-v2-onnx/tokenizer.json"
    )]
    pub tokenizer_path: PathBuf,

    /// Expected embedding dimension
    #[arg(long, env = "OVERPASS_DIMENSION", default_value_t = DEFAULT_DIMENSION)]
    pub dimension: usize,

    /// Maximum sequence length in tokens; longer inputs are truncated
    #[arg(long, env = "OVERPASS_MAX_LENGTH", default_value_t = DEFAULT_MAX_LENGTH)]
    pub max_length: usize,

    /// ONNX Runtime intra-op threads
    #[arg(long, env = "OVERPASS_INTRA_THREADS", default_value_t = 4)]
    pub intra_threads: usize,

    /// Skip L2 normalization of pooled embeddings
    #[arg(long, env = "OVERPASS_NO_NORMALIZE")]
    pub no_normalize: bool,
}

impl Cli {
    /// Model configuration described by these arguments
    pub fn encoder_config(&self) -> EncoderConfig {
        EncoderConfig {
            name: self.model_name.clone(),
            model_path: self.model_path.clone(),
            tokenizer_path: self.tokenizer_path.clone(),
            dimension: self.dimension,
            max_length: self.max_length,
            intra_threads: self.intra_threads,
            normalize: !self.no_normalize,
        }
    }
}
