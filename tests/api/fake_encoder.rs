// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Deterministic stand-in for the ONNX model
//!
//! Seeds a linear congruential generator from the text hash, so equal
//! texts give equal vectors and different texts almost surely differ.

use anyhow::{bail, Result};
use overpass_ai::Encoder;
use std::cell::Cell;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

pub struct HashEncoder {
    dimension: usize,
    calls: Cell<usize>,
}

impl HashEncoder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            calls: Cell::new(0),
        }
    }

    /// Number of `encode` calls so far
    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    fn embed(&self, text: &str) -> Vec<f32> {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let mut seed = hasher.finish();

        let mut embedding: Vec<f32> = (0..self.dimension)
            .map(|i| {
                seed = seed.wrapping_mul(1664525).wrapping_add(1013904223) ^ (i as u64);
                ((seed as f64 / u64::MAX as f64) * 2.0 - 1.0) as f32
            })
            .collect();

        let norm = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut embedding {
                *value /= norm;
            }
        }
        embedding
    }
}

impl Encoder for HashEncoder {
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.calls.set(self.calls.get() + 1);
        Ok(texts.iter().map(|text| self.embed(text)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Encoder whose every call fails, like a model that cannot run
pub struct FailingEncoder;

impl Encoder for FailingEncoder {
    fn encode(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
        bail!("ONNX model file not found: ./models/all-MiniLM-L6-v2-onnx/model.onnx")
    }

    fn dimension(&self) -> usize {
        384
    }
}
