//! Feature-hashing text embedder. Deterministic, no model, no network.
//!
//! Tokens are lowercase runs of two or more word characters. Each token is
//! hashed with SHA-256 into one of `dims` buckets; bucket counts are then
//! L2-normalised. Empty input embeds to the zero vector.

use std::sync::LazyLock;

use regex::Regex;
use sha2::{Digest, Sha256};

pub const DEFAULT_DIMENSIONS: usize = 512;

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w\w+\b").unwrap());

#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dims: usize,
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSIONS)
    }
}

impl HashingEmbedder {
    pub fn new(dims: usize) -> Self {
        Self { dims: dims.max(1) }
    }

    pub fn embed(&self, text: &str) -> Vec<f32> {
        let mut out = vec![0.0_f32; self.dims];
        let lowered = text.to_lowercase();
        for token in TOKEN_RE.find_iter(&lowered) {
            out[self.bucket(token.as_str())] += 1.0;
        }

        let norm: f32 = out.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut out {
                *v /= norm;
            }
        }
        out
    }

    fn bucket(&self, token: &str) -> usize {
        let digest = Sha256::digest(token.as_bytes());
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&digest[..4]);
        u32::from_le_bytes(bytes) as usize % self.dims
    }
}

/// Dot product; equals cosine similarity for L2-normalised inputs.
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
