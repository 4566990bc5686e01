//! Vector similarity for dense embeddings and TF-IDF vectors.
//!
//! Every call site picks a [`SimilarityMode`] explicitly. `Normalized` is the
//! fast path for inputs the caller already knows are unit length; `Cosine`
//! pays for the magnitudes and guards against near-zero vectors.

use crate::error::DimensionMismatch;

/// Magnitude products below this are treated as zero vectors
pub const EPSILON: f32 = 1e-10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimilarityMode {
    /// Raw dot product; both inputs must already be unit-normalized
    Normalized,
    /// Full cosine similarity
    Cosine,
}

pub fn similarity(a: &[f32], b: &[f32], mode: SimilarityMode) -> Result<f32, DimensionMismatch> {
    if a.len() != b.len() {
        return Err(DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    match mode {
        SimilarityMode::Normalized => Ok(dot(a, b)),
        SimilarityMode::Cosine => {
            let denom = magnitude(a) * magnitude(b);
            if denom < EPSILON {
                return Ok(0.0);
            }
            Ok(dot(a, b) / denom)
        }
    }
}

pub fn magnitude(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Scales `v` to unit length in place and returns its original magnitude.
/// Zero vectors are left untouched.
pub fn l2_normalize(v: &mut [f32]) -> f32 {
    let mag = magnitude(v);
    if mag > 0.0 {
        for x in v.iter_mut() {
            *x /= mag;
        }
    }
    mag
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
