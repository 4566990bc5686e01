//! Embedding provider abstraction
//!
//! The recommender only needs "text in, dense vector out". The production
//! implementation calls the sentence-embedding HTTP service; tests substitute
//! mocks or in-process fakes.
use crate::error::EmbeddingError;

pub mod http;

pub use http::HttpEmbeddingProvider;

/// Trait for dense embedding providers
///
/// Implementations should return vectors of the same dimensionality as the
/// corpus embeddings in the model artifact, already L2-normalized. Neither
/// property is checked here; the recommender rejects a dimension mismatch per
/// request.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single piece of free text
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}
