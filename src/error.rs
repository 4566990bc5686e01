use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::path::PathBuf;

/// Two vectors that were expected to share a dimensionality did not
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Vectors must have the same length (expected {expected}, got {actual})")]
pub struct DimensionMismatch {
    pub expected: usize,
    pub actual: usize,
}

/// Failures while loading the persisted model artifact. Always fatal at startup.
#[derive(thiserror::Error, Debug)]
pub enum ModelError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(
        "Model arrays are misaligned: {movies} movies, {embeddings} embeddings, {documents} TF-IDF vectors"
    )]
    Misaligned {
        movies: usize,
        embeddings: usize,
        documents: usize,
    },

    #[error("Embedding {index} has dimension {actual}, expected {expected}")]
    InconsistentDimensions {
        index: usize,
        expected: usize,
        actual: usize,
    },

    #[error("TF-IDF index is inconsistent: {0}")]
    VocabularyMismatch(String),

    #[error("Model artifact has no TF-IDF index and no TF-IDF file was configured")]
    MissingTfidf,
}

/// Failures of the external embedding service
#[derive(thiserror::Error, Debug)]
pub enum EmbeddingError {
    #[error("Embedding service timed out after {0} ms")]
    Timeout(u64),

    #[error("Embedding service refused the connection at {0}")]
    ConnectionRefused(String),

    #[error("Embedding service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Embedding service response could not be decoded: {0}")]
    Malformed(String),

    #[error("Embedding service response has no vector")]
    MissingVector,

    #[error("Embedding request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Internal failure kinds of the recommendation pipeline.
///
/// These never reach callers of `Recommender::recommend`, which logs them and
/// returns an empty list instead.
#[derive(thiserror::Error, Debug)]
pub enum RecommendError {
    #[error("Invalid query: must be text with at least {0} characters")]
    InvalidQuery(usize),

    #[error("Embedding service error: {0}")]
    EmbeddingService(#[from] EmbeddingError),

    #[error("Invalid embedding: {0}")]
    InvalidEmbedding(String),

    #[error(transparent)]
    DimensionMismatch(#[from] DimensionMismatch),
}

impl RecommendError {
    /// Short stable name used as a structured log field
    pub fn kind(&self) -> &'static str {
        match self {
            RecommendError::InvalidQuery(_) => "invalid_query",
            RecommendError::EmbeddingService(EmbeddingError::Timeout(_)) => "embedding_timeout",
            RecommendError::EmbeddingService(EmbeddingError::ConnectionRefused(_)) => {
                "embedding_connection_refused"
            }
            RecommendError::EmbeddingService(_) => "embedding_service",
            RecommendError::InvalidEmbedding(_) => "invalid_embedding",
            RecommendError::DimensionMismatch(_) => "dimension_mismatch",
        }
    }
}

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
