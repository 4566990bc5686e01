use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use std::sync::Arc;

use crate::services::{
    recommender::{DEFAULT_TOP_N, MIN_QUERY_CHARS},
    HttpEmbeddingProvider, ModelStore, Recommender,
};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Path to the persisted model artifact (movies + embeddings)
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,

    /// Optional separate TF-IDF index file. When unset, the index is read
    /// from the `tfidf` key of the model artifact.
    #[serde(default)]
    pub tfidf_path: Option<PathBuf>,

    /// Embedding service endpoint
    #[serde(default = "default_embedding_api_url")]
    pub embedding_api_url: String,

    /// Upper bound on a single embedding call, in milliseconds
    #[serde(default = "default_embedding_timeout_ms")]
    pub embedding_timeout_ms: u64,

    /// Prefix joined with each movie's stored poster path
    #[serde(default = "default_poster_base_url")]
    pub poster_base_url: String,

    /// Minimum trimmed query length accepted by the HTTP endpoint
    #[serde(default = "default_min_query_chars")]
    pub min_query_chars: usize,

    /// Number of results returned when the request does not specify one
    #[serde(default = "default_top_n")]
    pub default_top_n: usize,

    /// Log the full error chain when a recommendation fails
    #[serde(default)]
    pub debug_errors: bool,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_model_path() -> PathBuf {
    PathBuf::from("data/model/model.json")
}

fn default_embedding_api_url() -> String {
    "http://127.0.0.1:5000/embed".to_string()
}

fn default_embedding_timeout_ms() -> u64 {
    5000
}

fn default_poster_base_url() -> String {
    "https://image.tmdb.org/t/p/w154".to_string()
}

fn default_min_query_chars() -> usize {
    MIN_QUERY_CHARS
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn embedding_timeout(&self) -> Duration {
        Duration::from_millis(self.embedding_timeout_ms)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Loads the model artifact and wires the recommender to the HTTP embedding
/// service. A model that fails to load is fatal.
pub fn build_recommender(config: &Config) -> anyhow::Result<Recommender> {
    let store = ModelStore::load(&config.model_path, config.tfidf_path.as_deref())
        .with_context(|| format!("Failed to load model from {}", config.model_path.display()))?;

    let provider =
        HttpEmbeddingProvider::new(config.embedding_api_url.clone(), config.embedding_timeout())?;

    tracing::info!(
        embedding_api_url = %provider.api_url(),
        timeout_ms = config.embedding_timeout_ms,
        "Embedding provider configured"
    );

    Ok(Recommender::new(Arc::new(store), Arc::new(provider))
        .with_poster_base_url(config.poster_base_url.clone())
        .with_embedding_timeout(config.embedding_timeout())
        .with_debug_errors(config.debug_errors))
}
