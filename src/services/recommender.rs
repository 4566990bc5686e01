use std::cmp::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::{
    error::{EmbeddingError, RecommendError},
    models::Recommendation,
    services::{
        model_store::ModelStore,
        providers::EmbeddingProvider,
        similarity::{similarity, SimilarityMode},
    },
};

/// Weight of the dense embedding signal in the blended score
pub const WEIGHT_DENSE: f32 = 0.7;
/// Weight of the TF-IDF signal in the blended score
pub const WEIGHT_LEXICAL: f32 = 0.3;

pub const DEFAULT_TOP_N: usize = 5;
/// Minimum trimmed query length the engine accepts
pub const MIN_QUERY_CHARS: usize = 2;

const DEFAULT_EMBEDDING_TIMEOUT: Duration = Duration::from_millis(5000);
const DEFAULT_POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w154";

/// Hybrid movie recommender
///
/// Blends dense-embedding similarity with TF-IDF similarity over an immutable
/// [`ModelStore`]. Requests share nothing mutable, so one instance serves any
/// number of concurrent callers.
pub struct Recommender {
    store: Arc<ModelStore>,
    provider: Arc<dyn EmbeddingProvider>,
    poster_base_url: String,
    embedding_timeout: Duration,
    debug_errors: bool,
}

impl Recommender {
    pub fn new(store: Arc<ModelStore>, provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            store,
            provider,
            poster_base_url: DEFAULT_POSTER_BASE_URL.to_string(),
            embedding_timeout: DEFAULT_EMBEDDING_TIMEOUT,
            debug_errors: false,
        }
    }

    pub fn with_poster_base_url(mut self, poster_base_url: impl Into<String>) -> Self {
        self.poster_base_url = poster_base_url.into();
        self
    }

    pub fn with_embedding_timeout(mut self, timeout: Duration) -> Self {
        self.embedding_timeout = timeout;
        self
    }

    /// Log the full error chain on failure, not just kind and message
    pub fn with_debug_errors(mut self, debug_errors: bool) -> Self {
        self.debug_errors = debug_errors;
        self
    }

    pub fn store(&self) -> &ModelStore {
        &self.store
    }

    /// Returns up to `top_n` movies ranked by blended similarity to `query`.
    ///
    /// Never fails: any error is logged and yields an empty list, so callers
    /// cannot tell "no matches" from "internal failure". Use
    /// [`Recommender::try_recommend`] to observe the failure kind.
    pub async fn recommend(
        &self,
        query: &str,
        top_n: usize,
        keywords: Option<&str>,
        genres: Option<&str>,
    ) -> Vec<Recommendation> {
        let start = Instant::now();

        match self.try_recommend(query, top_n, keywords, genres).await {
            Ok(results) => {
                tracing::info!(
                    results = results.len(),
                    top_n = top_n,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Recommendations computed"
                );
                results
            }
            Err(err) => {
                self.log_failure(&err);
                Vec::new()
            }
        }
    }

    /// Keyword and genre hints are accepted from callers but do not affect
    /// ranking: both signals are computed from `query` alone.
    pub async fn try_recommend(
        &self,
        query: &str,
        top_n: usize,
        keywords: Option<&str>,
        genres: Option<&str>,
    ) -> Result<Vec<Recommendation>, RecommendError> {
        validate_query(query)?;

        if keywords.is_some() || genres.is_some() {
            tracing::debug!(
                keywords = ?keywords,
                genres = ?genres,
                "Ranking hints ignored"
            );
        }

        let query_embedding = self.embed_query(query).await?;
        validate_embedding(&query_embedding)?;

        let ranked = self.rank(&query_embedding, query, top_n)?;

        let movies = self.store.movies();
        Ok(ranked
            .into_iter()
            .map(|(index, score)| {
                Recommendation::from_movie(&movies[index], score, &self.poster_base_url)
            })
            .collect())
    }

    async fn embed_query(&self, query: &str) -> Result<Vec<f32>, RecommendError> {
        let start = Instant::now();

        let embedding = tokio::time::timeout(self.embedding_timeout, self.provider.embed(query))
            .await
            .map_err(|_| EmbeddingError::Timeout(self.embedding_timeout.as_millis() as u64))??;

        tracing::debug!(
            dim = embedding.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Query embedded"
        );

        Ok(embedding)
    }

    /// Scores every corpus item and keeps the best `top_n`, highest first.
    /// Equal scores keep corpus order.
    fn rank(
        &self,
        query_embedding: &[f32],
        query: &str,
        top_n: usize,
    ) -> Result<Vec<(usize, f32)>, RecommendError> {
        let lexical = self.store.tfidf().similarities(query)?;

        let mut scored = Vec::with_capacity(self.store.len());
        for (index, (embedding, lexical_score)) in
            self.store.embeddings().iter().zip(&lexical).enumerate()
        {
            // Corpus and query embeddings are assumed unit length
            let dense = similarity(query_embedding, embedding, SimilarityMode::Normalized)?;
            scored.push((index, WEIGHT_DENSE * dense + WEIGHT_LEXICAL * lexical_score));
        }

        // sort_by is stable
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        scored.truncate(top_n);

        Ok(scored)
    }

    fn log_failure(&self, err: &RecommendError) {
        tracing::error!(kind = err.kind(), error = %err, "Recommendation failed");

        if let RecommendError::EmbeddingService(EmbeddingError::ConnectionRefused(url)) = err {
            tracing::error!(url = %url, "Check that the embedding service is running");
        }

        if self.debug_errors {
            tracing::error!(error = ?err, "Recommendation failure detail");
        }
    }
}

fn validate_query(query: &str) -> Result<(), RecommendError> {
    if query.trim().chars().count() < MIN_QUERY_CHARS {
        return Err(RecommendError::InvalidQuery(MIN_QUERY_CHARS));
    }
    Ok(())
}

fn validate_embedding(embedding: &[f32]) -> Result<(), RecommendError> {
    if embedding.is_empty() {
        return Err(RecommendError::InvalidEmbedding(
            "embedding is empty".to_string(),
        ));
    }
    if let Some(position) = embedding.iter().position(|x| !x.is_finite()) {
        return Err(RecommendError::InvalidEmbedding(format!(
            "component {} is not a finite number",
            position
        )));
    }
    Ok(())
}
