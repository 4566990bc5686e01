use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::{routes::AppState, services::ModelStore};

/// Summary of the loaded corpus
#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub movies: usize,
    pub embedding_dim: usize,
    pub vocabulary_size: usize,
    pub renormalized_documents: usize,
    pub loaded_at: DateTime<Utc>,
}

impl From<&ModelStore> for ModelInfo {
    fn from(store: &ModelStore) -> Self {
        Self {
            movies: store.len(),
            embedding_dim: store.embedding_dim(),
            vocabulary_size: store.tfidf().vocabulary_size(),
            renormalized_documents: store.renormalized_documents(),
            loaded_at: store.loaded_at(),
        }
    }
}

/// Handler describing the model artifact currently served
pub async fn model_info(State(state): State<Arc<AppState>>) -> Json<ModelInfo> {
    Json(ModelInfo::from(state.recommender.store()))
}
