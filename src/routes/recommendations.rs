use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::Recommendation,
    routes::AppState,
};

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    #[serde(default)]
    pub query: Option<String>,
    /// Values of zero or below yield an empty list
    #[serde(default)]
    pub top_n: Option<i64>,
    #[serde(default)]
    pub keywords: Option<String>,
    #[serde(default)]
    pub genres: Option<String>,
}

/// Handler for the recommendation endpoint
///
/// Enforces the boundary's minimum query length, then delegates to the
/// recommender, which never fails: engine errors surface as an empty list.
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<Vec<Recommendation>>> {
    let query = request.query.unwrap_or_default();

    if query.trim().chars().count() < state.min_query_chars {
        tracing::info!(
            request_id = %request_id,
            query_chars = query.trim().chars().count(),
            "Rejected short query"
        );
        return Err(AppError::InvalidInput(format!(
            "Query must have at least {} characters",
            state.min_query_chars
        )));
    }

    let top_n = request
        .top_n
        .map_or(state.default_top_n, |n| usize::try_from(n).unwrap_or(0));

    tracing::info!(
        request_id = %request_id,
        query_chars = query.chars().count(),
        top_n = top_n,
        "Processing recommendation request"
    );

    let results = state
        .recommender
        .recommend(
            &query,
            top_n,
            request.keywords.as_deref(),
            request.genres.as_deref(),
        )
        .await;

    tracing::info!(
        request_id = %request_id,
        results = results.len(),
        "Recommendation request completed"
    );

    Ok(Json(results))
}
