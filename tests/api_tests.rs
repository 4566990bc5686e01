use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::json;
use std::sync::Arc;

use cinematch_api::{
    error::EmbeddingError,
    models::{Movie, Recommendation},
    routes::{create_router, AppState},
    services::{tfidf::TfidfIndex, EmbeddingProvider, ModelStore, Recommender},
};

/// Always answers with the same vector
struct FixedProvider(Vec<f32>);

#[async_trait::async_trait]
impl EmbeddingProvider for FixedProvider {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(self.0.clone())
    }
}

/// Behaves like an embedding service that is not running
struct DownProvider;

#[async_trait::async_trait]
impl EmbeddingProvider for DownProvider {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Err(EmbeddingError::ConnectionRefused(
            "http://127.0.0.1:5000/embed".to_string(),
        ))
    }
}

fn movie(id: i64, title: &str, genres: &str) -> Movie {
    Movie {
        id,
        title: title.to_string(),
        overview: None,
        genres: Some(genres.to_string()),
        keywords: None,
        popularity: 50.0,
        rating: 7.0,
        poster: None,
    }
}

fn fixture_store() -> Arc<ModelStore> {
    let tfidf = TfidfIndex::new(
        vec!["space".to_string(), "war".to_string(), "love".to_string()],
        vec![1.0, 1.0, 1.0],
        vec![
            vec![1.0, 0.0, 0.0],
            vec![0.0, 0.0, 1.0],
            vec![0.6, 0.8, 0.0],
        ],
    )
    .unwrap();

    Arc::new(
        ModelStore::from_parts(
            vec![
                movie(11, "Star Wars", "Aventura, Ação"),
                movie(194, "Amélie", "Comédia, Romance"),
                movie(1891, "O Império Contra-Ataca", "Aventura"),
            ],
            vec![vec![0.6, 0.8], vec![0.8, 0.6], vec![0.0, 1.0]],
            tfidf,
        )
        .unwrap(),
    )
}

fn create_test_server_with(provider: Arc<dyn EmbeddingProvider>, min_query_chars: usize) -> TestServer {
    let state = AppState {
        recommender: Recommender::new(fixture_store(), provider),
        min_query_chars,
        default_top_n: 5,
    };
    TestServer::new(create_router(state)).unwrap()
}

fn create_test_server() -> TestServer {
    create_test_server_with(Arc::new(FixedProvider(vec![1.0, 0.0])), 2)
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_recommend_returns_ranked_movies() {
    let server = create_test_server();

    let response = server
        .post("/api/recommender")
        .json(&json!({ "query": "space war", "top_n": 2 }))
        .await;

    response.assert_status_ok();
    let results: Vec<Recommendation> = response.json();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].title, "Star Wars");
    assert_eq!(results[0].similarity, 0.6321);
    assert_eq!(results[0].genres, vec!["Aventura", "Ação"]);
    assert_eq!(results[0].overview, "Sem descrição.");
    assert_eq!(results[0].poster, None);
    assert_eq!(results[1].title, "Amélie");
    assert_eq!(results[1].similarity, 0.56);
}

#[tokio::test]
async fn test_recommend_uses_default_top_n() {
    let server = create_test_server();

    let response = server
        .post("/api/recommender")
        .json(&json!({ "query": "space war" }))
        .await;

    response.assert_status_ok();
    let results: Vec<serde_json::Value> = response.json();
    // default of 5 exceeds the 3-movie corpus
    assert_eq!(results.len(), 3);
    assert!(results[0]["poster"].is_null());
}

#[tokio::test]
async fn test_versioned_route_matches_legacy_route() {
    let server = create_test_server();

    let legacy: Vec<Recommendation> = server
        .post("/api/recommender")
        .json(&json!({ "query": "space war", "top_n": 3 }))
        .await
        .json();
    let versioned: Vec<Recommendation> = server
        .post("/api/v1/recommendations")
        .json(&json!({ "query": "space war", "top_n": 3 }))
        .await
        .json();

    assert_eq!(legacy, versioned);
}

#[tokio::test]
async fn test_recommend_hints_leave_ranking_unchanged() {
    let server = create_test_server();

    let plain: Vec<Recommendation> = server
        .post("/api/recommender")
        .json(&json!({ "query": "space war", "top_n": 3 }))
        .await
        .json();
    let hinted: Vec<Recommendation> = server
        .post("/api/recommender")
        .json(&json!({
            "query": "space war",
            "top_n": 3,
            "keywords": "love, love, love",
            "genres": "Romance"
        }))
        .await
        .json();

    assert_eq!(plain, hinted);
}

#[tokio::test]
async fn test_recommend_non_positive_top_n_returns_empty() {
    let server = create_test_server();

    for top_n in [0, -3] {
        let response = server
            .post("/api/recommender")
            .json(&json!({ "query": "space war", "top_n": top_n }))
            .await;

        response.assert_status_ok();
        let results: Vec<serde_json::Value> = response.json();
        assert!(results.is_empty());
    }
}

#[tokio::test]
async fn test_recommend_rejects_short_query() {
    let server = create_test_server_with(Arc::new(FixedProvider(vec![1.0, 0.0])), 60);

    let response = server
        .post("/api/recommender")
        .json(&json!({ "query": "space war" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Query must have at least 60 characters");
}

#[tokio::test]
async fn test_recommend_rejects_missing_query() {
    let server = create_test_server();

    let response = server.post("/api/recommender").json(&json!({})).await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_recommend_embedding_failure_is_empty_list() {
    let server = create_test_server_with(Arc::new(DownProvider), 2);

    let response = server
        .post("/api/recommender")
        .json(&json!({ "query": "space war" }))
        .await;

    response.assert_status_ok();
    let results: Vec<serde_json::Value> = response.json();
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = create_test_server();
    let request_id = uuid::Uuid::new_v4().to_string();

    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_str(&request_id).unwrap(),
        )
        .await;

    let echoed = response.headers().get("x-request-id").unwrap();
    assert_eq!(echoed.to_str().unwrap(), request_id);
}

#[tokio::test]
async fn test_request_id_is_generated() {
    let server = create_test_server();

    let response = server.get("/health").await;

    let generated = response.headers().get("x-request-id").unwrap();
    assert!(uuid::Uuid::parse_str(generated.to_str().unwrap()).is_ok());
}

#[tokio::test]
async fn test_model_info() {
    let server = create_test_server();

    let response = server.get("/api/v1/model").await;

    response.assert_status_ok();
    let info: serde_json::Value = response.json();
    assert_eq!(info["movies"], 3);
    assert_eq!(info["embedding_dim"], 2);
    assert_eq!(info["vocabulary_size"], 3);
    assert_eq!(info["renormalized_documents"], 0);
    assert!(info["loaded_at"].is_string());
}
