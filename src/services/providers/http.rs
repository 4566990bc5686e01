//! HTTP embedding provider
//!
//! Talks to the sentence-embedding service:
//! `POST {api_url}` with `{"text": "..."}`, answered by `{"vector": [...]}`.
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{error::EmbeddingError, services::providers::EmbeddingProvider};

#[derive(Serialize)]
struct EmbedRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    #[serde(default)]
    vector: Option<Vec<f32>>,
}

#[derive(Clone)]
pub struct HttpEmbeddingProvider {
    http_client: HttpClient,
    api_url: String,
    timeout: Duration,
}

impl HttpEmbeddingProvider {
    /// Creates a provider whose requests are abandoned after `timeout`
    pub fn new(api_url: String, timeout: Duration) -> Result<Self, EmbeddingError> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_url,
            timeout,
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Maps transport failures onto the error kinds operators care about
    fn classify(&self, err: reqwest::Error) -> EmbeddingError {
        if err.is_timeout() {
            EmbeddingError::Timeout(self.timeout.as_millis() as u64)
        } else if is_connection_refused(&err) {
            EmbeddingError::ConnectionRefused(self.api_url.clone())
        } else if err.is_decode() {
            EmbeddingError::Malformed(err.to_string())
        } else {
            EmbeddingError::Request(err)
        }
    }
}

fn is_connection_refused(err: &reqwest::Error) -> bool {
    let mut source = std::error::Error::source(err);
    while let Some(inner) = source {
        if let Some(io) = inner.downcast_ref::<std::io::Error>() {
            if io.kind() == std::io::ErrorKind::ConnectionRefused {
                return true;
            }
        }
        source = std::error::Error::source(inner);
    }
    false
}

#[async_trait::async_trait]
impl EmbeddingProvider for HttpEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let response = self
            .http_client
            .post(&self.api_url)
            .json(&EmbedRequest { text })
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                status = %status,
                body = %body,
                "Embedding service request failed"
            );
            return Err(EmbeddingError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await.map_err(|e| self.classify(e))?;
        let parsed: EmbedResponse = serde_json::from_slice(&bytes)
            .map_err(|e| EmbeddingError::Malformed(e.to_string()))?;

        let vector = parsed.vector.ok_or(EmbeddingError::MissingVector)?;

        tracing::debug!(dim = vector.len(), "Embedding received");

        Ok(vector)
    }
}
