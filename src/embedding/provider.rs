//! `EmbeddingProvider` trait and the HTTP-backed `ApiEmbedder`.
//!
//! `ApiEmbedder` calls any OpenAI-compatible `/v1/embeddings` endpoint
//! (text-embeddings-inference, Ollama in OpenAI mode, OpenAI, ...).  One
//! call embeds one batch; nothing is cached between calls.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::EmbeddingConfig;

/// A fixed-length vector representing one piece of text.
pub type Embedding = Vec<f32>;

// ---------------------------------------------------------------------------
// EmbeddingError
// ---------------------------------------------------------------------------

/// Errors raised by an embedding provider.  Callers never receive partial
/// results alongside an error.
#[derive(Debug, Clone, Error)]
pub enum EmbeddingError {
    /// HTTP transport or connection error.
    #[error("embedding request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("embedding request timed out")]
    Timeout,

    /// The service answered with a non-success status.
    #[error("embedding service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body could not be parsed.
    #[error("failed to parse embedding response: {0}")]
    Parse(String),

    /// The service returned a different number of vectors than inputs.
    #[error("expected {expected} embeddings, got {got}")]
    CountMismatch { expected: usize, got: usize },

    /// Vectors within one batch have different lengths.
    #[error("embedding dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}

impl From<reqwest::Error> for EmbeddingError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            EmbeddingError::Timeout
        } else {
            EmbeddingError::Request(e.to_string())
        }
    }
}

/// Check that `vectors` has one entry per input and a single shared length.
pub fn validate_batch(vectors: &[Embedding], expected: usize) -> Result<(), EmbeddingError> {
    if vectors.len() != expected {
        return Err(EmbeddingError::CountMismatch {
            expected,
            got: vectors.len(),
        });
    }
    if let Some(first) = vectors.first() {
        let dim = first.len();
        if let Some(bad) = vectors.iter().find(|v| v.len() != dim) {
            return Err(EmbeddingError::DimensionMismatch {
                expected: dim,
                got: bad.len(),
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// EmbeddingProvider trait
// ---------------------------------------------------------------------------

/// Converts a batch of strings into vectors, preserving input order.
///
/// Implementors must be `Send + Sync` so one instance can be shared behind an
/// `Arc<dyn EmbeddingProvider>` for the lifetime of the process.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError>;
}

// ---------------------------------------------------------------------------
// ApiEmbedder
// ---------------------------------------------------------------------------

/// Calls an OpenAI-compatible `/v1/embeddings` endpoint.
pub struct ApiEmbedder {
    client: reqwest::Client,
    config: EmbeddingConfig,
}

impl ApiEmbedder {
    /// Build an `ApiEmbedder` from application config.
    ///
    /// Falls back to a default client (no timeout) if the builder fails.
    pub fn from_config(config: &EmbeddingConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/embeddings", self.config.base_url.trim_end_matches('/'))
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Embedding,
    index: usize,
}

#[async_trait]
impl EmbeddingProvider for ApiEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = EmbeddingRequest {
            model: &self.config.model,
            input: texts,
        };

        let mut req = self.client.post(self.endpoint()).json(&request);
        let key = self.config.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            req = req.bearer_auth(key);
        }

        let response = req.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(EmbeddingError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let mut parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::Parse(e.to_string()))?;
        parsed.data.sort_by_key(|entry| entry.index);

        let vectors: Vec<Embedding> = parsed.data.into_iter().map(|d| d.embedding).collect();
        validate_batch(&vectors, texts.len())?;

        log::debug!(
            "embedding: {} vectors of dim {}",
            vectors.len(),
            vectors.first().map_or(0, Vec::len)
        );
        Ok(vectors)
    }
}

// ---------------------------------------------------------------------------
// MockEmbedder  (test-only)
// ---------------------------------------------------------------------------

/// A lookup-table embedder: each known text maps to a fixed vector.
/// Unknown text is an error so tests notice unexpected inputs.
#[cfg(test)]
pub struct MockEmbedder {
    table: std::collections::HashMap<String, Embedding>,
    fail: Option<EmbeddingError>,
    calls: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl MockEmbedder {
    pub fn new<S: Into<String>>(entries: impl IntoIterator<Item = (S, Embedding)>) -> Self {
        Self {
            table: entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            fail: None,
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// A mock whose every call fails with `error`.
    pub fn failing(error: EmbeddingError) -> Self {
        Self {
            fail: Some(error),
            ..Self::new(Vec::<(String, Embedding)>::new())
        }
    }

    /// Number of `embed` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
#[async_trait]
impl EmbeddingProvider for MockEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Embedding>, EmbeddingError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        if let Some(err) = &self.fail {
            return Err(err.clone());
        }
        texts
            .iter()
            .map(|t| {
                self.table
                    .get(t)
                    .cloned()
                    .ok_or_else(|| EmbeddingError::Request(format!("no mock vector for {t:?}")))
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config_builds_without_panic() {
        let _embedder = ApiEmbedder::from_config(&EmbeddingConfig::default());
    }

    #[test]
    fn endpoint_strips_trailing_slash() {
        let config = EmbeddingConfig {
            base_url: "http://localhost:8080/".into(),
            ..EmbeddingConfig::default()
        };
        let embedder = ApiEmbedder::from_config(&config);
        assert_eq!(embedder.endpoint(), "http://localhost:8080/v1/embeddings");
    }

    #[test]
    fn embedder_is_object_safe() {
        let embedder: Box<dyn EmbeddingProvider> =
            Box::new(ApiEmbedder::from_config(&EmbeddingConfig::default()));
        drop(embedder);
    }

    #[tokio::test]
    async fn empty_batch_skips_the_network() {
        // Port 9 (discard) is never contacted for an empty batch.
        let config = EmbeddingConfig {
            base_url: "http://127.0.0.1:9".into(),
            ..EmbeddingConfig::default()
        };
        let vectors = ApiEmbedder::from_config(&config).embed(&[]).await.unwrap();
        assert!(vectors.is_empty());
    }

    #[test]
    fn validate_batch_accepts_uniform_vectors() {
        let vectors = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        assert!(validate_batch(&vectors, 2).is_ok());
        assert!(validate_batch(&[], 0).is_ok());
    }

    #[test]
    fn validate_batch_rejects_count_mismatch() {
        let err = validate_batch(&[vec![1.0]], 2).unwrap_err();
        assert!(matches!(
            err,
            EmbeddingError::CountMismatch { expected: 2, got: 1 }
        ));
    }

    #[test]
    fn validate_batch_rejects_ragged_vectors() {
        let err = validate_batch(&[vec![1.0, 0.0], vec![1.0]], 2).unwrap_err();
        assert!(matches!(
            err,
            EmbeddingError::DimensionMismatch { expected: 2, got: 1 }
        ));
    }

    #[tokio::test]
    async fn mock_recomputes_on_every_call() {
        let mock = MockEmbedder::new([("a", vec![1.0])]);
        let texts = vec!["a".to_string()];
        mock.embed(&texts).await.unwrap();
        mock.embed(&texts).await.unwrap();
        assert_eq!(mock.calls(), 2);
    }
}
