//! Sentence embeddings and cosine similarity.
//!
//! * [`EmbeddingProvider`]: async trait implemented by all embedding backends.
//! * [`ApiEmbedder`]: OpenAI-compatible `/v1/embeddings` client.
//! * [`similarity_matrix`] / [`argmax`]: pairwise scoring and best-match pick.
//!
//! There is no global model handle: construct one provider at startup and
//! share it as `Arc<dyn EmbeddingProvider>`.

pub mod provider;
pub mod similarity;

pub use provider::{validate_batch, ApiEmbedder, Embedding, EmbeddingError, EmbeddingProvider};
pub use similarity::{argmax, cosine_similarity, similarity_matrix};

#[cfg(test)]
pub use provider::MockEmbedder;
