//! Embedding service seam. The comparator only ever sees `dyn Embedder`; the
//! backend (remote endpoint, feature hashing, local model) is picked at startup.

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

pub mod hash;
pub mod http;
#[cfg(feature = "local-embeddings")]
pub mod local;

pub use hash::HashEmbedder;
pub use http::HttpEmbedder;
#[cfg(feature = "local-embeddings")]
pub use local::LocalEmbedder;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Embedding service returned no vectors")]
    EmptyResponse,

    #[cfg_attr(not(feature = "local-embeddings"), allow(dead_code))]
    #[error("Model error: {0}")]
    Model(String),
}

/// Turns text into a fixed-dimension vector.
///
/// Implementations must be deterministic for identical input within one
/// process; nothing else about the model is assumed.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Backend label, logged at startup and per comparison.
    fn name(&self) -> &'static str;

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}

/// Cosine similarity, `a·b / (|a| |b|)`, returned as computed.
/// Zero vectors, empty vectors and dimension mismatches score 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        warn!(
            a_len = a.len(),
            b_len = b.len(),
            "embedding dimension mismatch; returning zero similarity"
        );
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}
