use std::hash::{Hash, Hasher};

use async_trait::async_trait;
use siphasher::sip::SipHasher13;

use super::{Embedder, EmbeddingError};

// Changing either key changes every vector this backend produces.
const HASH_SEED_K0: u64 = 0x0123_4567_89ab_cdef;
const HASH_SEED_K1: u64 = 0xfedc_ba98_7654_3210;

/// Deterministic bag-of-words embedder using signed feature hashing.
///
/// No model download, no network. Two texts score high when they share
/// tokens, which is enough for offline runs and tests. Not semantic.
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn hash(token: &str) -> u64 {
        let mut hasher = SipHasher13::new_with_keys(HASH_SEED_K0, HASH_SEED_K1);
        token.hash(&mut hasher);
        hasher.finish()
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];

        for token in text.split_whitespace() {
            let h = Self::hash(token);
            let idx = (h % self.dimension as u64) as usize;
            // Top bit picks the sign so collisions tend to cancel out.
            let sign = if h >> 63 == 0 { 1.0 } else { -1.0 };
            vector[idx] += sign;
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    fn name(&self) -> &'static str {
        "hash"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(self.vectorize(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::cosine_similarity;

    #[test]
    fn test_vectors_are_normalized() {
        let v = HashEmbedder::new(384).vectorize("python rust sql python");
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5, "L2 norm should be 1.0, got {norm}");
    }

    #[test]
    fn test_empty_text_is_zero_vector() {
        let v = HashEmbedder::new(16).vectorize("  \n ");
        assert_eq!(v.len(), 16);
        assert!(v.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_zero_dimension_is_clamped() {
        assert_eq!(HashEmbedder::new(0).vectorize("rust").len(), 1);
    }

    #[tokio::test]
    async fn test_deterministic() {
        let embedder = HashEmbedder::new(384);
        let a = embedder.embed("senior python engineer").await.unwrap();
        let b = embedder.embed("senior python engineer").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_shared_tokens_score_higher() {
        let embedder = HashEmbedder::new(384);
        let jd = embedder.embed("python software engineer").await.unwrap();
        let close = embedder.embed("python engineer at acme").await.unwrap();
        let far = embedder.embed("watercolor painting classes").await.unwrap();
        assert!(cosine_similarity(&jd, &close) > cosine_similarity(&jd, &far));
    }

    #[tokio::test]
    async fn test_identical_text_scores_one() {
        let embedder = HashEmbedder::new(384);
        let a = embedder.embed("rust developer").await.unwrap();
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-5);
    }
}
