//! In-process all-MiniLM-L6-v2 via fastembed (ONNX). Downloads the model on
//! first start; inference runs on the blocking pool.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fastembed::{EmbeddingModel, TextEmbedding, TextInitOptions};
use tracing::info;

use super::{Embedder, EmbeddingError};

pub struct LocalEmbedder {
    model: Arc<Mutex<TextEmbedding>>,
}

impl LocalEmbedder {
    pub fn new() -> Result<Self, EmbeddingError> {
        let model = TextEmbedding::try_new(TextInitOptions::new(EmbeddingModel::AllMiniLML6V2))
            .map_err(|e| EmbeddingError::Model(format!("Failed to load all-MiniLM-L6-v2: {e}")))?;
        info!("Local embedding model loaded (all-MiniLM-L6-v2)");
        Ok(Self {
            model: Arc::new(Mutex::new(model)),
        })
    }
}

#[async_trait]
impl Embedder for LocalEmbedder {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let model = Arc::clone(&self.model);
        let text = text.to_string();

        tokio::task::spawn_blocking(move || {
            let mut model = model
                .lock()
                .map_err(|_| EmbeddingError::Model("embedding model lock poisoned".to_string()))?;
            model
                .embed(vec![text], None)
                .map_err(|e| EmbeddingError::Model(format!("Failed to generate embedding: {e:?}")))?
                .into_iter()
                .next()
                .ok_or(EmbeddingError::EmptyResponse)
        })
        .await
        .map_err(|e| EmbeddingError::Model(format!("Embedding task failed: {e}")))?
    }
}
