mod config;
mod embedding;
mod errors;
mod extraction;
mod matching;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, EmbeddingBackend};
use crate::embedding::{Embedder, HashEmbedder, HttpEmbedder};
use crate::matching::comparator::Comparator;
use crate::matching::weights::WeightConfig;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing or malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Compare API v{}", env!("CARGO_PKG_VERSION"));

    let embedder = build_embedder(&config)?;
    info!("Embedding backend initialized ({})", embedder.name());

    let weights = WeightConfig::default();
    info!("Section weights: {:?}", weights);

    let state = AppState {
        config: config.clone(),
        comparator: Arc::new(Comparator::new(embedder, weights)),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs the embedding backend selected by `EMBEDDING_BACKEND`.
fn build_embedder(config: &Config) -> Result<Arc<dyn Embedder>> {
    match config.embedding_backend {
        EmbeddingBackend::Http => {
            let url = config
                .embedding_api_url
                .clone()
                .context("EMBEDDING_API_URL is required for the http backend")?;
            info!("Embedding endpoint: {url} (model: {})", config.embedding_model);
            let embedder = HttpEmbedder::new(
                url,
                config.embedding_api_key.clone(),
                config.embedding_model.clone(),
                Duration::from_secs(config.embedding_timeout_secs),
            )?;
            Ok(Arc::new(embedder))
        }
        EmbeddingBackend::Hash => Ok(Arc::new(HashEmbedder::new(config.embedding_dimension))),
        #[cfg(feature = "local-embeddings")]
        EmbeddingBackend::Local => Ok(Arc::new(crate::embedding::LocalEmbedder::new()?)),
        #[cfg(not(feature = "local-embeddings"))]
        EmbeddingBackend::Local => Err(anyhow::anyhow!(
            "EMBEDDING_BACKEND=local requires building with the `local-embeddings` feature"
        )),
    }
}
