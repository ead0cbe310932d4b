use std::str::FromStr;

use anyhow::{anyhow, Context, Result};

const DEFAULT_EMBEDDING_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Which `Embedder` implementation backs the comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingBackend {
    /// Remote OpenAI-compatible `/embeddings` endpoint.
    Http,
    /// Deterministic feature hashing, no model.
    Hash,
    /// In-process all-MiniLM-L6-v2 (requires the `local-embeddings` feature).
    Local,
}

impl FromStr for EmbeddingBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "hash" => Ok(Self::Hash),
            "local" => Ok(Self::Local),
            other => Err(anyhow!(
                "unknown embedding backend '{other}' (expected http, hash or local)"
            )),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub embedding_backend: EmbeddingBackend,
    /// Set whenever the backend is `Http`.
    pub embedding_api_url: Option<String>,
    pub embedding_api_key: Option<String>,
    pub embedding_model: String,
    pub embedding_dimension: usize,
    pub embedding_timeout_secs: u64,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let embedding_backend: EmbeddingBackend =
            parse_or(&lookup, "EMBEDDING_BACKEND", EmbeddingBackend::Http)?;

        let embedding_api_url = lookup("EMBEDDING_API_URL").filter(|url| !url.trim().is_empty());
        if embedding_backend == EmbeddingBackend::Http && embedding_api_url.is_none() {
            return Err(anyhow!(
                "Required environment variable 'EMBEDDING_API_URL' is not set (EMBEDDING_BACKEND=http)"
            ));
        }

        Ok(Config {
            port: parse_or(&lookup, "PORT", 8080)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            embedding_backend,
            embedding_api_url,
            embedding_api_key: lookup("EMBEDDING_API_KEY").filter(|key| !key.is_empty()),
            embedding_model: lookup("EMBEDDING_MODEL")
                .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
            embedding_dimension: parse_or(&lookup, "EMBEDDING_DIMENSION", 384)?,
            embedding_timeout_secs: parse_or(&lookup, "EMBEDDING_TIMEOUT_SECS", 30)?,
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|e| anyhow!("{e}"))
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
pub(crate) fn test_config(vars: &[(&str, &str)]) -> Config {
    let vars: Vec<(String, String)> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_lookup(|key| {
        vars.iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    })
    .expect("test config should be valid")
}
