use std::sync::Arc;

use crate::config::Config;
use crate::matching::comparator::Comparator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Holds the embedding backend and the section weight table.
    pub comparator: Arc<Comparator>,
}
