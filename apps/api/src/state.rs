use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::llm_client::Completer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Model provider behind a trait so tests can swap in a stub.
    pub llm: Arc<dyn Completer>,
    pub config: Config,
}
