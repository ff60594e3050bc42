use std::sync::Arc;

use reqwest::Client;
use sqlx::PgPool;

use crate::ai::AiRouter;
use crate::render::PdfRenderer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub ai: Arc<AiRouter>,
    /// Plain HTTP client for job-page scraping.
    pub http: Client,
    /// HTML → PDF backend. Default: the Gotenberg-compatible renderer at `PDF_RENDER_URL`.
    pub renderer: Arc<dyn PdfRenderer>,
}

#[cfg(test)]
impl AppState {
    /// State backed by a lazy pool that never connects unless a handler touches the DB.
    pub fn for_tests(ai: AiRouter, renderer: Arc<dyn PdfRenderer>) -> Self {
        let config = crate::config::Config::for_tests();
        let db = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .expect("lazy pool");
        Self {
            db,
            ai: Arc::new(ai),
            http: Client::new(),
            renderer,
        }
    }
}
