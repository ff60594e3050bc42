mod ai;
mod applications;
mod config;
mod db;
mod errors;
mod jobs;
mod models;
mod profile;
mod render;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::ai::AiRouter;
use crate::config::Config;
use crate::db::create_pool;
use crate::render::GotenbergRenderer;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ApplyTrack API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // One HTTP client for vendors, job pages and the PDF service; the timeout bounds every call.
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.ai_timeout_secs))
        .user_agent(concat!("applytrack/", env!("CARGO_PKG_VERSION")))
        .build()?;

    // Initialize AI router (Gemini first, OpenAI as fallback)
    let ai = AiRouter::from_config(&config, http.clone());
    info!(
        "AI router initialized (gemini: {}, openai: {})",
        config.gemini_model, config.openai_model
    );
    if config.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY not set; auto mode will go straight to OpenAI");
    }
    if config.openai_api_key.is_none() {
        warn!("OPENAI_API_KEY not set; no fallback provider available");
    }

    let renderer = Arc::new(GotenbergRenderer::new(
        http.clone(),
        config.pdf_render_url.clone(),
    ));
    info!("PDF renderer: {}", config.pdf_render_url);

    // Build app state
    let state = AppState {
        db,
        ai: Arc::new(ai),
        http,
        renderer,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
