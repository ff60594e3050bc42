//! Axum route handler for raw AI generation.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::ai::router::Attempt;
use crate::ai::{AiRequest, OutputMode, ProviderKind, ProviderPolicy};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateBody {
    pub prompt: String,
    #[serde(default)]
    pub mode: OutputMode,
    #[serde(default)]
    pub provider: ProviderPolicy,
    pub model: Option<String>,
    pub cacheable_context: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub text: String,
    pub provider: ProviderKind,
    pub model: String,
    pub attempts: Vec<Attempt>,
}

/// POST /api/v1/ai/generate
///
/// Routes a free-form prompt through the provider policy and returns the raw
/// text together with the attempt trace.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(body): Json<GenerateBody>,
) -> Result<Json<GenerateResponse>, AppError> {
    let request = AiRequest::new(body.prompt)
        .with_output_mode(body.mode)
        .with_policy(body.provider)
        .with_model_override(body.model)
        .with_cacheable_context(body.cacheable_context);

    let dispatch = state.ai.dispatch(&request).await;
    if dispatch.fell_back() {
        info!("[AI] generate served after fallback: attempted {:?}", dispatch.attempted());
    }
    let response = dispatch.outcome?;

    Ok(Json(GenerateResponse {
        text: response.text,
        provider: response.provider,
        model: response.model,
        attempts: dispatch.attempts,
    }))
}
