// Job actions: posting analysis, gap analysis, cover letter, email, metadata scraping.
// All LLM calls go through ai::AiRouter; no direct vendor calls here.

pub mod analysis;
pub mod candidate;
pub mod cover_letter;
pub mod email;
pub mod gap;
pub mod handlers;
pub mod metadata;
pub mod prompts;

use serde::Deserialize;

use crate::ai::{AiRequest, ProviderPolicy};

/// Provider choice sent by the UI with every job action.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AiOptions {
    #[serde(default)]
    pub provider: ProviderPolicy,
    /// OpenAI model for this call only.
    pub openai_model: Option<String>,
}

impl AiOptions {
    pub fn apply(&self, request: AiRequest) -> AiRequest {
        request
            .with_policy(self.provider)
            .with_model_override(self.openai_model.clone())
    }
}
