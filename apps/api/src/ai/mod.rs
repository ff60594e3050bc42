/// AI layer: the single point of entry for every LLM call in ApplyTrack.
///
/// ARCHITECTURAL RULE: handlers never talk to a vendor API directly.
/// They build an `AiRequest` and hand it to `AiRouter`, which picks the
/// provider according to the request policy and falls back when allowed.
///
/// Provider A is Google Gemini, provider B is OpenAI.
use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;

pub mod cache;
pub mod gemini;
pub mod handlers;
pub mod openai;
pub mod prompts;
pub mod router;

#[cfg(test)]
pub mod testing;

pub use router::AiRouter;

// ────────────────────────────────────────────────────────────────────────────
// Request / response values
// ────────────────────────────────────────────────────────────────────────────

/// Which of the two vendors served (or failed) a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Gemini,
    OpenAi,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini",
            ProviderKind::OpenAi => "openai",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ProviderKind::Gemini => "Gemini",
            ProviderKind::OpenAi => "OpenAI",
        })
    }
}

/// Output contract requested from the model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputMode {
    #[default]
    #[serde(rename = "text")]
    PlainText,
    /// The vendor is told to emit syntactically valid JSON. Nothing here parses it.
    #[serde(rename = "json")]
    StructuredJson,
}

/// Caller-chosen provider selection for one call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProviderPolicy {
    /// Gemini first, OpenAI on any Gemini failure.
    #[default]
    #[serde(rename = "auto")]
    Auto,
    #[serde(rename = "gemini", alias = "providerA")]
    ForceGemini,
    #[serde(rename = "openai", alias = "providerB")]
    ForceOpenAi,
}

/// A unified, vendor-neutral generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct AiRequest {
    pub prompt_text: String,
    pub output_mode: OutputMode,
    pub policy: ProviderPolicy,
    /// Model id for the OpenAI call. Gemini always runs its configured model.
    pub model_override: Option<String>,
    /// Large reused context (the CV), kept apart from the per-call instructions.
    pub cacheable_context: Option<String>,
}

impl AiRequest {
    pub fn new(prompt_text: impl Into<String>) -> Self {
        Self {
            prompt_text: prompt_text.into(),
            output_mode: OutputMode::PlainText,
            policy: ProviderPolicy::Auto,
            model_override: None,
            cacheable_context: None,
        }
    }

    pub fn json(mut self) -> Self {
        self.output_mode = OutputMode::StructuredJson;
        self
    }

    pub fn with_output_mode(mut self, mode: OutputMode) -> Self {
        self.output_mode = mode;
        self
    }

    pub fn with_policy(mut self, policy: ProviderPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_model_override(mut self, model: Option<String>) -> Self {
        self.model_override = model.filter(|m| !m.trim().is_empty());
        self
    }

    pub fn with_cacheable_context(mut self, context: Option<String>) -> Self {
        self.cacheable_context = context;
        self
    }

    /// The cacheable context, or `None` when it is absent or blank.
    pub fn context(&self) -> Option<&str> {
        self.cacheable_context
            .as_deref()
            .filter(|c| !c.trim().is_empty())
    }

    pub fn is_json(&self) -> bool {
        self.output_mode == OutputMode::StructuredJson
    }

    pub fn validate(&self) -> Result<(), AiError> {
        if self.prompt_text.trim().is_empty() {
            return Err(AiError::InvalidRequest(
                "prompt text cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Normalised result of a successful provider call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AiResponse {
    pub text: String,
    pub provider: ProviderKind,
    pub model: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum AiError {
    /// Credential missing for the provider that was about to be called. No request was sent.
    #[error("{vendor} is not configured: {message}")]
    Configuration { vendor: ProviderKind, message: String },

    /// Transport failure or non-success HTTP status.
    #[error("{vendor} call failed{}: {message}", status_suffix(.status))]
    ProviderCall {
        vendor: ProviderKind,
        status: Option<u16>,
        message: String,
    },

    /// Success status, but the content field was missing or empty.
    #[error("{vendor} returned an empty response")]
    EmptyResponse { vendor: ProviderKind },

    #[error("Invalid AI request: {0}")]
    InvalidRequest(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (status {s})")).unwrap_or_default()
}

impl AiError {
    pub fn vendor(&self) -> Option<ProviderKind> {
        match self {
            AiError::Configuration { vendor, .. }
            | AiError::ProviderCall { vendor, .. }
            | AiError::EmptyResponse { vendor } => Some(*vendor),
            AiError::InvalidRequest(_) => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            AiError::ProviderCall { status, .. } => *status,
            _ => None,
        }
    }

    pub(crate) fn transport(vendor: ProviderKind, err: reqwest::Error) -> Self {
        AiError::ProviderCall {
            vendor,
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Provider seam
// ────────────────────────────────────────────────────────────────────────────

/// One vendor adapter. Makes exactly one outbound call per `call`, never retries.
///
/// Carried in `AiRouter` as `Arc<dyn LlmProvider>` so tests can swap in stubs.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    async fn call(&self, request: &AiRequest) -> Result<AiResponse, AiError>;
}

/// Per-vendor identity resolved once at startup.
#[derive(Clone)]
pub struct ProviderProfile {
    pub kind: ProviderKind,
    pub default_model: String,
    /// Base URL without a trailing slash.
    pub endpoint: String,
    pub credential: Option<String>,
}

impl ProviderProfile {
    pub fn gemini(config: &Config) -> Self {
        Self {
            kind: ProviderKind::Gemini,
            default_model: config.gemini_model.clone(),
            endpoint: config.gemini_api_base.trim_end_matches('/').to_string(),
            credential: config.gemini_api_key.clone(),
        }
    }

    pub fn openai(config: &Config) -> Self {
        Self {
            kind: ProviderKind::OpenAi,
            default_model: config.openai_model.clone(),
            endpoint: config.openai_api_base.trim_end_matches('/').to_string(),
            credential: config.openai_api_key.clone(),
        }
    }

    /// Returns the credential or a configuration error. Called before any network I/O.
    pub fn require_credential(&self) -> Result<&str, AiError> {
        self.credential
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AiError::Configuration {
                vendor: self.kind,
                message: format!("no API key set for {}", self.kind),
            })
    }
}

impl fmt::Debug for ProviderProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderProfile")
            .field("kind", &self.kind)
            .field("default_model", &self.default_model)
            .field("endpoint", &self.endpoint)
            .field("credential", &self.credential.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Output clean-up helpers used by callers
// ────────────────────────────────────────────────────────────────────────────

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    for tag in ["```json", "```"] {
        if let Some(stripped) = text.strip_prefix(tag) {
            let stripped = stripped.trim_start();
            return stripped
                .strip_suffix("```")
                .map(|s| s.trim())
                .unwrap_or(stripped);
        }
    }
    text
}

/// Removes every ```html / ```htm / ``` marker, wherever it appears.
pub fn strip_html_fences(text: &str) -> String {
    text.replace("```html", "")
        .replace("```htm", "")
        .replace("```", "")
        .trim()
        .to_string()
}
