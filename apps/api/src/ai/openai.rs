//! Provider B: OpenAI chat-completions adapter with ephemeral prompt caching for the CV.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ai::cache::{compose_messages, ChatMessage};
use crate::ai::{AiError, AiRequest, AiResponse, LlmProvider, ProviderKind, ProviderProfile};

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// OpenAI adapter.
///
/// Model precedence: the request's `model_override`, then the configured
/// `OPENAI_MODEL_OVERRIDE`, then the profile's default model.
#[derive(Clone)]
pub struct OpenAiProvider {
    client: Client,
    profile: ProviderProfile,
    model_override: Option<String>,
}

impl OpenAiProvider {
    pub fn new(client: Client, profile: ProviderProfile) -> Self {
        Self {
            client,
            profile,
            model_override: None,
        }
    }

    pub fn with_model_override(mut self, model: Option<String>) -> Self {
        self.model_override = model;
        self
    }

    fn model_for<'a>(&'a self, request: &'a AiRequest) -> &'a str {
        request
            .model_override
            .as_deref()
            .or(self.model_override.as_deref())
            .unwrap_or(&self.profile.default_model)
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
    }

    async fn call(&self, request: &AiRequest) -> Result<AiResponse, AiError> {
        let api_key = self.profile.require_credential()?;

        let model = self.model_for(request);
        let body = ChatCompletionRequest {
            model,
            messages: compose_messages(request.context(), &request.prompt_text),
            response_format: request.is_json().then_some(ResponseFormat {
                kind: "json_object",
            }),
        };

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.profile.endpoint))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AiError::transport(ProviderKind::OpenAi, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::ProviderCall {
                vendor: ProviderKind::OpenAi,
                status: Some(status.as_u16()),
                message: body,
            });
        }

        let payload: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AiError::transport(ProviderKind::OpenAi, e))?;

        let text = payload
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|t| !t.trim().is_empty())
            .ok_or(AiError::EmptyResponse {
                vendor: ProviderKind::OpenAi,
            })?;
        let model = payload.model.unwrap_or_else(|| model.to_string());

        debug!(
            "OpenAI call succeeded: model={model}, cacheable_cv={}",
            request.context().is_some()
        );

        Ok(AiResponse {
            text,
            provider: ProviderKind::OpenAi,
            model,
        })
    }
}
