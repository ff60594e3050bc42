//! Provider A: Google Gemini `generateContent` REST adapter.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ai::cache::compose_inline;
use crate::ai::{AiError, AiRequest, AiResponse, LlmProvider, ProviderKind, ProviderProfile};

const API_VERSION: &str = "v1beta";
const JSON_MIME_TYPE: &str = "application/json";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenates the text parts of the first candidate.
    fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// Gemini adapter. The CV is inlined in front of the prompt (see `ai::cache`).
#[derive(Clone)]
pub struct GeminiProvider {
    client: Client,
    profile: ProviderProfile,
}

impl GeminiProvider {
    pub fn new(client: Client, profile: ProviderProfile) -> Self {
        Self { client, profile }
    }

    fn url(&self) -> String {
        format!(
            "{}/{API_VERSION}/models/{}:generateContent",
            self.profile.endpoint, self.profile.default_model
        )
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    async fn call(&self, request: &AiRequest) -> Result<AiResponse, AiError> {
        let api_key = self.profile.require_credential()?;

        let prompt = compose_inline(request.context(), &request.prompt_text);
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: &prompt }],
            }],
            generation_config: request.is_json().then_some(GenerationConfig {
                response_mime_type: JSON_MIME_TYPE,
            }),
        };

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AiError::transport(ProviderKind::Gemini, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(AiError::ProviderCall {
                vendor: ProviderKind::Gemini,
                status: Some(status.as_u16()),
                message,
            });
        }

        let payload: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AiError::transport(ProviderKind::Gemini, e))?;

        let text = payload.text().ok_or(AiError::EmptyResponse {
            vendor: ProviderKind::Gemini,
        })?;
        let model = payload
            .model_version
            .unwrap_or_else(|| self.profile.default_model.clone());

        debug!("Gemini call succeeded: model={model}, chars={}", text.len());

        Ok(AiResponse {
            text,
            provider: ProviderKind::Gemini,
            model,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    const PATH: &str = "/v1beta/models/gemini-test:generateContent";

    fn provider(server: &MockServer, key: Option<&str>) -> GeminiProvider {
        GeminiProvider::new(
            Client::new(),
            ProviderProfile {
                kind: ProviderKind::Gemini,
                default_model: "gemini-test".to_string(),
                endpoint: server.base_url(),
                credential: key.map(String::from),
            },
        )
    }

    fn reply(text: &str) -> serde_json::Value {
        json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}],
            "modelVersion": "gemini-test-001"
        })
    }

    #[tokio::test]
    async fn test_plain_prompt_is_sent_without_generation_config() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path(PATH)
                    .header("x-goog-api-key", "g-key")
                    .json_body(json!({
                        "contents": [{"role": "user", "parts": [{"text": "Hi"}]}]
                    }));
                then.status(200).json_body(reply("Hello"));
            })
            .await;

        let response = provider(&server, Some("g-key"))
            .call(&AiRequest::new("Hi"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.text, "Hello");
        assert_eq!(response.provider, ProviderKind::Gemini);
        assert_eq!(response.model, "gemini-test-001");
    }

    #[tokio::test]
    async fn test_json_mode_sets_response_mime_type_and_inlines_context() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path(PATH).json_body(json!({
                    "contents": [{
                        "role": "user",
                        "parts": [{"text": "CV (cacheable):\nMon CV\n\nAnalyse"}]
                    }],
                    "generationConfig": {"responseMimeType": "application/json"}
                }));
                then.status(200).json_body(reply("{not json"));
            })
            .await;

        let request = AiRequest::new("Analyse")
            .json()
            .with_cacheable_context(Some("Mon CV".to_string()));
        let response = provider(&server, Some("g-key")).call(&request).await.unwrap();

        mock.assert_async().await;
        // Raw text is handed back untouched, even when it is not valid JSON.
        assert_eq!(response.text, "{not json");
    }

    #[tokio::test]
    async fn test_multiple_parts_are_concatenated() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(PATH);
                then.status(200).json_body(json!({
                    "candidates": [{"content": {"parts": [{"text": "Hel"}, {"text": "lo"}]}}]
                }));
            })
            .await;

        let response = provider(&server, Some("k"))
            .call(&AiRequest::new("Hi"))
            .await
            .unwrap();
        assert_eq!(response.text, "Hello");
        // No modelVersion in the payload: falls back to the configured model.
        assert_eq!(response.model, "gemini-test");
    }

    #[tokio::test]
    async fn test_error_status_carries_vendor_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(PATH);
                then.status(429)
                    .json_body(json!({"error": {"code": 429, "message": "RESOURCE_EXHAUSTED"}}));
            })
            .await;

        let err = provider(&server, Some("k"))
            .call(&AiRequest::new("Hi"))
            .await
            .unwrap_err();
        match err {
            AiError::ProviderCall {
                vendor,
                status,
                message,
            } => {
                assert_eq!(vendor, ProviderKind::Gemini);
                assert_eq!(status, Some(429));
                assert_eq!(message, "RESOURCE_EXHAUSTED");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_blocked_prompt_without_candidates_is_empty_response() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(PATH);
                then.status(200)
                    .json_body(json!({"promptFeedback": {"blockReason": "SAFETY"}}));
            })
            .await;

        let err = provider(&server, Some("k"))
            .call(&AiRequest::new("Hi"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AiError::EmptyResponse {
                vendor: ProviderKind::Gemini
            }
        ));
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_any_request() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path(PATH);
                then.status(200).json_body(reply("Hello"));
            })
            .await;

        let err = provider(&server, None)
            .call(&AiRequest::new("Hi"))
            .await
            .unwrap_err();

        assert!(matches!(err, AiError::Configuration { .. }));
        assert_eq!(mock.hits_async().await, 0);
    }
}
