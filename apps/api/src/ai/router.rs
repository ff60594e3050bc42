//! Fallback router: picks a provider per request policy.
//!
//! `ForceGemini` / `ForceOpenAi` call exactly that provider and return its
//! error unchanged. `Auto` tries Gemini, logs its failure, then tries OpenAI
//! with the same request; when both fail the OpenAI error is returned.
//! Calls are strictly sequential and no state is kept between requests.

use std::sync::Arc;

use reqwest::Client;
use serde::Serialize;
use tracing::{info, warn};

use crate::ai::gemini::GeminiProvider;
use crate::ai::openai::OpenAiProvider;
use crate::ai::{
    AiError, AiRequest, AiResponse, LlmProvider, ProviderKind, ProviderPolicy, ProviderProfile,
};
use crate::config::Config;

/// One provider attempt within a dispatch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attempt {
    pub provider: ProviderKind,
    /// `None` when the attempt succeeded.
    pub error: Option<String>,
}

/// Full trace of a routed call: every attempt in order, then the terminal outcome.
#[derive(Debug)]
pub struct Dispatch {
    pub attempts: Vec<Attempt>,
    pub outcome: Result<AiResponse, AiError>,
}

impl Dispatch {
    pub fn attempted(&self) -> Vec<ProviderKind> {
        self.attempts.iter().map(|a| a.provider).collect()
    }

    pub fn fell_back(&self) -> bool {
        self.attempts.len() > 1
    }
}

/// Entry point for every AI call. Read-only after construction; share it behind an `Arc`.
#[derive(Clone)]
pub struct AiRouter {
    primary: Arc<dyn LlmProvider>,
    secondary: Arc<dyn LlmProvider>,
}

impl AiRouter {
    /// `primary` is tried first in `Auto` mode; it is expected to be Gemini.
    pub fn new(primary: Arc<dyn LlmProvider>, secondary: Arc<dyn LlmProvider>) -> Self {
        Self { primary, secondary }
    }

    pub fn from_config(config: &Config, client: Client) -> Self {
        let gemini = GeminiProvider::new(client.clone(), ProviderProfile::gemini(config));
        let openai = OpenAiProvider::new(client, ProviderProfile::openai(config))
            .with_model_override(config.openai_model_override.clone());
        Self::new(Arc::new(gemini), Arc::new(openai))
    }

    /// Routes one request and returns the attempt trace alongside the outcome.
    pub async fn dispatch(&self, request: &AiRequest) -> Dispatch {
        if let Err(e) = request.validate() {
            return Dispatch {
                attempts: Vec::new(),
                outcome: Err(e),
            };
        }

        let mut attempts = Vec::with_capacity(2);

        let outcome = match request.policy {
            ProviderPolicy::ForceGemini => {
                self.attempt(self.provider(ProviderKind::Gemini), request, &mut attempts)
                    .await
            }
            ProviderPolicy::ForceOpenAi => {
                self.attempt(self.provider(ProviderKind::OpenAi), request, &mut attempts)
                    .await
            }
            ProviderPolicy::Auto => {
                match self.attempt(&self.primary, request, &mut attempts).await {
                    Ok(response) => Ok(response),
                    Err(primary_err) => {
                        warn!(
                            "[AI] {} failed, attempting {} fallback: {primary_err}",
                            self.primary.kind(),
                            self.secondary.kind()
                        );
                        self.attempt(&self.secondary, request, &mut attempts).await
                    }
                }
            }
        };

        Dispatch { attempts, outcome }
    }

    pub async fn generate(&self, request: &AiRequest) -> Result<AiResponse, AiError> {
        self.dispatch(request).await.outcome
    }

    /// Same as `generate`, keeping only the text.
    pub async fn generate_text(&self, request: &AiRequest) -> Result<String, AiError> {
        self.generate(request).await.map(|r| r.text)
    }

    fn provider(&self, kind: ProviderKind) -> &Arc<dyn LlmProvider> {
        if self.secondary.kind() == kind {
            &self.secondary
        } else {
            &self.primary
        }
    }

    async fn attempt(
        &self,
        provider: &Arc<dyn LlmProvider>,
        request: &AiRequest,
        attempts: &mut Vec<Attempt>,
    ) -> Result<AiResponse, AiError> {
        let result = provider.call(request).await;
        attempts.push(Attempt {
            provider: provider.kind(),
            error: result.as_ref().err().map(|e| e.to_string()),
        });
        if let Ok(response) = &result {
            info!(
                "[AI] Provider={} model={} success (cacheable CV {})",
                response.provider,
                response.model,
                if request.context().is_some() { "used" } else { "skipped" }
            );
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::testing::{called, new_log, CallLog, StubProvider};
    use crate::ai::OutputMode;

    fn router(primary: StubProvider, secondary: StubProvider) -> AiRouter {
        AiRouter::new(Arc::new(primary), Arc::new(secondary))
    }

    fn gemini_ok(log: &CallLog, text: &str) -> StubProvider {
        StubProvider::replying(ProviderKind::Gemini, text, log)
    }

    fn openai_ok(log: &CallLog, text: &str) -> StubProvider {
        StubProvider::replying(ProviderKind::OpenAi, text, log)
    }

    #[tokio::test]
    async fn test_force_gemini_calls_only_gemini() {
        let log = new_log();
        let router = router(gemini_ok(&log, "Hello"), openai_ok(&log, "unused"));

        let request = AiRequest::new("Hi").with_policy(ProviderPolicy::ForceGemini);
        let dispatch = router.dispatch(&request).await;

        assert_eq!(dispatch.outcome.unwrap().text, "Hello");
        assert_eq!(called(&log), vec![ProviderKind::Gemini]);
        assert_eq!(dispatch.attempts.len(), 1);
    }

    #[tokio::test]
    async fn test_force_gemini_failure_is_not_retried_on_openai() {
        let log = new_log();
        let router = router(
            StubProvider::failing(ProviderKind::Gemini, 500, &log),
            openai_ok(&log, "unused"),
        );

        let request = AiRequest::new("Hi").with_policy(ProviderPolicy::ForceGemini);
        let err = router.generate(&request).await.unwrap_err();

        assert_eq!(err.vendor(), Some(ProviderKind::Gemini));
        assert_eq!(err.status(), Some(500));
        assert_eq!(called(&log), vec![ProviderKind::Gemini]);
    }

    #[tokio::test]
    async fn test_force_openai_calls_only_openai() {
        let log = new_log();
        let router = router(
            StubProvider::failing(ProviderKind::Gemini, 500, &log),
            StubProvider::failing(ProviderKind::OpenAi, 401, &log),
        );

        let request = AiRequest::new("Hi").with_policy(ProviderPolicy::ForceOpenAi);
        let err = router.generate(&request).await.unwrap_err();

        assert_eq!(err.vendor(), Some(ProviderKind::OpenAi));
        assert_eq!(called(&log), vec![ProviderKind::OpenAi]);
    }

    #[tokio::test]
    async fn test_auto_uses_gemini_when_it_succeeds() {
        let log = new_log();
        let router = router(gemini_ok(&log, "from gemini"), openai_ok(&log, "from openai"));

        let dispatch = router.dispatch(&AiRequest::new("Hi")).await;

        assert!(!dispatch.fell_back());
        let response = dispatch.outcome.unwrap();
        assert_eq!(response.text, "from gemini");
        assert_eq!(response.provider, ProviderKind::Gemini);
        assert_eq!(called(&log), vec![ProviderKind::Gemini]);
    }

    #[tokio::test]
    async fn test_auto_falls_back_to_openai_in_order() {
        let log = new_log();
        let router = router(
            StubProvider::failing(ProviderKind::Gemini, 503, &log),
            openai_ok(&log, "from openai"),
        );

        let dispatch = router.dispatch(&AiRequest::new("Hi")).await;

        assert_eq!(
            dispatch.attempted(),
            vec![ProviderKind::Gemini, ProviderKind::OpenAi]
        );
        assert!(dispatch.attempts[0].error.is_some());
        assert!(dispatch.attempts[1].error.is_none());
        assert_eq!(dispatch.outcome.unwrap().text, "from openai");
        assert_eq!(
            called(&log),
            vec![ProviderKind::Gemini, ProviderKind::OpenAi]
        );
    }

    #[tokio::test]
    async fn test_auto_falls_back_on_empty_response() {
        let log = new_log();
        let router = router(
            StubProvider::empty(ProviderKind::Gemini, &log),
            openai_ok(&log, "from openai"),
        );

        let text = router.generate_text(&AiRequest::new("Hi")).await.unwrap();
        assert_eq!(text, "from openai");
    }

    #[tokio::test]
    async fn test_auto_falls_back_when_gemini_is_unconfigured() {
        let log = new_log();
        let router = router(
            StubProvider::unconfigured(ProviderKind::Gemini, &log),
            openai_ok(&log, "from openai"),
        );

        let dispatch = router.dispatch(&AiRequest::new("Hi")).await;

        assert_eq!(
            dispatch.attempted(),
            vec![ProviderKind::Gemini, ProviderKind::OpenAi]
        );
        // No outbound call was recorded for the unconfigured provider.
        assert_eq!(called(&log), vec![ProviderKind::OpenAi]);
        assert_eq!(dispatch.outcome.unwrap().text, "from openai");
    }

    #[tokio::test]
    async fn test_auto_both_failing_returns_openai_error() {
        let log = new_log();
        let router = router(
            StubProvider::failing(ProviderKind::Gemini, 500, &log),
            StubProvider::failing(ProviderKind::OpenAi, 429, &log),
        );

        let dispatch = router.dispatch(&AiRequest::new("Hi")).await;

        // The Gemini failure stays visible in the trace.
        assert!(dispatch.attempts[0]
            .error
            .as_deref()
            .unwrap()
            .contains("status 500"));
        let err = dispatch.outcome.unwrap_err();
        assert_eq!(err.vendor(), Some(ProviderKind::OpenAi));
        assert_eq!(err.status(), Some(429));
    }

    #[tokio::test]
    async fn test_fallback_reuses_the_same_request() {
        let log = new_log();
        let router = router(
            StubProvider::failing(ProviderKind::Gemini, 500, &log),
            openai_ok(&log, "ok"),
        );

        let request = AiRequest::new("Analyse")
            .json()
            .with_cacheable_context(Some("CV".to_string()))
            .with_model_override(Some("gpt-4o".to_string()));
        router.generate(&request).await.unwrap();

        let calls = log.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].1, request);
        assert_eq!(calls[1].1, request);
    }

    #[tokio::test]
    async fn test_structured_mode_returns_raw_text_unchanged() {
        let log = new_log();
        let router = router(gemini_ok(&log, "{not json"), openai_ok(&log, "unused"));

        let request = AiRequest::new("Hi")
            .with_output_mode(OutputMode::StructuredJson)
            .with_policy(ProviderPolicy::ForceGemini);
        let text = router.generate_text(&request).await.unwrap();

        assert_eq!(text, "{not json");
    }

    #[tokio::test]
    async fn test_empty_prompt_makes_no_calls() {
        let log = new_log();
        let router = router(gemini_ok(&log, "x"), openai_ok(&log, "y"));

        let dispatch = router.dispatch(&AiRequest::new("")).await;

        assert!(dispatch.attempts.is_empty());
        assert!(matches!(dispatch.outcome, Err(AiError::InvalidRequest(_))));
        assert!(called(&log).is_empty());
    }
}
