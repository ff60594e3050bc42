//! Job analysis: extracts structured insights from a raw job posting.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::ai::prompts::JSON_ONLY_INSTRUCTION;
use crate::ai::{strip_json_fences, AiRequest, AiRouter};
use crate::errors::AppError;
use crate::jobs::prompts::{fill_template, JOB_ANALYSIS_PROMPT_TEMPLATE};
use crate::jobs::AiOptions;
use crate::models::application::ApplicationPatch;

/// Full structured output of a job analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobAnalysis {
    pub company_name: String,
    pub role: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub missions: Vec<String>,
    /// Three Markdown points separated by blank lines.
    #[serde(default)]
    pub insights: String,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    #[serde(default)]
    pub daily_tasks_forecast: String,
    #[serde(default)]
    pub recruitment_process: String,
    /// Items prefixed with **Must** or **Nice**.
    #[serde(default)]
    pub profile_requirements: Vec<String>,
    #[serde(default)]
    pub company_summary: String,
}

impl JobAnalysis {
    /// Fields to copy onto a tracked application.
    pub fn to_patch(&self) -> ApplicationPatch {
        let text = |s: &str| Some(s.to_string()).filter(|s| !s.trim().is_empty());
        let list = |v: &[String]| Some(v.to_vec()).filter(|v| !v.is_empty());
        ApplicationPatch {
            company_name: text(&self.company_name),
            role: text(&self.role),
            location: text(&self.location),
            missions: list(&self.missions),
            insights: text(&self.insights),
            tech_stack: list(&self.tech_stack),
            daily_tasks_forecast: text(&self.daily_tasks_forecast),
            recruitment_process: text(&self.recruitment_process),
            profile_requirements: list(&self.profile_requirements),
            company_summary: text(&self.company_summary),
            ..Default::default()
        }
    }
}

pub fn build_job_analysis_prompt(description: &str) -> String {
    fill_template(
        JOB_ANALYSIS_PROMPT_TEMPLATE,
        &[
            ("json_only", JSON_ONLY_INSTRUCTION),
            ("description", description.trim()),
        ],
    )
}

/// Parses the model's text. Failure here is a downstream error, not an AI-layer one.
pub fn parse_job_analysis(text: &str) -> Result<JobAnalysis, AppError> {
    serde_json::from_str(strip_json_fences(text)).map_err(|e| {
        AppError::UnprocessableEntity(format!("AI returned a malformed job analysis: {e}"))
    })
}

/// Analyses a job posting in JSON mode and returns the parsed result.
pub async fn analyze_job(
    description: &str,
    options: &AiOptions,
    ai: &AiRouter,
) -> Result<JobAnalysis, AppError> {
    if description.trim().is_empty() {
        return Err(AppError::Validation(
            "description cannot be empty".to_string(),
        ));
    }

    let request = options.apply(AiRequest::new(build_job_analysis_prompt(description)).json());
    let text = ai.generate_text(&request).await?;
    let analysis = parse_job_analysis(&text)?;

    info!(
        "Job analysed: {} @ {} ({} missions, {} techs)",
        analysis.role,
        analysis.company_name,
        analysis.missions.len(),
        analysis.tech_stack.len()
    );
    Ok(analysis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::testing::{new_log, StubProvider};
    use crate::ai::{OutputMode, ProviderKind, ProviderPolicy};
    use std::sync::Arc;

    const POSTING: &str = "Stage Développeur Rust — Acme Robotics, Lyon. \
        Vous développerez nos services embarqués en Rust et Tokio.";

    const ANALYSIS_JSON: &str = r#"{
        "company_name": "Acme Robotics",
        "role": "Stage Développeur Rust",
        "location": "Lyon",
        "missions": ["Développer les services embarqués"],
        "insights": "🚩 **Vigilance** : offre courte\n\n💎 **Pépite** : Rust embarqué\n\n⚡ **Le Vrai Job** : livrer le firmware",
        "tech_stack": ["Rust", "Tokio"],
        "daily_tasks_forecast": "• Coder (≈60% du temps)",
        "recruitment_process": "• Entretien RH\n• Test technique",
        "profile_requirements": ["**Must** Rust", "**Nice** Tokio"],
        "company_summary": "Acme Robotics conçoit des robots industriels."
    }"#;

    #[test]
    fn test_prompt_embeds_posting_and_json_rule() {
        let prompt = build_job_analysis_prompt(POSTING);
        assert!(prompt.contains(POSTING));
        assert!(prompt.contains(JSON_ONLY_INSTRUCTION));
        assert!(prompt.contains("\"company_summary\""));
        assert!(!prompt.contains("{description}"));
        assert!(!prompt.contains("{json_only}"));
    }

    #[test]
    fn test_parse_accepts_fenced_json() {
        let fenced = format!("```json\n{ANALYSIS_JSON}\n```");
        let analysis = parse_job_analysis(&fenced).unwrap();
        assert_eq!(analysis.company_name, "Acme Robotics");
        assert_eq!(analysis.tech_stack, vec!["Rust", "Tokio"]);
        assert_eq!(analysis.insights.matches("\n\n").count(), 2);
    }

    #[test]
    fn test_parse_tolerates_missing_optional_fields() {
        let analysis =
            parse_job_analysis(r#"{"company_name": "Acme", "role": "Stage"}"#).unwrap();
        assert!(analysis.missions.is_empty());
        assert!(analysis.company_summary.is_empty());
    }

    #[test]
    fn test_malformed_json_is_a_downstream_error() {
        assert!(matches!(
            parse_job_analysis("{not json"),
            Err(AppError::UnprocessableEntity(_))
        ));
    }

    #[test]
    fn test_patch_skips_empty_fields() {
        let analysis = parse_job_analysis(r#"{"company_name": "Acme", "role": "Stage"}"#).unwrap();
        let patch = analysis.to_patch();
        assert_eq!(patch.company_name.as_deref(), Some("Acme"));
        assert!(patch.location.is_none());
        assert!(patch.missions.is_none());
        assert!(patch.cover_letter.is_none());
    }

    #[tokio::test]
    async fn test_analyze_job_sends_json_request_with_policy() {
        let log = new_log();
        let router = AiRouter::new(
            Arc::new(StubProvider::replying(ProviderKind::Gemini, ANALYSIS_JSON, &log)),
            Arc::new(StubProvider::replying(ProviderKind::OpenAi, "unused", &log)),
        );
        let options = AiOptions {
            provider: ProviderPolicy::ForceGemini,
            openai_model: None,
        };

        let analysis = analyze_job(POSTING, &options, &router).await.unwrap();

        assert_eq!(analysis.role, "Stage Développeur Rust");
        let calls = log.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1.output_mode, OutputMode::StructuredJson);
        assert_eq!(calls[0].1.policy, ProviderPolicy::ForceGemini);
        assert!(calls[0].1.cacheable_context.is_none());
    }

    #[tokio::test]
    async fn test_analyze_job_rejects_empty_description() {
        let log = new_log();
        let router = AiRouter::new(
            Arc::new(StubProvider::replying(ProviderKind::Gemini, ANALYSIS_JSON, &log)),
            Arc::new(StubProvider::replying(ProviderKind::OpenAi, "unused", &log)),
        );
        let result = analyze_job("  ", &AiOptions::default(), &router).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(log.lock().unwrap().is_empty());
    }
}
