//! Application email: short plain-text message sent with the CV and letter.

use crate::ai::prompts::NO_INVENTED_FIGURES;
use crate::ai::{AiRequest, AiRouter};
use crate::errors::AppError;
use crate::jobs::candidate::{note_or_default, Candidate};
use crate::jobs::prompts::{fill_template, EMAIL_PROMPT_TEMPLATE};
use crate::jobs::AiOptions;

const DEFAULT_EMAIL_CITY: &str = "Lyon";

pub fn build_email_prompt(
    candidate: &Candidate,
    job_description: &str,
    candidate_note: Option<&str>,
) -> String {
    let bio_line = candidate
        .bio
        .as_deref()
        .map(|bio| format!("- Parcours et objectifs : {bio}\n"))
        .unwrap_or_default();

    fill_template(
        EMAIL_PROMPT_TEMPLATE,
        &[
            ("no_invented_figures", NO_INVENTED_FIGURES),
            ("full_name", candidate.full_name.as_str()),
            ("city", candidate.city_or(DEFAULT_EMAIL_CITY)),
            ("bio_line", bio_line.as_str()),
            ("candidate_note", note_or_default(candidate_note)),
            ("job_description", job_description.trim()),
        ],
    )
}

pub async fn generate_email(
    candidate: &Candidate,
    job_description: &str,
    candidate_note: Option<&str>,
    options: &AiOptions,
    ai: &AiRouter,
) -> Result<String, AppError> {
    if job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }

    let prompt = build_email_prompt(candidate, job_description, candidate_note);
    let request =
        options.apply(AiRequest::new(prompt).with_cacheable_context(candidate.cv.clone()));
    let text = ai.generate_text(&request).await?;
    Ok(text.trim().to_string())
}
