//! Gap analysis: Markdown comparison of the stored CV against a job posting.

use crate::ai::prompts::CV_LOCATION_NOTE;
use crate::ai::{AiRequest, AiRouter};
use crate::errors::AppError;
use crate::jobs::prompts::{fill_template, GAP_ANALYSIS_PROMPT_TEMPLATE};
use crate::jobs::AiOptions;
use crate::models::profile::UserProfile;

pub fn build_gap_prompt(job_description: &str, bio: Option<&str>) -> String {
    let (bio_block, bio_clause) = match bio {
        Some(bio) => (
            format!("Contexte additionnel du candidat (objectifs, préférences de stage) :\n{bio}\n"),
            " en tenant compte de ses objectifs et de ses préférences",
        ),
        None => (String::new(), ""),
    };

    fill_template(
        GAP_ANALYSIS_PROMPT_TEMPLATE,
        &[
            ("job_description", job_description.trim()),
            ("cv_note", CV_LOCATION_NOTE),
            ("bio_block", bio_block.as_str()),
            ("bio_clause", bio_clause),
        ],
    )
}

/// Runs the gap analysis. The CV is mandatory and travels as cacheable context.
pub async fn analyze_gap(
    job_description: &str,
    profile: Option<&UserProfile>,
    options: &AiOptions,
    ai: &AiRouter,
) -> Result<String, AppError> {
    if job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }
    let cv = profile.and_then(UserProfile::cv_text).ok_or_else(|| {
        AppError::Validation(
            "CV introuvable dans le profil. Vérifiez que votre CV est enregistré.".to_string(),
        )
    })?;
    let bio = profile.and_then(UserProfile::bio);

    let request = options.apply(
        AiRequest::new(build_gap_prompt(job_description, bio))
            .with_cacheable_context(Some(cv.to_string())),
    );
    let text = ai.generate_text(&request).await?;
    Ok(text.trim().to_string())
}
