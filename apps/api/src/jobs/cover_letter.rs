//! Cover letter drafting: restricted HTML ready for the rich-text editor and PDF render.

use chrono::{Datelike, NaiveDate};

use crate::ai::prompts::{CV_LOCATION_NOTE, NO_INVENTED_FIGURES};
use crate::ai::{strip_html_fences, AiRequest, AiRouter};
use crate::errors::AppError;
use crate::jobs::candidate::{note_or_default, Candidate};
use crate::jobs::prompts::{fill_template, COVER_LETTER_PROMPT_TEMPLATE};
use crate::jobs::AiOptions;

const DEFAULT_LETTER_CITY: &str = "Lyon, France";

const FRENCH_MONTHS: [&str; 12] = [
    "janvier",
    "février",
    "mars",
    "avril",
    "mai",
    "juin",
    "juillet",
    "août",
    "septembre",
    "octobre",
    "novembre",
    "décembre",
];

/// `19 octobre 2026`
pub fn format_french_date(date: NaiveDate) -> String {
    format!(
        "{} {} {}",
        date.day(),
        FRENCH_MONTHS[date.month0() as usize],
        date.year()
    )
}

pub fn build_cover_letter_prompt(
    candidate: &Candidate,
    job_description: &str,
    candidate_note: Option<&str>,
    today: NaiveDate,
) -> String {
    let city = candidate.city_or(DEFAULT_LETTER_CITY);
    let bio_line = candidate
        .bio
        .as_deref()
        .map(|bio| format!("- Parcours et objectifs du candidat : {bio}\n"))
        .unwrap_or_default();

    let today = format_french_date(today);

    fill_template(
        COVER_LETTER_PROMPT_TEMPLATE,
        &[
            ("no_invented_figures", NO_INVENTED_FIGURES),
            ("cv_note", CV_LOCATION_NOTE),
            ("full_name", candidate.full_name.as_str()),
            ("email", candidate.email.as_str()),
            ("phone", candidate.phone.as_deref().unwrap_or("")),
            ("address", candidate.address.as_deref().unwrap_or(city)),
            ("city", city),
            ("today", today.as_str()),
            ("availability_start", candidate.availability_start.as_str()),
            ("availability_duration", candidate.availability_duration.as_str()),
            ("school", candidate.school.as_str()),
            ("bio_line", bio_line.as_str()),
            ("candidate_note", note_or_default(candidate_note)),
            ("job_description", job_description.trim()),
        ],
    )
}

/// Drafts the letter. An empty CV still produces a call, just without the cacheable block.
pub async fn generate_cover_letter(
    candidate: &Candidate,
    job_description: &str,
    candidate_note: Option<&str>,
    today: NaiveDate,
    options: &AiOptions,
    ai: &AiRouter,
) -> Result<String, AppError> {
    if job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }

    let prompt = build_cover_letter_prompt(candidate, job_description, candidate_note, today);
    let request =
        options.apply(AiRequest::new(prompt).with_cacheable_context(candidate.cv.clone()));
    let text = ai.generate_text(&request).await?;
    Ok(strip_html_fences(&text))
}
