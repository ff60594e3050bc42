use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::applications::handlers::not_found;
use crate::applications::repo;
use crate::errors::AppError;
use crate::jobs::analysis::{analyze_job, JobAnalysis};
use crate::jobs::candidate::Candidate;
use crate::jobs::cover_letter::generate_cover_letter;
use crate::jobs::email::generate_email;
use crate::jobs::gap::analyze_gap;
use crate::jobs::metadata::{fetch_job_metadata, JobMetadata};
use crate::jobs::AiOptions;
use crate::models::application::{Application, ApplicationPatch};
use crate::profile::repo::get_profile;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MetadataQuery {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeBody {
    pub description: String,
    #[serde(flatten)]
    pub ai: AiOptions,
    /// Application to copy the analysis onto.
    pub save_to: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    #[serde(flatten)]
    pub analysis: JobAnalysis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application: Option<Application>,
}

#[derive(Debug, Deserialize)]
pub struct DraftBody {
    pub job_description: String,
    /// Free-text instructions from the candidate (letter and email only).
    pub note: Option<String>,
    #[serde(flatten)]
    pub ai: AiOptions,
    pub save_to: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct DraftResponse {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application: Option<Application>,
}

/// GET /api/v1/jobs/metadata?url=
pub async fn handle_metadata(
    State(state): State<AppState>,
    Query(query): Query<MetadataQuery>,
) -> Result<Json<JobMetadata>, AppError> {
    use crate::jobs::metadata::ScrapeError;

    match fetch_job_metadata(&state.http, &query.url).await {
        Ok(metadata) => Ok(Json(metadata)),
        Err(ScrapeError::InvalidUrl(msg)) => Err(AppError::Validation(msg)),
        Err(e) => Err(AppError::Scrape(e.to_string())),
    }
}

/// POST /api/v1/jobs/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(body): Json<AnalyzeBody>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let analysis = analyze_job(&body.description, &body.ai, &state.ai).await?;

    let application = match body.save_to {
        Some(id) => {
            let patch = ApplicationPatch {
                job_description: Some(body.description.trim().to_string()),
                ..analysis.to_patch()
            };
            Some(save(&state, id, &patch).await?)
        }
        None => None,
    };

    Ok(Json(AnalyzeResponse {
        analysis,
        application,
    }))
}

/// POST /api/v1/jobs/gap-analysis
pub async fn handle_gap_analysis(
    State(state): State<AppState>,
    Json(body): Json<DraftBody>,
) -> Result<Json<DraftResponse>, AppError> {
    let profile = get_profile(&state.db).await?;
    let content = analyze_gap(&body.job_description, profile.as_ref(), &body.ai, &state.ai).await?;

    let application = match body.save_to {
        Some(id) => {
            let patch = ApplicationPatch {
                gap_analysis: Some(content.clone()),
                ..Default::default()
            };
            Some(save(&state, id, &patch).await?)
        }
        None => None,
    };

    Ok(Json(DraftResponse {
        content,
        application,
    }))
}

/// POST /api/v1/jobs/cover-letter
///
/// Returns restricted HTML. The candidate note is stored alongside the letter
/// so a later regeneration can reuse it.
pub async fn handle_cover_letter(
    State(state): State<AppState>,
    Json(body): Json<DraftBody>,
) -> Result<Json<DraftResponse>, AppError> {
    let profile = get_profile(&state.db).await?;
    let candidate = Candidate::from_profile(profile.as_ref())?;
    let today = chrono::Local::now().date_naive();

    let content = generate_cover_letter(
        &candidate,
        &body.job_description,
        body.note.as_deref(),
        today,
        &body.ai,
        &state.ai,
    )
    .await?;

    let application = match body.save_to {
        Some(id) => {
            let patch = ApplicationPatch {
                cover_letter: Some(content.clone()),
                cover_letter_context: body.note.clone().filter(|n| !n.trim().is_empty()),
                ..Default::default()
            };
            Some(save(&state, id, &patch).await?)
        }
        None => None,
    };

    Ok(Json(DraftResponse {
        content,
        application,
    }))
}

/// POST /api/v1/jobs/email
pub async fn handle_email(
    State(state): State<AppState>,
    Json(body): Json<DraftBody>,
) -> Result<Json<DraftResponse>, AppError> {
    let profile = get_profile(&state.db).await?;
    let candidate = Candidate::from_profile(profile.as_ref())?;

    let content = generate_email(
        &candidate,
        &body.job_description,
        body.note.as_deref(),
        &body.ai,
        &state.ai,
    )
    .await?;

    let application = match body.save_to {
        Some(id) => {
            let patch = ApplicationPatch {
                email_content: Some(content.clone()),
                ..Default::default()
            };
            Some(save(&state, id, &patch).await?)
        }
        None => None,
    };

    Ok(Json(DraftResponse {
        content,
        application,
    }))
}

async fn save(state: &AppState, id: Uuid, patch: &ApplicationPatch) -> Result<Application, AppError> {
    let application = repo::update_application(&state.db, id, patch)
        .await?
        .ok_or_else(|| not_found(id))?;
    info!("Saved job action result on application {id}");
    Ok(application)
}
