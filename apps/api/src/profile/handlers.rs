use axum::{
    extract::{Multipart, Query, State},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::models::profile::{ProfileUpdate, UserProfile};
use crate::profile::cv::{extract_cv_text, CvParseError};
use crate::profile::repo;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CvUploadQuery {
    /// Store the extracted text as the profile's `cv_content`.
    #[serde(default)]
    pub save: bool,
}

#[derive(Debug, Serialize)]
pub struct CvUploadResponse {
    pub text: String,
    pub chars: usize,
    pub saved: bool,
}

/// GET /api/v1/profile
///
/// Returns `null` until a profile has been saved.
pub async fn handle_get_profile(
    State(state): State<AppState>,
) -> Result<Json<Option<UserProfile>>, AppError> {
    Ok(Json(repo::get_profile(&state.db).await?))
}

/// PUT /api/v1/profile
pub async fn handle_upsert_profile(
    State(state): State<AppState>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<UserProfile>, AppError> {
    Ok(Json(repo::upsert_profile(&state.db, &update).await?))
}

/// POST /api/v1/profile/cv
///
/// Multipart upload with a `file` field holding the CV as PDF.
pub async fn handle_upload_cv(
    State(state): State<AppState>,
    Query(query): Query<CvUploadQuery>,
    mut multipart: Multipart,
) -> Result<Json<CvUploadResponse>, AppError> {
    let mut file: Option<Bytes> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            file = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?,
            );
            break;
        }
    }
    let file = file.ok_or_else(|| AppError::Validation(CvParseError::Missing.to_string()))?;

    // PDF parsing is CPU-bound and may panic on hostile input; keep it off the runtime.
    let text = tokio::task::spawn_blocking(move || extract_cv_text(&file))
        .await
        .map_err(|e| AppError::UnprocessableEntity(format!("Failed to parse PDF: {e}")))?
        .map_err(|e| match e {
            CvParseError::Missing | CvParseError::NotPdf => AppError::Validation(e.to_string()),
            _ => AppError::UnprocessableEntity(e.to_string()),
        })?;

    if query.save {
        let update = ProfileUpdate {
            cv_content: Some(text.clone()),
            ..Default::default()
        };
        repo::upsert_profile(&state.db, &update).await?;
        info!("Saved CV text ({} chars) to profile", text.chars().count());
    }

    Ok(Json(CvUploadResponse {
        chars: text.chars().count(),
        text,
        saved: query.save,
    }))
}
