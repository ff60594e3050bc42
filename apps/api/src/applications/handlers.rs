use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::applications::board::{build_board, Board};
use crate::applications::repo;
use crate::errors::AppError;
use crate::models::application::{
    Application, ApplicationDraft, ApplicationPatch, ApplicationStatus,
};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: ApplicationStatus,
}

/// GET /api/v1/applications
pub async fn handle_list(State(state): State<AppState>) -> Result<Json<Vec<Application>>, AppError> {
    Ok(Json(repo::list_applications(&state.db).await?))
}

/// GET /api/v1/applications/board
pub async fn handle_board(State(state): State<AppState>) -> Result<Json<Board>, AppError> {
    let applications = repo::list_applications(&state.db).await?;
    Ok(Json(build_board(applications)))
}

/// POST /api/v1/applications
pub async fn handle_create(
    State(state): State<AppState>,
    Json(draft): Json<ApplicationDraft>,
) -> Result<(StatusCode, Json<Application>), AppError> {
    if draft.company_name.trim().is_empty() || draft.role.trim().is_empty() {
        return Err(AppError::Validation(
            "company_name and role are required".to_string(),
        ));
    }
    let application = repo::create_application(&state.db, &draft).await?;
    Ok((StatusCode::CREATED, Json(application)))
}

/// GET /api/v1/applications/:id
pub async fn handle_get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Application>, AppError> {
    repo::get_application(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

/// PATCH /api/v1/applications/:id
pub async fn handle_update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<ApplicationPatch>,
) -> Result<Json<Application>, AppError> {
    if patch.is_empty() {
        return Err(AppError::Validation("No fields to update".to_string()));
    }
    repo::update_application(&state.db, id, &patch)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

/// PATCH /api/v1/applications/:id/status
///
/// Called when a card is dropped in another board column.
pub async fn handle_update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<StatusUpdate>,
) -> Result<Json<Application>, AppError> {
    repo::update_status(&state.db, id, body.status)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

/// DELETE /api/v1/applications/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if repo::delete_application(&state.db, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

pub(crate) fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Application {id} not found"))
}
