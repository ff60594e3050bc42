use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::render::wrap_letter_html;
use crate::state::AppState;

const DEFAULT_FILE_NAME: &str = "lettre_motivation.pdf";

#[derive(Debug, Deserialize)]
pub struct RenderBody {
    #[serde(default)]
    pub html: String,
    #[serde(default, alias = "fileName")]
    pub file_name: Option<String>,
}

/// Keeps the name safe for a quoted `Content-Disposition` value and forces a `.pdf` suffix.
pub fn attachment_name(requested: Option<&str>) -> String {
    let cleaned: String = requested
        .unwrap_or_default()
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches(|c| c == '.' || c == '_');

    if cleaned.is_empty() {
        DEFAULT_FILE_NAME.to_string()
    } else if cleaned.to_lowercase().ends_with(".pdf") {
        cleaned.to_string()
    } else {
        format!("{cleaned}.pdf")
    }
}

/// POST /api/v1/render/pdf
///
/// Body: `{ "html": "<p>…</p>", "file_name": "lettre.pdf" }`. Returns the PDF as an attachment.
pub async fn handle_render_pdf(
    State(state): State<AppState>,
    Json(body): Json<RenderBody>,
) -> Result<Response, AppError> {
    if body.html.trim().is_empty() {
        return Err(AppError::Validation("Missing HTML content".to_string()));
    }

    let pdf = state
        .renderer
        .render(&wrap_letter_html(&body.html))
        .await
        .map_err(|e| AppError::Render(e.to_string()))?;

    let file_name = attachment_name(body.file_name.as_deref());
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        pdf,
    )
        .into_response())
}
