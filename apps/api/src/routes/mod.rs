pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::ai::handlers as ai;
use crate::applications::handlers as applications;
use crate::jobs::handlers as jobs;
use crate::profile::handlers as profile;
use crate::render::handlers as render;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Raw AI access
        .route("/api/v1/ai/generate", post(ai::handle_generate))
        // Job actions
        .route("/api/v1/jobs/metadata", get(jobs::handle_metadata))
        .route("/api/v1/jobs/analyze", post(jobs::handle_analyze))
        .route("/api/v1/jobs/gap-analysis", post(jobs::handle_gap_analysis))
        .route("/api/v1/jobs/cover-letter", post(jobs::handle_cover_letter))
        .route("/api/v1/jobs/email", post(jobs::handle_email))
        // Applications
        .route(
            "/api/v1/applications",
            get(applications::handle_list).post(applications::handle_create),
        )
        .route("/api/v1/applications/board", get(applications::handle_board))
        .route(
            "/api/v1/applications/:id",
            get(applications::handle_get)
                .patch(applications::handle_update)
                .delete(applications::handle_delete),
        )
        .route(
            "/api/v1/applications/:id/status",
            patch(applications::handle_update_status),
        )
        // Profile
        .route(
            "/api/v1/profile",
            get(profile::handle_get_profile).put(profile::handle_upsert_profile),
        )
        .route("/api/v1/profile/cv", post(profile::handle_upload_cv))
        // Render
        .route("/api/v1/render/pdf", post(render::handle_render_pdf))
        .with_state(state)
}
