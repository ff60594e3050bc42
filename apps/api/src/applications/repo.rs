//! Application persistence. The `applications` table lives in the managed Postgres instance.

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::application::{
    Application, ApplicationDraft, ApplicationPatch, ApplicationStatus,
};

/// All applications, newest first.
pub async fn list_applications(pool: &PgPool) -> Result<Vec<Application>, sqlx::Error> {
    sqlx::query_as::<_, Application>("SELECT * FROM applications ORDER BY created_at DESC")
        .fetch_all(pool)
        .await
}

pub async fn get_application(pool: &PgPool, id: Uuid) -> Result<Option<Application>, sqlx::Error> {
    sqlx::query_as::<_, Application>("SELECT * FROM applications WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create_application(
    pool: &PgPool,
    draft: &ApplicationDraft,
) -> Result<Application, sqlx::Error> {
    let application = sqlx::query_as::<_, Application>(
        r#"
        INSERT INTO applications
            (company_name, role, location, status, job_description, missions, insights,
             cover_letter, email_content, gap_analysis, applied_at, job_url, tech_stack,
             daily_tasks_forecast, recruitment_process, profile_requirements,
             company_summary, cover_letter_context, cv_context_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                CASE WHEN $11 THEN now() ELSE NULL END,
                $12, $13, $14, $15, $16, $17, $18, $19)
        RETURNING *
        "#,
    )
    .bind(&draft.company_name)
    .bind(&draft.role)
    .bind(&draft.location)
    .bind(draft.status)
    .bind(&draft.job_description)
    .bind(&draft.missions)
    .bind(&draft.insights)
    .bind(&draft.cover_letter)
    .bind(&draft.email_content)
    .bind(&draft.gap_analysis)
    .bind(stamps_applied_at(draft.status))
    .bind(&draft.job_url)
    .bind(&draft.tech_stack)
    .bind(&draft.daily_tasks_forecast)
    .bind(&draft.recruitment_process)
    .bind(&draft.profile_requirements)
    .bind(&draft.company_summary)
    .bind(&draft.cover_letter_context)
    .bind(&draft.cv_context_id)
    .fetch_one(pool)
    .await?;

    info!(
        "Created application {} ({} @ {})",
        application.id, application.role, application.company_name
    );
    Ok(application)
}

/// Applies a partial update. Returns `None` when the id does not exist.
pub async fn update_application(
    pool: &PgPool,
    id: Uuid,
    patch: &ApplicationPatch,
) -> Result<Option<Application>, sqlx::Error> {
    sqlx::query_as::<_, Application>(
        r#"
        UPDATE applications SET
            company_name         = COALESCE($2, company_name),
            role                 = COALESCE($3, role),
            location             = COALESCE($4, location),
            job_description      = COALESCE($5, job_description),
            missions             = COALESCE($6, missions),
            insights             = COALESCE($7, insights),
            cover_letter         = COALESCE($8, cover_letter),
            email_content        = COALESCE($9, email_content),
            gap_analysis         = COALESCE($10, gap_analysis),
            job_url              = COALESCE($11, job_url),
            tech_stack           = COALESCE($12, tech_stack),
            daily_tasks_forecast = COALESCE($13, daily_tasks_forecast),
            recruitment_process  = COALESCE($14, recruitment_process),
            profile_requirements = COALESCE($15, profile_requirements),
            company_summary      = COALESCE($16, company_summary),
            cover_letter_context = COALESCE($17, cover_letter_context),
            cv_context_id        = COALESCE($18, cv_context_id)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&patch.company_name)
    .bind(&patch.role)
    .bind(&patch.location)
    .bind(&patch.job_description)
    .bind(&patch.missions)
    .bind(&patch.insights)
    .bind(&patch.cover_letter)
    .bind(&patch.email_content)
    .bind(&patch.gap_analysis)
    .bind(&patch.job_url)
    .bind(&patch.tech_stack)
    .bind(&patch.daily_tasks_forecast)
    .bind(&patch.recruitment_process)
    .bind(&patch.profile_requirements)
    .bind(&patch.company_summary)
    .bind(&patch.cover_letter_context)
    .bind(&patch.cv_context_id)
    .fetch_optional(pool)
    .await
}

/// Moves an application to another column. Moving to `Postulé` stamps
/// `applied_at` the first time only.
pub async fn update_status(
    pool: &PgPool,
    id: Uuid,
    status: ApplicationStatus,
) -> Result<Option<Application>, sqlx::Error> {
    let application = sqlx::query_as::<_, Application>(
        r#"
        UPDATE applications SET
            status = $2,
            applied_at = CASE WHEN $3 AND applied_at IS NULL THEN now() ELSE applied_at END
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(status)
    .bind(stamps_applied_at(status))
    .fetch_optional(pool)
    .await?;

    if application.is_some() {
        info!("Application {id} moved to '{}'", status.label());
    }
    Ok(application)
}

/// Returns `false` when nothing was deleted.
pub async fn delete_application(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM applications WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

fn stamps_applied_at(status: ApplicationStatus) -> bool {
    status == ApplicationStatus::Applied
}
