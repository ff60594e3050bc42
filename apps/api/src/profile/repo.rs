//! Singleton profile persistence. The single row lives under a fixed id.

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::profile::{ProfileUpdate, UserProfile};

/// Primary key of the one profile row.
pub const PROFILE_ID: Uuid = Uuid::nil();

const PROFILE_COLUMNS: [&str; 11] = [
    "full_name",
    "email",
    "phone",
    "address",
    "city",
    "school",
    "availability_start",
    "availability_duration_months",
    "bio_preferences",
    "cv_url",
    "cv_content",
];

/// Insert-or-merge in one statement so concurrent first saves converge on the same row.
/// `NULL` inputs keep the stored value.
fn upsert_sql() -> String {
    let columns = PROFILE_COLUMNS.join(", ");
    let placeholders = (2..=PROFILE_COLUMNS.len() + 1)
        .map(|i| format!("${i}"))
        .collect::<Vec<_>>()
        .join(", ");
    let merges = PROFILE_COLUMNS
        .iter()
        .map(|c| format!("{c} = COALESCE(EXCLUDED.{c}, user_profile.{c})"))
        .collect::<Vec<_>>()
        .join(",\n            ");

    format!(
        "INSERT INTO user_profile (id, {columns})
        VALUES ($1, {placeholders})
        ON CONFLICT (id) DO UPDATE SET
            {merges}
        RETURNING *"
    )
}

/// The profile row, if one was ever saved.
pub async fn get_profile(pool: &PgPool) -> Result<Option<UserProfile>, sqlx::Error> {
    sqlx::query_as::<_, UserProfile>("SELECT * FROM user_profile WHERE id = $1")
        .bind(PROFILE_ID)
        .fetch_optional(pool)
        .await
}

/// Creates the profile row on first save, otherwise merges the update into it.
pub async fn upsert_profile(
    pool: &PgPool,
    update: &ProfileUpdate,
) -> Result<UserProfile, sqlx::Error> {
    let sql = upsert_sql();
    let profile = sqlx::query_as::<_, UserProfile>(&sql)
        .bind(PROFILE_ID)
        .bind(&update.full_name)
        .bind(&update.email)
        .bind(&update.phone)
        .bind(&update.address)
        .bind(&update.city)
        .bind(&update.school)
        .bind(&update.availability_start)
        .bind(update.availability_duration_months)
        .bind(&update.bio_preferences)
        .bind(&update.cv_url)
        .bind(&update.cv_content)
        .fetch_one(pool)
        .await?;

    info!("Saved user profile {}", profile.id);
    Ok(profile)
}
