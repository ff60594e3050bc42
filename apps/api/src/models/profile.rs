use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// The single candidate profile. There is no auth; the first row is the profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub school: Option<String>,
    /// Free text, e.g. "mars 2026".
    pub availability_start: Option<String>,
    pub availability_duration_months: Option<i32>,
    /// Markdown notes on goals and internship preferences.
    pub bio_preferences: Option<String>,
    pub cv_url: Option<String>,
    pub cv_content: Option<String>,
}

impl UserProfile {
    /// Trimmed value, or `None` when missing or blank.
    pub fn field(value: &Option<String>) -> Option<&str> {
        value.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn cv_text(&self) -> Option<&str> {
        Self::field(&self.cv_content)
    }

    pub fn bio(&self) -> Option<&str> {
        Self::field(&self.bio_preferences)
    }
}

/// Body for `PUT /api/v1/profile`. `None` keeps the stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub school: Option<String>,
    pub availability_start: Option<String>,
    pub availability_duration_months: Option<i32>,
    pub bio_preferences: Option<String>,
    pub cv_url: Option<String>,
    pub cv_content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_fields_read_as_missing() {
        let profile = UserProfile {
            cv_content: Some("  \n ".to_string()),
            bio_preferences: Some(" Stage backend ".to_string()),
            ..Default::default()
        };
        assert!(profile.cv_text().is_none());
        assert_eq!(profile.bio(), Some("Stage backend"));
    }
}
