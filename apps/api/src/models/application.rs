use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Pipeline stage of an application, in board order.
///
/// Stored and serialised with the French labels the UI shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text")]
pub enum ApplicationStatus {
    #[default]
    #[serde(rename = "En attente")]
    #[sqlx(rename = "En attente")]
    Pending,
    #[serde(rename = "Postulé")]
    #[sqlx(rename = "Postulé")]
    Applied,
    #[serde(rename = "Entretien")]
    #[sqlx(rename = "Entretien")]
    Interview,
    #[serde(rename = "Refusé")]
    #[sqlx(rename = "Refusé")]
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 4] = [
        ApplicationStatus::Pending,
        ApplicationStatus::Applied,
        ApplicationStatus::Interview,
        ApplicationStatus::Rejected,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "En attente",
            ApplicationStatus::Applied => "Postulé",
            ApplicationStatus::Interview => "Entretien",
            ApplicationStatus::Rejected => "Refusé",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Application {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub company_name: String,
    pub role: String,
    pub location: Option<String>,
    pub status: ApplicationStatus,
    pub job_description: Option<String>,
    pub missions: Option<Vec<String>>,
    pub insights: Option<String>,
    pub cover_letter: Option<String>,
    pub email_content: Option<String>,
    pub gap_analysis: Option<String>,
    pub applied_at: Option<DateTime<Utc>>,
    pub job_url: Option<String>,
    pub tech_stack: Option<Vec<String>>,
    pub daily_tasks_forecast: Option<String>,
    pub recruitment_process: Option<String>,
    pub profile_requirements: Option<Vec<String>>,
    pub company_summary: Option<String>,
    /// Free-text note from the candidate used when drafting the cover letter.
    pub cover_letter_context: Option<String>,
    pub cv_context_id: Option<String>,
}

/// Body for creating an application. Everything but company and role is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicationDraft {
    pub company_name: String,
    pub role: String,
    pub location: Option<String>,
    #[serde(default)]
    pub status: ApplicationStatus,
    pub job_description: Option<String>,
    pub missions: Option<Vec<String>>,
    pub insights: Option<String>,
    pub cover_letter: Option<String>,
    pub email_content: Option<String>,
    pub gap_analysis: Option<String>,
    pub job_url: Option<String>,
    pub tech_stack: Option<Vec<String>>,
    pub daily_tasks_forecast: Option<String>,
    pub recruitment_process: Option<String>,
    pub profile_requirements: Option<Vec<String>>,
    pub company_summary: Option<String>,
    pub cover_letter_context: Option<String>,
    pub cv_context_id: Option<String>,
}

/// Partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicationPatch {
    pub company_name: Option<String>,
    pub role: Option<String>,
    pub location: Option<String>,
    pub job_description: Option<String>,
    pub missions: Option<Vec<String>>,
    pub insights: Option<String>,
    pub cover_letter: Option<String>,
    pub email_content: Option<String>,
    pub gap_analysis: Option<String>,
    pub job_url: Option<String>,
    pub tech_stack: Option<Vec<String>>,
    pub daily_tasks_forecast: Option<String>,
    pub recruitment_process: Option<String>,
    pub profile_requirements: Option<Vec<String>>,
    pub company_summary: Option<String>,
    pub cover_letter_context: Option<String>,
    pub cv_context_id: Option<String>,
}

impl ApplicationPatch {
    pub fn is_empty(&self) -> bool {
        self.company_name.is_none()
            && self.role.is_none()
            && self.location.is_none()
            && self.job_description.is_none()
            && self.missions.is_none()
            && self.insights.is_none()
            && self.cover_letter.is_none()
            && self.email_content.is_none()
            && self.gap_analysis.is_none()
            && self.job_url.is_none()
            && self.tech_stack.is_none()
            && self.daily_tasks_forecast.is_none()
            && self.recruitment_process.is_none()
            && self.profile_requirements.is_none()
            && self.company_summary.is_none()
            && self.cover_letter_context.is_none()
            && self.cv_context_id.is_none()
    }
}
