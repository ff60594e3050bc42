//! Candidate details pulled from the profile for the drafting prompts.

use crate::errors::AppError;
use crate::models::profile::UserProfile;

pub const DEFAULT_SCHOOL: &str = "École 42 Lyon";
pub const DEFAULT_AVAILABILITY_START: &str = "mars 2026";
pub const DEFAULT_AVAILABILITY_DURATION: &str = "4-6 mois";

/// Contact block and preferences. Name and email are mandatory.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub school: String,
    pub availability_start: String,
    pub availability_duration: String,
    pub bio: Option<String>,
    pub cv: Option<String>,
}

impl Candidate {
    pub fn from_profile(profile: Option<&UserProfile>) -> Result<Self, AppError> {
        let incomplete = || {
            AppError::Validation(
                "Complétez vos coordonnées dans Profil (nom + email au minimum).".to_string(),
            )
        };
        let profile = profile.ok_or_else(incomplete)?;
        let field = |v: &Option<String>| UserProfile::field(v).map(String::from);

        Ok(Self {
            full_name: field(&profile.full_name).ok_or_else(incomplete)?,
            email: field(&profile.email).ok_or_else(incomplete)?,
            phone: field(&profile.phone),
            address: field(&profile.address),
            city: field(&profile.city),
            school: field(&profile.school).unwrap_or_else(|| DEFAULT_SCHOOL.to_string()),
            availability_start: field(&profile.availability_start)
                .unwrap_or_else(|| DEFAULT_AVAILABILITY_START.to_string()),
            availability_duration: profile
                .availability_duration_months
                .map(|m| format!("{m} mois"))
                .unwrap_or_else(|| DEFAULT_AVAILABILITY_DURATION.to_string()),
            bio: field(&profile.bio_preferences),
            cv: field(&profile.cv_content),
        })
    }

    pub fn city_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.city.as_deref().unwrap_or(default)
    }
}

/// The candidate's free-text note, or the explicit "no note" marker.
pub fn note_or_default(note: Option<&str>) -> &str {
    note.map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or("Aucune note")
}
