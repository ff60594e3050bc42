//! Candidate profile: the singleton row holding contact details, preferences and CV text.

pub mod cv;
pub mod handlers;
pub mod repo;
