use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{
    application::Application, job::JobPosting, profile::CandidateProfile, user::UserSummary,
};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateApplicationPayload {
    pub job_id: Uuid,
    #[validate(length(max = 10000, message = "Cover letter is too long"))]
    pub cover_letter: Option<String>,
}

/// Status arrives as free text and is checked against the enum in the
/// service, so an unknown value is a 400 rather than a deserialization error.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateApplicationStatusPayload {
    #[validate(length(min = 1, message = "Status is required"))]
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateApplicationView {
    #[serde(flatten)]
    pub application: Application,
    pub job: Option<JobPosting>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplicantView {
    #[serde(flatten)]
    pub application: Application,
    pub candidate: Option<UserSummary>,
    pub profile: Option<CandidateProfile>,
}
