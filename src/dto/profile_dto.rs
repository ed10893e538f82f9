use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use validator::Validate;

use crate::dto::job_dto::JobMatch;
use crate::services::ai_service::CareerRecommendations;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCandidateProfilePayload {
    #[validate(length(max = 200))]
    pub headline: Option<String>,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    #[validate(length(max = 200))]
    pub location: Option<String>,
    pub resume: Option<String>,
    pub skills: Option<Vec<String>>,
    pub education: Option<JsonValue>,
    pub experience: Option<JsonValue>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecruiterProfilePayload {
    #[validate(length(max = 200))]
    pub company: Option<String>,
    #[validate(length(max = 200))]
    pub position: Option<String>,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    #[validate(url(message = "Company website must be a URL"))]
    pub company_website: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResumePayload {
    #[validate(length(min = 1, max = 50000, message = "Resume text is required"))]
    pub resume_text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerRecommendationsResponse {
    #[serde(flatten)]
    pub recommendations: CareerRecommendations,
    pub matching_jobs: Vec<JobMatch>,
}
