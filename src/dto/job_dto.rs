use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::job::{JobFilter, JobPosting};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobPayload {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, max = 200, message = "Company is required"))]
    pub company: String,
    #[validate(length(min = 1, max = 200, message = "Location is required"))]
    pub location: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    pub requirements: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Job type is required"))]
    pub job_type: String,
    pub experience_level: Option<String>,
    #[validate(range(min = 0))]
    pub salary_min: Option<i32>,
    #[validate(range(min = 0))]
    pub salary_max: Option<i32>,
    #[serde(default)]
    pub skills: Vec<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJobPayload {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub company: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub location: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    pub requirements: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub job_type: Option<String>,
    pub experience_level: Option<String>,
    #[validate(range(min = 0))]
    pub salary_min: Option<i32>,
    #[validate(range(min = 0))]
    pub salary_max: Option<i32>,
    pub skills: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct JobListQuery {
    pub search: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
}

impl From<JobListQuery> for JobFilter {
    fn from(value: JobListQuery) -> Self {
        let non_blank = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        Self {
            search: non_blank(value.search),
            location: non_blank(value.location),
            job_type: non_blank(value.job_type),
        }
    }
}

/// A recruiter's own posting together with how many candidates applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecruiterJobSummary {
    #[serde(flatten)]
    pub job: JobPosting,
    pub application_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMatch {
    pub job_id: Uuid,
    pub title: String,
    pub company: String,
    pub location: String,
    pub matched_skills: Vec<String>,
}
