use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    pub id: Uuid,
    pub recruiter_id: Uuid,
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub requirements: Option<String>,
    pub job_type: String,
    pub experience_level: Option<String>,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub skills: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewJobPosting {
    pub recruiter_id: Uuid,
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub requirements: Option<String>,
    pub job_type: String,
    pub experience_level: Option<String>,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub skills: Vec<String>,
    pub is_active: bool,
}

/// Filters for the candidate-facing job board. Only active postings are ever listed.
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    pub search: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
}

impl JobPosting {
    pub fn matches(&self, filter: &JobFilter) -> bool {
        if !self.is_active {
            return false;
        }
        if let Some(search) = filter.search.as_deref().map(str::to_lowercase) {
            let hit = self.title.to_lowercase().contains(&search)
                || self.company.to_lowercase().contains(&search)
                || self.description.to_lowercase().contains(&search);
            if !hit {
                return false;
            }
        }
        if let Some(location) = filter.location.as_deref().map(str::to_lowercase) {
            if !self.location.to_lowercase().contains(&location) {
                return false;
            }
        }
        if let Some(job_type) = filter.job_type.as_deref() {
            if !self.job_type.eq_ignore_ascii_case(job_type) {
                return false;
            }
        }
        true
    }
}
