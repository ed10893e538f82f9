use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecruiterAnalytics {
    pub total_jobs: usize,
    pub active_jobs: usize,
    pub total_applications: usize,
    pub applications_by_status: BTreeMap<String, usize>,
    pub average_ai_score: Option<f64>,
    pub top_jobs: Vec<TopJob>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopJob {
    pub job_id: Uuid,
    pub title: String,
    pub applications: usize,
}
