use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub headline: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub resume: Option<String>,
    pub skills: Vec<String>,
    pub education: JsonValue,
    pub experience: JsonValue,
    pub ai_evaluation: Option<JsonValue>,
    pub updated_at: DateTime<Utc>,
}

impl CandidateProfile {
    pub fn empty(user_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            headline: None,
            phone: None,
            location: None,
            resume: None,
            skills: Vec::new(),
            education: JsonValue::Array(Vec::new()),
            experience: JsonValue::Array(Vec::new()),
            ai_evaluation: None,
            updated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RecruiterProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company: Option<String>,
    pub position: Option<String>,
    pub phone: Option<String>,
    pub company_website: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl RecruiterProfile {
    pub fn empty(user_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            company: None,
            position: None,
            phone: None,
            company_website: None,
            updated_at: Utc::now(),
        }
    }
}
