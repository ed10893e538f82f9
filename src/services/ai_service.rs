use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::models::{job::JobPosting, profile::CandidateProfile};
use crate::services::llm_client::{ChatMessage, LlmClient};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    pub duration: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationEntry {
    pub degree: String,
    pub institution: String,
    pub year: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeEvaluation {
    pub score: i32,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedResume {
    pub skills: Vec<String>,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub summary: String,
    pub years_of_experience: i32,
    pub evaluation: ResumeEvaluation,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateScore {
    pub score: i32,
    pub notes: String,
    pub strengths: Vec<String>,
    pub gaps: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerRecommendations {
    pub recommended_roles: Vec<String>,
    pub skill_gaps: Vec<String>,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiSource {
    Provider,
    Fallback,
}

/// Result of an AI call. Callers always get a usable value; `source` tells
/// them whether it is worth persisting.
#[derive(Debug, Clone)]
pub struct AiOutcome<T> {
    pub value: T,
    pub source: AiSource,
}

impl<T: Default> AiOutcome<T> {
    fn fallback() -> Self {
        Self {
            value: T::default(),
            source: AiSource::Fallback,
        }
    }
}

impl<T> AiOutcome<T> {
    pub fn is_fallback(&self) -> bool {
        self.source == AiSource::Fallback
    }
}

const RESUME_SYSTEM_PROMPT: &str = r#"You are an expert resume parser and career advisor.
Extract structured information from the resume and evaluate it.
Respond with a JSON object with exactly these keys:
{
  "skills": [string],
  "experience": [{"title": string, "company": string, "duration": string, "description": string}],
  "education": [{"degree": string, "institution": string, "year": string}],
  "summary": string,
  "yearsOfExperience": number,
  "evaluation": {"score": number 0-100, "strengths": [string], "improvements": [string]}
}"#;

const SCORING_SYSTEM_PROMPT: &str = r#"You are an experienced technical recruiter.
Rate how well the candidate fits the job on a 0-100 scale.
Respond with a JSON object: {"score": number, "notes": string, "strengths": [string], "gaps": [string]}"#;

const CAREER_SYSTEM_PROMPT: &str = r#"You are a career coach.
Based on the candidate profile, suggest next career steps.
Respond with a JSON object: {"recommendedRoles": [string], "skillGaps": [string], "suggestions": [string]}"#;

#[derive(Clone)]
pub struct AIService {
    llm: Option<Arc<dyn LlmClient>>,
}

impl AIService {
    pub fn new(llm: Option<Arc<dyn LlmClient>>) -> Self {
        Self { llm }
    }

    /// Sends one request and parses the reply. Transport errors, non-object
    /// replies and objects missing the fields `parse` needs all end up as
    /// the fallback.
    async fn answer<T: Default>(
        &self,
        task: &'static str,
        messages: Vec<ChatMessage>,
        parse: fn(&JsonValue) -> Option<T>,
    ) -> AiOutcome<T> {
        let Some(llm) = self.llm.as_ref() else {
            return AiOutcome::fallback();
        };
        let raw = match llm.complete_json(&messages).await {
            Ok(value) if value.is_object() => value,
            Ok(other) => {
                tracing::warn!(task, kind = json_kind(&other), "AI reply was not a JSON object");
                return AiOutcome::fallback();
            }
            Err(e) => {
                tracing::warn!(task, error = %e, "AI request failed; using defaults");
                return AiOutcome::fallback();
            }
        };
        match parse(&raw) {
            Some(value) => AiOutcome {
                value,
                source: AiSource::Provider,
            },
            None => {
                tracing::warn!(task, reply = %raw, "AI reply is missing expected fields");
                AiOutcome::fallback()
            }
        }
    }

    pub async fn parse_resume(&self, resume_text: &str) -> AiOutcome<ParsedResume> {
        let messages = vec![
            ChatMessage::system(RESUME_SYSTEM_PROMPT),
            ChatMessage::user(format!("Resume:\n{}", resume_text)),
        ];
        self.answer("parse_resume", messages, ParsedResume::from_reply).await
    }

    pub async fn score_candidate(
        &self,
        profile: &CandidateProfile,
        job: &JobPosting,
    ) -> AiOutcome<CandidateScore> {
        let candidate = format!(
            "Headline: {}\nSkills: {}\nExperience: {}\nEducation: {}\nResume:\n{}",
            profile.headline.as_deref().unwrap_or(""),
            profile.skills.join(", "),
            profile.experience,
            profile.education,
            profile.resume.as_deref().unwrap_or(""),
        );
        let posting = format!(
            "Title: {}\nCompany: {}\nLevel: {}\nSkills: {}\nDescription:\n{}\nRequirements:\n{}",
            job.title,
            job.company,
            job.experience_level.as_deref().unwrap_or("any"),
            job.skills.join(", "),
            job.description,
            job.requirements.as_deref().unwrap_or(""),
        );
        let messages = vec![
            ChatMessage::system(SCORING_SYSTEM_PROMPT),
            ChatMessage::user(format!("CANDIDATE:\n{}\n\nJOB:\n{}", candidate, posting)),
        ];
        self.answer("score_candidate", messages, CandidateScore::from_reply).await
    }

    pub async fn career_recommendations(
        &self,
        profile: &CandidateProfile,
    ) -> AiOutcome<CareerRecommendations> {
        let summary = format!(
            "Headline: {}\nLocation: {}\nSkills: {}\nExperience: {}\nEducation: {}",
            profile.headline.as_deref().unwrap_or(""),
            profile.location.as_deref().unwrap_or(""),
            profile.skills.join(", "),
            profile.experience,
            profile.education,
        );
        let messages = vec![
            ChatMessage::system(CAREER_SYSTEM_PROMPT),
            ChatMessage::user(summary),
        ];
        self.answer("career_recommendations", messages, CareerRecommendations::from_reply).await
    }
}

impl ParsedResume {
    /// `None` unless the reply carries at least one resume section.
    pub fn from_reply(v: &JsonValue) -> Option<Self> {
        let has_section = has_list(v, "skills")
            || v.get("experience").is_some_and(JsonValue::is_array)
            || v.get("education").is_some_and(JsonValue::is_array)
            || v.get("evaluation").is_some_and(JsonValue::is_object);
        if !has_section {
            return None;
        }
        let evaluation = v.get("evaluation").unwrap_or(&JsonValue::Null);
        Some(Self {
            skills: text_list(v, "skills"),
            experience: objects(v, "experience")
                .map(|e| ExperienceEntry {
                    title: text(e, "title"),
                    company: text(e, "company"),
                    duration: text(e, "duration"),
                    description: text(e, "description"),
                })
                .collect(),
            education: objects(v, "education")
                .map(|e| EducationEntry {
                    degree: text(e, "degree"),
                    institution: text(e, "institution"),
                    year: text(e, "year"),
                })
                .collect(),
            summary: text(v, "summary"),
            years_of_experience: number(v, "yearsOfExperience").max(0),
            evaluation: ResumeEvaluation {
                score: score(evaluation, "score"),
                strengths: text_list(evaluation, "strengths"),
                improvements: text_list(evaluation, "improvements"),
            },
        })
    }
}

impl CandidateScore {
    /// `None` unless `score` is a number or a numeric string.
    pub fn from_reply(v: &JsonValue) -> Option<Self> {
        let numeric = match v.get("score") {
            Some(JsonValue::Number(_)) => true,
            Some(JsonValue::String(s)) => s.trim().parse::<f64>().is_ok_and(f64::is_finite),
            _ => false,
        };
        if !numeric {
            return None;
        }
        Some(Self {
            score: score(v, "score"),
            notes: text(v, "notes"),
            strengths: text_list(v, "strengths"),
            gaps: text_list(v, "gaps"),
        })
    }
}

impl CareerRecommendations {
    pub fn from_reply(v: &JsonValue) -> Option<Self> {
        if !["recommendedRoles", "skillGaps", "suggestions"]
            .iter()
            .any(|key| has_list(v, key))
        {
            return None;
        }
        Some(Self {
            recommended_roles: text_list(v, "recommendedRoles"),
            skill_gaps: text_list(v, "skillGaps"),
            suggestions: text_list(v, "suggestions"),
        })
    }
}

fn json_kind(v: &JsonValue) -> &'static str {
    match v {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

fn text(v: &JsonValue, key: &str) -> String {
    match v.get(key) {
        Some(JsonValue::String(s)) => s.trim().to_string(),
        Some(JsonValue::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn has_list(v: &JsonValue, key: &str) -> bool {
    matches!(v.get(key), Some(JsonValue::Array(_) | JsonValue::String(_)))
}

fn text_list(v: &JsonValue, key: &str) -> Vec<String> {
    match v.get(key) {
        Some(JsonValue::Array(items)) => items
            .iter()
            .filter_map(|x| x.as_str())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        Some(JsonValue::String(s)) => s
            .split(',')
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

fn objects<'a>(v: &'a JsonValue, key: &str) -> impl Iterator<Item = &'a JsonValue> {
    v.get(key)
        .and_then(|a| a.as_array())
        .map(|a| a.as_slice())
        .unwrap_or_default()
        .iter()
        .filter(|e| e.is_object())
}

fn number(v: &JsonValue, key: &str) -> i32 {
    let raw = match v.get(key) {
        Some(JsonValue::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(JsonValue::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if raw.is_finite() {
        raw.round().clamp(i32::MIN as f64, i32::MAX as f64) as i32
    } else {
        0
    }
}

/// A 0-100 score; anything else is clamped into range.
fn score(v: &JsonValue, key: &str) -> i32 {
    number(v, key).clamp(0, 100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::services::llm_client::MockLlmClient;
    use chrono::Utc;
    use serde_json::json;
    use uuid::Uuid;

    fn service_with(mock: MockLlmClient) -> AIService {
        AIService::new(Some(Arc::new(mock)))
    }

    fn sample_job() -> JobPosting {
        JobPosting {
            id: Uuid::new_v4(),
            recruiter_id: Uuid::new_v4(),
            title: "Backend Engineer".into(),
            company: "Acme".into(),
            location: "Remote".into(),
            description: "Rust services".into(),
            requirements: Some("3+ years".into()),
            job_type: "full_time".into(),
            experience_level: Some("mid".into()),
            salary_min: None,
            salary_max: None,
            skills: vec!["rust".into(), "postgres".into()],
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn parse_resume_maps_provider_fields() {
        let mut mock = MockLlmClient::new();
        mock.expect_complete_json().times(1).returning(|messages| {
            assert_eq!(messages.len(), 2);
            assert!(messages[1].content.contains("Ferris"));
            Ok(json!({
                "skills": ["Rust", " SQL ", 42],
                "experience": [{"title": "Engineer", "company": "Crab Co", "duration": "2y"}, "junk"],
                "education": [{"degree": "BSc", "institution": "Uni", "year": 2019}],
                "summary": "Systems programmer",
                "yearsOfExperience": 4.6,
                "evaluation": {"score": 140, "strengths": ["focus"], "improvements": []}
            }))
        });

        let outcome = service_with(mock).parse_resume("Ferris the crab").await;
        assert!(!outcome.is_fallback());
        let parsed = outcome.value;
        assert_eq!(parsed.skills, vec!["Rust", "SQL"]);
        assert_eq!(parsed.experience.len(), 1);
        assert_eq!(parsed.experience[0].company, "Crab Co");
        assert_eq!(parsed.experience[0].description, "");
        assert_eq!(parsed.education[0].year, "2019");
        assert_eq!(parsed.years_of_experience, 5);
        assert_eq!(parsed.evaluation.score, 100);
        assert_eq!(parsed.evaluation.strengths, vec!["focus"]);
    }

    #[tokio::test]
    async fn provider_error_yields_zeroed_resume() {
        let mut mock = MockLlmClient::new();
        mock.expect_complete_json()
            .returning(|_| Err(Error::Internal("connection refused".into())));

        let outcome = service_with(mock).parse_resume("anything").await;
        assert!(outcome.is_fallback());
        assert_eq!(outcome.value, ParsedResume::default());
        assert_eq!(outcome.value.evaluation.score, 0);
    }

    #[tokio::test]
    async fn non_object_reply_is_treated_as_failure() {
        let mut mock = MockLlmClient::new();
        mock.expect_complete_json()
            .returning(|_| Ok(json!(["not", "an", "object"])));

        let profile = CandidateProfile::empty(Uuid::new_v4());
        let outcome = service_with(mock).career_recommendations(&profile).await;
        assert!(outcome.is_fallback());
        assert!(outcome.value.recommended_roles.is_empty());
    }

    #[tokio::test]
    async fn disabled_service_never_calls_out() {
        let service = AIService::new(None);
        let profile = CandidateProfile::empty(Uuid::new_v4());
        let outcome = service.score_candidate(&profile, &sample_job()).await;
        assert!(outcome.is_fallback());
        assert_eq!(outcome.value.score, 0);
    }

    #[tokio::test]
    async fn score_accepts_numeric_strings_and_clamps_negatives() {
        let mut mock = MockLlmClient::new();
        mock.expect_complete_json()
            .returning(|_| Ok(json!({"score": "87", "notes": "Strong match", "gaps": "k8s, aws"})));
        let service = service_with(mock);
        let profile = CandidateProfile::empty(Uuid::new_v4());
        let outcome = service.score_candidate(&profile, &sample_job()).await;
        assert_eq!(outcome.value.score, 87);
        assert_eq!(outcome.value.gaps, vec!["k8s", "aws"]);
        assert!(outcome.value.strengths.is_empty());

        assert_eq!(score(&json!({"score": -5}), "score"), 0);
        assert_eq!(score(&json!({}), "score"), 0);
    }

    #[tokio::test]
    async fn error_object_reply_is_treated_as_failure() {
        let mut mock = MockLlmClient::new();
        mock.expect_complete_json()
            .times(3)
            .returning(|_| Ok(json!({"error": "model overloaded"})));
        let service = service_with(mock);
        let profile = CandidateProfile::empty(Uuid::new_v4());

        assert!(service.parse_resume("text").await.is_fallback());
        assert!(service.score_candidate(&profile, &sample_job()).await.is_fallback());
        assert!(service.career_recommendations(&profile).await.is_fallback());
    }

    #[test]
    fn score_reply_needs_a_numeric_score() {
        assert!(CandidateScore::from_reply(&json!({"notes": "fine"})).is_none());
        assert!(CandidateScore::from_reply(&json!({"score": "high"})).is_none());
        assert_eq!(CandidateScore::from_reply(&json!({"score": 0})).map(|s| s.score), Some(0));
    }
}
