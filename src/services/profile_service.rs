use std::sync::Arc;

use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::database::repository::{JobRepository, ProfileRepository};
use crate::dto::job_dto::JobMatch;
use crate::dto::profile_dto::{
    CareerRecommendationsResponse, UpdateCandidateProfilePayload, UpdateRecruiterProfilePayload,
};
use crate::error::Result;
use crate::models::{
    job::{JobFilter, JobPosting},
    profile::{CandidateProfile, RecruiterProfile},
};
use crate::services::ai_service::{AIService, ParsedResume};

const MAX_MATCHING_JOBS: usize = 5;

#[derive(Clone)]
pub struct ProfileService {
    profiles: Arc<dyn ProfileRepository>,
    jobs: Arc<dyn JobRepository>,
    ai_service: AIService,
}

impl ProfileService {
    pub fn new(
        profiles: Arc<dyn ProfileRepository>,
        jobs: Arc<dyn JobRepository>,
        ai_service: AIService,
    ) -> Self {
        Self {
            profiles,
            jobs,
            ai_service,
        }
    }

    /// Returns the candidate's profile, creating an empty one on first access.
    pub async fn candidate_profile(&self, user_id: Uuid) -> Result<CandidateProfile> {
        if let Some(profile) = self.profiles.find_candidate(user_id).await? {
            return Ok(profile);
        }
        tracing::debug!(user_id = %user_id, "creating empty candidate profile");
        self.profiles
            .upsert_candidate(&CandidateProfile::empty(user_id))
            .await
    }

    pub async fn update_candidate_profile(
        &self,
        user_id: Uuid,
        payload: UpdateCandidateProfilePayload,
    ) -> Result<CandidateProfile> {
        let mut profile = self.candidate_profile(user_id).await?;
        if payload.headline.is_some() {
            profile.headline = payload.headline;
        }
        if payload.phone.is_some() {
            profile.phone = payload.phone;
        }
        if payload.location.is_some() {
            profile.location = payload.location;
        }
        if payload.resume.is_some() {
            profile.resume = payload.resume;
        }
        if let Some(skills) = payload.skills {
            profile.skills = skills
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Some(education) = payload.education {
            profile.education = education;
        }
        if let Some(experience) = payload.experience {
            profile.experience = experience;
        }
        self.profiles.upsert_candidate(&profile).await
    }

    /// Runs the resume through the AI parser. The resume text is always
    /// stored; parsed fields only replace the profile's when the provider
    /// actually answered.
    pub async fn analyze_resume(&self, user_id: Uuid, resume_text: String) -> Result<ParsedResume> {
        let outcome = self.ai_service.parse_resume(&resume_text).await;
        let mut profile = self.candidate_profile(user_id).await?;
        profile.resume = Some(resume_text);

        if outcome.is_fallback() {
            tracing::warn!(user_id = %user_id, "resume analysis fell back to defaults; keeping previous AI fields");
        } else {
            let parsed = &outcome.value;
            if !parsed.skills.is_empty() {
                profile.skills = parsed.skills.clone();
            }
            profile.experience = serde_json::to_value(&parsed.experience)?;
            profile.education = serde_json::to_value(&parsed.education)?;
            profile.ai_evaluation = Some(evaluation_json(parsed)?);
        }

        self.profiles.upsert_candidate(&profile).await?;
        Ok(outcome.value)
    }

    pub async fn recommendations(&self, user_id: Uuid) -> Result<CareerRecommendationsResponse> {
        let profile = self.candidate_profile(user_id).await?;
        let active = self.jobs.list_active(&JobFilter::default()).await?;
        let matching_jobs = rank_matching_jobs(&profile.skills, &active, MAX_MATCHING_JOBS);
        let outcome = self.ai_service.career_recommendations(&profile).await;
        Ok(CareerRecommendationsResponse {
            recommendations: outcome.value,
            matching_jobs,
        })
    }

    pub async fn recruiter_profile(&self, user_id: Uuid) -> Result<RecruiterProfile> {
        if let Some(profile) = self.profiles.find_recruiter(user_id).await? {
            return Ok(profile);
        }
        self.profiles
            .upsert_recruiter(&RecruiterProfile::empty(user_id))
            .await
    }

    pub async fn update_recruiter_profile(
        &self,
        user_id: Uuid,
        payload: UpdateRecruiterProfilePayload,
    ) -> Result<RecruiterProfile> {
        let mut profile = self.recruiter_profile(user_id).await?;
        if payload.company.is_some() {
            profile.company = payload.company;
        }
        if payload.position.is_some() {
            profile.position = payload.position;
        }
        if payload.phone.is_some() {
            profile.phone = payload.phone;
        }
        if payload.company_website.is_some() {
            profile.company_website = payload.company_website;
        }
        self.profiles.upsert_recruiter(&profile).await
    }
}

fn evaluation_json(parsed: &ParsedResume) -> Result<JsonValue> {
    let mut value = serde_json::to_value(&parsed.evaluation)?;
    if let JsonValue::Object(map) = &mut value {
        map.insert("summary".into(), JsonValue::String(parsed.summary.clone()));
        map.insert(
            "yearsOfExperience".into(),
            JsonValue::from(parsed.years_of_experience),
        );
    }
    Ok(value)
}

/// Active jobs sharing the most skills with the candidate, best first.
/// Jobs with no overlap are left out.
pub fn rank_matching_jobs(skills: &[String], jobs: &[JobPosting], limit: usize) -> Vec<JobMatch> {
    let wanted: Vec<String> = skills.iter().map(|s| s.to_lowercase()).collect();
    let mut ranked: Vec<JobMatch> = jobs
        .iter()
        .filter(|job| job.is_active)
        .filter_map(|job| {
            let matched: Vec<String> = job
                .skills
                .iter()
                .filter(|s| wanted.contains(&s.to_lowercase()))
                .cloned()
                .collect();
            (!matched.is_empty()).then(|| JobMatch {
                job_id: job.id,
                title: job.title.clone(),
                company: job.company.clone(),
                location: job.location.clone(),
                matched_skills: matched,
            })
        })
        .collect();
    ranked.sort_by(|a, b| b.matched_skills.len().cmp(&a.matched_skills.len()));
    ranked.truncate(limit);
    ranked
}
