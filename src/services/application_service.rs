use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::database::repository::{ApplicationRepository, ProfileRepository, UserRepository};
use crate::dto::application_dto::{
    CandidateApplicationView, CreateApplicationPayload, JobApplicantView,
    UpdateApplicationStatusPayload,
};
use crate::error::{Error, Result};
use crate::models::{
    application::{Application, ApplicationStatus, NewApplication},
    job::JobPosting,
    profile::CandidateProfile,
    user::UserSummary,
};
use crate::services::ai_service::{AIService, CandidateScore};
use crate::services::job_service::JobService;

#[derive(Clone)]
pub struct ApplicationService {
    applications: Arc<dyn ApplicationRepository>,
    profiles: Arc<dyn ProfileRepository>,
    users: Arc<dyn UserRepository>,
    job_service: JobService,
    ai_service: AIService,
}

impl ApplicationService {
    pub fn new(
        applications: Arc<dyn ApplicationRepository>,
        profiles: Arc<dyn ProfileRepository>,
        users: Arc<dyn UserRepository>,
        job_service: JobService,
        ai_service: AIService,
    ) -> Self {
        Self {
            applications,
            profiles,
            users,
            job_service,
            ai_service,
        }
    }

    pub async fn apply(
        &self,
        candidate_id: Uuid,
        payload: CreateApplicationPayload,
    ) -> Result<Application> {
        let job = self.job_service.find(payload.job_id).await?;
        if !job.is_active {
            return Err(Error::NotFound("Job not found".into()));
        }

        if self
            .applications
            .find_by_candidate_and_job(candidate_id, job.id)
            .await?
            .is_some()
        {
            return Err(Error::AlreadyExists(
                "You have already applied for this job".into(),
            ));
        }

        let application = self
            .applications
            .create(NewApplication {
                job_id: job.id,
                candidate_id,
                cover_letter: payload.cover_letter,
            })
            .await?;
        tracing::info!(application_id = %application.id, job_id = %job.id, "application submitted");

        Ok(self.score_application(application, &job).await)
    }

    /// Best-effort AI scoring. The stored row is returned untouched when the
    /// provider fails, so a transient outage never writes a zero score.
    async fn score_application(&self, application: Application, job: &JobPosting) -> Application {
        let profile = match self.profiles.find_candidate(application.candidate_id).await {
            Ok(Some(profile)) => profile,
            Ok(None) => CandidateProfile::empty(application.candidate_id),
            Err(e) => {
                tracing::warn!(error = %e, "could not load profile for scoring");
                return application;
            }
        };

        let outcome = self.ai_service.score_candidate(&profile, job).await;
        if outcome.is_fallback() {
            return application;
        }

        let scored = Application {
            ai_score: Some(outcome.value.score),
            ai_notes: Some(render_notes(&outcome.value)),
            ..application.clone()
        };
        match self.applications.update(&scored).await {
            Ok(saved) => saved,
            Err(e) => {
                tracing::warn!(application_id = %application.id, error = %e, "failed to store AI score");
                application
            }
        }
    }

    pub async fn list_for_candidate(&self, candidate_id: Uuid) -> Result<Vec<CandidateApplicationView>> {
        let applications = self.applications.list_by_candidate(candidate_id).await?;
        let job_ids: Vec<Uuid> = applications.iter().map(|a| a.job_id).collect();
        let jobs: HashMap<Uuid, JobPosting> = self
            .job_service
            .find_many(&job_ids)
            .await?
            .into_iter()
            .map(|job| (job.id, job))
            .collect();

        Ok(applications
            .into_iter()
            .map(|application| CandidateApplicationView {
                job: jobs.get(&application.job_id).cloned(),
                application,
            })
            .collect())
    }

    pub async fn list_for_job(&self, job_id: Uuid, recruiter_id: Uuid) -> Result<Vec<JobApplicantView>> {
        let job = self.job_service.find_owned(job_id, recruiter_id).await?;
        let applications = self.applications.list_by_jobs(&[job.id]).await?;
        let candidate_ids: Vec<Uuid> = applications.iter().map(|a| a.candidate_id).collect();

        let users: HashMap<Uuid, UserSummary> = self
            .users
            .find_by_ids(&candidate_ids)
            .await?
            .iter()
            .map(|u| (u.id, UserSummary::from(u)))
            .collect();
        let profiles: HashMap<Uuid, CandidateProfile> = self
            .profiles
            .find_candidates(&candidate_ids)
            .await?
            .into_iter()
            .map(|p| (p.user_id, p))
            .collect();

        Ok(applications
            .into_iter()
            .map(|application| JobApplicantView {
                candidate: users.get(&application.candidate_id).cloned(),
                profile: profiles.get(&application.candidate_id).cloned(),
                application,
            })
            .collect())
    }

    /// Overwrites the status. Any of the five values may follow any other.
    pub async fn update_status(
        &self,
        application_id: Uuid,
        recruiter_id: Uuid,
        payload: UpdateApplicationStatusPayload,
    ) -> Result<Application> {
        let status: ApplicationStatus = payload.status.trim().parse().map_err(|_| {
            Error::BadRequest(format!(
                "Invalid status '{}'. Expected one of: {}",
                payload.status,
                ApplicationStatus::ALL.map(|s| s.as_str()).join(", ")
            ))
        })?;

        let mut application = self.find(application_id).await?;
        self.job_service
            .find_owned(application.job_id, recruiter_id)
            .await?;

        application.status = status;
        let saved = self.applications.update(&application).await?;
        tracing::info!(application_id = %saved.id, status = %saved.status, "application status updated");
        Ok(saved)
    }

    pub async fn withdraw(&self, application_id: Uuid, candidate_id: Uuid) -> Result<()> {
        let application = self.find(application_id).await?;
        if application.candidate_id != candidate_id {
            return Err(Error::Forbidden(
                "You can only withdraw your own applications".into(),
            ));
        }
        self.applications.delete(application.id).await?;
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Application> {
        self.applications
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::NotFound("Application not found".into()))
    }
}

fn render_notes(score: &CandidateScore) -> String {
    let mut notes = score.notes.clone();
    if !score.strengths.is_empty() {
        notes.push_str(&format!("\nStrengths: {}", score.strengths.join(", ")));
    }
    if !score.gaps.is_empty() {
        notes.push_str(&format!("\nGaps: {}", score.gaps.join(", ")));
    }
    notes.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notes_include_strengths_and_gaps() {
        let notes = render_notes(&CandidateScore {
            score: 80,
            notes: "Good fit".into(),
            strengths: vec!["Rust".into()],
            gaps: vec!["AWS".into(), "K8s".into()],
        });
        assert_eq!(notes, "Good fit\nStrengths: Rust\nGaps: AWS, K8s");
    }

    #[test]
    fn notes_without_summary_are_trimmed() {
        let notes = render_notes(&CandidateScore {
            gaps: vec!["Go".into()],
            ..CandidateScore::default()
        });
        assert_eq!(notes, "Gaps: Go");
    }
}
