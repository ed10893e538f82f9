use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::database::repository::{ApplicationRepository, JobRepository};
use crate::dto::job_dto::{CreateJobPayload, RecruiterJobSummary, UpdateJobPayload};
use crate::error::{Error, Result};
use crate::models::job::{JobFilter, JobPosting, NewJobPosting};
use crate::models::user::UserRole;
use crate::middleware::auth::CurrentUser;

#[derive(Clone)]
pub struct JobService {
    jobs: Arc<dyn JobRepository>,
    applications: Arc<dyn ApplicationRepository>,
}

fn check_salary_range(min: Option<i32>, max: Option<i32>) -> Result<()> {
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(Error::BadRequest(
                "salaryMin cannot be greater than salaryMax".into(),
            ));
        }
    }
    Ok(())
}

fn clean_skills(skills: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(skills.len());
    for skill in skills {
        let skill = skill.trim().to_string();
        if !skill.is_empty() && !out.iter().any(|s| s.eq_ignore_ascii_case(&skill)) {
            out.push(skill);
        }
    }
    out
}

impl JobService {
    pub fn new(jobs: Arc<dyn JobRepository>, applications: Arc<dyn ApplicationRepository>) -> Self {
        Self { jobs, applications }
    }

    pub async fn create(&self, recruiter_id: Uuid, payload: CreateJobPayload) -> Result<JobPosting> {
        check_salary_range(payload.salary_min, payload.salary_max)?;
        let job = self
            .jobs
            .create(NewJobPosting {
                recruiter_id,
                title: payload.title.trim().to_string(),
                company: payload.company.trim().to_string(),
                location: payload.location.trim().to_string(),
                description: payload.description,
                requirements: payload.requirements,
                job_type: payload.job_type.trim().to_string(),
                experience_level: payload.experience_level,
                salary_min: payload.salary_min,
                salary_max: payload.salary_max,
                skills: clean_skills(payload.skills),
                is_active: payload.is_active.unwrap_or(true),
            })
            .await?;
        tracing::info!(job_id = %job.id, recruiter_id = %recruiter_id, "job posted");
        Ok(job)
    }

    pub async fn list_active(&self, filter: JobFilter) -> Result<Vec<JobPosting>> {
        self.jobs.list_active(&filter).await
    }

    /// Inactive postings are only visible to the recruiter who owns them.
    pub async fn get_for_viewer(&self, id: Uuid, viewer: &CurrentUser) -> Result<JobPosting> {
        let job = self.find(id).await?;
        let owner = viewer.role == UserRole::Recruiter && job.recruiter_id == viewer.id;
        if !job.is_active && !owner {
            return Err(Error::NotFound("Job not found".into()));
        }
        Ok(job)
    }

    pub async fn find(&self, id: Uuid) -> Result<JobPosting> {
        self.jobs
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::NotFound("Job not found".into()))
    }

    pub async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<JobPosting>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.jobs.find_by_ids(ids).await
    }

    /// Loads a posting and checks that `recruiter_id` owns it.
    pub async fn find_owned(&self, id: Uuid, recruiter_id: Uuid) -> Result<JobPosting> {
        let job = self.find(id).await?;
        if job.recruiter_id != recruiter_id {
            return Err(Error::Forbidden(
                "You can only manage your own job postings".into(),
            ));
        }
        Ok(job)
    }

    pub async fn update(
        &self,
        id: Uuid,
        recruiter_id: Uuid,
        payload: UpdateJobPayload,
    ) -> Result<JobPosting> {
        let mut job = self.find_owned(id, recruiter_id).await?;

        if let Some(title) = payload.title {
            job.title = title.trim().to_string();
        }
        if let Some(company) = payload.company {
            job.company = company.trim().to_string();
        }
        if let Some(location) = payload.location {
            job.location = location.trim().to_string();
        }
        if let Some(description) = payload.description {
            job.description = description;
        }
        if payload.requirements.is_some() {
            job.requirements = payload.requirements;
        }
        if let Some(job_type) = payload.job_type {
            job.job_type = job_type.trim().to_string();
        }
        if payload.experience_level.is_some() {
            job.experience_level = payload.experience_level;
        }
        if payload.salary_min.is_some() {
            job.salary_min = payload.salary_min;
        }
        if payload.salary_max.is_some() {
            job.salary_max = payload.salary_max;
        }
        if let Some(skills) = payload.skills {
            job.skills = clean_skills(skills);
        }
        if let Some(is_active) = payload.is_active {
            if is_active != job.is_active {
                tracing::info!(job_id = %job.id, is_active, "job visibility changed");
            }
            job.is_active = is_active;
        }
        check_salary_range(job.salary_min, job.salary_max)?;

        self.jobs.update(&job).await
    }

    pub async fn delete(&self, id: Uuid, recruiter_id: Uuid) -> Result<()> {
        self.find_owned(id, recruiter_id).await?;
        if !self.jobs.delete(id).await? {
            return Err(Error::NotFound("Job not found".into()));
        }
        tracing::info!(job_id = %id, "job deleted");
        Ok(())
    }

    pub async fn list_for_recruiter(&self, recruiter_id: Uuid) -> Result<Vec<RecruiterJobSummary>> {
        let jobs = self.jobs.list_by_recruiter(recruiter_id).await?;
        let ids: Vec<Uuid> = jobs.iter().map(|j| j.id).collect();
        let mut counts: HashMap<Uuid, usize> = HashMap::new();
        for application in self.applications.list_by_jobs(&ids).await? {
            *counts.entry(application.job_id).or_default() += 1;
        }
        Ok(jobs
            .into_iter()
            .map(|job| RecruiterJobSummary {
                application_count: counts.get(&job.id).copied().unwrap_or(0),
                job,
            })
            .collect())
    }
}
