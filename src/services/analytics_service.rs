use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use uuid::Uuid;

use crate::database::repository::{ApplicationRepository, JobRepository};
use crate::dto::analytics_dto::{RecruiterAnalytics, TopJob};
use crate::error::Result;
use crate::models::{
    application::{Application, ApplicationStatus},
    job::JobPosting,
};

const TOP_JOBS: usize = 5;

#[derive(Clone)]
pub struct AnalyticsService {
    jobs: Arc<dyn JobRepository>,
    applications: Arc<dyn ApplicationRepository>,
}

impl AnalyticsService {
    pub fn new(jobs: Arc<dyn JobRepository>, applications: Arc<dyn ApplicationRepository>) -> Self {
        Self { jobs, applications }
    }

    pub async fn recruiter_analytics(&self, recruiter_id: Uuid) -> Result<RecruiterAnalytics> {
        let jobs = self.jobs.list_by_recruiter(recruiter_id).await?;
        let ids: Vec<Uuid> = jobs.iter().map(|j| j.id).collect();
        let applications = self.applications.list_by_jobs(&ids).await?;
        Ok(summarize(&jobs, &applications))
    }
}

pub fn summarize(jobs: &[JobPosting], applications: &[Application]) -> RecruiterAnalytics {
    let mut by_status: BTreeMap<String, usize> = ApplicationStatus::ALL
        .iter()
        .map(|s| (s.as_str().to_string(), 0))
        .collect();
    let mut per_job: HashMap<Uuid, usize> = HashMap::new();
    let mut score_total = 0i64;
    let mut scored = 0usize;

    for application in applications {
        *by_status
            .entry(application.status.as_str().to_string())
            .or_default() += 1;
        *per_job.entry(application.job_id).or_default() += 1;
        if let Some(score) = application.ai_score {
            score_total += i64::from(score);
            scored += 1;
        }
    }

    let average_ai_score = (scored > 0).then(|| {
        let avg = score_total as f64 / scored as f64;
        (avg * 10.0).round() / 10.0
    });

    let mut top_jobs: Vec<TopJob> = jobs
        .iter()
        .map(|job| TopJob {
            job_id: job.id,
            title: job.title.clone(),
            applications: per_job.get(&job.id).copied().unwrap_or(0),
        })
        .filter(|t| t.applications > 0)
        .collect();
    top_jobs.sort_by(|a, b| b.applications.cmp(&a.applications));
    top_jobs.truncate(TOP_JOBS);

    RecruiterAnalytics {
        total_jobs: jobs.len(),
        active_jobs: jobs.iter().filter(|j| j.is_active).count(),
        total_applications: applications.len(),
        applications_by_status: by_status,
        average_ai_score,
        top_jobs,
    }
}
