//! Storage contracts for the portal's entities.
//!
//! Every write is a whole-row insert or upsert. Handlers never see the
//! backing store directly; they go through the services, which hold these
//! traits behind `Arc<dyn _>` so Postgres and the in-memory store are
//! interchangeable.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    application::{Application, NewApplication},
    job::{JobFilter, JobPosting, NewJobPosting},
    profile::{CandidateProfile, RecruiterProfile},
    user::{NewUser, User},
};

use super::{memory::MemoryStore, postgres::PgStore};

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a user. A taken username or email yields `Error::AlreadyExists`.
    async fn create(&self, user: NewUser) -> Result<User>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>>;
}

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn find_candidate(&self, user_id: Uuid) -> Result<Option<CandidateProfile>>;
    async fn find_candidates(&self, user_ids: &[Uuid]) -> Result<Vec<CandidateProfile>>;
    /// Replaces the stored profile for `profile.user_id`, inserting it if absent.
    async fn upsert_candidate(&self, profile: &CandidateProfile) -> Result<CandidateProfile>;
    async fn find_recruiter(&self, user_id: Uuid) -> Result<Option<RecruiterProfile>>;
    async fn upsert_recruiter(&self, profile: &RecruiterProfile) -> Result<RecruiterProfile>;
}

#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn create(&self, job: NewJobPosting) -> Result<JobPosting>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<JobPosting>>;
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<JobPosting>>;
    /// Active postings matching `filter`, newest first.
    async fn list_active(&self, filter: &JobFilter) -> Result<Vec<JobPosting>>;
    /// All postings owned by a recruiter, active or not, newest first.
    async fn list_by_recruiter(&self, recruiter_id: Uuid) -> Result<Vec<JobPosting>>;
    async fn update(&self, job: &JobPosting) -> Result<JobPosting>;
    /// Deletes the posting together with its applications.
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Inserts an application. A second row for the same (candidate, job)
    /// pair yields `Error::AlreadyExists`, even under concurrent inserts.
    async fn create(&self, application: NewApplication) -> Result<Application>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Application>>;
    async fn find_by_candidate_and_job(
        &self,
        candidate_id: Uuid,
        job_id: Uuid,
    ) -> Result<Option<Application>>;
    async fn list_by_candidate(&self, candidate_id: Uuid) -> Result<Vec<Application>>;
    async fn list_by_jobs(&self, job_ids: &[Uuid]) -> Result<Vec<Application>>;
    async fn update(&self, application: &Application) -> Result<Application>;
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub jobs: Arc<dyn JobRepository>,
    pub applications: Arc<dyn ApplicationRepository>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        let store = Arc::new(PgStore::new(pool));
        Self {
            users: store.clone(),
            profiles: store.clone(),
            jobs: store.clone(),
            applications: store,
        }
    }

    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::default());
        Self {
            users: store.clone(),
            profiles: store.clone(),
            jobs: store.clone(),
            applications: store,
        }
    }
}
