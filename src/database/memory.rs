//! Process-local store used for development runs (`STORAGE_BACKEND=memory`)
//! and by the HTTP tests. Every trait method takes the lock once, so a
//! check-then-insert inside one method is atomic.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{
    application::{Application, ApplicationStatus, NewApplication},
    job::{JobFilter, JobPosting, NewJobPosting},
    profile::{CandidateProfile, RecruiterProfile},
    user::{NewUser, User},
};

use super::repository::{
    ApplicationRepository, JobRepository, ProfileRepository, UserRepository,
};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    candidate_profiles: HashMap<Uuid, CandidateProfile>,
    recruiter_profiles: HashMap<Uuid, RecruiterProfile>,
    jobs: HashMap<Uuid, JobPosting>,
    applications: HashMap<Uuid, Application>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

fn newest_first<T, F>(mut items: Vec<T>, key: F) -> Vec<T>
where
    F: Fn(&T) -> chrono::DateTime<Utc>,
{
    items.sort_by_key(|item| std::cmp::Reverse(key(item)));
    items
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: NewUser) -> Result<User> {
        let mut tables = self.tables.write().await;
        let taken = tables.users.values().any(|u| {
            u.username == user.username || u.email.eq_ignore_ascii_case(&user.email)
        });
        if taken {
            return Err(Error::AlreadyExists(
                "Username or email already exists".to_string(),
            ));
        }
        let created = User {
            id: Uuid::new_v4(),
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            password_hash: user.password_hash,
            role: user.role,
            created_at: Utc::now(),
        };
        tables.users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>> {
        let tables = self.tables.read().await;
        Ok(ids.iter().filter_map(|id| tables.users.get(id).cloned()).collect())
    }
}

#[async_trait]
impl ProfileRepository for MemoryStore {
    async fn find_candidate(&self, user_id: Uuid) -> Result<Option<CandidateProfile>> {
        Ok(self
            .tables
            .read()
            .await
            .candidate_profiles
            .get(&user_id)
            .cloned())
    }

    async fn find_candidates(&self, user_ids: &[Uuid]) -> Result<Vec<CandidateProfile>> {
        let tables = self.tables.read().await;
        Ok(user_ids
            .iter()
            .filter_map(|id| tables.candidate_profiles.get(id).cloned())
            .collect())
    }

    async fn upsert_candidate(&self, profile: &CandidateProfile) -> Result<CandidateProfile> {
        let mut tables = self.tables.write().await;
        let mut saved = profile.clone();
        if let Some(existing) = tables.candidate_profiles.get(&profile.user_id) {
            saved.id = existing.id;
        }
        saved.updated_at = Utc::now();
        tables
            .candidate_profiles
            .insert(saved.user_id, saved.clone());
        Ok(saved)
    }

    async fn find_recruiter(&self, user_id: Uuid) -> Result<Option<RecruiterProfile>> {
        Ok(self
            .tables
            .read()
            .await
            .recruiter_profiles
            .get(&user_id)
            .cloned())
    }

    async fn upsert_recruiter(&self, profile: &RecruiterProfile) -> Result<RecruiterProfile> {
        let mut tables = self.tables.write().await;
        let mut saved = profile.clone();
        if let Some(existing) = tables.recruiter_profiles.get(&profile.user_id) {
            saved.id = existing.id;
        }
        saved.updated_at = Utc::now();
        tables
            .recruiter_profiles
            .insert(saved.user_id, saved.clone());
        Ok(saved)
    }
}

#[async_trait]
impl JobRepository for MemoryStore {
    async fn create(&self, job: NewJobPosting) -> Result<JobPosting> {
        let now = Utc::now();
        let created = JobPosting {
            id: Uuid::new_v4(),
            recruiter_id: job.recruiter_id,
            title: job.title,
            company: job.company,
            location: job.location,
            description: job.description,
            requirements: job.requirements,
            job_type: job.job_type,
            experience_level: job.experience_level,
            salary_min: job.salary_min,
            salary_max: job.salary_max,
            skills: job.skills,
            is_active: job.is_active,
            created_at: now,
            updated_at: now,
        };
        self.tables
            .write()
            .await
            .jobs
            .insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<JobPosting>> {
        Ok(self.tables.read().await.jobs.get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<JobPosting>> {
        let tables = self.tables.read().await;
        Ok(ids.iter().filter_map(|id| tables.jobs.get(id).cloned()).collect())
    }

    async fn list_active(&self, filter: &JobFilter) -> Result<Vec<JobPosting>> {
        let tables = self.tables.read().await;
        let items = tables
            .jobs
            .values()
            .filter(|job| job.matches(filter))
            .cloned()
            .collect();
        Ok(newest_first(items, |job| job.created_at))
    }

    async fn list_by_recruiter(&self, recruiter_id: Uuid) -> Result<Vec<JobPosting>> {
        let tables = self.tables.read().await;
        let items = tables
            .jobs
            .values()
            .filter(|job| job.recruiter_id == recruiter_id)
            .cloned()
            .collect();
        Ok(newest_first(items, |job| job.created_at))
    }

    async fn update(&self, job: &JobPosting) -> Result<JobPosting> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .jobs
            .get_mut(&job.id)
            .ok_or_else(|| Error::NotFound("Job not found".to_string()))?;
        *stored = JobPosting {
            created_at: stored.created_at,
            updated_at: Utc::now(),
            ..job.clone()
        };
        Ok(stored.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut tables = self.tables.write().await;
        let removed = tables.jobs.remove(&id).is_some();
        if removed {
            tables.applications.retain(|_, app| app.job_id != id);
        }
        Ok(removed)
    }
}

#[async_trait]
impl ApplicationRepository for MemoryStore {
    async fn create(&self, application: NewApplication) -> Result<Application> {
        let mut tables = self.tables.write().await;
        let duplicate = tables.applications.values().any(|existing| {
            existing.candidate_id == application.candidate_id
                && existing.job_id == application.job_id
        });
        if duplicate {
            return Err(Error::AlreadyExists(
                "You have already applied for this job".to_string(),
            ));
        }
        let now = Utc::now();
        let created = Application {
            id: Uuid::new_v4(),
            job_id: application.job_id,
            candidate_id: application.candidate_id,
            status: ApplicationStatus::Applied,
            cover_letter: application.cover_letter,
            ai_score: None,
            ai_notes: None,
            created_at: now,
            updated_at: now,
        };
        tables.applications.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Application>> {
        Ok(self.tables.read().await.applications.get(&id).cloned())
    }

    async fn find_by_candidate_and_job(
        &self,
        candidate_id: Uuid,
        job_id: Uuid,
    ) -> Result<Option<Application>> {
        let tables = self.tables.read().await;
        Ok(tables
            .applications
            .values()
            .find(|app| app.candidate_id == candidate_id && app.job_id == job_id)
            .cloned())
    }

    async fn list_by_candidate(&self, candidate_id: Uuid) -> Result<Vec<Application>> {
        let tables = self.tables.read().await;
        let items = tables
            .applications
            .values()
            .filter(|app| app.candidate_id == candidate_id)
            .cloned()
            .collect();
        Ok(newest_first(items, |app| app.created_at))
    }

    async fn list_by_jobs(&self, job_ids: &[Uuid]) -> Result<Vec<Application>> {
        let tables = self.tables.read().await;
        let items = tables
            .applications
            .values()
            .filter(|app| job_ids.contains(&app.job_id))
            .cloned()
            .collect();
        Ok(newest_first(items, |app| app.created_at))
    }

    async fn update(&self, application: &Application) -> Result<Application> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .applications
            .get_mut(&application.id)
            .ok_or_else(|| Error::NotFound("Application not found".to_string()))?;
        *stored = Application {
            created_at: stored.created_at,
            updated_at: Utc::now(),
            ..application.clone()
        };
        Ok(stored.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        Ok(self
            .tables
            .write()
            .await
            .applications
            .remove(&id)
            .is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::UserRole;
    use std::sync::Arc;

    fn new_user(name: &str, role: UserRole) -> NewUser {
        NewUser {
            username: name.to_string(),
            email: format!("{}@example.com", name),
            full_name: name.to_uppercase(),
            password_hash: "hash".to_string(),
            role,
        }
    }

    fn new_job(recruiter_id: Uuid, title: &str) -> NewJobPosting {
        NewJobPosting {
            recruiter_id,
            title: title.to_string(),
            company: "Acme".to_string(),
            location: "Berlin".to_string(),
            description: "Build things".to_string(),
            requirements: None,
            job_type: "full_time".to_string(),
            experience_level: None,
            salary_min: None,
            salary_max: None,
            skills: vec!["rust".to_string()],
            is_active: true,
        }
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let store = MemoryStore::default();
        UserRepository::create(&store, new_user("ana", UserRole::Candidate))
            .await
            .unwrap();
        let err = UserRepository::create(&store, new_user("ana", UserRole::Recruiter))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn concurrent_duplicate_applications_store_one_row() {
        let store = Arc::new(MemoryStore::default());
        let job = JobRepository::create(store.as_ref(), new_job(Uuid::new_v4(), "Dev"))
            .await
            .unwrap();
        let job_id = job.id;
        let candidate_id = Uuid::new_v4();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                ApplicationRepository::create(
                    store.as_ref(),
                    NewApplication {
                        job_id,
                        candidate_id,
                        cover_letter: None,
                    },
                )
                .await
            }));
        }
        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                created += 1;
            }
        }
        assert_eq!(created, 1);
        let rows = store.list_by_candidate(candidate_id).await.unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn deleting_a_job_removes_its_applications() {
        let store = MemoryStore::default();
        let job = JobRepository::create(&store, new_job(Uuid::new_v4(), "Dev"))
            .await
            .unwrap();
        let candidate_id = Uuid::new_v4();
        ApplicationRepository::create(
            &store,
            NewApplication {
                job_id: job.id,
                candidate_id,
                cover_letter: None,
            },
        )
        .await
        .unwrap();

        assert!(JobRepository::delete(&store, job.id).await.unwrap());
        assert!(store.list_by_candidate(candidate_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn inactive_jobs_are_not_listed() {
        let store = MemoryStore::default();
        let recruiter = Uuid::new_v4();
        let mut hidden = JobRepository::create(&store, new_job(recruiter, "Hidden"))
            .await
            .unwrap();
        JobRepository::create(&store, new_job(recruiter, "Visible"))
            .await
            .unwrap();
        hidden.is_active = false;
        JobRepository::update(&store, &hidden).await.unwrap();

        let listed = store.list_active(&JobFilter::default()).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "Visible");
        assert_eq!(store.list_by_recruiter(recruiter).await.unwrap().len(), 2);
    }
}
