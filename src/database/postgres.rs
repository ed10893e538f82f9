use async_trait::async_trait;
use sqlx::PgPool;
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

const USER_COLUMNS: &str = "id, username, email, full_name, password_hash, role, created_at";

const CANDIDATE_PROFILE_COLUMNS: &str = "id, user_id, headline, phone, location, resume, skills, education, experience, ai_evaluation, updated_at";

const RECRUITER_PROFILE_COLUMNS: &str =
    "id, user_id, company, position, phone, company_website, updated_at";

const JOB_COLUMNS: &str = "id, recruiter_id, title, company, location, description, requirements, job_type, experience_level, salary_min, salary_max, skills, is_active, created_at, updated_at";

const APPLICATION_COLUMNS: &str =
    "id, job_id, candidate_id, status, cover_letter, ai_score, ai_notes, created_at, updated_at";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn duplicate_as(err: sqlx::Error, message: &str) -> Error {
    match Error::from(err) {
        Error::AlreadyExists(_) => Error::AlreadyExists(message.to_string()),
        other => other,
    }
}

#[async_trait]
impl UserRepository for PgStore {
    async fn create(&self, user: NewUser) -> Result<User> {
        let query = format!(
            "INSERT INTO users (id, username, email, full_name, password_hash, role)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&query)
            .bind(Uuid::new_v4())
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.full_name)
            .bind(&user.password_hash)
            .bind(user.role)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| duplicate_as(e, "Username or email already exists"))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let query = format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let query = format!(
            "SELECT {} FROM users WHERE LOWER(email) = LOWER($1)",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>> {
        let query = format!("SELECT {} FROM users WHERE id = ANY($1)", USER_COLUMNS);
        let users = sqlx::query_as::<_, User>(&query)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }
}

#[async_trait]
impl ProfileRepository for PgStore {
    async fn find_candidate(&self, user_id: Uuid) -> Result<Option<CandidateProfile>> {
        let query = format!(
            "SELECT {} FROM candidate_profiles WHERE user_id = $1",
            CANDIDATE_PROFILE_COLUMNS
        );
        let profile = sqlx::query_as::<_, CandidateProfile>(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(profile)
    }

    async fn find_candidates(&self, user_ids: &[Uuid]) -> Result<Vec<CandidateProfile>> {
        let query = format!(
            "SELECT {} FROM candidate_profiles WHERE user_id = ANY($1)",
            CANDIDATE_PROFILE_COLUMNS
        );
        let profiles = sqlx::query_as::<_, CandidateProfile>(&query)
            .bind(user_ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(profiles)
    }

    async fn upsert_candidate(&self, profile: &CandidateProfile) -> Result<CandidateProfile> {
        let query = format!(
            "INSERT INTO candidate_profiles (
                id, user_id, headline, phone, location, resume,
                skills, education, experience, ai_evaluation, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, NOW())
            ON CONFLICT (user_id) DO UPDATE SET
                headline = EXCLUDED.headline,
                phone = EXCLUDED.phone,
                location = EXCLUDED.location,
                resume = EXCLUDED.resume,
                skills = EXCLUDED.skills,
                education = EXCLUDED.education,
                experience = EXCLUDED.experience,
                ai_evaluation = EXCLUDED.ai_evaluation,
                updated_at = NOW()
            RETURNING {}",
            CANDIDATE_PROFILE_COLUMNS
        );
        let saved = sqlx::query_as::<_, CandidateProfile>(&query)
            .bind(profile.id)
            .bind(profile.user_id)
            .bind(&profile.headline)
            .bind(&profile.phone)
            .bind(&profile.location)
            .bind(&profile.resume)
            .bind(&profile.skills)
            .bind(&profile.education)
            .bind(&profile.experience)
            .bind(&profile.ai_evaluation)
            .fetch_one(&self.pool)
            .await?;
        Ok(saved)
    }

    async fn find_recruiter(&self, user_id: Uuid) -> Result<Option<RecruiterProfile>> {
        let query = format!(
            "SELECT {} FROM recruiter_profiles WHERE user_id = $1",
            RECRUITER_PROFILE_COLUMNS
        );
        let profile = sqlx::query_as::<_, RecruiterProfile>(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(profile)
    }

    async fn upsert_recruiter(&self, profile: &RecruiterProfile) -> Result<RecruiterProfile> {
        let query = format!(
            "INSERT INTO recruiter_profiles (
                id, user_id, company, position, phone, company_website, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, NOW())
            ON CONFLICT (user_id) DO UPDATE SET
                company = EXCLUDED.company,
                position = EXCLUDED.position,
                phone = EXCLUDED.phone,
                company_website = EXCLUDED.company_website,
                updated_at = NOW()
            RETURNING {}",
            RECRUITER_PROFILE_COLUMNS
        );
        let saved = sqlx::query_as::<_, RecruiterProfile>(&query)
            .bind(profile.id)
            .bind(profile.user_id)
            .bind(&profile.company)
            .bind(&profile.position)
            .bind(&profile.phone)
            .bind(&profile.company_website)
            .fetch_one(&self.pool)
            .await?;
        Ok(saved)
    }
}

#[async_trait]
impl JobRepository for PgStore {
    async fn create(&self, job: NewJobPosting) -> Result<JobPosting> {
        let query = format!(
            "INSERT INTO job_postings (
                id, recruiter_id, title, company, location, description, requirements,
                job_type, experience_level, salary_min, salary_max, skills, is_active
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7,
                $8, $9, $10, $11, $12, $13
            )
            RETURNING {}",
            JOB_COLUMNS
        );
        let created = sqlx::query_as::<_, JobPosting>(&query)
            .bind(Uuid::new_v4())
            .bind(job.recruiter_id)
            .bind(&job.title)
            .bind(&job.company)
            .bind(&job.location)
            .bind(&job.description)
            .bind(&job.requirements)
            .bind(&job.job_type)
            .bind(&job.experience_level)
            .bind(job.salary_min)
            .bind(job.salary_max)
            .bind(&job.skills)
            .bind(job.is_active)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<JobPosting>> {
        let query = format!("SELECT {} FROM job_postings WHERE id = $1", JOB_COLUMNS);
        let job = sqlx::query_as::<_, JobPosting>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(job)
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<JobPosting>> {
        let query = format!(
            "SELECT {} FROM job_postings WHERE id = ANY($1)",
            JOB_COLUMNS
        );
        let jobs = sqlx::query_as::<_, JobPosting>(&query)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(jobs)
    }

    async fn list_active(&self, filter: &JobFilter) -> Result<Vec<JobPosting>> {
        let (query, args) = active_jobs_query(filter);
        let mut statement = sqlx::query_as::<_, JobPosting>(&query);
        for value in &args {
            statement = statement.bind(value);
        }
        let jobs = statement.fetch_all(&self.pool).await?;
        Ok(jobs)
    }

    async fn list_by_recruiter(&self, recruiter_id: Uuid) -> Result<Vec<JobPosting>> {
        let query = format!(
            "SELECT {} FROM job_postings WHERE recruiter_id = $1 ORDER BY created_at DESC",
            JOB_COLUMNS
        );
        let jobs = sqlx::query_as::<_, JobPosting>(&query)
            .bind(recruiter_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(jobs)
    }

    async fn update(&self, job: &JobPosting) -> Result<JobPosting> {
        let query = format!(
            "UPDATE job_postings
            SET
                title = $2,
                company = $3,
                location = $4,
                description = $5,
                requirements = $6,
                job_type = $7,
                experience_level = $8,
                salary_min = $9,
                salary_max = $10,
                skills = $11,
                is_active = $12,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}",
            JOB_COLUMNS
        );
        let updated = sqlx::query_as::<_, JobPosting>(&query)
            .bind(job.id)
            .bind(&job.title)
            .bind(&job.company)
            .bind(&job.location)
            .bind(&job.description)
            .bind(&job.requirements)
            .bind(&job.job_type)
            .bind(&job.experience_level)
            .bind(job.salary_min)
            .bind(job.salary_max)
            .bind(&job.skills)
            .bind(job.is_active)
            .fetch_one(&self.pool)
            .await?;
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let res = sqlx::query("DELETE FROM job_postings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}

#[async_trait]
impl ApplicationRepository for PgStore {
    async fn create(&self, application: NewApplication) -> Result<Application> {
        let query = format!(
            "INSERT INTO applications (id, job_id, candidate_id, status, cover_letter)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {}",
            APPLICATION_COLUMNS
        );
        sqlx::query_as::<_, Application>(&query)
            .bind(Uuid::new_v4())
            .bind(application.job_id)
            .bind(application.candidate_id)
            .bind(ApplicationStatus::Applied)
            .bind(&application.cover_letter)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| duplicate_as(e, "You have already applied for this job"))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Application>> {
        let query = format!("SELECT {} FROM applications WHERE id = $1", APPLICATION_COLUMNS);
        let application = sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(application)
    }

    async fn find_by_candidate_and_job(
        &self,
        candidate_id: Uuid,
        job_id: Uuid,
    ) -> Result<Option<Application>> {
        let query = format!(
            "SELECT {} FROM applications WHERE candidate_id = $1 AND job_id = $2",
            APPLICATION_COLUMNS
        );
        let application = sqlx::query_as::<_, Application>(&query)
            .bind(candidate_id)
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(application)
    }

    async fn list_by_candidate(&self, candidate_id: Uuid) -> Result<Vec<Application>> {
        let query = format!(
            "SELECT {} FROM applications WHERE candidate_id = $1 ORDER BY created_at DESC",
            APPLICATION_COLUMNS
        );
        let items = sqlx::query_as::<_, Application>(&query)
            .bind(candidate_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    async fn list_by_jobs(&self, job_ids: &[Uuid]) -> Result<Vec<Application>> {
        let query = format!(
            "SELECT {} FROM applications WHERE job_id = ANY($1) ORDER BY created_at DESC",
            APPLICATION_COLUMNS
        );
        let items = sqlx::query_as::<_, Application>(&query)
            .bind(job_ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    async fn update(&self, application: &Application) -> Result<Application> {
        let query = format!(
            "UPDATE applications
            SET status = $2, cover_letter = $3, ai_score = $4, ai_notes = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING {}",
            APPLICATION_COLUMNS
        );
        let updated = sqlx::query_as::<_, Application>(&query)
            .bind(application.id)
            .bind(application.status)
            .bind(&application.cover_letter)
            .bind(application.ai_score)
            .bind(&application.ai_notes)
            .fetch_one(&self.pool)
            .await?;
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let res = sqlx::query("DELETE FROM applications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}

/// Builds the job-board query. Search terms are matched as plain substrings
/// with `position`, so `%` and `_` in user input carry no meaning.
fn active_jobs_query(filter: &JobFilter) -> (String, Vec<String>) {
    let mut filters = vec!["is_active = TRUE".to_string()];
    let mut args: Vec<String> = Vec::new();

    if let Some(search) = &filter.search {
        let n = args.len() + 1;
        filters.push(format!(
            "(position(LOWER(${n}) IN LOWER(title)) > 0 \
             OR position(LOWER(${n}) IN LOWER(company)) > 0 \
             OR position(LOWER(${n}) IN LOWER(description)) > 0)"
        ));
        args.push(search.clone());
    }
    if let Some(location) = &filter.location {
        filters.push(format!(
            "position(LOWER(${}) IN LOWER(location)) > 0",
            args.len() + 1
        ));
        args.push(location.clone());
    }
    if let Some(job_type) = &filter.job_type {
        filters.push(format!("LOWER(job_type) = LOWER(${})", args.len() + 1));
        args.push(job_type.clone());
    }

    let query = format!(
        "SELECT {} FROM job_postings WHERE {} ORDER BY created_at DESC",
        JOB_COLUMNS,
        filters.join(" AND ")
    );
    (query, args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_terms_are_bound_verbatim() {
        let filter = JobFilter {
            search: Some("100%_remote".into()),
            location: Some("Berlin".into()),
            job_type: Some("contract".into()),
        };
        let (query, args) = active_jobs_query(&filter);
        assert_eq!(args, vec!["100%_remote", "Berlin", "contract"]);
        assert!(!query.contains("ILIKE"));
        assert!(query.contains("position(LOWER($1) IN LOWER(title)) > 0"));
        assert!(query.contains("position(LOWER($2) IN LOWER(location)) > 0"));
        assert!(query.contains("LOWER(job_type) = LOWER($3)"));
    }

    #[test]
    fn empty_filter_lists_active_jobs_only() {
        let (query, args) = active_jobs_query(&JobFilter::default());
        assert!(args.is_empty());
        assert!(query.contains("WHERE is_active = TRUE ORDER BY created_at DESC"));
    }
}
