pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use crate::config::Config;
use crate::database::Repositories;
use crate::services::{
    ai_service::AIService, analytics_service::AnalyticsService,
    application_service::ApplicationService, auth_service::AuthService, job_service::JobService,
    llm_client::LlmClient, profile_service::ProfileService,
};
use crate::utils::token::SessionKeys;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub sessions: SessionKeys,
    pub ai_service: AIService,
    pub auth_service: AuthService,
    pub job_service: JobService,
    pub application_service: ApplicationService,
    pub profile_service: ProfileService,
    pub analytics_service: AnalyticsService,
}

impl AppState {
    pub fn new(config: Config, repos: Repositories, llm: Option<Arc<dyn LlmClient>>) -> Self {
        let sessions = SessionKeys::new(&config.session_secret, config.session_ttl_hours);

        let ai_service = AIService::new(llm);
        let auth_service = AuthService::new(repos.users.clone());
        let job_service = JobService::new(repos.jobs.clone(), repos.applications.clone());
        let application_service = ApplicationService::new(
            repos.applications.clone(),
            repos.profiles.clone(),
            repos.users.clone(),
            job_service.clone(),
            ai_service.clone(),
        );
        let profile_service =
            ProfileService::new(repos.profiles.clone(), repos.jobs.clone(), ai_service.clone());
        let analytics_service = AnalyticsService::new(repos.jobs, repos.applications);

        Self {
            config: Arc::new(config),
            sessions,
            ai_service,
            auth_service,
            job_service,
            application_service,
            profile_service,
            analytics_service,
        }
    }
}
