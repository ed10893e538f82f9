pub mod ai_service;
pub mod analytics_service;
pub mod application_service;
pub mod auth_service;
pub mod job_service;
pub mod llm_client;
pub mod profile_service;
