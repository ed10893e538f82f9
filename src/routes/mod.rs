use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::middleware::cors::cors_layer;
use crate::AppState;

pub mod applications;
pub mod auth;
pub mod candidate;
pub mod health;
pub mod jobs;
pub mod recruiter;

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(state.config.cors_origin.as_deref());

    let auth_api = Router::new()
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login))
        .route("/api/logout", post(auth::logout))
        .route("/api/user", get(auth::current_user));

    let jobs_api = Router::new()
        .route("/api/jobs", get(jobs::list_jobs).post(jobs::create_job))
        .route(
            "/api/jobs/:id",
            get(jobs::get_job)
                .patch(jobs::update_job)
                .delete(jobs::delete_job),
        )
        .route(
            "/api/jobs/:id/applications",
            get(applications::list_job_applications),
        );

    let applications_api = Router::new()
        .route("/api/applications", post(applications::create_application))
        .route(
            "/api/applications/:id",
            patch(applications::update_application_status)
                .delete(applications::withdraw_application),
        );

    let candidate_api = Router::new()
        .route(
            "/api/candidate/profile",
            get(candidate::get_profile).patch(candidate::update_profile),
        )
        .route(
            "/api/candidate/applications",
            get(applications::list_candidate_applications),
        )
        .route("/api/candidate/resume/analyze", post(candidate::analyze_resume))
        .route(
            "/api/candidate/recommendations",
            get(candidate::recommendations),
        );

    let recruiter_api = Router::new()
        .route(
            "/api/recruiter/profile",
            get(recruiter::get_profile).patch(recruiter::update_profile),
        )
        .route("/api/recruiter/jobs", get(jobs::list_recruiter_jobs))
        .route("/api/recruiter/analytics", get(recruiter::analytics));

    Router::new()
        .route("/health", get(health::health))
        .merge(auth_api)
        .merge(jobs_api)
        .merge(applications_api)
        .merge(candidate_api)
        .merge(recruiter_api)
        .with_state(state)
        .layer(DefaultBodyLimit::max(2 * 1024 * 1024))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        let status = res.status();
                        let elapsed_ms = latency.as_millis() as u64;
                        if status.is_server_error() {
                            tracing::error!(%status, elapsed_ms, "response");
                        } else {
                            tracing::info!(%status, elapsed_ms, "response");
                        }
                    },
                ),
        )
}
