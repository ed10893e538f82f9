use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;

use crate::{
    dto::job_dto::{CreateJobPayload, JobListQuery, UpdateJobPayload},
    error::Result,
    middleware::auth::{CurrentUser, RecruiterUser},
    utils::validation::ValidatedJson,
    AppState,
};

#[axum::debug_handler]
pub async fn list_jobs(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(query): Query<JobListQuery>,
) -> Result<impl IntoResponse> {
    let jobs = state.job_service.list_active(query.into()).await?;
    Ok(Json(jobs))
}

#[axum::debug_handler]
pub async fn get_job(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let job = state.job_service.get_for_viewer(id, &user).await?;
    Ok(Json(job))
}

#[axum::debug_handler]
pub async fn create_job(
    State(state): State<AppState>,
    RecruiterUser(user): RecruiterUser,
    ValidatedJson(payload): ValidatedJson<CreateJobPayload>,
) -> Result<impl IntoResponse> {
    let job = state.job_service.create(user.id, payload).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

#[axum::debug_handler]
pub async fn update_job(
    State(state): State<AppState>,
    RecruiterUser(user): RecruiterUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateJobPayload>,
) -> Result<impl IntoResponse> {
    let job = state.job_service.update(id, user.id, payload).await?;
    Ok(Json(job))
}

#[axum::debug_handler]
pub async fn delete_job(
    State(state): State<AppState>,
    RecruiterUser(user): RecruiterUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.job_service.delete(id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn list_recruiter_jobs(
    State(state): State<AppState>,
    RecruiterUser(user): RecruiterUser,
) -> Result<impl IntoResponse> {
    let jobs = state.job_service.list_for_recruiter(user.id).await?;
    Ok(Json(jobs))
}
