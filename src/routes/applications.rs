use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;

use crate::{
    dto::application_dto::{CreateApplicationPayload, UpdateApplicationStatusPayload},
    error::Result,
    middleware::auth::{CandidateUser, RecruiterUser},
    utils::validation::ValidatedJson,
    AppState,
};

#[axum::debug_handler]
pub async fn create_application(
    State(state): State<AppState>,
    CandidateUser(user): CandidateUser,
    ValidatedJson(payload): ValidatedJson<CreateApplicationPayload>,
) -> Result<impl IntoResponse> {
    let application = state.application_service.apply(user.id, payload).await?;
    Ok((StatusCode::CREATED, Json(application)))
}

#[axum::debug_handler]
pub async fn list_candidate_applications(
    State(state): State<AppState>,
    CandidateUser(user): CandidateUser,
) -> Result<impl IntoResponse> {
    let applications = state.application_service.list_for_candidate(user.id).await?;
    Ok(Json(applications))
}

#[axum::debug_handler]
pub async fn list_job_applications(
    State(state): State<AppState>,
    RecruiterUser(user): RecruiterUser,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let applications = state
        .application_service
        .list_for_job(job_id, user.id)
        .await?;
    Ok(Json(applications))
}

#[axum::debug_handler]
pub async fn update_application_status(
    State(state): State<AppState>,
    RecruiterUser(user): RecruiterUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateApplicationStatusPayload>,
) -> Result<impl IntoResponse> {
    let application = state
        .application_service
        .update_status(id, user.id, payload)
        .await?;
    Ok(Json(application))
}

#[axum::debug_handler]
pub async fn withdraw_application(
    State(state): State<AppState>,
    CandidateUser(user): CandidateUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.application_service.withdraw(id, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
