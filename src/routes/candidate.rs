use axum::{
    extract::State,
    response::{IntoResponse, Json},
};

use crate::{
    dto::profile_dto::{AnalyzeResumePayload, UpdateCandidateProfilePayload},
    error::Result,
    middleware::auth::CandidateUser,
    utils::validation::ValidatedJson,
    AppState,
};

#[axum::debug_handler]
pub async fn get_profile(
    State(state): State<AppState>,
    CandidateUser(user): CandidateUser,
) -> Result<impl IntoResponse> {
    let profile = state.profile_service.candidate_profile(user.id).await?;
    Ok(Json(profile))
}

#[axum::debug_handler]
pub async fn update_profile(
    State(state): State<AppState>,
    CandidateUser(user): CandidateUser,
    ValidatedJson(payload): ValidatedJson<UpdateCandidateProfilePayload>,
) -> Result<impl IntoResponse> {
    let profile = state
        .profile_service
        .update_candidate_profile(user.id, payload)
        .await?;
    Ok(Json(profile))
}

/// Always 200: when the model is unavailable the parsed resume is empty.
#[axum::debug_handler]
pub async fn analyze_resume(
    State(state): State<AppState>,
    CandidateUser(user): CandidateUser,
    ValidatedJson(payload): ValidatedJson<AnalyzeResumePayload>,
) -> Result<impl IntoResponse> {
    let parsed = state
        .profile_service
        .analyze_resume(user.id, payload.resume_text)
        .await?;
    Ok(Json(parsed))
}

#[axum::debug_handler]
pub async fn recommendations(
    State(state): State<AppState>,
    CandidateUser(user): CandidateUser,
) -> Result<impl IntoResponse> {
    let response = state.profile_service.recommendations(user.id).await?;
    Ok(Json(response))
}
