use axum::{
    extract::State,
    response::{IntoResponse, Json},
};

use crate::{
    dto::profile_dto::UpdateRecruiterProfilePayload,
    error::Result,
    middleware::auth::RecruiterUser,
    utils::validation::ValidatedJson,
    AppState,
};

#[axum::debug_handler]
pub async fn get_profile(
    State(state): State<AppState>,
    RecruiterUser(user): RecruiterUser,
) -> Result<impl IntoResponse> {
    let profile = state.profile_service.recruiter_profile(user.id).await?;
    Ok(Json(profile))
}

#[axum::debug_handler]
pub async fn update_profile(
    State(state): State<AppState>,
    RecruiterUser(user): RecruiterUser,
    ValidatedJson(payload): ValidatedJson<UpdateRecruiterProfilePayload>,
) -> Result<impl IntoResponse> {
    let profile = state
        .profile_service
        .update_recruiter_profile(user.id, payload)
        .await?;
    Ok(Json(profile))
}

#[axum::debug_handler]
pub async fn analytics(
    State(state): State<AppState>,
    RecruiterUser(user): RecruiterUser,
) -> Result<impl IntoResponse> {
    let stats = state
        .analytics_service
        .recruiter_analytics(user.id)
        .await?;
    Ok(Json(stats))
}
