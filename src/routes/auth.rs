use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use serde_json::json;

use crate::{
    dto::auth_dto::{LoginPayload, RegisterPayload},
    error::Result,
    middleware::auth::CurrentUser,
    models::user::User,
    utils::{
        token::{clear_session_cookie, session_cookie},
        validation::ValidatedJson,
    },
    AppState,
};

fn issue_cookie(state: &AppState, user: &User) -> Result<String> {
    let token = state.sessions.issue(user.id, user.role)?;
    Ok(session_cookie(
        &token,
        state.sessions.ttl_seconds(),
        state.config.cookie_secure,
    ))
}

#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterPayload>,
) -> Result<impl IntoResponse> {
    let user = state.auth_service.register(payload).await?;
    let cookie = issue_cookie(&state, &user)?;
    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie)],
        Json(user),
    ))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginPayload>,
) -> Result<impl IntoResponse> {
    let user = state.auth_service.login(payload).await?;
    let cookie = issue_cookie(&state, &user)?;
    Ok(([(header::SET_COOKIE, cookie)], Json(user)))
}

#[axum::debug_handler]
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::SET_COOKIE, clear_session_cookie(state.config.cookie_secure))],
        Json(json!({ "success": true })),
    )
}

#[axum::debug_handler]
pub async fn current_user(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<impl IntoResponse> {
    let user = state.auth_service.get_user(user.id).await?;
    Ok(Json(user))
}
