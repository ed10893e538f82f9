//! Request extractors that resolve the caller from the session token.
//!
//! The token is read from the `session` cookie first and from an
//! `Authorization: Bearer` header otherwise.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use uuid::Uuid;

use crate::error::Error;
use crate::models::user::UserRole;
use crate::utils::token::token_from_cookie_header;
use crate::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: Uuid,
    pub role: UserRole,
}

/// A signed-in user whose role is `recruiter`.
#[derive(Debug, Clone, Copy)]
pub struct RecruiterUser(pub CurrentUser);

/// A signed-in user whose role is `candidate`.
#[derive(Debug, Clone, Copy)]
pub struct CandidateUser(pub CurrentUser);

fn session_token(parts: &Parts) -> Option<&str> {
    let from_cookie = parts
        .headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .find_map(token_from_cookie_header);
    if from_cookie.is_some() {
        return from_cookie;
    }

    let auth = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    auth.strip_prefix("Bearer ")
        .or_else(|| auth.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = session_token(parts)
            .ok_or_else(|| Error::Unauthorized("Not authenticated".into()))?;

        let claims = state.sessions.verify(token).map_err(|e| {
            tracing::debug!(error = %e, "rejected session token");
            Error::Unauthorized("Invalid or expired session".into())
        })?;

        Ok(CurrentUser {
            id: claims.sub,
            role: claims.role,
        })
    }
}

#[async_trait]
impl FromRequestParts<AppState> for RecruiterUser {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let user = CurrentUser::from_request_parts(parts, state).await?;
        if user.role != UserRole::Recruiter {
            return Err(Error::Forbidden("Recruiter access required".into()));
        }
        Ok(RecruiterUser(user))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CandidateUser {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let user = CurrentUser::from_request_parts(parts, state).await?;
        if user.role != UserRole::Candidate {
            return Err(Error::Forbidden("Candidate access required".into()));
        }
        Ok(CandidateUser(user))
    }
}
