//! Signed session tokens carried in the `session` cookie.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::MAX_SESSION_TTL_HOURS;
use crate::error::Result;
use crate::models::user::UserRole;

pub const SESSION_COOKIE: &str = "session";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: Uuid,
    pub role: UserRole,
    pub iat: usize,
    pub exp: usize,
}

#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl SessionKeys {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(ttl_hours.clamp(1, MAX_SESSION_TTL_HOURS)),
        }
    }

    pub fn ttl_seconds(&self) -> i64 {
        self.ttl.num_seconds()
    }

    pub fn issue(&self, user_id: Uuid, role: UserRole) -> Result<String> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: user_id,
            role,
            iat: now.timestamp() as usize,
            exp: (now + self.ttl).timestamp() as usize,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        tracing::debug!(user_id = %user_id, "session issued");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> Result<SessionClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        let data = decode::<SessionClaims>(token, &self.decoding, &validation)?;
        Ok(data.claims)
    }
}

pub fn session_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        SESSION_COOKIE, token, max_age_secs
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

pub fn clear_session_cookie(secure: bool) -> String {
    session_cookie("", 0, secure)
}

/// Finds the session token in a raw `Cookie` header value.
pub fn token_from_cookie_header(header: &str) -> Option<&str> {
    header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE && !value.is_empty()).then_some(value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_verifies_with_same_secret() {
        let keys = SessionKeys::new("dev-secret", 1);
        let user_id = Uuid::new_v4();
        let token = keys.issue(user_id, UserRole::Recruiter).unwrap();
        let claims = keys.verify(&token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role, UserRole::Recruiter);
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let token = SessionKeys::new("a", 1)
            .issue(Uuid::new_v4(), UserRole::Candidate)
            .unwrap();
        assert!(SessionKeys::new("b", 1).verify(&token).is_err());
    }

    #[test]
    fn oversized_ttl_is_capped() {
        let keys = SessionKeys::new("dev-secret", i64::MAX);
        assert_eq!(keys.ttl_seconds(), MAX_SESSION_TTL_HOURS * 3600);
        let token = keys.issue(Uuid::new_v4(), UserRole::Candidate).unwrap();
        assert!(keys.verify(&token).is_ok());
    }

    #[test]
    fn cookie_header_lookup() {
        assert_eq!(
            token_from_cookie_header("theme=dark; session=abc.def; other=1"),
            Some("abc.def")
        );
        assert_eq!(token_from_cookie_header("session="), None);
        assert_eq!(token_from_cookie_header("sessionid=x"), None);
    }

    #[test]
    fn cookie_attributes() {
        let cookie = session_cookie("tok", 60, true);
        assert!(cookie.starts_with("session=tok;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.ends_with("; Secure"));
        assert!(clear_session_cookie(false).contains("Max-Age=0"));
    }
}
