use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

/// Ten years. Longer lifetimes overflow timestamp arithmetic.
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365 * 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(format!("unknown storage backend '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub storage_backend: StorageBackend,
    pub database_url: Option<String>,
    pub session_secret: String,
    pub session_ttl_hours: i64,
    pub cookie_secure: bool,
    pub cors_origin: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_model: String,
    pub ai_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let storage_backend = get_env_or("STORAGE_BACKEND", StorageBackend::Postgres)?;
        let database_url = env::var("DATABASE_URL").ok().filter(|v| !v.is_empty());
        if storage_backend == StorageBackend::Postgres && database_url.is_none() {
            return Err(Error::Config(
                "Missing environment variable: DATABASE_URL".to_string(),
            ));
        }

        Ok(Self {
            server_address: env::var("SERVER_ADDRESS").unwrap_or_else(|_| "0.0.0.0:5000".into()),
            storage_backend,
            database_url,
            session_secret: get_env("SESSION_SECRET")?,
            session_ttl_hours: session_ttl(get_env_or("SESSION_TTL_HOURS", 168)?)?,
            cookie_secure: get_env_or("COOKIE_SECURE", false)?,
            cors_origin: env::var("CORS_ORIGIN").ok().filter(|v| !v.is_empty()),
            openai_api_key: env::var("OPENAI_API_KEY").ok().filter(|v| !v.is_empty()),
            openai_base_url: env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".into()),
            openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o".into()),
            ai_timeout_secs: get_env_or("AI_TIMEOUT_SECS", 60)?,
        })
    }
}

fn session_ttl(hours: i64) -> Result<i64> {
    if (1..=MAX_SESSION_TTL_HOURS).contains(&hours) {
        Ok(hours)
    } else {
        Err(Error::Config(format!(
            "SESSION_TTL_HOURS must be between 1 and {}, got {}",
            MAX_SESSION_TTL_HOURS, hours
        )))
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_or<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_backend_parses_known_names() {
        assert_eq!("memory".parse::<StorageBackend>(), Ok(StorageBackend::Memory));
        assert_eq!(" Postgres ".parse::<StorageBackend>(), Ok(StorageBackend::Postgres));
        assert!("sqlite".parse::<StorageBackend>().is_err());
    }

    #[test]
    fn unset_variables_fall_back_to_default() {
        let value: u64 = get_env_or("RECRUITMENT_PORTAL_UNSET_TIMEOUT", 42).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn session_ttl_must_stay_in_range() {
        assert_eq!(session_ttl(168).unwrap(), 168);
        assert!(session_ttl(0).is_err());
        assert!(session_ttl(-3).is_err());
        assert!(session_ttl(i64::MAX).is_err());
        assert!(session_ttl(MAX_SESSION_TTL_HOURS).is_ok());
    }
}
