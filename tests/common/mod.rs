#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use recruitment_portal::{
    config::{Config, StorageBackend},
    database::Repositories,
    error::{Error, Result},
    routes::build_router,
    services::llm_client::{ChatMessage, ChatRole, LlmClient},
    AppState,
};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;

pub fn test_config() -> Config {
    Config {
        server_address: "127.0.0.1:0".into(),
        storage_backend: StorageBackend::Memory,
        database_url: None,
        session_secret: "test_session_secret".into(),
        session_ttl_hours: 1,
        cookie_secure: false,
        cors_origin: None,
        openai_api_key: None,
        openai_base_url: "http://localhost".into(),
        openai_model: "gpt-4o".into(),
        ai_timeout_secs: 5,
    }
}

/// Answers every prompt with a canned reply chosen by the system prompt.
pub struct ScriptedLlm;

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn complete_json(&self, messages: &[ChatMessage]) -> Result<JsonValue> {
        let system = messages
            .iter()
            .find(|m| m.role == ChatRole::System)
            .map(|m| m.content.as_str())
            .unwrap_or_default();

        if system.contains("resume") {
            Ok(json!({
                "skills": ["Rust", "PostgreSQL"],
                "experience": [{"title": "Engineer", "company": "Acme", "duration": "3 years", "description": "Backend"}],
                "education": [{"degree": "BSc", "institution": "MIT", "year": "2018"}],
                "summary": "Backend engineer",
                "yearsOfExperience": 3,
                "evaluation": {"score": 140, "strengths": ["Rust"], "improvements": ["Testing"]}
            }))
        } else if system.contains("recruiter") {
            Ok(json!({"score": 82, "notes": "Strong match", "strengths": ["Rust"], "gaps": []}))
        } else {
            Ok(json!({
                "recommendedRoles": ["Senior Engineer"],
                "skillGaps": ["Kubernetes"],
                "suggestions": ["Contribute to open source"]
            }))
        }
    }
}

/// Provider that is always down.
pub struct FailingLlm;

#[async_trait]
impl LlmClient for FailingLlm {
    async fn complete_json(&self, _messages: &[ChatMessage]) -> Result<JsonValue> {
        Err(Error::Internal("provider unavailable".into()))
    }
}

/// Provider that answers with an object carrying none of the expected fields.
pub struct ErrorObjectLlm;

#[async_trait]
impl LlmClient for ErrorObjectLlm {
    async fn complete_json(&self, _messages: &[ChatMessage]) -> Result<JsonValue> {
        Ok(json!({ "error": "model overloaded" }))
    }
}

/// Scripted replies while healthy, failures after `go_down`.
#[derive(Default)]
pub struct FlakyLlm {
    down: AtomicBool,
}

impl FlakyLlm {
    pub fn go_down(&self) {
        self.down.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl LlmClient for FlakyLlm {
    async fn complete_json(&self, messages: &[ChatMessage]) -> Result<JsonValue> {
        if self.down.load(Ordering::SeqCst) {
            return Err(Error::Internal("provider unavailable".into()));
        }
        ScriptedLlm.complete_json(messages).await
    }
}

pub fn app_with(llm: Option<Arc<dyn LlmClient>>) -> Router {
    let state = AppState::new(test_config(), Repositories::in_memory(), llm);
    build_router(state)
}

pub fn app() -> Router {
    app_with(None)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub cookie: Option<String>,
    pub body: JsonValue,
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: Option<JsonValue>,
) -> TestResponse {
    let headers: Vec<(header::HeaderName, String)> = cookie
        .map(|c| vec![(header::COOKIE, c.to_string())])
        .unwrap_or_default();
    send_with_headers(app, method, uri, headers, body).await
}

pub async fn send_with_headers(
    app: &Router,
    method: &str,
    uri: &str,
    headers: Vec<(header::HeaderName, String)>,
    body: Option<JsonValue>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(name, value);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let res = app.clone().oneshot(request).await.unwrap();
    let status = res.status();
    let cookie = res
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string);
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    TestResponse {
        status,
        cookie,
        body,
    }
}

/// Registers a user and returns its session cookie and id.
pub async fn register(app: &Router, username: &str, role: &str) -> (String, String) {
    let res = send(
        app,
        "POST",
        "/api/register",
        None,
        Some(json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": "secret123",
            "fullName": format!("{} Tester", username),
            "role": role,
        })),
    )
    .await;
    assert_eq!(res.status, StatusCode::CREATED, "register failed: {}", res.body);
    let cookie = res.cookie.expect("session cookie");
    let id = res.body["id"].as_str().unwrap().to_string();
    (cookie, id)
}

pub fn job_payload(title: &str, skills: &[&str]) -> JsonValue {
    json!({
        "title": title,
        "company": "Acme",
        "location": "Remote",
        "description": "Build backend services",
        "jobType": "full_time",
        "salaryMin": 50000,
        "salaryMax": 90000,
        "skills": skills,
    })
}

pub async fn create_job(app: &Router, cookie: &str, title: &str, skills: &[&str]) -> String {
    let res = send(app, "POST", "/api/jobs", Some(cookie), Some(job_payload(title, skills))).await;
    assert_eq!(res.status, StatusCode::CREATED, "create job failed: {}", res.body);
    res.body["id"].as_str().unwrap().to_string()
}
