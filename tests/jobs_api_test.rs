mod common;

use axum::http::StatusCode;
use common::{app, create_job, job_payload, register, send};
use serde_json::json;

#[tokio::test]
async fn recruiter_creates_job_owned_by_caller() {
    let app = app();
    let (cookie, recruiter_id) = register(&app, "rita", "recruiter").await;

    let res = send(
        &app,
        "POST",
        "/api/jobs",
        Some(&cookie),
        Some(job_payload("Rust Engineer", &["Rust", "SQL"])),
    )
    .await;

    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["recruiterId"], recruiter_id.as_str());
    assert_eq!(res.body["isActive"], true);
    assert_eq!(res.body["skills"], json!(["Rust", "SQL"]));
}

#[tokio::test]
async fn candidates_cannot_post_jobs() {
    let app = app();
    let (cookie, _) = register(&app, "cand", "candidate").await;
    let res = send(&app, "POST", "/api/jobs", Some(&cookie), Some(job_payload("X", &[]))).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn inverted_salary_range_is_rejected() {
    let app = app();
    let (cookie, _) = register(&app, "rita", "recruiter").await;
    let mut payload = job_payload("Rust Engineer", &[]);
    payload["salaryMin"] = json!(100000);
    payload["salaryMax"] = json!(10);
    let res = send(&app, "POST", "/api/jobs", Some(&cookie), Some(payload)).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn non_owner_cannot_update_job() {
    let app = app();
    let (owner, _) = register(&app, "owner", "recruiter").await;
    let (other, _) = register(&app, "other", "recruiter").await;
    let job_id = create_job(&app, &owner, "Rust Engineer", &[]).await;

    let res = send(
        &app,
        "PATCH",
        &format!("/api/jobs/{}", job_id),
        Some(&other),
        Some(json!({ "title": "Hijacked" })),
    )
    .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = send(
        &app,
        "PATCH",
        &format!("/api/jobs/{}", uuid::Uuid::new_v4()),
        Some(&owner),
        Some(json!({ "title": "Ghost" })),
    )
    .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deactivated_job_leaves_public_listing() {
    let app = app();
    let (recruiter, _) = register(&app, "rita", "recruiter").await;
    let (candidate, _) = register(&app, "cand", "candidate").await;
    let job_id = create_job(&app, &recruiter, "Rust Engineer", &[]).await;
    create_job(&app, &recruiter, "Go Engineer", &[]).await;

    let listed = send(&app, "GET", "/api/jobs", Some(&candidate), None).await;
    assert_eq!(listed.body.as_array().unwrap().len(), 2);

    let res = send(
        &app,
        "PATCH",
        &format!("/api/jobs/{}", job_id),
        Some(&recruiter),
        Some(json!({ "isActive": false })),
    )
    .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["isActive"], false);

    let listed = send(&app, "GET", "/api/jobs", Some(&candidate), None).await;
    let titles: Vec<&str> = listed
        .body
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|j| j["title"].as_str())
        .collect();
    assert_eq!(titles, vec!["Go Engineer"]);

    let hidden = send(&app, "GET", &format!("/api/jobs/{}", job_id), Some(&candidate), None).await;
    assert_eq!(hidden.status, StatusCode::NOT_FOUND);
    let visible = send(&app, "GET", &format!("/api/jobs/{}", job_id), Some(&recruiter), None).await;
    assert_eq!(visible.status, StatusCode::OK);

    let own = send(&app, "GET", "/api/recruiter/jobs", Some(&recruiter), None).await;
    assert_eq!(own.body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn listing_filters_by_search_and_location() {
    let app = app();
    let (recruiter, _) = register(&app, "rita", "recruiter").await;
    create_job(&app, &recruiter, "Rust Engineer", &[]).await;
    let mut onsite = job_payload("Data Analyst", &[]);
    onsite["location"] = json!("Berlin");
    send(&app, "POST", "/api/jobs", Some(&recruiter), Some(onsite)).await;

    let res = send(&app, "GET", "/api/jobs?search=rust", Some(&recruiter), None).await;
    assert_eq!(res.body.as_array().unwrap().len(), 1);
    assert_eq!(res.body[0]["title"], "Rust Engineer");

    let res = send(&app, "GET", "/api/jobs?location=berlin", Some(&recruiter), None).await;
    assert_eq!(res.body.as_array().unwrap().len(), 1);
    assert_eq!(res.body[0]["title"], "Data Analyst");
}

#[tokio::test]
async fn deleting_job_returns_no_content() {
    let app = app();
    let (recruiter, _) = register(&app, "rita", "recruiter").await;
    let job_id = create_job(&app, &recruiter, "Rust Engineer", &[]).await;

    let res = send(&app, "DELETE", &format!("/api/jobs/{}", job_id), Some(&recruiter), None).await;
    assert_eq!(res.status, StatusCode::NO_CONTENT);

    let res = send(&app, "GET", &format!("/api/jobs/{}", job_id), Some(&recruiter), None).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn recruiter_job_list_counts_applications() {
    let app = app();
    let (recruiter, _) = register(&app, "rita", "recruiter").await;
    let (first, _) = register(&app, "cand1", "candidate").await;
    let (second, _) = register(&app, "cand2", "candidate").await;
    let busy = create_job(&app, &recruiter, "Rust Engineer", &[]).await;
    let quiet = create_job(&app, &recruiter, "Go Engineer", &[]).await;

    for cookie in [&first, &second] {
        let res = send(
            &app,
            "POST",
            "/api/applications",
            Some(cookie.as_str()),
            Some(json!({ "jobId": busy })),
        )
        .await;
        assert_eq!(res.status, StatusCode::CREATED);
    }

    let res = send(&app, "GET", "/api/recruiter/jobs", Some(&recruiter), None).await;
    assert_eq!(res.status, StatusCode::OK);
    let jobs = res.body.as_array().unwrap();
    let count_for = |id: &str| {
        jobs.iter()
            .find(|j| j["id"] == id)
            .map(|j| j["applicationCount"].clone())
            .unwrap()
    };
    assert_eq!(count_for(busy.as_str()), 2);
    assert_eq!(count_for(quiet.as_str()), 0);
}

#[tokio::test]
async fn listing_filters_by_job_type() {
    let app = app();
    let (recruiter, _) = register(&app, "rita", "recruiter").await;
    create_job(&app, &recruiter, "Rust Engineer", &[]).await;
    let mut contract = job_payload("Contract Auditor", &[]);
    contract["jobType"] = json!("contract");
    send(&app, "POST", "/api/jobs", Some(&recruiter), Some(contract)).await;

    let res = send(&app, "GET", "/api/jobs?jobType=CONTRACT", Some(&recruiter), None).await;
    let titles: Vec<&str> = res
        .body
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|j| j["title"].as_str())
        .collect();
    assert_eq!(titles, vec!["Contract Auditor"]);
}

#[tokio::test]
async fn search_wildcards_match_literally() {
    let app = app();
    let (recruiter, _) = register(&app, "rita", "recruiter").await;
    create_job(&app, &recruiter, "100% Remote Engineer", &[]).await;
    create_job(&app, &recruiter, "Office Engineer", &[]).await;

    let res = send(&app, "GET", "/api/jobs?search=100%25", Some(&recruiter), None).await;
    assert_eq!(res.body.as_array().unwrap().len(), 1);

    let res = send(&app, "GET", "/api/jobs?search=%25", Some(&recruiter), None).await;
    assert_eq!(res.body.as_array().unwrap().len(), 1);
    assert_eq!(res.body[0]["title"], "100% Remote Engineer");

    let res = send(&app, "GET", "/api/jobs?search=_", Some(&recruiter), None).await;
    assert!(res.body.as_array().unwrap().is_empty());
}
