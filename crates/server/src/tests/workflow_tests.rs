// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use axum::http::StatusCode;
use serde_json::{Value, json};

use super::helpers::{
    TestApp, application_body, create_test_app, login_token, request_body, send, ticket_body,
    wait_for_sent,
};

async fn submit_request(app: &TestApp) -> i64 {
    let (status, body) = send(app, "POST", "/api/requests", None, Some(request_body())).await;
    assert_eq!(status, StatusCode::CREATED);
    body["request"]["id"].as_i64().unwrap()
}

async fn submit_ticket(app: &TestApp, email: &str) -> (i64, String) {
    let (status, body) = send(app, "POST", "/api/support/submit", None, Some(ticket_body(email))).await;
    assert_eq!(status, StatusCode::CREATED);
    (
        body["ticket"]["id"].as_i64().unwrap(),
        body["ticket"]["ticketNumber"].as_str().unwrap().to_string(),
    )
}

#[tokio::test]
async fn test_submit_request_creates_pending_request_and_notifies() {
    let app = create_test_app();

    let (status, body) = send(&app, "POST", "/api/requests", None, Some(request_body())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["request"]["status"], "Pending");
    let kinds: Vec<&str> = wait_for_sent(&app.notifier, 2).await;
    assert!(kinds.contains(&"new_request_alert"));
    assert!(kinds.contains(&"request_confirmation"));
}

#[tokio::test]
async fn test_submit_request_reports_every_invalid_field() {
    let app = create_test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/requests",
        None,
        Some(json!({ "client_name": "J" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"client_email"));
    assert!(fields.contains(&"client_phone"));
    assert!(fields.contains(&"requirements"));
}

#[tokio::test]
async fn test_quotation_is_stored_and_request_quoted() {
    let app = create_test_app();
    let token: String = login_token(&app).await;
    let request_id: i64 = submit_request(&app).await;
    wait_for_sent(&app.notifier, 2).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/quotes",
        Some(&token),
        Some(json!({ "request_id": request_id, "total_cost": 85000, "timeline_weeks": 4 })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email_sent"], true);
    assert_eq!(body["request_status"], "Quoted");
    assert!(app.notifier.sent_kinds().contains(&"quotation"));
    let (_, detail) = send(
        &app,
        "GET",
        &format!("/api/requests/{request_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(detail["request"]["status"], "Quoted");
}

#[tokio::test]
async fn test_quotation_survives_mail_failure() {
    let app = create_test_app();
    let token: String = login_token(&app).await;
    let request_id: i64 = submit_request(&app).await;
    wait_for_sent(&app.notifier, 2).await;
    app.notifier.fail_with("relay refused");

    let (status, body) = send(
        &app,
        "POST",
        "/api/quotes",
        Some(&token),
        Some(json!({ "request_id": request_id, "total_cost": 85000, "timeline_weeks": 4 })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email_sent"], false);
    assert!(body["email_error"].is_string());
    let (_, listed) = send(
        &app,
        "GET",
        &format!("/api/quotes/request/{request_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(listed["quotations"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_quotation_for_missing_request_is_not_found() {
    let app = create_test_app();
    let token: String = login_token(&app).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/quotes",
        Some(&token),
        Some(json!({ "request_id": 404, "total_cost": 100, "timeline_weeks": 1 })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_quotation_can_be_read_listed_and_deleted() {
    let app = create_test_app();
    let token: String = login_token(&app).await;
    let request_id: i64 = submit_request(&app).await;
    let (_, issued) = send(
        &app,
        "POST",
        "/api/quotes",
        Some(&token),
        Some(json!({ "request_id": request_id, "total_cost": 85000, "timeline_weeks": 4 })),
    )
    .await;
    let quote_id: i64 = issued["quote"]["id"].as_i64().unwrap();

    let (status, detail) = send(
        &app,
        "GET",
        &format!("/api/quotes/{quote_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["quote"]["client_email"], "jane@x.com");
    assert_eq!(detail["quote"]["request_id"], request_id);

    let (status, listed) = send(&app, "GET", "/api/quotes", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["total"], 1);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/quotes/{quote_id}"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/quotes/{quote_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/quotes/{quote_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, request) = send(
        &app,
        "GET",
        &format!("/api/requests/{request_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(request["request"]["status"], "Quoted");
    assert_eq!(request["activity"][0]["details"]["quotation_deleted"], quote_id);
}

#[tokio::test]
async fn test_setting_quoted_by_hand_is_unprocessable() {
    let app = create_test_app();
    let token: String = login_token(&app).await;
    let request_id: i64 = submit_request(&app).await;

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/requests/{request_id}"),
        Some(&token),
        Some(json!({ "status": "Quoted" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_public_ticket_lookup_hides_internal_notes_and_mismatches() {
    let app = create_test_app();
    let token: String = login_token(&app).await;
    let (ticket_id, number) = submit_ticket(&app, "jane@x.com").await;
    send(
        &app,
        "POST",
        &format!("/api/support/admin/tickets/{ticket_id}/respond"),
        Some(&token),
        Some(json!({ "message": "Old browser, check later.", "is_internal_note": true })),
    )
    .await;
    send(
        &app,
        "POST",
        &format!("/api/support/admin/tickets/{ticket_id}/respond"),
        Some(&token),
        Some(json!({ "message": "Please clear your cache.", "is_internal_note": false })),
    )
    .await;

    let (ok_status, ok) = send(
        &app,
        "GET",
        &format!("/api/support/ticket/{number}?email=jane@x.com"),
        None,
        None,
    )
    .await;
    let (wrong_status, _) = send(
        &app,
        "GET",
        &format!("/api/support/ticket/{number}?email=eve@x.com"),
        None,
        None,
    )
    .await;

    assert_eq!(ok_status, StatusCode::OK);
    let messages: Vec<&str> = ok["messages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["message"].as_str().unwrap())
        .collect();
    assert_eq!(messages, vec!["Please clear your cache."]);
    assert_eq!(ok["ticket"]["status"], "in_progress");
    assert_eq!(wrong_status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_resolving_ticket_records_resolver() {
    let app = create_test_app();
    let token: String = login_token(&app).await;
    let (ticket_id, _) = submit_ticket(&app, "jane@x.com").await;
    let (_, me) = send(&app, "GET", "/api/auth/me", Some(&token), None).await;

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/support/admin/tickets/{ticket_id}"),
        Some(&token),
        Some(json!({ "status": "resolved", "resolution_notes": "Fixed the handler." })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ticket"]["status"], "resolved");
    assert_eq!(body["ticket"]["resolved_by"], me["id"]);
    assert!(body["ticket"]["resolved_at"].is_string());
    let (_, detail) = send(
        &app,
        "GET",
        &format!("/api/support/admin/tickets/{ticket_id}"),
        Some(&token),
        None,
    )
    .await;
    assert!(!detail["activity"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_client_cannot_reply_to_closed_ticket() {
    let app = create_test_app();
    let token: String = login_token(&app).await;
    let (ticket_id, number) = submit_ticket(&app, "jane@x.com").await;
    send(
        &app,
        "PATCH",
        &format!("/api/support/admin/tickets/{ticket_id}"),
        Some(&token),
        Some(json!({ "status": "closed" })),
    )
    .await;

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/support/ticket/{number}/message"),
        None,
        Some(json!({ "email": "jane@x.com", "message": "Still broken." })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_ticket_stats_require_session() {
    let app = create_test_app();
    let token: String = login_token(&app).await;
    submit_ticket(&app, "jane@x.com").await;

    let (anonymous, _) = send(&app, "GET", "/api/support/admin/stats", None, None).await;
    let (status, stats) = send(&app, "GET", "/api/support/admin/stats", Some(&token), None).await;

    assert_eq!(anonymous, StatusCode::UNAUTHORIZED);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_tickets"], 1);
    assert_eq!(stats["open_tickets"], 1);
}

#[tokio::test]
async fn test_duplicate_application_is_bad_request() {
    let app = create_test_app();

    let (first, body) = send(
        &app,
        "POST",
        "/api/talent/apply",
        None,
        Some(application_body("amina@example.com")),
    )
    .await;
    let (second, error) = send(
        &app,
        "POST",
        "/api/talent/apply",
        None,
        Some(application_body("amina@example.com")),
    )
    .await;

    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(body["needsAssessment"], false);
    assert_eq!(second, StatusCode::BAD_REQUEST);
    assert_eq!(error["details"][0]["field"], "email");
}

#[tokio::test]
async fn test_assessment_then_interview_progresses_application() {
    let app = create_test_app();
    let token: String = login_token(&app).await;
    let (_, submitted) = send(
        &app,
        "POST",
        "/api/talent/apply",
        None,
        Some(application_body("amina@example.com")),
    )
    .await;
    let id: i64 = submitted["applicationId"].as_i64().unwrap();

    let (assessment_status, _) = send(
        &app,
        "POST",
        &format!("/api/talent/applications/{id}/assessment"),
        Some(&token),
        Some(json!({ "task_title": "Todo API", "task_description": "CRUD with tests." })),
    )
    .await;
    let (interview_status, _) = send(
        &app,
        "POST",
        &format!("/api/talent/applications/{id}/interview"),
        Some(&token),
        Some(json!({ "interview_type": "video", "scheduled_at": "2026-11-02T10:00:00Z" })),
    )
    .await;
    let (_, detail) = send(
        &app,
        "GET",
        &format!("/api/talent/applications/{id}"),
        Some(&token),
        None,
    )
    .await;

    assert_eq!(assessment_status, StatusCode::CREATED);
    assert_eq!(interview_status, StatusCode::CREATED);
    assert_eq!(detail["application"]["status"], "interview_scheduled");
    assert_eq!(detail["application"]["needs_assessment"], true);
    assert_eq!(detail["assessments"].as_array().unwrap().len(), 1);
    let interviews: &Value = &detail["interviews"];
    assert_eq!(interviews[0]["duration_minutes"], 60);
}
