// Copyright (C) 2026 PlanMorph Software
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use planmorph_api::{AuthConfig, bootstrap_admin};
use planmorph_notify::{Dispatcher, MemoryNotifier};
use planmorph_persistence::Persistence;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use crate::{AppState, build_router};

pub const TEST_ADMIN_EMAIL: &str = "ops@planmorph.software";
pub const TEST_PASSWORD: &str = "Sup3rSecret";

pub struct TestApp {
    pub router: Router,
    pub notifier: MemoryNotifier,
}

/// Helper to create a router over in-memory persistence with one admin.
pub fn create_test_app() -> TestApp {
    let persistence: Persistence =
        Persistence::new_in_memory().expect("Failed to create in-memory persistence");
    let auth: AuthConfig = AuthConfig {
        hash_cost: 4,
        ..AuthConfig::default()
    };
    bootstrap_admin(&persistence, &auth, TEST_ADMIN_EMAIL, TEST_PASSWORD)
        .expect("bootstrap admin");

    let notifier: MemoryNotifier = MemoryNotifier::new();
    let app_state: AppState = AppState {
        persistence,
        dispatcher: Dispatcher::new(
            Arc::new(notifier.clone()),
            String::from("staff@planmorph.software"),
        ),
        auth,
    };

    TestApp {
        router: build_router(app_state),
        notifier,
    }
}

/// Sends a request and returns the status and the JSON body.
pub async fn send(
    app: &TestApp,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request: Request<Body> = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.router.clone().oneshot(request).await.unwrap();
    let status: StatusCode = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

pub async fn login_token(app: &TestApp) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": TEST_ADMIN_EMAIL, "password": TEST_PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

/// Waits for background deliveries to reach the notifier.
pub async fn wait_for_sent(notifier: &MemoryNotifier, count: usize) -> Vec<&'static str> {
    for _ in 0..100 {
        if notifier.sent().len() >= count {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    notifier.sent_kinds()
}

pub fn request_body() -> Value {
    json!({
        "client_name": "Jane Doe",
        "client_email": "jane@x.com",
        "client_phone": "0712345678",
        "project_type": "Business Website",
        "requirements": "A five page site with a contact form."
    })
}

pub fn ticket_body(email: &str) -> Value {
    json!({
        "full_name": "Jane Doe",
        "email": email,
        "subject": "Checkout broken",
        "description": "The pay button does nothing.",
        "category": "bug"
    })
}

pub fn application_body(email: &str) -> Value {
    json!({
        "full_name": "Amina Otieno",
        "email": email,
        "role": "developer",
        "specialization": "Backend",
        "experience_level": "advanced",
        "years_of_experience": 6,
        "portfolio_url": "https://amina.dev",
        "skills": ["Rust"],
        "why_join": "I like the product work.",
        "availability": "two_weeks"
    })
}
