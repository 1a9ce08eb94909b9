//! End-to-end tests of the request observability pipeline: audit capture,
//! correlation, failure classification, and the error body contract.

use uuid::Uuid;

mod common;

#[tokio::test]
async fn successful_call_writes_initial_then_completion() {
    let app = common::spawn_app().await;
    let token = app.login_admin().await;

    let response = app
        .client
        .get(app.url("/users"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body_bytes = response.text().await.unwrap();

    let record = app
        .audit()
        .requests()
        .into_iter()
        .find(|r| r.path == "/users" && r.http_method == "GET")
        .expect("audit record for GET /users");

    // Caller identity flowed from the bearer token into the record.
    assert_eq!(record.user_id.as_deref(), Some("ADMIN"));
    // Empty request body is recorded as absent, not as "".
    assert_eq!(record.request_body, None);
    // Completion fields are all present and consistent.
    assert_eq!(record.status_code, Some(200));
    let end = record.end_date.expect("end date set");
    assert!(end >= record.start_date);
    assert!(record.duration_ms.is_some());
    // Transparent capture: the caller got exactly the recorded bytes.
    assert_eq!(record.response_body.as_deref(), Some(body_bytes.as_str()));
}

#[tokio::test]
async fn login_is_audited_without_identity() {
    let app = common::spawn_app().await;
    app.login_admin().await;

    let record = app
        .audit()
        .requests()
        .into_iter()
        .find(|r| r.path == "/auth/login")
        .expect("audit record for login");

    // The login call itself is unauthenticated.
    assert_eq!(record.user_id, None);
    assert_eq!(record.status_code, Some(200));
    assert!(record.request_body.as_deref().unwrap().contains("admin"));
}

#[tokio::test]
async fn docs_routes_are_never_audited() {
    let app = common::spawn_app().await;
    let baseline = app.audit().request_count();

    assert_eq!(app.client.get(app.url("/docs")).send().await.unwrap().status(), 200);
    let response = app
        .client
        .get(app.url("/docs/openapi.json"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    assert_eq!(app.audit().request_count(), baseline);
}

#[tokio::test]
async fn validation_failure_is_a_400_without_log_id() {
    let app = common::spawn_app().await;
    let token = app.login_admin().await;

    // Seeded admin already owns this user id.
    let response = app
        .client
        .post(app.url("/users"))
        .bearer_auth(&token)
        .json(&serde_json::json!({
            "userId": "admin",
            "name": "Clone",
            "email": "clone@example.com",
            "password": "Sup3r$ecret",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "An error occurred processing your request.");
    assert_eq!(body["detail"], "UserId already exists. Try another one.");
    assert!(body["logId"].is_null());
}

#[tokio::test]
async fn missing_token_is_a_401_without_log_id() {
    let app = common::spawn_app().await;

    let response = app.client.get(app.url("/users")).send().await.unwrap();

    assert_eq!(response.status(), 401);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["detail"], "Invalid Token, not Authenticated.");
    assert!(body["logId"].is_null());
}

#[tokio::test]
async fn bad_credentials_are_a_401_without_log_id() {
    let app = common::spawn_app().await;

    let response = app
        .client
        .post(app.url("/auth/login"))
        .json(&serde_json::json!({ "userId": "admin", "password": "wrong" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 401);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["detail"], "User or password invalid.");
    assert!(body["logId"].is_null());
}

#[tokio::test]
async fn unknown_user_is_a_404_without_log_id() {
    let app = common::spawn_app().await;
    let token = app.login_admin().await;

    let response = app
        .client
        .get(app.url("/users/ghost"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["detail"], "User with ID ghost not found.");
    assert!(body["logId"].is_null());
}

#[tokio::test]
async fn internal_failure_produces_one_joined_trace_and_an_incomplete_record() {
    let app = common::spawn_app().await;
    let token = app.login_admin().await;

    let response = app
        .client
        .post(app.url("/users"))
        .bearer_auth(&token)
        .json(&serde_json::json!({
            "userId": "newuser",
            "name": "error 500 fake",
            "email": "new@example.com",
            "password": "Sup3r$ecret",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 500);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["detail"], "Contact our support and send the LogId returned.");
    let log_id: Uuid = body["logId"].as_str().unwrap().parse().unwrap();

    // Exactly one Error-severity trace, joined by the correlation id.
    let traces: Vec<_> = app
        .audit()
        .traces()
        .into_iter()
        .filter(|t| t.record.log_id == log_id)
        .collect();
    assert_eq!(traces.len(), 1);
    assert_eq!(traces[0].record.level.as_str(), "Error");
    assert_eq!(traces[0].record.message, "Error 500 adding user. [FAKE]");

    // The initial audit write exists under the same id, and the failure
    // left it incomplete: the completion update is owned by the success
    // path only.
    let record = app.audit().request(&log_id).expect("initial write exists");
    assert_eq!(record.http_method, "POST");
    assert_eq!(record.path, "/users");
    assert!(record.request_body.as_deref().unwrap().contains("error 500 fake"));
    assert_eq!(record.status_code, None);
    assert_eq!(record.end_date, None);
}

#[tokio::test]
async fn classified_failures_leave_the_request_record_incomplete() {
    let app = common::spawn_app().await;

    let response = app.client.get(app.url("/users")).send().await.unwrap();
    assert_eq!(response.status(), 401);

    let record = app
        .audit()
        .requests()
        .into_iter()
        .find(|r| r.path == "/users")
        .expect("initial write exists for the rejected call");
    assert_eq!(record.status_code, None, "no completion update on failure");
}
