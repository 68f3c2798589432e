use super::routes;
use crate::config::Config;
use crate::state::{AppState, SharedState};
use axum::{
    body::Body,
    extract::connect_info::MockConnectInfo,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceExt;

async fn app() -> (Router, SharedState) {
    let state = Arc::new(AppState::seeded(Config::default()).await.unwrap());
    let router = routes(state.clone()).layer(MockConnectInfo(SocketAddr::from(([127, 0, 0, 1], 4000))));
    (router, state)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn login(app: &Router, id: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "id": id, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_login_roles_and_access() {
    let (app, _) = app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "id": "emp001", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid credentials. Please try again.");

    let (status, _) = send(&app, Method::POST, "/auth/login", None, Some(json!({ "id": "", "password": "" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let employee = login(&app, "emp001", "emp123").await;
    let (status, me) = send(&app, Method::GET, "/auth/me", Some(&employee), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["role"], "employee");
    assert_eq!(me["name"], "John Doe");

    let (status, _) = send(&app, Method::GET, "/admin/employees", Some(&employee), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&app, Method::GET, "/admin/employees", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let admin = login(&app, "admin001", "admin123").await;
    let (status, _) = send(&app, Method::GET, "/admin/employees", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_logout_ends_session() {
    let (app, _) = app().await;
    let token = login(&app, "emp001", "emp123").await;

    let (status, _) = send(&app, Method::POST, "/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::GET, "/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_is_rate_limited() {
    let (app, state) = app().await;
    let attempts = state.config.login_attempts_per_minute;
    for _ in 0..attempts {
        let (status, _) = send(
            &app,
            Method::POST,
            "/auth/login",
            None,
            Some(json!({ "id": "emp001", "password": "nope" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
    let (status, _) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "id": "emp001", "password": "emp123" })),
    )
    .await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_employee_list_filters_and_paginates() {
    let (app, _) = app().await;
    let admin = login(&app, "admin001", "admin123").await;

    let (_, page) = send(&app, Method::GET, "/admin/employees?search=EMP002&department=all", Some(&admin), None).await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["id"], "EMP002");

    let (_, page) = send(&app, Method::GET, "/admin/employees?department=technology&page=7", Some(&admin), None).await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["page"], 1);
    assert_eq!(page["items"][0]["department"], "Technology");

    let (_, page) = send(&app, Method::GET, "/admin/employees?search=priya&department=Finance", Some(&admin), None).await;
    assert_eq!(page["total"], 0);

    let (_, departments) = send(&app, Method::GET, "/admin/employees/departments", Some(&admin), None).await;
    assert_eq!(departments, json!(["Finance", "Human Resources", "Technology", "Marketing"]));
}

#[tokio::test]
async fn test_employee_lifecycle() {
    let (app, state) = app().await;
    let admin = login(&app, "admin001", "admin123").await;

    let new_employee = json!({
        "employee_id": "EMP005",
        "password": "welcome1",
        "first_name": "Asha",
        "last_name": "Rao",
        "email": "asha.rao@confidencefs.com",
        "department": "Finance",
        "designation": "Analyst",
        "annual_ctc": "480000",
        "basic_monthly": "20000",
        "hra_monthly": ""
    });
    let (status, created) = send(&app, Method::POST, "/admin/employees", Some(&admin), Some(new_employee.clone())).await;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    assert_eq!(created["name"], "Asha Rao");
    assert_eq!(created["salary_view"]["rollup"]["annual"]["basic"], 240000.0);

    let (status, _) = send(&app, Method::POST, "/admin/employees", Some(&admin), Some(new_employee)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(state.employees.count().await, 5);

    // New employee can sign in
    login(&app, "emp005", "welcome1").await;

    let (status, updated) = send(
        &app,
        Method::PUT,
        "/admin/employees/EMP005",
        Some(&admin),
        Some(json!({ "department": "Operations", "basic_monthly": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["department"], "Operations");
    assert_eq!(updated["salary"]["breakdown"]["basic"], 20000.0);

    let (status, _) = send(&app, Method::DELETE, "/admin/employees/EMP005", Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let ids: Vec<String> = state.employees.list().await.into_iter().map(|e| e.id).collect();
    assert_eq!(ids, vec!["EMP001", "EMP002", "EMP003", "EMP004"]);

    let (status, _) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "id": "emp005", "password": "welcome1" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::DELETE, "/admin/employees/EMP005", Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_edit_keeps_login_directory_in_step() {
    let (app, _) = app().await;
    let admin = login(&app, "admin001", "admin123").await;
    let employee = login(&app, "emp001", "emp123").await;

    let (status, _) = send(
        &app,
        Method::PUT,
        "/admin/employees/EMP001",
        Some(&admin),
        Some(json!({ "last_name": "Smith", "email": "john.smith@confidencefs.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Open sessions pick up the edit
    let (_, me) = send(&app, Method::GET, "/auth/me", Some(&employee), None).await;
    assert_eq!(me["name"], "John Smith");
    assert_eq!(me["email"], "john.smith@confidencefs.com");

    let (_, started) = send(
        &app,
        Method::POST,
        "/auth/password-reset",
        None,
        Some(json!({ "employee_id": "emp001", "email": "john.smith@confidencefs.com" })),
    )
    .await;
    let flow = started["flow_id"].as_str().unwrap().to_string();
    let code = started["demo_code"].as_str().unwrap().to_string();
    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/auth/password-reset/{flow}/verify"),
        None,
        Some(json!({ "code": code })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/auth/password-reset/{flow}/complete"),
        None,
        Some(json!({ "new_password": "after-edit", "confirm_password": "after-edit" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let token = login(&app, "emp001", "after-edit").await;
    let (_, me) = send(&app, Method::GET, "/auth/me", Some(&token), None).await;
    assert_eq!(me["name"], "John Smith");
}

#[tokio::test]
async fn test_oversized_amounts_do_not_break_salary_routes() {
    let (app, _) = app().await;
    let admin = login(&app, "admin001", "admin123").await;
    let decimal_max = "79228162514264337593543950335";

    let (status, preview) = send(
        &app,
        Method::POST,
        "/admin/salary/rollup",
        Some(&admin),
        Some(json!({ "basic_monthly": decimal_max, "hra_monthly": "1000" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(preview["rollup"]["annual"]["basic"], 0.0);
    assert_eq!(preview["rollup"]["annual_total"], 12000.0);

    let (status, updated) = send(
        &app,
        Method::PUT,
        "/admin/employees/EMP001",
        Some(&admin),
        Some(json!({ "annual_ctc": decimal_max, "basic_monthly": decimal_max })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["salary"]["annual_ctc"], 800000.0);
    assert_eq!(updated["salary"]["breakdown"]["basic"], 30000.0);

    let (status, _) = send(&app, Method::GET, "/admin/dashboard", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_create_rolls_back_when_login_exists() {
    let (app, state) = app().await;
    let admin = login(&app, "admin001", "admin123").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/admin/employees",
        Some(&admin),
        Some(json!({
            "employee_id": "ADMIN001",
            "password": "welcome1",
            "first_name": "Second",
            "last_name": "Admin",
            "email": "second.admin@confidencefs.com"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT, "{body}");
    assert!(state.employees.get("ADMIN001").await.is_none());
    assert_eq!(state.employees.count().await, 4);
    login(&app, "admin001", "admin123").await;
}

#[tokio::test]
async fn test_create_employee_requires_fields() {
    let (app, _) = app().await;
    let admin = login(&app, "admin001", "admin123").await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/admin/employees",
        Some(&admin),
        Some(json!({ "employee_id": "EMP009", "first_name": "No", "last_name": "Password" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Please fill in all required fields");
}

#[tokio::test]
async fn test_announcements_prepend_and_delete() {
    let (app, _) = app().await;
    let admin = login(&app, "admin001", "admin123").await;
    let employee = login(&app, "emp001", "emp123").await;

    let (_, before) = send(&app, Method::GET, "/announcements", Some(&employee), None).await;
    let before = before.as_array().unwrap().len();

    let (status, created) = send(
        &app,
        Method::POST,
        "/admin/announcements",
        Some(&admin),
        Some(json!({ "title": "Town hall", "description": "Friday 4pm", "priority": "high" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["priority"], "high");
    assert_eq!(created["date"], crate::domain::format::today().to_string());

    let (_, after) = send(&app, Method::GET, "/announcements", Some(&employee), None).await;
    let after = after.as_array().unwrap();
    assert_eq!(after.len(), before + 1);
    assert_eq!(after[0]["title"], "Town hall");

    let (status, _) = send(
        &app,
        Method::POST,
        "/admin/announcements",
        Some(&employee),
        Some(json!({ "title": "x", "description": "y" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let uri = format!("/admin/announcements/{}", created["id"]);
    let (status, _) = send(&app, Method::DELETE, &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::DELETE, &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_password_reset_over_http() {
    let (app, _) = app().await;

    let (status, started) = send(
        &app,
        Method::POST,
        "/auth/password-reset",
        None,
        Some(json!({ "employee_id": "emp001", "email": "john.doe@confidencefs.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(started["step"], "awaiting_code");
    let flow = started["flow_id"].as_str().unwrap().to_string();
    let first_code = started["demo_code"].as_str().unwrap().to_string();

    let (_, resent) = send(&app, Method::POST, &format!("/auth/password-reset/{flow}/resend"), None, None).await;
    let second_code = resent["demo_code"].as_str().unwrap().to_string();

    let verify = format!("/auth/password-reset/{flow}/verify");
    if first_code != second_code {
        let (status, body) = send(&app, Method::POST, &verify, None, Some(json!({ "code": first_code }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid verification code. Please try again.");
    }
    let (status, body) = send(&app, Method::POST, &verify, None, Some(json!({ "code": second_code }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["step"], "awaiting_new_password");

    let complete = format!("/auth/password-reset/{flow}/complete");
    let (status, _) = send(
        &app,
        Method::POST,
        &complete,
        None,
        Some(json!({ "new_password": "fresh-pass", "confirm_password": "fresh-pas" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        Method::POST,
        &complete,
        None,
        Some(json!({ "new_password": "fresh-pass", "confirm_password": "fresh-pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["step"], "done");

    login(&app, "emp001", "fresh-pass").await;

    // Finished flows are gone
    let (status, _) = send(&app, Method::POST, &verify, None, Some(json!({ "code": second_code }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_profile_shows_salary_rollup() {
    let (app, _) = app().await;
    let employee = login(&app, "emp001", "emp123").await;

    let (status, profile) = send(&app, Method::GET, "/profile", Some(&employee), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["id"], "EMP001");
    assert_eq!(profile["join_date_display"], "15 March 2022");
    let basic = &profile["salary_view"]["lines"][0];
    assert_eq!(basic["component"], "basic");
    assert_eq!(basic["annual"], 360000.0);
    assert_eq!(basic["annual_display"], "₹3,60,000.00");
    assert_eq!(profile["documents"]["downloadable"][0], "Offer Letter");

    // The admin account has no employee record
    let admin = login(&app, "admin001", "admin123").await;
    let (status, _) = send(&app, Method::GET, "/profile", Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_document_selection_and_submit() {
    let (app, _) = app().await;
    let admin = login(&app, "admin001", "admin123").await;

    let (status, overview) = send(
        &app,
        Method::PUT,
        "/admin/documents/offer-letter",
        Some(&admin),
        Some(json!({ "name": "offer.pdf", "content_type": "application/pdf", "size_bytes": 2048 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(overview["selected_count"], 1);

    let (status, body) = send(
        &app,
        Method::PUT,
        "/admin/documents/pan",
        Some(&admin),
        Some(json!({ "name": "pan.pdf", "content_type": "application/pdf", "size_bytes": 20 * 1024 * 1024 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Document size should be less than 10MB");

    let (status, _) = send(&app, Method::POST, "/admin/documents/submit", Some(&admin), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, submitted) = send(
        &app,
        Method::POST,
        "/admin/documents/submit",
        Some(&admin),
        Some(json!({ "employee_id": "EMP002" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(submitted["message"], "1 documents uploaded for Priya Sharma");

    let (_, overview) = send(&app, Method::GET, "/admin/documents", Some(&admin), None).await;
    assert_eq!(overview["selected_count"], 0);
}

#[tokio::test]
async fn test_dashboard_metrics() {
    let (app, _) = app().await;
    let admin = login(&app, "admin001", "admin123").await;

    let (status, metrics) = send(&app, Method::GET, "/admin/dashboard", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(metrics["total_employees"], 4);
    assert_eq!(metrics["total_announcements"], 3);
    assert_eq!(metrics["average_annual_ctc"], 750000.0);
    assert_eq!(metrics["average_annual_ctc_display"], "₹7,50,000.00");
    assert_eq!(metrics["recent_employees"][0]["id"], "EMP003");
}
