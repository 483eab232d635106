mod test_utils;

use actix_web::{http::StatusCode, test, test::TestRequest};
use chrono::DateTime;
use portfolio_api::{errors::AppError, settings::AppEnvironment};
use serde_json::{json, Value};
use test_utils::*;
use uuid::Uuid;

#[actix_rt::test]
async fn status_is_public_and_reports_environment() {
    let app = test::init_service(build_app(TestRepos::new().into_state(&test_config()), true)).await;
    let resp = test::call_service(&app, TestRequest::get().uri("/api/status").to_request()).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["environment"], "testing");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["uptime"].is_string());
    assert!(DateTime::parse_from_rfc3339(body["timestamp"].as_str().unwrap()).is_ok());
}

#[actix_rt::test]
async fn home_and_trailing_slash_both_resolve() {
    let app = test::init_service(build_app(TestRepos::new().into_state(&test_config()), true)).await;

    let resp = test::call_service(&app, TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);

    let resp = test::call_service(&app, TestRequest::get().uri("/api/status/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn unknown_routes_get_the_404_envelope() {
    let app = test::init_service(build_app(TestRepos::new().into_state(&test_config()), true)).await;

    for uri in ["/nope", "/api/nope", "/api/projects/a/b/c"] {
        let resp = test::call_service(&app, TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", uri);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"success": false, "message": "Route not found"}));
    }
}

#[actix_rt::test]
async fn malformed_bearer_is_rejected_even_on_public_routes() {
    let app = test::init_service(build_app(TestRepos::new().into_state(&test_config()), true)).await;
    let req = TestRequest::get()
        .uri("/api/status")
        .insert_header(("Authorization", "Bearer not.a.jwt"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
}

#[actix_rt::test]
async fn token_signed_with_another_secret_is_rejected() {
    let mut other = test_config();
    other.jwt_secret = "another_secret_that_is_also_long_enough_for_hs512".into();
    let token = portfolio_api::auth::jwt::JwtService::new(&other)
        .create_jwt(&Uuid::new_v4(), "x@example.com", portfolio_api::entities::user::UserRole::Admin)
        .unwrap();

    let app = test::init_service(build_app(TestRepos::new().into_state(&test_config()), true)).await;
    let req = TestRequest::get()
        .uri("/api/admin/dashboard-stats")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

fn failing_project_lookup() -> TestRepos {
    let mut repos = TestRepos::new();
    repos
        .project
        .expect_get_project_by_id()
        .returning(|_| Err(AppError::InternalError("Database error: relation does not exist".into())));
    repos
}

#[actix_rt::test]
async fn internal_errors_carry_detail_outside_production() {
    let app = test::init_service(build_app(failing_project_lookup().into_state(&test_config()), true)).await;
    let resp = test::call_service(
        &app,
        TestRequest::get().uri(&format!("/api/projects/{}", Uuid::new_v4())).to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body,
        json!({
            "success": false,
            "message": "Internal server error",
            "error": "Database error: relation does not exist"
        })
    );
}

#[actix_rt::test]
async fn internal_errors_hide_detail_in_production() {
    let mut config = test_config();
    config.env = AppEnvironment::Production;

    let app = test::init_service(build_app(failing_project_lookup().into_state(&config), false)).await;
    let resp = test::call_service(
        &app,
        TestRequest::get().uri(&format!("/api/projects/{}", Uuid::new_v4())).to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"success": false, "message": "Internal server error"}));
}
