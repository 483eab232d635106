mod test_utils;

use actix_web::{http::StatusCode, test, test::TestRequest};
use portfolio_api::{
    entities::{list_query::MAX_PAGE, user::UserRole},
    mail::MailError,
};
use serde_json::{json, Value};
use test_utils::*;
use uuid::Uuid;

fn contact_body() -> Value {
    json!({
        "name": "Jane",
        "email": "  Jane@Example.com ",
        "phone": "",
        "message": "I'd like to hire you"
    })
}

fn submit(body: Value, peer: &str) -> TestRequest {
    TestRequest::post()
        .uri("/api/contact")
        .peer_addr(peer.parse().unwrap())
        .set_json(body)
}

#[actix_rt::test]
async fn submission_is_saved_and_both_emails_sent() {
    let mut repos = TestRepos::new();
    repos
        .contact
        .expect_create_contact()
        .withf(|form| form.email == "jane@example.com" && form.phone.is_none())
        .times(1)
        .returning(|form| Ok(contact_from_form(form)));
    repos
        .mailer
        .expect_send()
        .withf(|email| email.to == ADMIN_EMAIL)
        .times(1)
        .returning(|_| Ok(()));
    repos
        .mailer
        .expect_send()
        .withf(|email| email.to == "jane@example.com")
        .times(1)
        .returning(|_| Ok(()));

    let app = test::init_service(build_app(repos.into_state(&test_config()), true)).await;
    let resp = test::call_service(&app, submit(contact_body(), "10.0.0.1:4000").to_request()).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"success": true, "data": "Email sent successfully"}));
}

#[actix_rt::test]
async fn mail_failure_keeps_the_record_and_returns_500() {
    let mut repos = TestRepos::new();
    repos
        .contact
        .expect_create_contact()
        .times(1)
        .returning(|form| Ok(contact_from_form(form)));
    repos
        .mailer
        .expect_send()
        .times(1)
        .returning(|_| Err(MailError::Transport("connection refused".into())));

    let app = test::init_service(build_app(repos.into_state(&test_config()), false)).await;
    let resp = test::call_service(&app, submit(contact_body(), "10.0.0.2:4000").to_request()).await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Email could not be sent");
}

#[actix_rt::test]
async fn invalid_submission_is_rejected_before_saving() {
    let mut repos = TestRepos::new();
    repos.contact.expect_create_contact().never();

    let app = test::init_service(build_app(repos.into_state(&test_config()), true)).await;
    let resp = test::call_service(
        &app,
        submit(json!({"name": "Jane", "email": "nope", "message": ""}), "10.0.0.3:4000").to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Validation failed");
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["email", "message"]);
}

#[actix_rt::test]
async fn submissions_over_the_hourly_limit_get_429() {
    let mut config = test_config();
    config.contact_rate_limit_per_hour = 2;

    let mut repos = TestRepos::new();
    repos
        .contact
        .expect_create_contact()
        .times(2)
        .returning(|form| Ok(contact_from_form(form)));
    repos.mailer.expect_send().times(4).returning(|_| Ok(()));

    let app = test::init_service(build_app(repos.into_state(&config), true)).await;

    for _ in 0..2 {
        let resp = test::call_service(&app, submit(contact_body(), "10.0.0.4:4000").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let resp = test::call_service(&app, submit(contact_body(), "10.0.0.4:4001").to_request()).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
}

#[actix_rt::test]
async fn malformed_json_gets_an_envelope() {
    let app = test::init_service(build_app(TestRepos::new().into_state(&test_config()), true)).await;
    let req = TestRequest::post()
        .uri("/api/contact")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"name\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().starts_with("Invalid JSON payload"));
}

#[actix_rt::test]
async fn listing_requires_an_admin() {
    let app = test::init_service(build_app(TestRepos::new().into_state(&test_config()), true)).await;

    let resp = test::call_service(&app, TestRequest::get().uri("/api/contact").to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"success": false, "message": "Not authorized to access this route"}));

    let req = TestRequest::get()
        .uri("/api/contact")
        .insert_header(("Authorization", user_bearer()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "User role user is not authorized to access this route");
}

#[actix_rt::test]
async fn admin_lists_contacts_with_pagination() {
    let mut repos = TestRepos::new();
    repos.contact.expect_count_matching().times(1).returning(|_| Ok(3));
    repos
        .contact
        .expect_find_matching()
        .withf(|q| q.page == 2 && q.limit == 2)
        .times(1)
        .returning(|_| Ok(vec![sample_contact(false)]));

    let app = test::init_service(build_app(repos.into_state(&test_config()), true)).await;
    let req = TestRequest::get()
        .uri("/api/contact?page=2&limit=2")
        .insert_header(("Authorization", admin_bearer()))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["total"], 3);
    assert_eq!(body["pagination"]["prev"], json!({"page": 1, "limit": 2}));
    assert!(body["pagination"].get("next").is_none());
}

#[actix_rt::test]
async fn out_of_range_page_returns_an_empty_page() {
    let mut repos = TestRepos::new();
    repos.contact.expect_count_matching().times(1).returning(|_| Ok(3));
    repos
        .contact
        .expect_find_matching()
        .withf(|q| q.page == MAX_PAGE)
        .times(1)
        .returning(|_| Ok(vec![]));

    let app = test::init_service(build_app(repos.into_state(&test_config()), true)).await;
    let req = TestRequest::get()
        .uri(&format!("/api/contact?page={}", u32::MAX))
        .insert_header(("Authorization", admin_bearer()))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["count"], 0);
    assert_eq!(body["total"], 3);
    assert!(body["pagination"].get("next").is_none());
    assert_eq!(body["pagination"]["prev"]["page"], MAX_PAGE - 1);
}

#[actix_rt::test]
async fn first_view_marks_contact_as_read() {
    let unread = sample_contact(false);
    let id = unread.id;
    let read = portfolio_api::entities::contact::Contact { is_read: true, ..unread.clone() };

    let mut repos = TestRepos::new();
    repos
        .contact
        .expect_get_contact_by_id()
        .times(1)
        .returning(move |_| Ok(Some(unread.clone())));
    repos
        .contact
        .expect_mark_first_read()
        .withf(move |candidate| *candidate == id)
        .times(1)
        .returning(move |_| Ok(Some(read.clone())));

    let app = test::init_service(build_app(repos.into_state(&test_config()), true)).await;
    let req = TestRequest::get()
        .uri(&format!("/api/contact/{}", id))
        .insert_header(("Authorization", admin_bearer()))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["isRead"], true);
}

#[actix_rt::test]
async fn viewing_a_read_contact_does_not_write() {
    let read = sample_contact(true);
    let id = read.id;

    let mut repos = TestRepos::new();
    repos
        .contact
        .expect_get_contact_by_id()
        .returning(move |_| Ok(Some(read.clone())));
    repos.contact.expect_mark_first_read().never();

    let app = test::init_service(build_app(repos.into_state(&test_config()), true)).await;
    let req = TestRequest::get()
        .uri(&format!("/api/contact/{}", id))
        .insert_header(("Authorization", admin_bearer()))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn mark_read_without_body_toggles() {
    let contact = sample_contact(true);
    let id = contact.id;

    let mut repos = TestRepos::new();
    repos
        .contact
        .expect_set_read()
        .withf(move |candidate, is_read| *candidate == id && is_read.is_none())
        .times(1)
        .returning(move |_, _| Ok(Some(contact.clone())));

    let app = test::init_service(build_app(repos.into_state(&test_config()), true)).await;
    let req = TestRequest::put()
        .uri(&format!("/api/contact/{}/read", id))
        .insert_header(("Authorization", admin_bearer()))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn mark_read_with_explicit_flag() {
    let contact = sample_contact(false);
    let id = contact.id;

    let mut repos = TestRepos::new();
    repos
        .contact
        .expect_set_read()
        .withf(|_, is_read| *is_read == Some(false))
        .times(1)
        .returning(move |_, _| Ok(Some(contact.clone())));

    let app = test::init_service(build_app(repos.into_state(&test_config()), true)).await;
    let req = TestRequest::put()
        .uri(&format!("/api/contact/{}/read", id))
        .insert_header(("Authorization", admin_bearer()))
        .set_json(json!({"isRead": false}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["isRead"], false);
}

#[actix_rt::test]
async fn mark_read_with_a_mistyped_flag_is_400() {
    let mut repos = TestRepos::new();
    repos.contact.expect_set_read().never();

    let app = test::init_service(build_app(repos.into_state(&test_config()), true)).await;
    let req = TestRequest::put()
        .uri(&format!("/api/contact/{}/read", Uuid::new_v4()))
        .insert_header(("Authorization", admin_bearer()))
        .set_json(json!({"isRead": "false"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap().starts_with("Invalid JSON payload"));
}

#[actix_rt::test]
async fn malformed_and_unknown_ids_are_404() {
    let mut repos = TestRepos::new();
    repos.contact.expect_delete_contact().times(1).returning(|_| Ok(false));

    let app = test::init_service(build_app(repos.into_state(&test_config()), true)).await;

    let req = TestRequest::get()
        .uri("/api/contact/not-a-uuid")
        .insert_header(("Authorization", admin_bearer()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Contact not found with id of not-a-uuid");

    let req = TestRequest::delete()
        .uri(&format!("/api/contact/{}", Uuid::new_v4()))
        .insert_header(("Authorization", bearer(UserRole::Admin).1))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
