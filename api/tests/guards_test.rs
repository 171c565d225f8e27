mod helpers;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};

use db::models::course_role::Role;
use helpers::app::{
    StubGradingService, bearer, content_with_peer_unit, grading_uri, make_test_app,
    response_json, seed_role, send,
};

fn get_request(uri: &str, auth: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(auth) = auth {
        builder = builder.header("Authorization", auth);
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let app = make_test_app(content_with_peer_unit(), Arc::new(StubGradingService::default())).await;

    let response = send(&app, get_request(&grading_uri("staff"), None)).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn garbage_token_is_unauthorized() {
    let app = make_test_app(content_with_peer_unit(), Arc::new(StubGradingService::default())).await;

    let response = send(
        &app,
        get_request(&grading_uri("staff"), Some("Bearer not-a-jwt")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn students_cannot_reach_staff_routes() {
    let app = make_test_app(content_with_peer_unit(), Arc::new(StubGradingService::default())).await;
    seed_role(&app.db, 2, Role::Student).await;

    let response = send(&app, get_request(&grading_uri("flagged"), Some(&bearer(2, false)))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let json = response_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Staff access required for this course");
}

#[tokio::test]
async fn roles_do_not_carry_across_courses() {
    let app = make_test_app(content_with_peer_unit(), Arc::new(StubGradingService::default())).await;
    seed_role(&app.db, 3, Role::Staff).await;

    // Staff on 2013_Spring, a stranger to 2013_Fall.
    let uri = "/api/courses/MITx/6.002x/2013_Fall/grading/staff";
    let response = send(&app, get_request(uri, Some(&bearer(3, false)))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admins_bypass_course_roles() {
    let app = make_test_app(content_with_peer_unit(), Arc::new(StubGradingService::default())).await;

    let response = send(&app, get_request(&grading_uri("staff"), Some(&bearer(99, true)))).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn enrolled_students_can_reach_load_routes() {
    let app = make_test_app(content_with_peer_unit(), Arc::new(StubGradingService::default())).await;
    seed_role(&app.db, 4, Role::Student).await;

    let response = send(
        &app,
        get_request(&grading_uri("notifications"), Some(&bearer(4, false))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn unenrolled_users_cannot_reach_load_routes() {
    let app = make_test_app(content_with_peer_unit(), Arc::new(StubGradingService::default())).await;

    let response = send(
        &app,
        get_request(&grading_uri("notifications"), Some(&bearer(5, false))),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
