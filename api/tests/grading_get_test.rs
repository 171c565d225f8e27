mod helpers;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::json;

use api::routes::courses::grading::STAFF_ERROR_MESSAGE;
use api::services::problem_list::STUDENT_ERROR_MESSAGE;
use db::models::course_role::Role;
use helpers::app::{
    StubGradingService, bearer, content_with_peer_unit, content_without_peer_unit, grading_uri,
    make_test_app, response_json, seed_role, send,
};

fn get_request(uri: &str, auth: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("Authorization", auth)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn staff_grading_returns_context_with_no_store_headers() {
    let app = make_test_app(content_with_peer_unit(), Arc::new(StubGradingService::default())).await;
    seed_role(&app.db, 1, Role::Staff).await;

    let response = send(&app, get_request(&grading_uri("staff"), &bearer(1, false))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let cache_control = response
        .headers()
        .get(header::CACHE_CONTROL)
        .expect("missing cache-control header");
    assert_eq!(cache_control, "no-cache, no-store, must-revalidate");
    assert_eq!(response.headers().get(header::PRAGMA).unwrap(), "no-cache");

    let json = response_json(response).await;
    assert_eq!(json["course_id"], "MITx/6.002x/2013_Spring");
    assert_eq!(json["staff_access"], true);
    assert!(
        json["ajax_url"]
            .as_str()
            .unwrap()
            .ends_with("/grading/staff/")
    );
}

#[tokio::test]
async fn staff_grading_is_forbidden_for_students() {
    let app = make_test_app(content_with_peer_unit(), Arc::new(StubGradingService::default())).await;
    seed_role(&app.db, 2, Role::Student).await;

    let response = send(&app, get_request(&grading_uri("staff"), &bearer(2, false))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let json = response_json(response).await;
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn peer_grading_redirects_to_the_peer_unit() {
    let app = make_test_app(content_with_peer_unit(), Arc::new(StubGradingService::default())).await;
    seed_role(&app.db, 3, Role::Student).await;

    let response = send(&app, get_request(&grading_uri("peer"), &bearer(3, false))).await;
    assert!(response.status().is_redirection());

    let location = response
        .headers()
        .get(header::LOCATION)
        .expect("missing redirect location")
        .to_str()
        .unwrap();
    assert_eq!(
        location,
        "/courses/MITx/6.002x/2013_Spring/courseware/Week1/Grading/"
    );
    assert!(location.ends_with('/'));
}

#[tokio::test]
async fn peer_grading_shows_an_error_when_no_unit_exists() {
    let app =
        make_test_app(content_without_peer_unit(), Arc::new(StubGradingService::default())).await;
    seed_role(&app.db, 3, Role::Student).await;

    let response = send(&app, get_request(&grading_uri("peer"), &bearer(3, false))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = response_json(response).await;
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().unwrap().contains("peer grading"));
}

#[tokio::test]
async fn student_problem_list_annotates_problem_urls() {
    let grader = Arc::new(StubGradingService {
        problem_list_body: Some(
            json!({
                "success": true,
                "problem_list": [
                    {"location": "peer_1", "problem_name": "Essay on circuits"}
                ]
            })
            .to_string(),
        ),
        ..Default::default()
    });
    let app = make_test_app(content_with_peer_unit(), grader).await;
    seed_role(&app.db, 4, Role::Student).await;

    let response = send(&app, get_request(&grading_uri("problems"), &bearer(4, false))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = response_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["staff_access"], false);
    assert_eq!(json["error_text"], "");

    let problems = json["problem_list"].as_array().unwrap();
    assert_eq!(problems.len(), 1);
    assert_eq!(problems[0]["problem_name"], "Essay on circuits");
    assert!(problems[0]["problem_url"].as_str().unwrap().ends_with('/'));
}

#[tokio::test]
async fn student_problem_list_drops_unresolvable_problems() {
    let grader = Arc::new(StubGradingService {
        problem_list_body: Some(
            json!({
                "success": true,
                "problem_list": [
                    {"location": "peer_1", "problem_name": "Reachable"},
                    {"location": "ghost", "problem_name": "Orphaned"}
                ]
            })
            .to_string(),
        ),
        ..Default::default()
    });
    let app = make_test_app(content_with_peer_unit(), grader).await;
    seed_role(&app.db, 4, Role::Student).await;

    let response = send(&app, get_request(&grading_uri("problems"), &bearer(4, false))).await;
    let json = response_json(response).await;

    let problems = json["problem_list"].as_array().unwrap();
    assert_eq!(problems.len(), 1);
    assert_eq!(problems[0]["problem_name"], "Reachable");
}

#[tokio::test]
async fn student_problem_list_degrades_when_the_service_fails() {
    let grader = Arc::new(StubGradingService {
        problem_list_body: None,
        ..Default::default()
    });
    let app = make_test_app(content_with_peer_unit(), grader).await;
    seed_role(&app.db, 4, Role::Student).await;

    let response = send(&app, get_request(&grading_uri("problems"), &bearer(4, false))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = response_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["problem_list"].as_array().unwrap().len(), 0);
    assert_eq!(json["error_text"], STUDENT_ERROR_MESSAGE);
}

#[tokio::test]
async fn flagged_problem_list_returns_flagged_submissions() {
    let grader = Arc::new(StubGradingService {
        flagged_body: Some(
            json!({
                "success": true,
                "flagged_submissions": [
                    {"submission_id": 12, "student_response": "...", "flagged_by": ["abc"]}
                ]
            })
            .to_string(),
        ),
        ..Default::default()
    });
    let app = make_test_app(content_with_peer_unit(), grader).await;
    seed_role(&app.db, 5, Role::Staff).await;

    let response = send(&app, get_request(&grading_uri("flagged"), &bearer(5, false))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = response_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["staff_access"], true);
    assert_eq!(json["problem_list"].as_array().unwrap().len(), 1);
    assert_eq!(json["problem_list"][0]["submission_id"], 12);
}

#[tokio::test]
async fn flagged_problem_list_recovers_from_invalid_json() {
    let grader = Arc::new(StubGradingService {
        flagged_body: Some("this is not json".to_string()),
        ..Default::default()
    });
    let app = make_test_app(content_with_peer_unit(), grader).await;
    seed_role(&app.db, 5, Role::Staff).await;

    let response = send(&app, get_request(&grading_uri("flagged"), &bearer(5, false))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = response_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["problem_list"].as_array().unwrap().len(), 0);
    assert_eq!(json["error_text"], STAFF_ERROR_MESSAGE);
}

#[tokio::test]
async fn flagged_problem_list_surfaces_upstream_error_text() {
    let grader = Arc::new(StubGradingService {
        flagged_body: Some(
            json!({"success": false, "error": "Grading dashboard is rebuilding"}).to_string(),
        ),
        ..Default::default()
    });
    let app = make_test_app(content_with_peer_unit(), grader).await;
    seed_role(&app.db, 5, Role::Staff).await;

    let response = send(&app, get_request(&grading_uri("flagged"), &bearer(5, false))).await;
    let json = response_json(response).await;

    assert_eq!(json["success"], false);
    assert_eq!(json["error_text"], "Grading dashboard is rebuilding");
    assert_eq!(json["problem_list"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn unknown_course_is_not_found() {
    let app = make_test_app(content_with_peer_unit(), Arc::new(StubGradingService::default())).await;

    let uri = "/api/courses/MITx/6.002x/1999_Winter/grading/staff";
    let response = send(&app, get_request(uri, &bearer(1, true))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = response_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Course not found");
}
