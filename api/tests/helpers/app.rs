//! Shared harness for the API integration tests: an in-memory database, a
//! programmatically built content store, and a scripted grading-service stub
//! wired into the real router.

use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use axum::{Router, body::Body, http::Request, response::Response};
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};
use tower::ServiceExt;

use api::routes::routes;
use api::services::ora::{GradingService, GradingServiceError};
use api::state::AppState;
use content::{ContentStore, ContentUnit, CourseKey, PEER_GRADING_CATEGORY};
use db::models::course_role::{Model as CourseRole, Role};

pub const TEST_ORG: &str = "MITx";
pub const TEST_COURSE: &str = "6.002x";
pub const TEST_RUN: &str = "2013_Spring";

pub fn test_course_key() -> CourseKey {
    CourseKey::new(TEST_ORG, TEST_COURSE, TEST_RUN)
}

pub fn grading_uri(suffix: &str) -> String {
    format!("/api/courses/{TEST_ORG}/{TEST_COURSE}/{TEST_RUN}/grading/{suffix}")
}

pub fn features_uri() -> String {
    format!("/api/courses/{TEST_ORG}/{TEST_COURSE}/{TEST_RUN}/features")
}

/// Required config keys, set once per test binary before the lazy
/// `AppConfig` singleton first initializes.
pub fn ensure_test_env() {
    static INIT: Once = Once::new();
    INIT.call_once(|| unsafe {
        std::env::set_var("DATABASE_PATH", "data/test.db");
        std::env::set_var("JWT_SECRET", "integration-test-secret");
        std::env::set_var("COURSE_CONTENT_ROOT", "data/content.json");
    });
}

/// An action forwarded to the stubbed grading service.
#[derive(Debug, Clone)]
pub struct RecordedAction {
    pub course_id: String,
    pub student_id: String,
    pub submission_id: String,
    pub action_type: String,
}

/// Scripted stand-in for the external grading service.
///
/// Each response field holds the body to return; `None` simulates a service
/// failure. Forwarded moderation actions are recorded for assertions.
pub struct StubGradingService {
    pub notifications: Option<Value>,
    pub problem_list_body: Option<String>,
    pub flagged_body: Option<String>,
    pub action_body: Option<String>,
    pub actions: Mutex<Vec<RecordedAction>>,
}

impl Default for StubGradingService {
    fn default() -> Self {
        Self {
            notifications: Some(json!({"success": true})),
            problem_list_body: Some(json!({"success": true, "problem_list": []}).to_string()),
            flagged_body: Some(
                json!({"success": true, "flagged_submissions": []}).to_string(),
            ),
            action_body: Some(json!({"success": true}).to_string()),
            actions: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl GradingService for StubGradingService {
    async fn get_combined_notifications(
        &self,
        _course_id: &str,
        _student_id: &str,
    ) -> Result<Value, GradingServiceError> {
        self.notifications
            .clone()
            .ok_or(GradingServiceError::Status(503))
    }

    async fn get_student_problem_list(
        &self,
        _course_id: &str,
        _student_id: &str,
    ) -> Result<String, GradingServiceError> {
        self.problem_list_body
            .clone()
            .ok_or(GradingServiceError::Status(503))
    }

    async fn get_flagged_problem_list(
        &self,
        _course_id: &str,
    ) -> Result<String, GradingServiceError> {
        self.flagged_body
            .clone()
            .ok_or(GradingServiceError::Status(503))
    }

    async fn take_action_on_flags(
        &self,
        course_id: &str,
        student_id: &str,
        submission_id: &str,
        action_type: &str,
    ) -> Result<String, GradingServiceError> {
        self.actions
            .lock()
            .expect("actions lock poisoned")
            .push(RecordedAction {
                course_id: course_id.to_string(),
                student_id: student_id.to_string(),
                submission_id: submission_id.to_string(),
                action_type: action_type.to_string(),
            });
        self.action_body
            .clone()
            .ok_or(GradingServiceError::Status(503))
    }
}

/// Content store with the test course but no peer-grading unit.
pub fn content_without_peer_unit() -> ContentStore {
    let mut store = ContentStore::new();
    store.add_course(test_course_key(), "Circuits and Electronics");
    store
}

/// Content store with the test course and one reachable peer-grading unit.
pub fn content_with_peer_unit() -> ContentStore {
    let mut store = content_without_peer_unit();
    let key = test_course_key();
    store
        .add_unit(
            &key,
            ContentUnit {
                name: "peer_1".to_string(),
                category: PEER_GRADING_CATEGORY.to_string(),
                display_name: "Peer Assessment".to_string(),
                use_for_single_location: true,
            },
        )
        .expect("Failed to add peer unit");
    store
        .add_path(&key, "Week1", "Grading", "peer_1")
        .expect("Failed to add peer unit path");
    store
}

pub struct TestApp {
    pub app: Router,
    pub db: DatabaseConnection,
}

pub async fn make_test_app(content: ContentStore, grader: Arc<StubGradingService>) -> TestApp {
    ensure_test_env();

    let db = db::test_utils::setup_test_db().await;
    let state = AppState::new(db.clone(), Arc::new(content), grader);
    let app = Router::new()
        .nest("/api", routes(state.clone()))
        .with_state(state);

    TestApp { app, db }
}

pub async fn seed_role(db: &DatabaseConnection, user_id: i64, role: Role) {
    CourseRole::assign(db, user_id, &test_course_key().to_string(), role)
        .await
        .expect("Failed to seed course role");
}

pub fn bearer(user_id: i64, admin: bool) -> String {
    ensure_test_env();
    let (token, _) = api::auth::generate_jwt(user_id, admin);
    format!("Bearer {token}")
}

/// Fires a request at the test app.
pub async fn send(app: &TestApp, req: Request<Body>) -> Response {
    app.app.clone().oneshot(req).await.expect("request failed")
}

pub async fn response_json(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    serde_json::from_slice(&body).expect("Response body was not valid JSON")
}
