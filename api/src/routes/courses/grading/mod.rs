//! # Course Grading Routes
//!
//! Defines and wires up routes for the open-ended grading endpoint group
//! under `/api/courses/{org}/{course}/{run}/grading`.
//!
//! ## Structure
//! - `get.rs` — GET handlers (staff dashboard, peer redirect, problem lists,
//!   notification panel)
//! - `post.rs` — the flagged-submission moderation action
//!
//! ## Usage
//! Call `grading_routes()` to get a configured `Router` to be nested under
//! the course path in the courses group.

use axum::{
    Router,
    body::Body,
    http::{HeaderValue, Request, header},
    middleware::{Next, from_fn, from_fn_with_state},
    response::Response,
    routing::{any, get},
};
use serde::Serialize;

use content::CourseKey;

use crate::auth::guards::{allow_course_access, allow_course_staff};
use crate::state::AppState;
use get::{
    combined_notifications, flagged_problem_list, peer_grading, staff_grading,
    student_problem_list,
};
use post::take_action_on_flags;

pub mod get;
pub mod post;

/// Staff-facing message shown when the external grading service cannot be
/// reached or rejects a request. Ends with spacing so detail text can be
/// appended directly.
pub const STAFF_ERROR_MESSAGE: &str =
    "Could not contact the external grading service.  Please notify the development team.  ";

/// Error payload for the grading endpoints whose wire contract is
/// `{success, error}` rather than the standard API envelope.
#[derive(Debug, Serialize)]
pub struct GradingErrorResponse {
    pub success: bool,
    pub error: String,
}

impl GradingErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

/// Route for a grading page, slash-terminated the way the frontend widgets
/// expect their ajax endpoints.
pub fn grading_url_with_slash(course_key: &CourseKey, suffix: &str) -> String {
    let url = format!("/api/courses/{course_key}/grading/{suffix}");
    if url.ends_with('/') { url } else { format!("{url}/") }
}

/// Grading state is personalized; it must never be cached by the browser or
/// any intermediary.
async fn no_store(req: Request<Body>, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-cache, no-store, must-revalidate"),
    );
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    response
}

/// Builds the course grading route group.
///
/// Routes:
/// - `GET  /staff`         → staff grading dashboard context (staff only)
/// - `GET  /peer`          → redirect to the course's peer grading unit
/// - `GET  /problems`      → the caller's own submitted problems
/// - `GET  /flagged`       → flagged submissions (staff only)
/// - `GET  /notifications` → combined notification panel
/// - `POST /flags`         → moderation action on a flagged submission
///   (staff only; other methods answer 404)
pub fn grading_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/staff",
            get(staff_grading)
                .route_layer(from_fn_with_state(app_state.clone(), allow_course_staff)),
        )
        .route(
            "/peer",
            get(peer_grading)
                .route_layer(from_fn_with_state(app_state.clone(), allow_course_access)),
        )
        .route(
            "/problems",
            get(student_problem_list)
                .route_layer(from_fn_with_state(app_state.clone(), allow_course_access)),
        )
        .route(
            "/flagged",
            get(flagged_problem_list)
                .route_layer(from_fn_with_state(app_state.clone(), allow_course_staff)),
        )
        .route(
            "/notifications",
            get(combined_notifications)
                .route_layer(from_fn_with_state(app_state.clone(), allow_course_access)),
        )
        .route(
            "/flags",
            any(take_action_on_flags)
                .layer(from_fn_with_state(app_state, allow_course_staff)),
        )
        .layer(from_fn(no_store))
}

#[cfg(test)]
mod tests {
    use super::grading_url_with_slash;
    use content::CourseKey;

    #[test]
    fn ajax_urls_are_slash_terminated() {
        let key = CourseKey::new("MITx", "6.002x", "2013_Spring");
        let url = grading_url_with_slash(&key, "staff");
        assert_eq!(url, "/api/courses/MITx/6.002x/2013_Spring/grading/staff/");
    }
}
