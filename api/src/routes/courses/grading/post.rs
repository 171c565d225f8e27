use std::collections::HashMap;

use axum::{
    Json,
    extract::{Form, Path, State},
    http::{Method, StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::routes::courses::grading::{GradingErrorResponse, STAFF_ERROR_MESSAGE};
use crate::routes::courses::resolve_course;
use crate::state::AppState;

/// Form fields the moderation action requires, in the order missing fields
/// are reported.
const REQUIRED_FLAG_FIELDS: [&str; 3] = ["submission_id", "action_type", "student_id"];

/// POST /api/courses/{org}/{course}/{run}/grading/flags
///
/// Takes a moderation action (e.g. `unflag`, `ban`) on a student-flagged
/// submission and relays the grading service's JSON response verbatim.
///
/// ### Access Control
/// Course staff only (enforced by the route guard).
///
/// ### Form fields
/// - `submission_id`
/// - `action_type` (normalized to lowercase before forwarding)
/// - `student_id`
///
/// ### Responses
///
/// - Non-`POST` methods → `404 Not Found`. Existing clients depend on this,
///   so the route is registered for every method and answers 404 itself
///   instead of the router's default 405.
/// - Missing field → `200 OK` (the contract keeps error bodies on 200)
/// ```json
/// {
///   "success": false,
///   "error": "Could not contact the external grading service.  Please notify the development team.  Missing key action_type from submission.  Please reload and try again."
/// }
/// ```
/// - Service failure → `200 OK` with `{"success": false, "error": "..."}`
/// - Success → the upstream JSON body, `Content-Type: application/json`
pub async fn take_action_on_flags(
    State(app_state): State<AppState>,
    Path((org, course, run)): Path<(String, String, String)>,
    method: Method,
    Form(fields): Form<HashMap<String, String>>,
) -> Response {
    if method != Method::POST {
        return StatusCode::NOT_FOUND.into_response();
    }

    let course_key = match resolve_course(&app_state, org, course, run) {
        Ok(course_key) => course_key,
        Err(response) => return response,
    };

    for key in REQUIRED_FLAG_FIELDS {
        if !fields.contains_key(key) {
            let error = format!(
                "{STAFF_ERROR_MESSAGE}Missing key {key} from submission.  Please reload and try again."
            );
            return Json(GradingErrorResponse::new(error)).into_response();
        }
    }

    let submission_id = fields["submission_id"].trim();
    let student_id = fields["student_id"].trim();
    let action_type = fields["action_type"].trim().to_lowercase();

    match app_state
        .grader()
        .take_action_on_flags(
            &course_key.to_string(),
            student_id,
            submission_id,
            &action_type,
        )
        .await
    {
        Ok(body) => {
            ([(header::CONTENT_TYPE, "application/json")], body).into_response()
        }
        Err(err) => {
            error!(
                %submission_id,
                %action_type,
                %student_id,
                error = %err,
                "Error taking action on flagged peer grading submission"
            );
            Json(GradingErrorResponse::new(STAFF_ERROR_MESSAGE)).into_response()
        }
    }
}
