use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Serialize;
use serde_json::Value;
use tracing::error;
use util::config;

use content::find_peer_grading_unit;

use crate::auth::{AuthUser, anonymous_student_id};
use crate::routes::courses::grading::{
    GradingErrorResponse, STAFF_ERROR_MESSAGE, grading_url_with_slash,
};
use crate::routes::courses::resolve_course;
use crate::services::notifications::{self, NotificationItem};
use crate::services::problem_list::StudentProblemList;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct StaffGradingContext {
    pub course_id: String,
    pub ajax_url: String,
    pub staff_access: bool,
}

/// GET /api/courses/{org}/{course}/{run}/grading/staff
///
/// Context for the instructor grading dashboard. The dashboard widget polls
/// `ajax_url` for submissions to grade.
///
/// ### Access Control
/// Course staff only (enforced by the route guard).
///
/// ### Responses
///
/// - `200 OK`
/// ```json
/// {
///   "course_id": "MITx/6.002x/2013_Spring",
///   "ajax_url": "/api/courses/MITx/6.002x/2013_Spring/grading/staff/",
///   "staff_access": true
/// }
/// ```
///
/// - `404 Not Found` for an unknown course
pub async fn staff_grading(
    State(app_state): State<AppState>,
    Path((org, course, run)): Path<(String, String, String)>,
) -> Response {
    let course_key = match resolve_course(&app_state, org, course, run) {
        Ok(course_key) => course_key,
        Err(response) => return response,
    };

    let context = StaffGradingContext {
        course_id: course_key.to_string(),
        ajax_url: grading_url_with_slash(&course_key, "staff"),
        staff_access: true,
    };

    Json(context).into_response()
}

/// GET /api/courses/{org}/{course}/{run}/grading/peer
///
/// Sends the caller to the course's peer grading unit. When the course has
/// no reachable single-problem peer grading unit, answers `200 OK` with an
/// inline error instead of redirecting:
///
/// ```json
/// {
///   "success": false,
///   "error": "Error with initializing peer grading. ..."
/// }
/// ```
pub async fn peer_grading(
    State(app_state): State<AppState>,
    Path((org, course, run)): Path<(String, String, String)>,
) -> Response {
    let course_key = match resolve_course(&app_state, org, course, run) {
        Ok(course_key) => course_key,
        Err(response) => return response,
    };

    match find_peer_grading_unit(app_state.content(), &course_key, &config::course_base_url()) {
        Some(problem_url) => Redirect::to(&problem_url).into_response(),
        None => {
            let error_message = "Error with initializing peer grading. \
                There has not been a peer grading problem created in the courseware \
                that would allow you to grade others. Please check back later for this.";
            error!(course = %course_key, "{error_message}");
            Json(GradingErrorResponse::new(error_message)).into_response()
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StudentProblemListContext {
    pub course_id: String,
    pub ajax_url: String,
    pub success: bool,
    pub problem_list: Vec<Value>,
    pub error_text: String,
    pub staff_access: bool,
}

/// GET /api/courses/{org}/{course}/{run}/grading/problems
///
/// The caller's own submitted problems, fetched from the grading service
/// and annotated with navigable URLs. On a service failure the list is empty
/// and `error_text` carries a student-facing message; the request itself
/// still succeeds.
pub async fn student_problem_list(
    State(app_state): State<AppState>,
    Path((org, course, run)): Path<(String, String, String)>,
    AuthUser(claims): AuthUser,
) -> Response {
    let course_key = match resolve_course(&app_state, org, course, run) {
        Ok(course_key) => course_key,
        Err(response) => return response,
    };

    let student_id = anonymous_student_id(claims.sub);
    let mut problem_list = StudentProblemList::new(course_key.clone(), student_id);
    let success = problem_list.fetch_from_grading_service(app_state.grader()).await;

    let (valid_problems, error_text) = if success {
        let valid =
            problem_list.add_problem_data(app_state.content(), &config::course_base_url());
        (valid, String::new())
    } else {
        (Vec::new(), problem_list.error_text.clone())
    };

    let context = StudentProblemListContext {
        course_id: course_key.to_string(),
        ajax_url: grading_url_with_slash(&course_key, "problems"),
        success,
        problem_list: valid_problems,
        error_text,
        staff_access: false,
    };

    Json(context).into_response()
}

#[derive(Debug, Serialize)]
pub struct FlaggedProblemListContext {
    pub course_id: String,
    pub ajax_url: String,
    pub success: bool,
    pub problem_list: Vec<Value>,
    pub error_text: String,
    pub staff_access: bool,
}

/// GET /api/courses/{org}/{course}/{run}/grading/flagged
///
/// Submissions students have flagged as inappropriate, for staff moderation.
///
/// The grading service's response is parsed here; a transport failure or a
/// malformed payload degrades to `success: false` with an empty list and
/// staff-facing error text, while the developer-facing detail goes to the
/// log.
pub async fn flagged_problem_list(
    State(app_state): State<AppState>,
    Path((org, course, run)): Path<(String, String, String)>,
) -> Response {
    let course_key = match resolve_course(&app_state, org, course, run) {
        Ok(course_key) => course_key,
        Err(response) => return response,
    };
    let course_id = course_key.to_string();

    let mut success = false;
    let mut error_text = String::new();
    let mut problem_list: Vec<Value> = Vec::new();

    match app_state.grader().get_flagged_problem_list(&course_id).await {
        Ok(raw) => match serde_json::from_str::<Value>(&raw) {
            Ok(parsed) => {
                success = parsed.get("success").and_then(Value::as_bool).unwrap_or(false);
                if let Some(upstream_error) = parsed.get("error").and_then(Value::as_str) {
                    error_text = upstream_error.to_string();
                } else {
                    problem_list = parsed
                        .get("flagged_submissions")
                        .and_then(Value::as_array)
                        .cloned()
                        .unwrap_or_default();
                }
            }
            Err(err) => {
                // Staff see the generic message; the log keeps the detail.
                error!(
                    course = %course_id,
                    error = %err,
                    "Could not parse flagged problem list from the grading service response"
                );
                error_text = STAFF_ERROR_MESSAGE.to_string();
                success = false;
            }
        },
        Err(err) => {
            error!(
                course = %course_id,
                error = %err,
                "Could not get flagged problem list from the grading service"
            );
            error_text = STAFF_ERROR_MESSAGE.to_string();
            success = false;
        }
    }

    let context = FlaggedProblemListContext {
        course_id,
        ajax_url: grading_url_with_slash(&course_key, "flagged"),
        success,
        problem_list,
        error_text,
        staff_access: true,
    };

    Json(context).into_response()
}

#[derive(Debug, Serialize)]
pub struct CombinedNotificationsContext {
    pub course_id: String,
    pub ajax_url: String,
    pub success: bool,
    pub error_text: String,
    pub notification_list: Vec<NotificationItem>,
}

/// GET /api/courses/{org}/{course}/{run}/grading/notifications
///
/// The combined notification panel: one entry per grading channel with new
/// or pending activity for this caller, in canonical channel order.
pub async fn combined_notifications(
    State(app_state): State<AppState>,
    Path((org, course, run)): Path<(String, String, String)>,
    AuthUser(claims): AuthUser,
) -> Response {
    let course_key = match resolve_course(&app_state, org, course, run) {
        Ok(course_key) => course_key,
        Err(response) => return response,
    };

    let student_id = anonymous_student_id(claims.sub);
    let notification_list = notifications::combined_notifications(
        app_state.content(),
        app_state.grader(),
        &course_key,
        &student_id,
        &config::course_base_url(),
    )
    .await;

    let context = CombinedNotificationsContext {
        course_id: course_key.to_string(),
        ajax_url: grading_url_with_slash(&course_key, "notifications"),
        success: true,
        error_text: String::new(),
        notification_list,
    };

    Json(context).into_response()
}
