use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use db::models::course_feature::Model as CourseFeature;

use crate::response::ApiResponse;
use crate::routes::courses::resolve_course;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CourseFeaturesResponse {
    /// Whether email-to-instructor is exposed for this course.
    pub email_enabled: bool,
}

/// GET /api/courses/{org}/{course}/{run}/features
///
/// The course's feature flags. A flag that was never explicitly enabled
/// reads as disabled.
///
/// ### Responses
///
/// - `200 OK`
/// ```json
/// {
///   "success": true,
///   "data": { "email_enabled": false },
///   "message": "Course features retrieved successfully"
/// }
/// ```
///
/// - `404 Not Found` for an unknown course
pub async fn get_course_features(
    State(app_state): State<AppState>,
    Path((org, course, run)): Path<(String, String, String)>,
) -> Response {
    let course_key = match resolve_course(&app_state, org, course, run) {
        Ok(course_key) => course_key,
        Err(response) => return response,
    };

    match CourseFeature::email_enabled(app_state.db(), &course_key.to_string()).await {
        Ok(email_enabled) => Json(ApiResponse::success(
            CourseFeaturesResponse { email_enabled },
            "Course features retrieved successfully",
        ))
        .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<()>::error(format!("Database error: {}", e))),
        )
            .into_response(),
    }
}
