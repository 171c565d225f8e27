//! Course-scoped route groups.
//!
//! Course identity travels as three path segments (`org`, `course`, `run`)
//! because path parameters cannot contain `/`; handlers reassemble them into
//! a [`content::CourseKey`] at the boundary.

use axum::{Json, Router, http::StatusCode, response::IntoResponse, response::Response};

use content::CourseKey;

use crate::response::ApiResponse;
use crate::state::AppState;
use features::features_routes;
use grading::grading_routes;

pub mod features;
pub mod grading;

/// Reassembles the course path segments and checks the course exists in the
/// content store. Handlers bail out with a 404 envelope for unknown courses.
pub fn resolve_course(
    app_state: &AppState,
    org: String,
    course: String,
    run: String,
) -> Result<CourseKey, Response> {
    let course_key = CourseKey::new(org, course, run);
    if app_state.content().get_course(&course_key).is_none() {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<()>::error("Course not found")),
        )
            .into_response());
    }
    Ok(course_key)
}

/// Builds the `/courses` route group.
///
/// - Nested grading routes under `/{org}/{course}/{run}/grading`
/// - Nested feature-flag routes under `/{org}/{course}/{run}/features`
pub fn courses_routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .nest(
            "/{org}/{course}/{run}/grading",
            grading_routes(app_state.clone()),
        )
        .nest("/{org}/{course}/{run}/features", features_routes(app_state))
}
