//! # Course Feature Routes
//!
//! Per-course feature flags under `/api/courses/{org}/{course}/{run}/features`.

use axum::{Router, middleware::from_fn_with_state, routing::get};

use crate::auth::guards::allow_course_access;
use crate::state::AppState;
use get::get_course_features;

pub mod get;

/// Builds the course features route group.
///
/// Routes:
/// - `GET /` → the course's feature flags
pub fn features_routes(app_state: AppState) -> Router<AppState> {
    Router::new().route(
        "/",
        get(get_course_features).route_layer(from_fn_with_state(app_state, allow_course_access)),
    )
}
