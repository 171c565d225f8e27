//! HTTP route entry point for `/api/...`.
//!
//! Route groups:
//! - `/health` → Health check endpoint (public)
//! - `/courses` → Course-scoped grading and feature endpoints
//!   (authenticated users; per-route role guards within the group)

use axum::{Router, middleware::from_fn};

use crate::auth::guards::allow_authenticated;
use crate::routes::{courses::courses_routes, health::health_routes};
use crate::state::AppState;

pub mod courses;
pub mod health;

/// Builds the complete application router for all HTTP endpoints.
///
/// The returned router has `AppState` as its state type and mounts all
/// route groups under their respective base paths.
pub fn routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/health", health_routes())
        .nest(
            "/courses",
            courses_routes(app_state).route_layer(from_fn(allow_authenticated)),
        )
}
