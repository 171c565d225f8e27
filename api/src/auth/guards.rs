//! Role based access guards for course-scoped routes.
//!
//! The grading endpoints know two access levels: `staff` (course staff only)
//! and `load` (anyone with a role on the course). Guards resolve the course
//! from the `org`/`course`/`run` path segments, check the caller's role in
//! `course_roles`, and reject up front so handlers never see unauthorized
//! requests. Platform admins pass every guard.

use std::collections::HashMap;

use axum::{
    Json,
    body::Body,
    extract::{FromRequestParts, Path, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use db::models::course_role::{Model as CourseRole, Role};
use sea_orm::DatabaseConnection;

use crate::auth::claims::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(serde::Serialize, Default)]
pub struct Empty;

/// Extracts and validates the user from the request, then re-inserts the
/// claims into request extensions for downstream handlers.
async fn extract_and_insert_authuser(
    req: Request<Body>,
) -> Result<(Request<Body>, AuthUser), (StatusCode, Json<ApiResponse<Empty>>)> {
    let (mut parts, body) = req.into_parts();
    let user = AuthUser::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::error("Authentication required")),
            )
        })?;

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(user.clone());
    Ok((req, user))
}

/// Joins the course path segments back into the `org/course/run` id the
/// role table is keyed by.
fn course_id_from_params(
    params: &HashMap<String, String>,
) -> Result<String, (StatusCode, Json<ApiResponse<Empty>>)> {
    match (params.get("org"), params.get("course"), params.get("run")) {
        (Some(org), Some(course), Some(run)) => Ok(format!("{org}/{course}/{run}")),
        _ => Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("Missing course id in path")),
        )),
    }
}

/// Role lookup that fails safe: a database error denies access.
async fn user_has_any_role(
    db: &DatabaseConnection,
    user_id: i64,
    course_id: &str,
    roles: &[Role],
) -> bool {
    match CourseRole::has_any_role(db, user_id, course_id, roles).await {
        Ok(allowed) => allowed,
        Err(e) => {
            tracing::warn!(
                error = %e,
                user_id, %course_id,
                "DB error while checking course role; denying access"
            );
            false
        }
    }
}

/// Base role guard the course-level guards build on.
async fn allow_role_base(
    State(app_state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
    req: Request<Body>,
    next: Next,
    required_roles: &[Role],
    failure_msg: &str,
) -> Result<Response, (StatusCode, Json<ApiResponse<Empty>>)> {
    let (req, user) = extract_and_insert_authuser(req).await?;
    let course_id = course_id_from_params(&params)?;

    if user.0.admin {
        return Ok(next.run(req).await);
    }

    if user_has_any_role(app_state.db(), user.0.sub, &course_id, required_roles).await {
        Ok(next.run(req).await)
    } else {
        Err((StatusCode::FORBIDDEN, Json(ApiResponse::error(failure_msg))))
    }
}

/// Basic guard to ensure the request is authenticated.
pub async fn allow_authenticated(
    req: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, Json<ApiResponse<Empty>>)> {
    let (req, _user) = extract_and_insert_authuser(req).await?;

    Ok(next.run(req).await)
}

/// Guard for course staff only (`staff` access level).
pub async fn allow_course_staff(
    State(app_state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, Json<ApiResponse<Empty>>)> {
    allow_role_base(
        State(app_state),
        Path(params),
        req,
        next,
        &[Role::Staff],
        "Staff access required for this course",
    )
    .await
}

/// Guard for anyone with a role on the course (`load` access level).
pub async fn allow_course_access(
    State(app_state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, Json<ApiResponse<Empty>>)> {
    allow_role_base(
        State(app_state),
        Path(params),
        req,
        next,
        &[Role::Staff, Role::Student],
        "You are not enrolled in this course",
    )
    .await
}
