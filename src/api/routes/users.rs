//! User Routes
//!
//! - GET /api/v1/users - List users (`?role=`, `?team_id=`)
//! - POST /api/v1/users - Create a user
//! - GET /api/v1/users/:id - Get a user
//! - PUT /api/v1/users/:id - Partially update a user
//! - DELETE /api/v1/users/:id - Delete a user

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use super::teams::check_slot;
use super::{optional, required, validate_email};
use crate::api::dto::{CreateUserRequest, UpdateUserRequest, UserListParams, UserListResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::model::{User, UserRole};
use crate::store::UserFilter;

/// GET /api/v1/users
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UserListParams>,
) -> ApiResult<Json<UserListResponse>> {
    let filter = UserFilter {
        role: params.role.as_deref().map(parse_role).transpose()?,
        team_id: optional(params.team_id),
    };
    let users = state.store.list_users(&filter)?;

    Ok(Json(UserListResponse {
        total: users.len(),
        users,
    }))
}

/// GET /api/v1/users/:id
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<User>> {
    Ok(Json(require_user(&state, &id)?))
}

/// POST /api/v1/users
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let name = required("name", &req.name, 100)?;
    let email = validate_email(&req.email)?;
    let role = parse_role(&req.role)?;

    let mut user = User::new(name, email, role);
    user.phone = optional(req.phone);
    user.college = optional(req.college);

    user.team_id = optional(req.team_id);

    state
        .store
        .insert_user_checked(&user, |team_id, members| check_slot(team_id, role, members))?;
    tracing::info!(user_id = %user.id, role = %user.role, "Created user");

    Ok((StatusCode::CREATED, Json(user)))
}

/// PUT /api/v1/users/:id
///
/// An empty `team_id` detaches the user from their team.
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<User>> {
    let existing = require_user(&state, &id)?;
    let mut user = existing.clone();

    if let Some(name) = &req.name {
        user.name = required("name", name, 100)?;
    }
    if let Some(email) = &req.email {
        user.email = validate_email(email)?;
    }
    if let Some(role) = &req.role {
        user.role = parse_role(role)?;
    }
    if let Some(team_id) = req.team_id {
        user.team_id = optional(Some(team_id));
    }
    if req.phone.is_some() {
        user.phone = optional(req.phone);
    }
    if req.college.is_some() {
        user.college = optional(req.college);
    }

    let moved = user.team_id != existing.team_id || user.role != existing.role;
    if moved {
        let role = user.role;
        state
            .store
            .update_user_checked(&user, |team_id, members| check_slot(team_id, role, members))?;
    } else {
        state.store.update_user(&user)?;
    }
    tracing::info!(user_id = %user.id, "Updated user");

    Ok(Json(user))
}

/// DELETE /api/v1/users/:id
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if !state.store.delete_user(&id)? {
        return Err(ApiError::NotFound(format!("User with id {} not found", id)));
    }
    tracing::info!(user_id = %id, "Deleted user");
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) fn require_user(state: &AppState, id: &str) -> ApiResult<User> {
    state
        .store
        .get_user(id)?
        .ok_or_else(|| ApiError::NotFound(format!("User with id {} not found", id)))
}

fn parse_role(s: &str) -> ApiResult<UserRole> {
    UserRole::parse(s).ok_or_else(|| {
        ApiError::Validation(format!(
            "Invalid role: {}. Must be one of: super_admin, admin, team_leader, team_member",
            s
        ))
    })
}
