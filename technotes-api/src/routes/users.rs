/// User endpoints
///
/// - `GET /users` - List users (credential hash omitted)
/// - `POST /users` - Create user
/// - `PATCH /users` - Update user
/// - `DELETE /users` - Delete user (refused while the user owns notes)

use super::{json_body, DeleteRequest, MessageResponse};
use crate::{app::AppState, error::ApiResult};
use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use technotes_shared::models::user::UserView;
use technotes_shared::repo::users::{CreateUserRequest, UpdateUserRequest};
use uuid::Uuid;

/// Create user response
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateUserResponse {
    pub message: String,
    pub id: Uuid,
}

/// List all users
///
/// # Errors
///
/// - `400 Bad Request`: No users exist
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<UserView>>> {
    let users = state.repos.users.list_all().await?;
    Ok(Json(users))
}

/// Create a new user
///
/// # Endpoint
///
/// ```text
/// POST /users
/// Content-Type: application/json
///
/// { "username": "alice", "password": "pw1", "roles": ["Employee"] }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Missing or empty fields
/// - `409 Conflict`: Username already exists
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CreateUserResponse>)> {
    let req = json_body(payload)?;
    let created = state.repos.users.create(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateUserResponse {
            message: format!("New user {} created", created.username),
            id: created.id,
        }),
    ))
}

/// Update a user
///
/// # Endpoint
///
/// ```text
/// PATCH /users
/// Content-Type: application/json
///
/// { "id": "uuid", "username": "alice", "roles": ["Manager"], "active": true, "password": "optional" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Missing fields or unknown user
/// - `409 Conflict`: Username belongs to another user
pub async fn update_user(
    State(state): State<AppState>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let req = json_body(payload)?;
    let username = state.repos.users.update(req).await?;

    Ok(Json(MessageResponse {
        message: format!("{} updated", username),
    }))
}

/// Delete a user
///
/// # Errors
///
/// - `400 Bad Request`: Missing id, unknown user, or user has assigned notes
pub async fn delete_user(
    State(state): State<AppState>,
    payload: Result<Json<DeleteRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let req = json_body(payload)?;
    let message = state.repos.users.delete(req.id).await?;

    Ok(Json(MessageResponse { message }))
}
