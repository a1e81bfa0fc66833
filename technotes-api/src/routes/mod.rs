/// API route handlers
///
/// - `health`: Health check endpoint
/// - `users`: Account CRUD
/// - `notes`: Note CRUD

pub mod health;
pub mod notes;
pub mod users;

use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};

/// Confirmation body shared by mutating endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Body of the DELETE endpoints
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeleteRequest {
    pub id: Uuid,
}

/// Unwraps a JSON body, treating any missing, mistyped or unknown field as
/// invalid input
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            tracing::debug!(reason = %rejection.body_text(), "Rejected request body");
            Err(ApiError::BadRequest("All fields are required".to_string()))
        }
    }
}
