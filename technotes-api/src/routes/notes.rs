/// Note endpoints
///
/// - `GET /notes` - List notes with owner usernames
/// - `POST /notes` - Create note (assigns the next ticket)
/// - `PATCH /notes` - Update note
/// - `DELETE /notes` - Delete note

use super::{json_body, DeleteRequest, MessageResponse};
use crate::{app::AppState, error::ApiResult};
use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use technotes_shared::models::note::NoteView;
use technotes_shared::repo::notes::{CreateNoteRequest, UpdateNoteRequest};
use uuid::Uuid;

/// Create note response
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateNoteResponse {
    pub message: String,
    pub id: Uuid,
    pub ticket: i64,
}

pub async fn list_notes(State(state): State<AppState>) -> ApiResult<Json<Vec<NoteView>>> {
    let notes = state.repos.notes.list_all().await?;
    Ok(Json(notes))
}

/// Create a note
///
/// # Errors
///
/// - `400 Bad Request`: Missing fields or unknown owner
pub async fn create_note(
    State(state): State<AppState>,
    payload: Result<Json<CreateNoteRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CreateNoteResponse>)> {
    let req = json_body(payload)?;
    let note = state.repos.notes.create(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateNoteResponse {
            message: "New note created".to_string(),
            id: note.id,
            ticket: note.ticket,
        }),
    ))
}

pub async fn update_note(
    State(state): State<AppState>,
    payload: Result<Json<UpdateNoteRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let req = json_body(payload)?;
    let note = state.repos.notes.update(req).await?;

    Ok(Json(MessageResponse {
        message: format!("'{}' updated", note.title),
    }))
}

pub async fn delete_note(
    State(state): State<AppState>,
    payload: Result<Json<DeleteRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let req = json_body(payload)?;
    let message = state.repos.notes.delete(req.id).await?;

    Ok(Json(MessageResponse { message }))
}
