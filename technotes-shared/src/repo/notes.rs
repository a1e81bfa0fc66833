/// Note (task) repository
///
/// Every note is owned by exactly one existing user and carries a ticket
/// number drawn once, at creation, from the `ticketNums` sequence. Ticket
/// numbers are globally monotonic across owners; updates never touch them.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::sequence::{SequenceGenerator, TICKET_SEQUENCE};
use crate::error::{invalid_input, RepoError, RepoResult, StoreError};
use crate::models::note::{CreateNote, Note, NoteView, UpdateNote};
use crate::store::{NoteStore, UserStore};

const NOTE_NOT_FOUND: &str = "Note not found";
const OWNER_NOT_FOUND: &str = "User not found";

/// Request to create a note
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateNoteRequest {
    /// Owning user ID
    pub user: Uuid,

    #[validate(length(min = 1))]
    pub title: String,

    #[validate(length(min = 1))]
    pub text: String,
}

/// Request to update a note; every mutable field is required
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateNoteRequest {
    pub id: Uuid,

    pub user: Uuid,

    #[validate(length(min = 1))]
    pub title: String,

    #[validate(length(min = 1))]
    pub text: String,

    pub completed: bool,
}

pub struct NoteRepository {
    notes: Arc<dyn NoteStore>,
    users: Arc<dyn UserStore>,
    sequence: SequenceGenerator,
}

impl NoteRepository {
    pub fn new(
        notes: Arc<dyn NoteStore>,
        users: Arc<dyn UserStore>,
        sequence: SequenceGenerator,
    ) -> Self {
        Self {
            notes,
            users,
            sequence,
        }
    }

    /// Whether any note is owned by `user_id`
    pub async fn exists_any_for_owner(&self, user_id: Uuid) -> RepoResult<bool> {
        Ok(self.notes.any_note_for_user(user_id).await?)
    }

    /// Lists all notes in ticket order with their owners' usernames
    ///
    /// # Errors
    ///
    /// `NotFound("No notes found")` when there are no notes
    pub async fn list_all(&self) -> RepoResult<Vec<NoteView>> {
        let notes = self.notes.list_notes().await?;
        if notes.is_empty() {
            return Err(RepoError::NotFound("No notes found".to_string()));
        }

        let usernames: HashMap<Uuid, String> = self
            .users
            .list_users()
            .await?
            .into_iter()
            .map(|u| (u.id, u.username))
            .collect();

        Ok(notes
            .into_iter()
            .map(|note| {
                let username = usernames.get(&note.user_id).cloned();
                NoteView { note, username }
            })
            .collect())
    }

    /// Creates a note for an existing user and assigns the next ticket
    ///
    /// The sequence is advanced exactly once, after input and owner checks
    /// pass and before the note is written. If the sequence fails nothing is
    /// written.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if title or text is empty
    /// - `NotFound` if the owner does not exist
    /// - `StoreUnavailable` / `Timeout` from the sequence or the insert
    pub async fn create(&self, req: CreateNoteRequest) -> RepoResult<Note> {
        req.validate().map_err(invalid_input)?;

        if self.users.find_user(req.user).await?.is_none() {
            return Err(RepoError::NotFound(OWNER_NOT_FOUND.to_string()));
        }

        let ticket = self.sequence.next(TICKET_SEQUENCE).await?;

        let note = self
            .notes
            .insert_note(CreateNote {
                user_id: req.user,
                ticket,
                title: req.title,
                text: req.text,
            })
            .await
            .map_err(map_owner_violation)?;

        info!(note_id = %note.id, user_id = %note.user_id, ticket = note.ticket, "Created note");
        Ok(note)
    }

    /// Updates a note's owner, title, text and completion flag
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if title or text is empty
    /// - `NotFound` if the note or the new owner does not exist
    pub async fn update(&self, req: UpdateNoteRequest) -> RepoResult<Note> {
        req.validate().map_err(invalid_input)?;

        if self.notes.find_note(req.id).await?.is_none() {
            return Err(RepoError::NotFound(NOTE_NOT_FOUND.to_string()));
        }

        if self.users.find_user(req.user).await?.is_none() {
            return Err(RepoError::NotFound(OWNER_NOT_FOUND.to_string()));
        }

        let note = self
            .notes
            .update_note(
                req.id,
                UpdateNote {
                    user_id: req.user,
                    title: req.title,
                    text: req.text,
                    completed: req.completed,
                },
            )
            .await
            .map_err(map_owner_violation)?
            .ok_or_else(|| RepoError::NotFound(NOTE_NOT_FOUND.to_string()))?;

        info!(note_id = %note.id, ticket = note.ticket, completed = note.completed, "Updated note");
        Ok(note)
    }

    /// Deletes a note and returns a confirmation message
    ///
    /// # Errors
    ///
    /// `NotFound` if no note has this ID
    pub async fn delete(&self, id: Uuid) -> RepoResult<String> {
        let deleted = self
            .notes
            .delete_note(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(NOTE_NOT_FOUND.to_string()))?;

        info!(note_id = %deleted.id, ticket = deleted.ticket, "Deleted note");
        Ok(format!("Note '{}' with ID {} deleted", deleted.title, deleted.id))
    }
}

// The owner vanished between the existence check and the write.
fn map_owner_violation(err: StoreError) -> RepoError {
    match err {
        StoreError::ReferenceViolation(_) => RepoError::NotFound(OWNER_NOT_FOUND.to_string()),
        other => other.into(),
    }
}
