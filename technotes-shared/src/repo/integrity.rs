/// Cross-repository integrity rule: an account cannot be deleted while it
/// still owns notes.
///
/// The check and the delete are separate store calls. A note created for the
/// account in between is caught by the store's own `ON DELETE RESTRICT`
/// reference, which [`super::users::UserRepository::delete`] also reports as
/// `Blocked`.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use super::notes::NoteRepository;
use crate::error::{RepoError, RepoResult};

/// Message carried by `Blocked` when a user still owns notes
pub const ASSIGNED_NOTES_MESSAGE: &str = "User has assigned notes";

#[derive(Clone)]
pub struct IntegrityGuard {
    notes: Arc<NoteRepository>,
}

impl IntegrityGuard {
    pub fn new(notes: Arc<NoteRepository>) -> Self {
        Self { notes }
    }

    /// Succeeds only if the user owns no notes
    ///
    /// # Errors
    ///
    /// `Blocked` if at least one note references `user_id`
    pub async fn assert_deletable(&self, user_id: Uuid) -> RepoResult<()> {
        if self.notes.exists_any_for_owner(user_id).await? {
            info!(user_id = %user_id, "Refusing to delete user with assigned notes");
            return Err(RepoError::Blocked(ASSIGNED_NOTES_MESSAGE.to_string()));
        }
        Ok(())
    }
}
