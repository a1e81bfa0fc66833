/// Note model and database operations
///
/// A note is a unit of work owned by exactly one user. Its `ticket` comes
/// from the `ticketNums` sequence when the note is created and is never
/// rewritten afterwards; no update statement in this module touches it.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE notes (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE RESTRICT,
///     ticket BIGINT NOT NULL,
///     title TEXT NOT NULL,
///     text TEXT NOT NULL,
///     completed BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

const NOTE_COLUMNS: &str = "id, user_id, ticket, title, text, completed, created_at, updated_at";

/// Note model representing a task record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Note {
    /// Unique note ID, assigned by the store
    pub id: Uuid,

    /// Owning user
    #[serde(rename = "user")]
    pub user_id: Uuid,

    /// Sequential ticket number, globally monotonic
    pub ticket: i64,

    pub title: String,

    pub text: String,

    /// Whether the work is done
    pub completed: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Note joined with its owner's username for list views
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteView {
    #[serde(flatten)]
    pub note: Note,

    /// Owner's username, None if the owner no longer resolves
    pub username: Option<String>,
}

/// Input for inserting a new note
#[derive(Debug, Clone)]
pub struct CreateNote {
    pub user_id: Uuid,

    /// Ticket number already drawn from the sequence
    pub ticket: i64,

    pub title: String,

    pub text: String,
}

/// Input for updating an existing note
///
/// The ticket number is not part of the mutable set.
#[derive(Debug, Clone)]
pub struct UpdateNote {
    pub user_id: Uuid,
    pub title: String,
    pub text: String,
    pub completed: bool,
}

impl Note {
    /// Inserts a new note
    ///
    /// # Errors
    ///
    /// Returns a foreign key violation if `user_id` does not reference a user
    pub async fn create(pool: &PgPool, data: CreateNote) -> Result<Self, sqlx::Error> {
        let query = format!(
            "INSERT INTO notes (user_id, ticket, title, text)
             VALUES ($1, $2, $3, $4)
             RETURNING {NOTE_COLUMNS}"
        );

        sqlx::query_as::<_, Note>(&query)
            .bind(data.user_id)
            .bind(data.ticket)
            .bind(data.title)
            .bind(data.text)
            .fetch_one(pool)
            .await
    }

    /// Finds a note by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = $1");

        sqlx::query_as::<_, Note>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lists all notes in ticket order
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!("SELECT {NOTE_COLUMNS} FROM notes ORDER BY ticket ASC");

        sqlx::query_as::<_, Note>(&query).fetch_all(pool).await
    }

    /// Checks whether a user owns at least one note
    pub async fn exists_for_user(pool: &PgPool, user_id: Uuid) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM notes WHERE user_id = $1)")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Updates an existing note
    ///
    /// # Returns
    ///
    /// The updated note, or None if no note has this ID
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateNote,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "UPDATE notes
             SET user_id = $2,
                 title = $3,
                 text = $4,
                 completed = $5,
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {NOTE_COLUMNS}"
        );

        sqlx::query_as::<_, Note>(&query)
            .bind(id)
            .bind(data.user_id)
            .bind(data.title)
            .bind(data.text)
            .bind(data.completed)
            .fetch_optional(pool)
            .await
    }

    /// Deletes a note by ID
    ///
    /// # Returns
    ///
    /// The deleted note, or None if no note had this ID
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("DELETE FROM notes WHERE id = $1 RETURNING {NOTE_COLUMNS}");

        sqlx::query_as::<_, Note>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_serializes_owner_as_user() {
        let owner = Uuid::new_v4();
        let note = Note {
            id: Uuid::new_v4(),
            user_id: owner,
            ticket: 500,
            title: "Fix printer".to_string(),
            text: "Paper jam on floor 2".to_string(),
            completed: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let view = NoteView {
            note,
            username: Some("alice".to_string()),
        };
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["user"], owner.to_string());
        assert_eq!(json["ticket"], 500);
        assert_eq!(json["username"], "alice");
        assert!(json.get("user_id").is_none());
    }
}
