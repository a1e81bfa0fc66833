/// Persistence seams
///
/// Repositories talk to the store only through these traits, so the same
/// rules run against PostgreSQL in production and against [`MemoryStore`] in
/// tests. Both backends declare the same constraints:
///
/// - usernames are unique (`users_username_key`)
/// - every user has at least one role (`users_roles_not_empty`)
/// - a note's owner must exist, and a user with notes cannot be deleted
///   (`notes_user_id_fkey`)
/// - sequence advancement is a single atomic step
///
/// No backend caches records; every call reads the store.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::note::{CreateNote, Note, UpdateNote};
use crate::models::user::{CreateUser, UpdateUser, User};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Name of the unique index on `users.username`
pub const USERNAME_CONSTRAINT: &str = "users_username_key";

/// Name of the check requiring at least one role
pub const ROLES_CONSTRAINT: &str = "users_roles_not_empty";

/// Name of the reference from `notes.user_id` to `users.id`
pub const NOTE_OWNER_CONSTRAINT: &str = "notes_user_id_fkey";

/// Account record storage
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    async fn insert_user(&self, data: CreateUser) -> Result<User, StoreError>;

    /// Returns None if no user has this ID
    async fn update_user(&self, id: Uuid, data: UpdateUser) -> Result<Option<User>, StoreError>;

    /// Returns the removed user, or None if no user had this ID
    async fn delete_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;
}

/// Task record storage
#[async_trait]
pub trait NoteStore: Send + Sync {
    async fn list_notes(&self) -> Result<Vec<Note>, StoreError>;

    async fn find_note(&self, id: Uuid) -> Result<Option<Note>, StoreError>;

    /// Whether the user owns at least one note
    async fn any_note_for_user(&self, user_id: Uuid) -> Result<bool, StoreError>;

    async fn insert_note(&self, data: CreateNote) -> Result<Note, StoreError>;

    async fn update_note(&self, id: Uuid, data: UpdateNote) -> Result<Option<Note>, StoreError>;

    async fn delete_note(&self, id: Uuid) -> Result<Option<Note>, StoreError>;
}

/// Named monotonic sequences
#[async_trait]
pub trait SequenceStore: Send + Sync {
    /// Atomically advances `name` and returns the new value
    ///
    /// The first call for a name returns `start`.
    async fn next_value(&self, name: &str, start: i64) -> Result<i64, StoreError>;
}

/// Liveness probe for the backing store
#[async_trait]
pub trait StoreHealth: Send + Sync {
    async fn ping(&self) -> Result<(), StoreError>;
}
