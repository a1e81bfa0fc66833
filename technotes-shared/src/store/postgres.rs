/// PostgreSQL backend
///
/// Every call is one statement against the pool; constraint violations and
/// pool timeouts are classified by `From<sqlx::Error> for StoreError`.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{NoteStore, SequenceStore, StoreHealth, UserStore};
use crate::db::pool::health_check;
use crate::error::StoreError;
use crate::models::counter;
use crate::models::note::{CreateNote, Note, UpdateNote};
use crate::models::user::{CreateUser, UpdateUser, User};

/// Store backed by a PostgreSQL connection pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(User::list(&self.pool).await?)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(User::find_by_id(&self.pool, id).await?)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(User::find_by_username(&self.pool, username).await?)
    }

    async fn insert_user(&self, data: CreateUser) -> Result<User, StoreError> {
        Ok(User::create(&self.pool, data).await?)
    }

    async fn update_user(&self, id: Uuid, data: UpdateUser) -> Result<Option<User>, StoreError> {
        Ok(User::update(&self.pool, id, data).await?)
    }

    async fn delete_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(User::delete(&self.pool, id).await?)
    }
}

#[async_trait]
impl NoteStore for PgStore {
    async fn list_notes(&self) -> Result<Vec<Note>, StoreError> {
        Ok(Note::list(&self.pool).await?)
    }

    async fn find_note(&self, id: Uuid) -> Result<Option<Note>, StoreError> {
        Ok(Note::find_by_id(&self.pool, id).await?)
    }

    async fn any_note_for_user(&self, user_id: Uuid) -> Result<bool, StoreError> {
        Ok(Note::exists_for_user(&self.pool, user_id).await?)
    }

    async fn insert_note(&self, data: CreateNote) -> Result<Note, StoreError> {
        Ok(Note::create(&self.pool, data).await?)
    }

    async fn update_note(&self, id: Uuid, data: UpdateNote) -> Result<Option<Note>, StoreError> {
        Ok(Note::update(&self.pool, id, data).await?)
    }

    async fn delete_note(&self, id: Uuid) -> Result<Option<Note>, StoreError> {
        Ok(Note::delete(&self.pool, id).await?)
    }
}

#[async_trait]
impl SequenceStore for PgStore {
    async fn next_value(&self, name: &str, start: i64) -> Result<i64, StoreError> {
        Ok(counter::increment(&self.pool, name, start).await?)
    }
}

#[async_trait]
impl StoreHealth for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(health_check(&self.pool).await?)
    }
}
