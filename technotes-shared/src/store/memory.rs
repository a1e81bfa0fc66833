//! In-memory backend.
//!
//! All state sits behind one async mutex, so each trait call is atomic with
//! respect to every other call, the same per-statement guarantee the
//! PostgreSQL backend gets from the database.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{
    NoteStore, SequenceStore, StoreHealth, UserStore, NOTE_OWNER_CONSTRAINT, ROLES_CONSTRAINT,
    USERNAME_CONSTRAINT,
};
use crate::error::StoreError;
use crate::models::note::{CreateNote, Note, UpdateNote};
use crate::models::user::{CreateUser, UpdateUser, User};

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    // insertion order doubles as creation order
    users: Vec<User>,
    notes: Vec<Note>,
    counters: HashMap<String, i64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MemoryState {
    fn username_taken(&self, username: &str, except: Option<Uuid>) -> bool {
        self.users
            .iter()
            .any(|u| u.username == username && Some(u.id) != except)
    }

    fn user_exists(&self, id: Uuid) -> bool {
        self.users.iter().any(|u| u.id == id)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.users.clone())
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.users.iter().find(|u| u.username == username).cloned())
    }

    async fn insert_user(&self, data: CreateUser) -> Result<User, StoreError> {
        if data.roles.is_empty() {
            return Err(StoreError::CheckViolation(ROLES_CONSTRAINT.to_string()));
        }

        let mut inner = self.inner.lock().await;
        if inner.username_taken(&data.username, None) {
            return Err(StoreError::UniqueViolation(USERNAME_CONSTRAINT.to_string()));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: data.username,
            password_hash: data.password_hash,
            roles: data.roles,
            active: true,
            created_at: now,
            updated_at: now,
        };
        inner.users.push(user.clone());
        Ok(user)
    }

    async fn update_user(&self, id: Uuid, data: UpdateUser) -> Result<Option<User>, StoreError> {
        if data.roles.is_empty() {
            return Err(StoreError::CheckViolation(ROLES_CONSTRAINT.to_string()));
        }

        let mut inner = self.inner.lock().await;
        if inner.username_taken(&data.username, Some(id)) {
            return Err(StoreError::UniqueViolation(USERNAME_CONSTRAINT.to_string()));
        }

        let Some(user) = inner.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        user.username = data.username;
        user.roles = data.roles;
        user.active = data.active;
        if let Some(password_hash) = data.password_hash {
            user.password_hash = password_hash;
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn delete_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let mut inner = self.inner.lock().await;
        if inner.notes.iter().any(|n| n.user_id == id) {
            return Err(StoreError::ReferenceViolation(NOTE_OWNER_CONSTRAINT.to_string()));
        }

        let Some(pos) = inner.users.iter().position(|u| u.id == id) else {
            return Ok(None);
        };
        Ok(Some(inner.users.remove(pos)))
    }
}

#[async_trait]
impl NoteStore for MemoryStore {
    async fn list_notes(&self) -> Result<Vec<Note>, StoreError> {
        let inner = self.inner.lock().await;
        let mut notes = inner.notes.clone();
        notes.sort_by_key(|n| n.ticket);
        Ok(notes)
    }

    async fn find_note(&self, id: Uuid) -> Result<Option<Note>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.notes.iter().find(|n| n.id == id).cloned())
    }

    async fn any_note_for_user(&self, user_id: Uuid) -> Result<bool, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.notes.iter().any(|n| n.user_id == user_id))
    }

    async fn insert_note(&self, data: CreateNote) -> Result<Note, StoreError> {
        let mut inner = self.inner.lock().await;
        if !inner.user_exists(data.user_id) {
            return Err(StoreError::ReferenceViolation(NOTE_OWNER_CONSTRAINT.to_string()));
        }

        let now = Utc::now();
        let note = Note {
            id: Uuid::new_v4(),
            user_id: data.user_id,
            ticket: data.ticket,
            title: data.title,
            text: data.text,
            completed: false,
            created_at: now,
            updated_at: now,
        };
        inner.notes.push(note.clone());
        Ok(note)
    }

    async fn update_note(&self, id: Uuid, data: UpdateNote) -> Result<Option<Note>, StoreError> {
        let mut inner = self.inner.lock().await;
        if !inner.notes.iter().any(|n| n.id == id) {
            return Ok(None);
        }
        if !inner.user_exists(data.user_id) {
            return Err(StoreError::ReferenceViolation(NOTE_OWNER_CONSTRAINT.to_string()));
        }

        let Some(note) = inner.notes.iter_mut().find(|n| n.id == id) else {
            return Ok(None);
        };
        note.user_id = data.user_id;
        note.title = data.title;
        note.text = data.text;
        note.completed = data.completed;
        note.updated_at = Utc::now();
        Ok(Some(note.clone()))
    }

    async fn delete_note(&self, id: Uuid) -> Result<Option<Note>, StoreError> {
        let mut inner = self.inner.lock().await;
        let Some(pos) = inner.notes.iter().position(|n| n.id == id) else {
            return Ok(None);
        };
        Ok(Some(inner.notes.remove(pos)))
    }
}

#[async_trait]
impl SequenceStore for MemoryStore {
    async fn next_value(&self, name: &str, start: i64) -> Result<i64, StoreError> {
        let mut inner = self.inner.lock().await;
        let value = inner
            .counters
            .entry(name.to_string())
            .and_modify(|seq| *seq += 1)
            .or_insert(start);
        Ok(*value)
    }
}

#[async_trait]
impl StoreHealth for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
