//! Shared fixtures for repository integration tests
//!
//! Tests run against `MemoryStore` with low-cost hashing parameters so that
//! no database is needed.

#![allow(dead_code)]

use std::sync::Arc;

use technotes_shared::auth::password::HashParams;
use technotes_shared::repo::notes::CreateNoteRequest;
use technotes_shared::repo::users::{CreateUserRequest, CreatedUser};
use technotes_shared::repo::Repositories;
use technotes_shared::store::MemoryStore;
use uuid::Uuid;

pub fn test_hash_params() -> HashParams {
    HashParams {
        memory_kib: 1024,
        iterations: 1,
        lanes: 1,
    }
}

pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub repos: Repositories,
}

impl TestContext {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let repos = Repositories::new(store.clone(), test_hash_params());
        Self { store, repos }
    }

    pub async fn create_user(&self, username: &str, password: &str) -> CreatedUser {
        self.repos
            .users
            .create(CreateUserRequest {
                username: username.to_string(),
                password: password.to_string(),
                roles: vec!["Employee".to_string()],
            })
            .await
            .expect("user creation should succeed")
    }

    pub async fn create_note(&self, owner: Uuid, title: &str) -> technotes_shared::models::note::Note {
        self.repos
            .notes
            .create(CreateNoteRequest {
                user: owner,
                title: title.to_string(),
                text: format!("{} details", title),
            })
            .await
            .expect("note creation should succeed")
    }
}
