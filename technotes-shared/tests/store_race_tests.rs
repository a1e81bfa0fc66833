/// Repository behaviour when another writer slips in between a repository's
/// check and its write
///
/// `InterleavingStore` wraps `MemoryStore` and performs one extra write right
/// after a chosen read, so the repository's own check passes and the store
/// constraint is what rejects the operation.

mod common;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use common::test_hash_params;
use technotes_shared::error::{RepoError, StoreError};
use technotes_shared::models::note::{CreateNote, Note, UpdateNote};
use technotes_shared::models::user::{CreateUser, UpdateUser, User};
use technotes_shared::repo::integrity::ASSIGNED_NOTES_MESSAGE;
use technotes_shared::repo::notes::CreateNoteRequest;
use technotes_shared::repo::users::CreateUserRequest;
use technotes_shared::repo::Repositories;
use technotes_shared::store::{MemoryStore, NoteStore, SequenceStore, UserStore};
use uuid::Uuid;

#[derive(Default)]
struct InterleavingStore {
    inner: MemoryStore,
    /// Insert a note for the user right after the "owns notes?" check
    note_after_check: AtomicBool,
    /// Delete the user right after it is looked up
    delete_after_lookup: AtomicBool,
}

impl InterleavingStore {
    fn fire(flag: &AtomicBool) -> bool {
        flag.swap(false, Ordering::SeqCst)
    }
}

#[async_trait]
impl UserStore for InterleavingStore {
    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        self.inner.list_users().await
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = self.inner.find_user(id).await?;
        if Self::fire(&self.delete_after_lookup) {
            self.inner.delete_user(id).await?;
        }
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        self.inner.find_user_by_username(username).await
    }

    async fn insert_user(&self, data: CreateUser) -> Result<User, StoreError> {
        self.inner.insert_user(data).await
    }

    async fn update_user(&self, id: Uuid, data: UpdateUser) -> Result<Option<User>, StoreError> {
        self.inner.update_user(id, data).await
    }

    async fn delete_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        self.inner.delete_user(id).await
    }
}

#[async_trait]
impl NoteStore for InterleavingStore {
    async fn list_notes(&self) -> Result<Vec<Note>, StoreError> {
        self.inner.list_notes().await
    }

    async fn find_note(&self, id: Uuid) -> Result<Option<Note>, StoreError> {
        self.inner.find_note(id).await
    }

    async fn any_note_for_user(&self, user_id: Uuid) -> Result<bool, StoreError> {
        let owns_notes = self.inner.any_note_for_user(user_id).await?;
        if Self::fire(&self.note_after_check) {
            self.inner
                .insert_note(CreateNote {
                    user_id,
                    ticket: 999,
                    title: "late".to_string(),
                    text: "written after the check".to_string(),
                })
                .await?;
        }
        Ok(owns_notes)
    }

    async fn insert_note(&self, data: CreateNote) -> Result<Note, StoreError> {
        self.inner.insert_note(data).await
    }

    async fn update_note(&self, id: Uuid, data: UpdateNote) -> Result<Option<Note>, StoreError> {
        self.inner.update_note(id, data).await
    }

    async fn delete_note(&self, id: Uuid) -> Result<Option<Note>, StoreError> {
        self.inner.delete_note(id).await
    }
}

#[async_trait]
impl SequenceStore for InterleavingStore {
    async fn next_value(&self, name: &str, start: i64) -> Result<i64, StoreError> {
        self.inner.next_value(name, start).await
    }
}

async fn setup() -> (Arc<InterleavingStore>, Repositories, Uuid) {
    let store = Arc::new(InterleavingStore::default());
    let repos = Repositories::new(store.clone(), test_hash_params());
    let owner = repos
        .users
        .create(CreateUserRequest {
            username: "alice".to_string(),
            password: "pw1".to_string(),
            roles: vec!["Employee".to_string()],
        })
        .await
        .unwrap();
    (store, repos, owner.id)
}

#[tokio::test]
async fn test_delete_blocked_when_note_arrives_after_check() {
    let (store, repos, owner) = setup().await;
    store.note_after_check.store(true, Ordering::SeqCst);

    let err = repos.users.delete(owner).await.unwrap_err();
    match err {
        RepoError::Blocked(msg) => assert_eq!(msg, ASSIGNED_NOTES_MESSAGE),
        other => panic!("expected Blocked, got {:?}", other),
    }

    // neither the user nor the late note was removed
    assert!(store.inner.find_user(owner).await.unwrap().is_some());
    let notes = store.inner.list_notes().await.unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].user_id, owner);
}

#[tokio::test]
async fn test_create_note_not_found_when_owner_deleted_after_lookup() {
    let (store, repos, owner) = setup().await;
    store.delete_after_lookup.store(true, Ordering::SeqCst);

    let err = repos
        .notes
        .create(CreateNoteRequest {
            user: owner,
            title: "orphan".to_string(),
            text: "owner vanished".to_string(),
        })
        .await
        .unwrap_err();
    match err {
        RepoError::NotFound(msg) => assert_eq!(msg, "User not found"),
        other => panic!("expected NotFound, got {:?}", other),
    }

    assert!(store.inner.list_notes().await.unwrap().is_empty());
    assert!(store.inner.find_user(owner).await.unwrap().is_none());
}
