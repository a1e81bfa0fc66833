/// Integration tests for the note repository and ticket sequence

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use common::{test_hash_params, TestContext};
use technotes_shared::error::{RepoError, StoreError};
use technotes_shared::repo::notes::{CreateNoteRequest, NoteRepository, UpdateNoteRequest};
use technotes_shared::repo::sequence::{SequenceGenerator, TICKET_SEQUENCE, TICKET_START};
use technotes_shared::repo::Repositories;
use technotes_shared::store::{MemoryStore, NoteStore, SequenceStore};
use uuid::Uuid;

/// Sequence backend that is always down
struct UnreachableSequence;

#[async_trait]
impl SequenceStore for UnreachableSequence {
    async fn next_value(&self, _name: &str, _start: i64) -> Result<i64, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

#[tokio::test]
async fn test_tickets_start_at_500_and_increase_across_owners() {
    let ctx = TestContext::new();
    let alice = ctx.create_user("alice", "pw1").await;
    let bob = ctx.create_user("bob", "pw2").await;

    let first = ctx.create_note(alice.id, "one").await;
    let second = ctx.create_note(bob.id, "two").await;
    let third = ctx.create_note(alice.id, "three").await;

    assert_eq!(first.ticket, 500);
    assert_eq!(second.ticket, 501);
    assert_eq!(third.ticket, 502);
    assert!(!first.completed);
}

#[tokio::test]
async fn test_create_for_unknown_owner_is_not_found_and_consumes_no_ticket() {
    let ctx = TestContext::new();
    let err = ctx
        .repos
        .notes
        .create(CreateNoteRequest {
            user: Uuid::new_v4(),
            title: "orphan".to_string(),
            text: "no owner".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));

    let owner = ctx.create_user("alice", "pw1").await;
    let note = ctx.create_note(owner.id, "first").await;
    assert_eq!(note.ticket, TICKET_START);
}

#[tokio::test]
async fn test_create_with_empty_title_or_text_is_invalid() {
    let ctx = TestContext::new();
    let owner = ctx.create_user("alice", "pw1").await;

    for (title, text) in [("", "body"), ("title", "")] {
        let err = ctx
            .repos
            .notes
            .create(CreateNoteRequest {
                user: owner.id,
                title: title.to_string(),
                text: text.to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::InvalidInput(_)));
    }
    assert!(ctx.store.list_notes().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_sequence_failure_aborts_before_write() {
    let store = Arc::new(MemoryStore::new());
    let users = Repositories::new(store.clone(), test_hash_params()).users;
    let owner = users
        .create(technotes_shared::repo::users::CreateUserRequest {
            username: "alice".to_string(),
            password: "pw1".to_string(),
            roles: vec!["Employee".to_string()],
        })
        .await
        .unwrap();

    let sequence = SequenceGenerator::new(Arc::new(UnreachableSequence), TICKET_START);
    let notes = NoteRepository::new(store.clone(), store.clone(), sequence);

    let err = notes
        .create(CreateNoteRequest {
            user: owner.id,
            title: "title".to_string(),
            text: "text".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, RepoError::StoreUnavailable(_)));
    assert!(err.is_retryable());
    assert!(store.list_notes().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_concurrent_sequence_calls_never_repeat() {
    let store = Arc::new(MemoryStore::new());
    let generator = SequenceGenerator::new(store, TICKET_START);

    let handles: Vec<_> = (0..50)
        .map(|_| {
            let generator = generator.clone();
            tokio::spawn(async move { generator.next(TICKET_SEQUENCE).await })
        })
        .collect();

    let mut values = Vec::new();
    for handle in handles {
        values.push(handle.await.unwrap().unwrap());
    }
    values.sort_unstable();

    let expected: Vec<i64> = (TICKET_START..TICKET_START + 50).collect();
    assert_eq!(values, expected);
}

#[tokio::test]
async fn test_update_keeps_ticket() {
    let ctx = TestContext::new();
    let alice = ctx.create_user("alice", "pw1").await;
    let bob = ctx.create_user("bob", "pw2").await;
    let note = ctx.create_note(alice.id, "draft").await;

    let updated = ctx
        .repos
        .notes
        .update(UpdateNoteRequest {
            id: note.id,
            user: bob.id,
            title: "final".to_string(),
            text: "done".to_string(),
            completed: true,
        })
        .await
        .unwrap();

    assert_eq!(updated.ticket, note.ticket);
    assert_eq!(updated.user_id, bob.id);
    assert_eq!(updated.title, "final");
    assert!(updated.completed);
}

#[tokio::test]
async fn test_update_to_unknown_owner_is_not_found() {
    let ctx = TestContext::new();
    let alice = ctx.create_user("alice", "pw1").await;
    let note = ctx.create_note(alice.id, "draft").await;

    let err = ctx
        .repos
        .notes
        .update(UpdateNoteRequest {
            id: note.id,
            user: Uuid::new_v4(),
            title: "draft".to_string(),
            text: "text".to_string(),
            completed: false,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(msg) if msg == "User not found"));
}

#[tokio::test]
async fn test_list_all_attaches_usernames_in_ticket_order() {
    let ctx = TestContext::new();
    assert!(matches!(
        ctx.repos.notes.list_all().await.unwrap_err(),
        RepoError::NotFound(_)
    ));

    let alice = ctx.create_user("alice", "pw1").await;
    let bob = ctx.create_user("bob", "pw2").await;
    ctx.create_note(bob.id, "first").await;
    ctx.create_note(alice.id, "second").await;

    let notes = ctx.repos.notes.list_all().await.unwrap();
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0].note.ticket, 500);
    assert_eq!(notes[0].username.as_deref(), Some("bob"));
    assert_eq!(notes[1].username.as_deref(), Some("alice"));
}

#[tokio::test]
async fn test_delete_note_and_exists_for_owner() {
    let ctx = TestContext::new();
    let alice = ctx.create_user("alice", "pw1").await;
    let note = ctx.create_note(alice.id, "only").await;

    assert!(ctx.repos.notes.exists_any_for_owner(alice.id).await.unwrap());

    let reply = ctx.repos.notes.delete(note.id).await.unwrap();
    assert!(reply.contains("only"));
    assert!(!ctx.repos.notes.exists_any_for_owner(alice.id).await.unwrap());

    let err = ctx.repos.notes.delete(note.id).await.unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}
