/// Repositories enforcing the record lifecycle rules
///
/// - [`sequence`]: named monotonic sequence generator (`ticketNums`)
/// - [`users`]: account create/list/update/delete with username uniqueness
/// - [`notes`]: note CRUD with owner checks and ticket assignment
/// - [`integrity`]: refuses to delete an account that still owns notes
///
/// Every operation validates its input before touching the store and runs as
/// one independent unit; there is no multi-statement transaction. The
/// declared store constraints (see [`crate::store`]) back up the
/// check-then-act sequences.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use technotes_shared::auth::password::HashParams;
/// use technotes_shared::repo::Repositories;
/// use technotes_shared::repo::users::CreateUserRequest;
/// use technotes_shared::store::MemoryStore;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let repos = Repositories::new(Arc::new(MemoryStore::new()), HashParams::default());
///
/// let created = repos.users.create(CreateUserRequest {
///     username: "alice".to_string(),
///     password: "pw1".to_string(),
///     roles: vec!["Employee".to_string()],
/// }).await?;
/// assert_eq!(created.username, "alice");
/// # Ok(())
/// # }
/// ```

use std::sync::Arc;

use crate::auth::password::HashParams;
use crate::store::{NoteStore, SequenceStore, UserStore};

pub mod integrity;
pub mod notes;
pub mod sequence;
pub mod users;

use integrity::IntegrityGuard;
use notes::NoteRepository;
use sequence::{SequenceGenerator, TICKET_START};
use users::UserRepository;

/// The wired set of repositories over one store
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<UserRepository>,
    pub notes: Arc<NoteRepository>,
}

impl Repositories {
    /// Wires every repository against a single backing store
    pub fn new<S>(store: Arc<S>, hash_params: HashParams) -> Self
    where
        S: UserStore + NoteStore + SequenceStore + 'static,
    {
        let sequence = SequenceGenerator::new(store.clone(), TICKET_START);
        let notes = Arc::new(NoteRepository::new(store.clone(), store.clone(), sequence));
        let guard = IntegrityGuard::new(notes.clone());
        let users = Arc::new(UserRepository::new(store, guard, hash_params));

        Self { users, notes }
    }
}
