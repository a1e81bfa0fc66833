/// Persisted record shapes and their PostgreSQL operations
///
/// # Models
///
/// - `user`: Account records (unique username, hashed credential, roles)
/// - `note`: Task records owned by one user, numbered from the ticket sequence
/// - `counter`: Named monotonic sequences
///
/// The functions here are thin SQL wrappers. Uniqueness, ownership and
/// sequencing rules live in [`crate::repo`].

pub mod counter;
pub mod note;
pub mod user;
