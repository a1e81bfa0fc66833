/// Credential utilities
///
/// # Modules
///
/// - [`password`]: Argon2id credential hashing and verification
///
/// Only the salted hash is ever persisted. Verifying a login is the job of
/// whatever authentication layer sits in front of this crate; it uses
/// [`password::verify_password`] against the stored hash.

pub mod password;
