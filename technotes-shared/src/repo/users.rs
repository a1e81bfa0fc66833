/// User (account) repository
///
/// Owns account records and enforces:
///
/// - usernames are unique; on update the check excludes the account being
///   updated (by ID, not by value)
/// - roles are never empty
/// - passwords are hashed before they reach the store, and an update without
///   a password leaves the stored hash untouched
/// - an account that owns notes is not deleted (via [`IntegrityGuard`])
///
/// The uniqueness check is backed by the store's unique index, so two
/// concurrent creates for one username cannot both succeed: the loser gets
/// `Conflict` from the constraint instead of from the pre-check.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::integrity::{IntegrityGuard, ASSIGNED_NOTES_MESSAGE};
use crate::auth::password::{hash_password, HashParams, PasswordError};
use crate::error::{invalid_input, RepoError, RepoResult, StoreError};
use crate::models::user::{normalize_roles, CreateUser, UpdateUser, UserView};
use crate::store::UserStore;

const DUPLICATE_USERNAME: &str = "Duplicate username";
const USER_NOT_FOUND: &str = "User not found";

/// Request to create a user
///
/// Unknown fields are rejected during deserialization.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateUserRequest {
    #[validate(length(min = 1))]
    pub username: String,

    /// Plaintext; hashed before persistence
    #[validate(length(min = 1))]
    pub password: String,

    #[validate(length(min = 1), custom(function = "validate_role_tags"))]
    pub roles: Vec<String>,
}

/// Request to update a user
///
/// `username`, `roles` and `active` are always applied. `password` is
/// optional; absent or empty means "keep the current one".
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateUserRequest {
    pub id: Uuid,

    #[validate(length(min = 1))]
    pub username: String,

    #[validate(length(min = 1), custom(function = "validate_role_tags"))]
    pub roles: Vec<String>,

    pub active: bool,

    #[serde(default)]
    pub password: Option<String>,
}

/// Identity of a freshly created user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedUser {
    pub id: Uuid,
    pub username: String,
}

fn validate_role_tags(roles: &Vec<String>) -> Result<(), ValidationError> {
    if roles.iter().any(|role| role.is_empty()) {
        return Err(ValidationError::new("empty_role"));
    }
    Ok(())
}

pub struct UserRepository {
    users: Arc<dyn UserStore>,
    guard: IntegrityGuard,
    hash_params: HashParams,
}

impl UserRepository {
    pub fn new(users: Arc<dyn UserStore>, guard: IntegrityGuard, hash_params: HashParams) -> Self {
        Self {
            users,
            guard,
            hash_params,
        }
    }

    /// Lists all users without their credential hashes
    ///
    /// # Errors
    ///
    /// `NotFound("No users found")` when there are no users at all. This is
    /// an empty-result condition; the caller decides whether it is an error.
    pub async fn list_all(&self) -> RepoResult<Vec<UserView>> {
        let users = self.users.list_users().await?;
        if users.is_empty() {
            return Err(RepoError::NotFound("No users found".to_string()));
        }

        Ok(users.into_iter().map(UserView::from).collect())
    }

    /// Creates an active user with a hashed password
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if username or password is empty, or roles is empty
    /// - `Conflict` if the username is taken
    pub async fn create(&self, req: CreateUserRequest) -> RepoResult<CreatedUser> {
        req.validate().map_err(invalid_input)?;

        if self.users.find_user_by_username(&req.username).await?.is_some() {
            debug!(username = %req.username, "Rejecting duplicate username");
            return Err(RepoError::Conflict(DUPLICATE_USERNAME.to_string()));
        }

        let password_hash = self.hash(req.password).await?;

        let user = self
            .users
            .insert_user(CreateUser {
                username: req.username,
                password_hash,
                roles: normalize_roles(req.roles),
            })
            .await
            .map_err(map_unique_violation)?;

        info!(user_id = %user.id, username = %user.username, "Created user");
        Ok(CreatedUser {
            id: user.id,
            username: user.username,
        })
    }

    /// Updates a user's mutable fields and returns the new username
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if username is empty or roles is empty
    /// - `NotFound` if no user has this ID
    /// - `Conflict` if a different user already has the username
    pub async fn update(&self, req: UpdateUserRequest) -> RepoResult<String> {
        req.validate().map_err(invalid_input)?;

        if self.users.find_user(req.id).await?.is_none() {
            return Err(RepoError::NotFound(USER_NOT_FOUND.to_string()));
        }

        if let Some(holder) = self.users.find_user_by_username(&req.username).await? {
            if holder.id != req.id {
                debug!(user_id = %req.id, username = %req.username, "Rejecting duplicate username");
                return Err(RepoError::Conflict(DUPLICATE_USERNAME.to_string()));
            }
        }

        let password_hash = match req.password.filter(|p| !p.is_empty()) {
            Some(password) => Some(self.hash(password).await?),
            None => None,
        };
        let password_changed = password_hash.is_some();

        let user = self
            .users
            .update_user(
                req.id,
                UpdateUser {
                    username: req.username,
                    roles: normalize_roles(req.roles),
                    active: req.active,
                    password_hash,
                },
            )
            .await
            .map_err(map_unique_violation)?
            .ok_or_else(|| RepoError::NotFound(USER_NOT_FOUND.to_string()))?;

        info!(
            user_id = %user.id,
            username = %user.username,
            active = user.active,
            password_changed,
            "Updated user"
        );
        Ok(user.username)
    }

    /// Deletes a user that owns no notes
    ///
    /// # Returns
    ///
    /// A confirmation naming the deleted username and ID
    ///
    /// # Errors
    ///
    /// - `NotFound` if no user has this ID
    /// - `Blocked` if the user still owns notes
    pub async fn delete(&self, id: Uuid) -> RepoResult<String> {
        if self.users.find_user(id).await?.is_none() {
            return Err(RepoError::NotFound(USER_NOT_FOUND.to_string()));
        }

        self.guard.assert_deletable(id).await?;

        let deleted = self
            .users
            .delete_user(id)
            .await
            .map_err(|err| match err {
                StoreError::ReferenceViolation(_) => {
                    RepoError::Blocked(ASSIGNED_NOTES_MESSAGE.to_string())
                }
                other => other.into(),
            })?
            .ok_or_else(|| RepoError::NotFound(USER_NOT_FOUND.to_string()))?;

        info!(user_id = %deleted.id, username = %deleted.username, "Deleted user");
        Ok(format!(
            "Username {} with ID {} deleted",
            deleted.username, deleted.id
        ))
    }

    // Argon2 is CPU-bound; keep it off the async workers.
    async fn hash(&self, password: String) -> RepoResult<String> {
        let params = self.hash_params;
        let hash = tokio::task::spawn_blocking(move || hash_password(&password, &params))
            .await
            .map_err(|e| PasswordError::HashError(format!("Hashing task failed: {}", e)))??;
        Ok(hash)
    }
}

fn map_unique_violation(err: StoreError) -> RepoError {
    match err {
        StoreError::UniqueViolation(_) => RepoError::Conflict(DUPLICATE_USERNAME.to_string()),
        other => other.into(),
    }
}
