/// User model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     username TEXT NOT NULL,
///     password_hash TEXT NOT NULL,
///     roles TEXT[] NOT NULL DEFAULT ARRAY['Employee'],
///     active BOOLEAN NOT NULL DEFAULT TRUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT users_roles_not_empty CHECK (cardinality(roles) > 0)
/// );
/// CREATE UNIQUE INDEX users_username_key ON users (username);
/// ```
///
/// # Example
///
/// ```no_run
/// use technotes_shared::models::user::{User, CreateUser};
/// use technotes_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(&DatabaseConfig::new("postgresql://localhost/technotes")).await?;
///
/// let user = User::create(&pool, CreateUser {
///     username: "alice".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     roles: vec!["Employee".to_string()],
/// }).await?;
///
/// let found = User::find_by_username(&pool, "alice").await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, username, password_hash, roles, active, created_at, updated_at";

/// User model representing an account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID, assigned by the store
    pub id: Uuid,

    /// Login name, unique across all users (case-sensitive)
    pub username: String,

    /// Argon2id password hash
    ///
    /// Never serialized; readers get a [`UserView`]
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Role tags, never empty
    pub roles: Vec<String>,

    /// Whether the account is enabled
    pub active: bool,

    /// When the user was created
    pub created_at: DateTime<Utc>,

    /// When the user was last updated
    pub updated_at: DateTime<Utc>,
}

/// Read view of a user without the credential hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserView {
    pub id: Uuid,
    pub username: String,
    pub roles: Vec<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            roles: user.roles,
            active: user.active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Input for inserting a new user
///
/// New users are always active.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,

    /// Argon2id password hash (NOT plaintext password!)
    pub password_hash: String,

    pub roles: Vec<String>,
}

/// Input for updating an existing user
///
/// The mutable fields of a user are exactly these. `password_hash` is only
/// written when present; `None` leaves the stored hash untouched.
#[derive(Debug, Clone)]
pub struct UpdateUser {
    pub username: String,
    pub roles: Vec<String>,
    pub active: bool,
    pub password_hash: Option<String>,
}

/// Deduplicates role tags, keeping the first occurrence of each
pub fn normalize_roles(roles: Vec<String>) -> Vec<String> {
    let mut seen = Vec::with_capacity(roles.len());
    for role in roles {
        if !seen.contains(&role) {
            seen.push(role);
        }
    }
    seen
}

impl User {
    /// Inserts a new user
    ///
    /// # Errors
    ///
    /// Returns a database error if the username already exists
    /// (`users_username_key`) or the connection fails
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, password_hash, roles, active)
             VALUES ($1, $2, $3, TRUE)
             RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, User>(&query)
            .bind(data.username)
            .bind(data.password_hash)
            .bind(data.roles)
            .fetch_one(pool)
            .await
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Finds a user by exact username
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");

        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Lists all users, oldest first
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at ASC, username ASC");

        sqlx::query_as::<_, User>(&query).fetch_all(pool).await
    }

    /// Updates an existing user
    ///
    /// `updated_at` is set to the current time. The password hash is only
    /// replaced when `data.password_hash` is `Some`.
    ///
    /// # Returns
    ///
    /// The updated user, or None if no user has this ID
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateUser,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "UPDATE users
             SET username = $2,
                 roles = $3,
                 active = $4,
                 password_hash = COALESCE($5, password_hash),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(data.username)
            .bind(data.roles)
            .bind(data.active)
            .bind(data.password_hash)
            .fetch_optional(pool)
            .await
    }

    /// Deletes a user by ID
    ///
    /// # Returns
    ///
    /// The deleted user, or None if no user had this ID
    ///
    /// # Errors
    ///
    /// Returns a foreign key violation if notes still reference the user
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("DELETE FROM users WHERE id = $1 RETURNING {USER_COLUMNS}");

        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
