/// Error types shared by the store and repository layers
///
/// Two levels are distinguished:
///
/// - [`StoreError`]: what a persistence backend reports (connectivity,
///   timeouts, declared constraint violations)
/// - [`RepoError`]: the outcome taxonomy exposed to callers of the
///   repositories (`InvalidInput`, `Conflict`, `NotFound`, `Blocked`,
///   `StoreUnavailable`, `Timeout`)
///
/// `StoreUnavailable` and `Timeout` are transient and retryable by the caller.
/// Nothing in this crate retries internally.

use crate::auth::password::PasswordError;

/// Repository result type alias
pub type RepoResult<T> = Result<T, RepoError>;

/// Failure reported by a persistence backend
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached or failed mid-operation
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The store did not answer in time (e.g. pool acquire timeout)
    #[error("store operation timed out")]
    Timeout,

    /// A declared unique constraint rejected the write
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    /// A declared reference constraint rejected the write
    #[error("reference constraint violated: {0}")]
    ReferenceViolation(String),

    /// A declared check constraint rejected the row (e.g. empty roles)
    #[error("check constraint violated: {0}")]
    CheckViolation(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut => StoreError::Timeout,
            sqlx::Error::Database(db_err) => {
                let constraint = db_err.constraint().unwrap_or("unknown").to_string();
                if db_err.is_unique_violation() {
                    StoreError::UniqueViolation(constraint)
                } else if db_err.is_foreign_key_violation() {
                    StoreError::ReferenceViolation(constraint)
                } else if db_err.is_check_violation() {
                    StoreError::CheckViolation(constraint)
                } else {
                    StoreError::Unavailable(format!("database error: {}", db_err))
                }
            }
            other => StoreError::Unavailable(other.to_string()),
        }
    }
}

/// Outcome of a repository operation that did not succeed
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// Missing or malformed required input; never retried
    #[error("{0}")]
    InvalidInput(String),

    /// Uniqueness violation; caller must choose a different value
    #[error("{0}")]
    Conflict(String),

    /// A referenced identifier does not resolve
    #[error("{0}")]
    NotFound(String),

    /// Refused because a dependency invariant would break
    #[error("{0}")]
    Blocked(String),

    /// Infrastructure failure, transient
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// Store did not answer in time, transient
    #[error("store operation timed out")]
    Timeout,

    /// Credential hashing failed
    #[error(transparent)]
    Hashing(#[from] PasswordError),
}

impl RepoError {
    /// Whether the caller may retry the same operation unchanged
    pub fn is_retryable(&self) -> bool {
        matches!(self, RepoError::StoreUnavailable(_) | RepoError::Timeout)
    }
}

/// Default mapping for store failures that carry no operation-specific meaning
///
/// Constraint violations that do carry meaning (duplicate username, deleting
/// an account that still owns notes) are translated by the repositories
/// before falling back to this conversion.
impl From<StoreError> for RepoError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(msg) => RepoError::StoreUnavailable(msg),
            StoreError::Timeout => RepoError::Timeout,
            StoreError::UniqueViolation(constraint) => {
                RepoError::Conflict(format!("Constraint violation: {}", constraint))
            }
            StoreError::ReferenceViolation(constraint) => {
                RepoError::Blocked(format!("Constraint violation: {}", constraint))
            }
            StoreError::CheckViolation(constraint) => {
                RepoError::InvalidInput(format!("Constraint violation: {}", constraint))
            }
        }
    }
}

/// Flattens `validator` errors into a single message listing offending fields
pub(crate) fn invalid_input(errors: validator::ValidationErrors) -> RepoError {
    let mut fields: Vec<String> = errors
        .field_errors()
        .keys()
        .map(|field| field.to_string())
        .collect();
    fields.sort();

    RepoError::InvalidInput(format!("All fields are required ({})", fields.join(", ")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_maps_to_retryable() {
        let err: RepoError = StoreError::Timeout.into();
        assert!(err.is_retryable());

        let err: RepoError = StoreError::Unavailable("connection refused".to_string()).into();
        assert!(err.is_retryable());
        assert!(matches!(err, RepoError::StoreUnavailable(_)));
    }

    #[test]
    fn test_constraint_violations_are_not_retryable() {
        let err: RepoError = StoreError::UniqueViolation("users_username_key".to_string()).into();
        assert!(matches!(err, RepoError::Conflict(_)));
        assert!(!err.is_retryable());

        let err: RepoError = StoreError::ReferenceViolation("notes_user_id_fkey".to_string()).into();
        assert!(matches!(err, RepoError::Blocked(_)));

        let err: RepoError = StoreError::CheckViolation("users_roles_not_empty".to_string()).into();
        assert!(matches!(err, RepoError::InvalidInput(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_pool_timeout_is_timeout() {
        let err: StoreError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, StoreError::Timeout));

        let err: StoreError = sqlx::Error::PoolClosed.into();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }

    #[test]
    fn test_repo_error_display_is_bare_message() {
        let err = RepoError::Conflict("Duplicate username".to_string());
        assert_eq!(err.to_string(), "Duplicate username");
    }
}
