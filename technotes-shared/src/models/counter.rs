/// Named sequence counters
///
/// One row per sequence name. The first call for a name inserts the row at
/// its start value; every later call increments it. Both cases are a single
/// statement, so concurrent callers never read the same value.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE counters (
///     id TEXT PRIMARY KEY,
///     seq BIGINT NOT NULL
/// );
/// ```

use sqlx::PgPool;

/// Atomically advances the named sequence and returns the new value
///
/// The first call for `name` returns `start`.
pub async fn increment(pool: &PgPool, name: &str, start: i64) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        INSERT INTO counters (id, seq)
        VALUES ($1, $2)
        ON CONFLICT (id) DO UPDATE SET seq = counters.seq + 1
        RETURNING seq
        "#,
    )
    .bind(name)
    .bind(start)
    .fetch_one(pool)
    .await
}

/// Reads the current value of a sequence without advancing it
pub async fn current(pool: &PgPool, name: &str) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar("SELECT seq FROM counters WHERE id = $1")
        .bind(name)
        .fetch_optional(pool)
        .await
}
