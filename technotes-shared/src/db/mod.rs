/// Database layer for technotes
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool management with health checks
/// - `migrations`: Schema migration runner (`users`, `notes`, `counters`)
///
/// # Example
///
/// ```no_run
/// use technotes_shared::db::pool::{create_pool, DatabaseConfig};
/// use technotes_shared::db::migrations::run_migrations;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig::new(std::env::var("DATABASE_URL")?);
///
///     let pool = create_pool(&config).await?;
///     run_migrations(&pool).await?;
///     Ok(())
/// }
/// ```

pub mod migrations;
pub mod pool;
