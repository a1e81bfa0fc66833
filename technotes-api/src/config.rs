/// Configuration management for the API server
///
/// This module loads configuration from environment variables and provides
/// a type-safe configuration struct.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `DATABASE_ACQUIRE_TIMEOUT_SECS`: Wait for a free connection before timing out (default: 30)
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 3500)
/// - `CORS_ORIGINS`: Comma-separated allowed origins (default: http://localhost:3000, `*` = any)
/// - `PASSWORD_HASH_MEMORY_KIB`: Argon2 memory cost (default: 65536)
/// - `PASSWORD_HASH_ITERATIONS`: Argon2 passes (default: 3)
/// - `PASSWORD_HASH_LANES`: Argon2 parallelism (default: 4)
/// - `RUST_LOG`: Log filter (default: technotes_api=debug,technotes_shared=debug,tower_http=debug)
///
/// # Example
///
/// ```no_run
/// use technotes_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use technotes_shared::auth::password::HashParams;
use technotes_shared::db::pool::DatabaseConfig;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Connection pool settings, passed to `create_pool` as-is
    pub database: DatabaseConfig,

    /// Credential hashing cost
    pub password: HashParams,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Origins allowed to make credentialed cross-origin requests
    ///
    /// A single `*` entry switches to a permissive policy (development only).
    pub cors_origins: Vec<String>,
}

fn var_or<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{} has an invalid value: {}", name, e)),
        Err(_) => Ok(default),
    }
}

/// Splits a comma-separated origin list, dropping blanks
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

/// Rejects Argon2 costs the hasher would refuse, so the server fails at
/// startup instead of on the first password write
pub fn check_hash_params(params: &HashParams) -> anyhow::Result<()> {
    params.validate().map_err(|e| {
        anyhow::anyhow!(
            "PASSWORD_HASH_MEMORY_KIB, PASSWORD_HASH_ITERATIONS and PASSWORD_HASH_LANES are invalid: {}",
            e
        )
    })
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` is missing or a variable has an
    /// invalid value
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let api_port = var_or("API_PORT", 3500u16)?;

        let cors_origins = parse_origins(
            &env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:3000".to_string()),
        );

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;
        let database = DatabaseConfig {
            url: database_url,
            max_connections: var_or(
                "DATABASE_MAX_CONNECTIONS",
                DatabaseConfig::DEFAULT_MAX_CONNECTIONS,
            )?,
            acquire_timeout_secs: var_or(
                "DATABASE_ACQUIRE_TIMEOUT_SECS",
                DatabaseConfig::DEFAULT_ACQUIRE_TIMEOUT_SECS,
            )?,
        };
        if database.max_connections == 0 {
            anyhow::bail!("DATABASE_MAX_CONNECTIONS must be at least 1");
        }

        let defaults = HashParams::default();
        let password = HashParams {
            memory_kib: var_or("PASSWORD_HASH_MEMORY_KIB", defaults.memory_kib)?,
            iterations: var_or("PASSWORD_HASH_ITERATIONS", defaults.iterations)?,
            lanes: var_or("PASSWORD_HASH_LANES", defaults.lanes)?,
        };

        check_hash_params(&password)?;

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
                cors_origins,
            },
            database,
            password,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    /// Whether cross-origin requests from any origin are accepted
    pub fn cors_is_permissive(&self) -> bool {
        self.api.cors_origins.iter().any(|origin| origin == "*")
    }
}
