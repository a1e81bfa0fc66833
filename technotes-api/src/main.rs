//! # technotes API Server
//!
//! HTTP front for the technotes user and note repositories.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/technotes cargo run -p technotes-api
//! ```

use std::sync::Arc;

use anyhow::Context;
use technotes_api::{
    app::{build_router, AppState},
    config::Config,
};
use technotes_shared::db::{
    migrations::run_migrations,
    pool::{close_pool, create_pool},
};
use technotes_shared::store::PgStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "technotes_api=debug,technotes_shared=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "technotes API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let pool = create_pool(&config.database)
        .await
        .context("failed to connect to database")?;

    run_migrations(&pool)
        .await
        .context("failed to run database migrations")?;

    let bind_address = config.bind_address();
    let state = AppState::new(Arc::new(PgStore::new(pool.clone())), config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("failed to bind {}", bind_address))?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    close_pool(pool).await;
    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        // without a signal handler, run until killed
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, exiting...");
}
