/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use technotes_api::{app::{build_router, AppState}, config::Config};
/// use technotes_shared::store::PgStore;
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(Arc::new(PgStore::new(pool)), config);
/// let app = build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError};
use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use std::sync::Arc;
use technotes_shared::repo::Repositories;
use technotes_shared::store::{NoteStore, SequenceStore, StoreHealth, UserStore};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// User and note repositories over one store
    pub repos: Repositories,

    /// Store liveness probe for `/health`
    pub health: Arc<dyn StoreHealth>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates application state over any store backend
    pub fn new<S>(store: Arc<S>, config: Config) -> Self
    where
        S: UserStore + NoteStore + SequenceStore + StoreHealth + 'static,
    {
        let repos = Repositories::new(store.clone(), config.password);
        Self {
            repos,
            health: store,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// ```text
/// /
/// ├── GET    /health
/// ├── /users
/// │   ├── GET      list users
/// │   ├── POST     create user
/// │   ├── PATCH    update user
/// │   └── DELETE   delete user
/// └── /notes
///     ├── GET      list notes
///     ├── POST     create note
///     ├── PATCH    update note
///     └── DELETE   delete note
/// ```
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let cors = cors_layer(&state.config);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route(
            "/users",
            get(routes::users::list_users)
                .post(routes::users::create_user)
                .patch(routes::users::update_user)
                .delete(routes::users::delete_user),
        )
        .route(
            "/notes",
            get(routes::notes::list_notes)
                .post(routes::notes::create_note)
                .patch(routes::notes::update_note)
                .delete(routes::notes::delete_note),
        )
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors_is_permissive() {
        // Development mode: permissive CORS
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Resource not found".to_string())
}
