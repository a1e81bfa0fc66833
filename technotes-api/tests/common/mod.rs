//! Common test utilities for API integration tests
//!
//! Builds the full router over an in-memory store, so no database is needed.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use technotes_api::app::{build_router, AppState};
use technotes_api::config::{ApiConfig, Config};
use technotes_shared::auth::password::HashParams;
use technotes_shared::db::pool::DatabaseConfig;
use technotes_shared::store::MemoryStore;
use tower::Service as _;

/// Test context containing all necessary resources
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub app: axum::Router,
}

pub fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["http://localhost:3000".to_string()],
        },
        database: DatabaseConfig::new("postgresql://unused"),
        password: HashParams {
            memory_kib: 1024,
            iterations: 1,
            lanes: 1,
        },
    }
}

impl TestContext {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone(), test_config());
        let app = build_router(state);
        Self { store, app }
    }

    /// Sends a request with an optional JSON body and returns status and parsed body
    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, json)
    }

    /// Creates a user through the API and returns its id
    pub async fn create_user(&self, username: &str, password: &str) -> String {
        let (status, body) = self
            .send(
                "POST",
                "/users",
                Some(serde_json::json!({
                    "username": username,
                    "password": password,
                    "roles": ["Employee"]
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create user failed: {}", body);
        body["id"].as_str().unwrap().to_string()
    }

    /// Creates a note through the API and returns (id, ticket)
    pub async fn create_note(&self, owner: &str, title: &str) -> (String, i64) {
        let (status, body) = self
            .send(
                "POST",
                "/notes",
                Some(serde_json::json!({
                    "user": owner,
                    "title": title,
                    "text": "details"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create note failed: {}", body);
        (
            body["id"].as_str().unwrap().to_string(),
            body["ticket"].as_i64().unwrap(),
        )
    }
}
