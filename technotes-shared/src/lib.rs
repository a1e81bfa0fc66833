//! # technotes shared library
//!
//! Core record lifecycle for the technotes service: account ("user") and
//! task ("note") records, the ticket sequence, credential hashing and the
//! integrity rules that tie them together.
//!
//! ## Module Organization
//!
//! - `auth`: Credential hashing
//! - `db`: PostgreSQL pool and migrations
//! - `error`: Store and repository error types
//! - `models`: Persisted record shapes and their SQL operations
//! - `store`: Persistence seams with PostgreSQL and in-memory backends
//! - `repo`: Repositories enforcing uniqueness, ownership and sequencing

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod repo;
pub mod store;

/// Current version of the technotes shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
