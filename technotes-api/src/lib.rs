//! # technotes API server library
//!
//! Thin HTTP surface over `technotes-shared`: it parses request bodies,
//! calls the repositories and maps their outcomes onto status codes.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
