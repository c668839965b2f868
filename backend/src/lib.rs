//! # Tasks Backend
//!
//! A small task-tracking service: create, list, update and delete tasks over a
//! JSON HTTP API, backed by an in-memory store or PostgreSQL.
//!
//! ## Architecture
//!
//! - [`models`]: the `Task` entity, its id type and the three-state [`models::Patch`]
//! - [`api`]: request bodies accepted by the HTTP API
//! - [`services`]: request validation producing structured field errors
//! - [`db`]: repository trait, store implementations, configuration and factory
//! - [`http`]: axum router, handlers and generated API documentation

// RepositoryError carries an ErrorContext on every variant
#![allow(clippy::result_large_err)]

pub mod api;
pub mod db;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
