//! Repository abstraction over the task store.
//!
//! Handlers and services depend on [`TaskRepository`] only, so the in-memory
//! and Postgres stores are interchangeable behind an `Arc<dyn TaskRepository>`.

pub mod error;
pub mod task;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};
pub use task::TaskRepository;
