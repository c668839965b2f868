//! Application state for the HTTP server.

use std::sync::Arc;

use super::docs::ApiDoc;
use crate::db::repository::TaskRepository;

/// Shared application state passed to all handlers.
///
/// Built once in `main` and cloned per request; both members are shared
/// handles, so a clone is two reference-count bumps.
#[derive(Clone)]
pub struct AppState {
    /// Store shared by every request
    pub repository: Arc<dyn TaskRepository>,
    /// API description generated at startup, never modified afterwards
    pub api_doc: Arc<ApiDoc>,
}

impl AppState {
    /// Create a new application state with the given repository.
    pub fn new(repository: Arc<dyn TaskRepository>, api_doc: Arc<ApiDoc>) -> Self {
        Self {
            repository,
            api_doc,
        }
    }

    /// State with the API description for this crate's own endpoints.
    pub fn with_repository(repository: Arc<dyn TaskRepository>) -> Self {
        Self::new(repository, Arc::new(ApiDoc::for_task_api()))
    }
}
