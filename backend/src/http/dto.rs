//! Data Transfer Objects for the HTTP API.
//!
//! Request and entity types live in [`crate::api`] and are re-exported here;
//! this module adds the shapes only the HTTP layer produces.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub use super::error::ApiError;
pub use crate::api::{
    CreateTaskRequest, FieldError, FieldLocation, Task, TaskId, UpdateTaskRequest,
    ValidationErrors,
};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the service
    pub version: String,
    /// Database connection status
    pub database: String,
}
