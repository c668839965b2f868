//! Public API surface for the task service.
//!
//! This file consolidates the request/response types of the HTTP API.
//! Request types deserialize leniently (every field optional) so that missing
//! fields are reported by the validation layer rather than by the decoder.

pub use crate::models::{NewTask, Patch, Task, TaskId, TaskPatch};
pub use crate::services::validation::{FieldError, FieldLocation, ValidationErrors};

use schemars::JsonSchema;
use serde::Deserialize;

/// Body of `POST /create`.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    /// Task name. Required and non-empty.
    #[serde(default)]
    pub name: Option<String>,
    /// Free-form notes. Defaults to an empty string.
    #[serde(default)]
    pub info: Option<String>,
    /// Completion flag. Defaults to false.
    #[serde(default)]
    pub is_done: Option<bool>,
}

/// Body of `POST /update`.
///
/// Only the keys present in the payload are written. `null` resets `info` to
/// an empty string and `isDone` to false.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    /// Id of the task to update. Required.
    #[serde(default)]
    pub id: Option<i64>,
    /// New name. Must not be null.
    #[serde(default)]
    #[schemars(with = "Option<String>")]
    pub name: Patch<String>,
    /// New notes.
    #[serde(default)]
    #[schemars(with = "Option<String>")]
    pub info: Patch<String>,
    /// New completion flag.
    #[serde(default)]
    #[schemars(with = "Option<bool>")]
    pub is_done: Patch<bool>,
}
