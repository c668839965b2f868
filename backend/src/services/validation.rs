//! Validation layer for task requests.
//!
//! Each endpoint has one function that turns its raw request into the typed
//! input the store expects, or into the full list of field failures. Rules are
//! all checked before returning, so a client sees every problem at once.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::api::{CreateTaskRequest, UpdateTaskRequest};
use crate::models::{NewTask, TaskId, TaskPatch};

/// Where the rejected value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum FieldLocation {
    Body,
    Params,
}

/// A single rule failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FieldError {
    pub location: FieldLocation,
    /// Field name, or `body` when the payload itself could not be decoded
    pub path: String,
    pub msg: String,
    /// The offending value, when there was one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl FieldError {
    pub fn body(path: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            location: FieldLocation::Body,
            path: path.into(),
            msg: msg.into(),
            value: None,
        }
    }

    pub fn params(path: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            location: FieldLocation::Params,
            path: path.into(),
            msg: msg.into(),
            value: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }
}

/// Every rule failure for one request. Serialized as `{"errors": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// `Ok(value)` when no rule failed, otherwise `Err(self)`.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl From<FieldError> for ValidationErrors {
    fn from(error: FieldError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.path, e.msg))
            .collect();
        write!(f, "validation failed ({})", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// A payload that could not be decoded into the endpoint's request shape.
pub fn malformed_body(message: impl Into<String>) -> ValidationErrors {
    FieldError::body("body", message).into()
}

/// Rules for `POST /create`.
///
/// `name` must be present and non-empty. `info` defaults to `""` and
/// `isDone` to `false`.
pub fn validate_create(request: CreateTaskRequest) -> Result<NewTask, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let name = match request.name {
        None => {
            errors.push(FieldError::body("name", "name is required"));
            String::new()
        }
        Some(name) if name.is_empty() => {
            errors.push(FieldError::body("name", "name must not be empty").with_value(name));
            String::new()
        }
        Some(name) => name,
    };

    let task = NewTask::new(name)
        .with_info(request.info.unwrap_or_default())
        .done(request.is_done.unwrap_or(false));

    errors.into_result(task)
}

/// Rules for `POST /update`.
///
/// `id` must be present. Only the fields present in the payload are written;
/// `name` cannot be reset with `null` because it has no default.
pub fn validate_update(request: UpdateTaskRequest) -> Result<(TaskId, TaskPatch), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if request.id.is_none() {
        errors.push(FieldError::body("id", "id is required"));
    }
    if request.name.is_null() {
        errors.push(FieldError::body("name", "name must not be null").with_value(Value::Null));
    }

    let patch = TaskPatch {
        name: request.name,
        info: request.info,
        is_done: request.is_done,
    };

    match request.id {
        Some(id) if errors.is_empty() => Ok((TaskId::new(id), patch)),
        _ => Err(errors),
    }
}

/// Rules for the `:id` path segment of `GET /delete/:id`.
pub fn validate_task_id(raw: &str) -> Result<TaskId, ValidationErrors> {
    if raw.trim().is_empty() {
        return Err(FieldError::params("id", "id is required").into());
    }
    raw.trim().parse::<TaskId>().map_err(|_| {
        FieldError::params("id", "id must be an integer")
            .with_value(raw)
            .into()
    })
}
