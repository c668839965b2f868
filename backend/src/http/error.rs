//! HTTP error handling and response types.
//!
//! Every failure leaves the handler as an [`AppError`] and is rendered here,
//! so clients always receive a JSON body:
//!
//! | Error | Status | Body |
//! |---|---|---|
//! | validation | 400 | `{"errors": [...]}` |
//! | store | 500 | `{"code": "REPOSITORY_ERROR", "message": ...}` |

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::db::repository::RepositoryError;
use crate::services::validation::{malformed_body, ValidationErrors};

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable failure detail
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Request failed the validation layer
    Validation(ValidationErrors),
    /// Store operation failed, including an unknown task id
    Repository(RepositoryError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(errors) => (StatusCode::BAD_REQUEST, Json(errors)).into_response(),
            AppError::Repository(e) => {
                warn!(error = %e, "store operation failed");
                let mut body = ApiError::new("REPOSITORY_ERROR", e.to_string());
                if let Some(details) = e.context().details.clone() {
                    body = body.with_details(details);
                }
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(errors)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(malformed_body(rejection.body_text()))
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}
