//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the service
//! layer for persistence. The [`EndpointDoc`] beside each handler feeds the
//! generated API description.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Html,
    Json,
};
use serde_json::Value;

use super::docs::{
    BodyDoc, EndpointDoc, ParamDoc, ResponseDoc, SchemaRef, HEALTH_BODY, STORE_FAILED, TASK_BODY,
    VALIDATION_FAILED,
};
use super::dto::{CreateTaskRequest, HealthResponse, Task, UpdateTaskRequest};
use super::error::AppError;
use super::state::AppState;
use crate::db::services as db_services;
use crate::services::validation::{validate_create, validate_task_id, validate_update};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// Every documented endpoint, in the order they appear in the API description.
pub const ENDPOINTS: &[EndpointDoc] = &[
    READ_DOC,
    CREATE_DOC,
    UPDATE_DOC,
    DELETE_DOC,
    HEALTH_DOC,
];

// =============================================================================
// Health Check
// =============================================================================

const HEALTH_DOC: EndpointDoc = EndpointDoc {
    method: "get",
    path: "/health",
    operation_id: "healthCheck",
    summary: "Service health",
    description: "Reports whether the service is up and the store reachable.",
    path_params: &[],
    request: None,
    responses: &[ResponseDoc {
        status: 200,
        description: "Service status",
        body: Some(HEALTH_BODY),
    }],
};

/// GET /health
///
/// Health check endpoint to verify the service is running and the store is accessible.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Task CRUD
// =============================================================================

const READ_DOC: EndpointDoc = EndpointDoc {
    method: "get",
    path: "/read",
    operation_id: "readTasks",
    summary: "List every task",
    description: "Returns all stored tasks in store order.",
    path_params: &[],
    request: None,
    responses: &[
        ResponseDoc {
            status: 200,
            description: "All tasks, possibly none",
            body: Some(BodyDoc {
                schema: SchemaRef::of::<Task>("Task"),
                array: true,
                example: r#"[{"id": 1, "name": "Buy milk", "info": "", "isDone": false}]"#,
            }),
        },
        STORE_FAILED,
    ],
};

/// GET /read
///
/// List all tasks.
pub async fn list_tasks(State(state): State<AppState>) -> HandlerResult<Vec<Task>> {
    let tasks = db_services::list_tasks(state.repository.as_ref()).await?;
    Ok(Json(tasks))
}

const CREATE_DOC: EndpointDoc = EndpointDoc {
    method: "post",
    path: "/create",
    operation_id: "createTask",
    summary: "Create a task",
    description: "Stores a new task. `info` defaults to an empty string and `isDone` to false.",
    path_params: &[],
    request: Some(BodyDoc {
        schema: SchemaRef::of::<CreateTaskRequest>("CreateTaskRequest"),
        array: false,
        example: r#"{"name": "Buy milk", "info": "2%", "isDone": false}"#,
    }),
    responses: &[
        ResponseDoc {
            status: 200,
            description: "The created task with its assigned id",
            body: Some(TASK_BODY),
        },
        VALIDATION_FAILED,
        STORE_FAILED,
    ],
};

/// POST /create
pub async fn create_task(
    State(state): State<AppState>,
    body: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> HandlerResult<Task> {
    let Json(request) = body?;
    let new_task = validate_create(request)?;
    let task = db_services::create_task(state.repository.as_ref(), new_task).await?;
    Ok(Json(task))
}

const UPDATE_DOC: EndpointDoc = EndpointDoc {
    method: "post",
    path: "/update",
    operation_id: "updateTask",
    summary: "Update a task",
    description: "Writes only the fields present in the body. `null` resets `info` to an \
                  empty string and `isDone` to false; `name` may not be null. \
                  An unknown id is a store failure.",
    path_params: &[],
    request: Some(BodyDoc {
        schema: SchemaRef::of::<UpdateTaskRequest>("UpdateTaskRequest"),
        array: false,
        example: r#"{"id": 1, "info": "2%", "isDone": true}"#,
    }),
    responses: &[
        ResponseDoc {
            status: 200,
            description: "The task after the update",
            body: Some(TASK_BODY),
        },
        VALIDATION_FAILED,
        STORE_FAILED,
    ],
};

/// POST /update
pub async fn update_task(
    State(state): State<AppState>,
    body: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> HandlerResult<Task> {
    let Json(request) = body?;
    let (id, patch) = validate_update(request)?;
    let task = db_services::update_task(state.repository.as_ref(), id, patch).await?;
    Ok(Json(task))
}

const DELETE_DOC: EndpointDoc = EndpointDoc {
    method: "get",
    path: "/delete/{id}",
    operation_id: "deleteTask",
    summary: "Delete a task",
    description: "Removes the task and returns its last stored values. \
                  An unknown id is a store failure.",
    path_params: &[ParamDoc {
        name: "id",
        description: "Id of the task to delete",
        example: "1",
    }],
    request: None,
    responses: &[
        ResponseDoc {
            status: 200,
            description: "The deleted task",
            body: Some(TASK_BODY),
        },
        VALIDATION_FAILED,
        STORE_FAILED,
    ],
};

/// GET /delete/{id}
///
/// The id is taken as a raw string so a non-integer value is reported as a
/// field error rather than an extractor rejection. Also mounted at `/delete/`,
/// where the missing id fails validation.
pub async fn delete_task(
    State(state): State<AppState>,
    raw_id: Option<Path<String>>,
) -> HandlerResult<Task> {
    let raw_id = raw_id.map(|Path(id)| id).unwrap_or_default();
    let id = validate_task_id(&raw_id)?;
    let task = db_services::delete_task(state.repository.as_ref(), id).await?;
    Ok(Json(task))
}

// =============================================================================
// Documentation
// =============================================================================

/// GET /docs
pub async fn docs_page(State(state): State<AppState>) -> Html<String> {
    Html(state.api_doc.html().to_string())
}

/// GET /docs/openapi.json
pub async fn openapi_document(State(state): State<AppState>) -> Json<Value> {
    Json(state.api_doc.document().clone())
}
