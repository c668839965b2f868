//! End-to-end tests of the HTTP API over the in-memory store.

mod support;

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use serde_json::{json, Value};

use support::{get, local_app, post_json, post_raw};
use tasks_backend::db::{RepositoryError, RepositoryResult, TaskRepository};
use tasks_backend::models::{NewTask, Task, TaskId, TaskPatch};

fn first_error(body: &Value) -> &Value {
    &body["errors"][0]
}

#[tokio::test]
async fn test_full_task_lifecycle() {
    let app = local_app();

    let (status, created) = post_json(&app, "/create", &json!({"name": "Buy milk"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        created,
        json!({"id": 1, "name": "Buy milk", "info": "", "isDone": false})
    );

    let (status, listed) = get(&app, "/read").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        listed,
        json!([{"id": 1, "name": "Buy milk", "info": "", "isDone": false}])
    );

    let (status, updated) = post_json(
        &app,
        "/update",
        &json!({"id": 1, "name": "Buy milk", "info": "2%", "isDone": true}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        updated,
        json!({"id": 1, "name": "Buy milk", "info": "2%", "isDone": true})
    );

    let (status, deleted) = get(&app, "/delete/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        deleted,
        json!({"id": 1, "name": "Buy milk", "info": "2%", "isDone": true})
    );

    let (status, listed) = get(&app, "/read").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn test_read_empty_store() {
    let (status, body) = get(&local_app(), "/read").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_create_with_all_fields() {
    let app = local_app();
    let (status, body) = post_json(
        &app,
        "/create",
        &json!({"name": "Write report", "info": "due friday", "isDone": true}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["info"], "due friday");
    assert_eq!(body["isDone"], true);
}

#[tokio::test]
async fn test_create_assigns_increasing_ids() {
    let app = local_app();
    let (_, first) = post_json(&app, "/create", &json!({"name": "a"})).await;
    let (_, second) = post_json(&app, "/create", &json!({"name": "b"})).await;
    assert!(second["id"].as_i64().unwrap() > first["id"].as_i64().unwrap());
}

#[tokio::test]
async fn test_create_missing_name_is_rejected() {
    let app = local_app();
    let (status, body) = post_json(&app, "/create", &json!({"info": "no name"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(first_error(&body)["location"], "body");
    assert_eq!(first_error(&body)["path"], "name");

    let (_, listed) = get(&app, "/read").await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn test_create_empty_name_is_rejected() {
    let (status, body) = post_json(&local_app(), "/create", &json!({"name": ""})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(first_error(&body)["path"], "name");
    assert_eq!(first_error(&body)["value"], "");
}

#[tokio::test]
async fn test_create_malformed_body_is_rejected() {
    let (status, body) = post_raw(&local_app(), "/create", "{not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(first_error(&body)["path"], "body");
}

#[tokio::test]
async fn test_create_wrong_type_is_rejected() {
    let (status, body) = post_json(&local_app(), "/create", &json!({"name": 42})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(first_error(&body)["path"], "body");
}

#[tokio::test]
async fn test_update_only_writes_present_fields() {
    let app = local_app();
    post_json(
        &app,
        "/create",
        &json!({"name": "Buy milk", "info": "2%", "isDone": false}),
    )
    .await;

    let (status, body) = post_json(&app, "/update", &json!({"id": 1, "isDone": true})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"id": 1, "name": "Buy milk", "info": "2%", "isDone": true})
    );
}

#[tokio::test]
async fn test_update_null_resets_to_defaults() {
    let app = local_app();
    post_json(
        &app,
        "/create",
        &json!({"name": "Buy milk", "info": "2%", "isDone": true}),
    )
    .await;

    let (status, body) = post_json(
        &app,
        "/update",
        &json!({"id": 1, "info": null, "isDone": null}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["info"], "");
    assert_eq!(body["isDone"], false);
    assert_eq!(body["name"], "Buy milk");
}

#[tokio::test]
async fn test_update_with_only_id_returns_current_task() {
    let app = local_app();
    post_json(&app, "/create", &json!({"name": "Buy milk"})).await;

    let (status, body) = post_json(&app, "/update", &json!({"id": 1})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Buy milk");
}

#[tokio::test]
async fn test_update_missing_id_is_rejected() {
    let (status, body) = post_json(&local_app(), "/update", &json!({"name": "x"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(first_error(&body)["path"], "id");
}

#[tokio::test]
async fn test_update_null_name_is_rejected() {
    let app = local_app();
    post_json(&app, "/create", &json!({"name": "Buy milk"})).await;

    let (status, body) = post_json(&app, "/update", &json!({"id": 1, "name": null})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(first_error(&body)["path"], "name");

    let (_, listed) = get(&app, "/read").await;
    assert_eq!(listed[0]["name"], "Buy milk");
}

#[tokio::test]
async fn test_update_reports_every_failing_field() {
    let (status, body) = post_json(&local_app(), "/update", &json!({"name": null})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_update_unknown_id_is_store_error() {
    let (status, body) = post_json(&local_app(), "/update", &json!({"id": 99, "name": "x"})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "REPOSITORY_ERROR");
    assert!(body["message"].as_str().unwrap().contains("99"));
}

#[tokio::test]
async fn test_delete_unknown_id_is_store_error() {
    let (status, body) = get(&local_app(), "/delete/7").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "REPOSITORY_ERROR");
}

#[tokio::test]
async fn test_delete_non_integer_id_is_rejected() {
    let (status, body) = get(&local_app(), "/delete/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(first_error(&body)["location"], "params");
    assert_eq!(first_error(&body)["path"], "id");
    assert_eq!(first_error(&body)["value"], "abc");
}

#[tokio::test]
async fn test_delete_without_id_is_rejected() {
    let (status, body) = get(&local_app(), "/delete/").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(first_error(&body)["location"], "params");
    assert_eq!(first_error(&body)["msg"], "id is required");
}

#[tokio::test]
async fn test_delete_twice_fails_second_time() {
    let app = local_app();
    post_json(&app, "/create", &json!({"name": "once"})).await;

    let (status, _) = get(&app, "/delete/1").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = get(&app, "/delete/1").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let (status, _) = get(&local_app(), "/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_reports_connected() {
    let (status, body) = get(&local_app(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn test_openapi_document_lists_task_routes() {
    let (status, body) = get(&local_app(), "/docs/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/read"]["get"].is_object());
    assert!(body["paths"]["/create"]["post"].is_object());
    assert!(body["paths"]["/update"]["post"].is_object());
    assert!(body["paths"]["/delete/{id}"]["get"].is_object());
    assert!(body["paths"]["/create"]["post"]["responses"]["400"].is_object());
}

#[tokio::test]
async fn test_docs_page_is_html() {
    let app = local_app();
    let request = axum::http::Request::builder()
        .uri("/docs")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()["content-type"].to_str().unwrap();
    assert!(content_type.starts_with("text/html"));
}

/// Store whose every operation fails, as an unreachable database would.
struct UnreachableStore;

#[async_trait]
impl TaskRepository for UnreachableStore {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Err(RepositoryError::connection("connection refused"))
    }

    async fn list_tasks(&self) -> RepositoryResult<Vec<Task>> {
        Err(RepositoryError::connection("connection refused"))
    }

    async fn get_task(&self, _id: TaskId) -> RepositoryResult<Task> {
        Err(RepositoryError::connection("connection refused"))
    }

    async fn insert_task(&self, _task: NewTask) -> RepositoryResult<Task> {
        Err(RepositoryError::connection("connection refused"))
    }

    async fn update_task(&self, _id: TaskId, _patch: TaskPatch) -> RepositoryResult<Task> {
        Err(RepositoryError::connection("connection refused"))
    }

    async fn delete_task(&self, _id: TaskId) -> RepositoryResult<Task> {
        Err(RepositoryError::connection("connection refused"))
    }
}

#[tokio::test]
async fn test_unreachable_store_maps_to_500() {
    let app = support::app_with(Arc::new(UnreachableStore));

    let (status, body) = get(&app, "/read").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("connection refused"));

    let (status, _) = post_json(&app, "/create", &json!({"name": "x"})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, _) = get(&app, "/delete/1").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_validation_runs_before_store() {
    let app = support::app_with(Arc::new(UnreachableStore));
    let (status, _) = post_json(&app, "/create", &json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unreachable_store_health() {
    let (status, body) = get(&support::app_with(Arc::new(UnreachableStore)), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["database"].as_str().unwrap().starts_with("error:"));
}
