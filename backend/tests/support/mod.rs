//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use tasks_backend::db::{LocalRepository, TaskRepository};
use tasks_backend::http::{create_router, AppState};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Environment overrides that hold the process-wide env lock until dropped.
///
/// Restores every touched variable on drop, including on unwind. Tests that
/// await while the overrides are active hold the guard across the await.
pub struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
    _lock: MutexGuard<'static, ()>,
}

impl ScopedEnv {
    /// `Some(v)` sets a variable, `None` removes it.
    pub fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self {
            snapshot,
            _lock: lock,
        }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// Runs `f` with environment variables temporarily modified.
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _env = ScopedEnv::new(changes);
    f()
}

/// Router over a fresh in-memory store.
pub fn local_app() -> Router {
    app_with(Arc::new(LocalRepository::new()))
}

pub fn app_with(repository: Arc<dyn TaskRepository>) -> Router {
    create_router(AppState::with_repository(repository))
}

/// Issue one request and return the status with the body parsed as JSON
/// (or `Value::Null` for an empty or non-JSON body).
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn post_json(app: &Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    post_raw(app, uri, &body.to_string()).await
}

pub async fn post_raw(app: &Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}
