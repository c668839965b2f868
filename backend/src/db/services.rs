//! Service layer for task persistence.
//!
//! These functions are the entry points the HTTP handlers use. They work with
//! any [`TaskRepository`] and add what every store shares: operation names in
//! error context and the observability log lines.

use tracing::{debug, info};

use super::repository::{RepositoryResult, TaskRepository};
use crate::models::{NewTask, Task, TaskId, TaskPatch};

/// Check that the store is reachable.
pub async fn health_check<R: TaskRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

/// Fetch every stored task.
pub async fn list_tasks<R: TaskRepository + ?Sized>(repo: &R) -> RepositoryResult<Vec<Task>> {
    let tasks = repo.list_tasks().await?;
    debug!(count = tasks.len(), "listed tasks");
    Ok(tasks)
}

/// Fetch a single task.
pub async fn get_task<R: TaskRepository + ?Sized>(repo: &R, id: TaskId) -> RepositoryResult<Task> {
    repo.get_task(id).await
}

/// Insert a validated task and return it with its assigned id.
pub async fn create_task<R: TaskRepository + ?Sized>(
    repo: &R,
    task: NewTask,
) -> RepositoryResult<Task> {
    let created = repo
        .insert_task(task)
        .await
        .map_err(|e| e.with_operation("create_task"))?;
    info!(
        id = %created.id,
        name = %created.name,
        info = %created.info,
        is_done = created.is_done,
        "created task"
    );
    Ok(created)
}

/// Write the present fields of `patch` to an existing task.
pub async fn update_task<R: TaskRepository + ?Sized>(
    repo: &R,
    id: TaskId,
    patch: TaskPatch,
) -> RepositoryResult<Task> {
    let updated = repo.update_task(id, patch).await?;
    debug!(id = %updated.id, "updated task");
    Ok(updated)
}

/// Remove a task and return the values it had.
pub async fn delete_task<R: TaskRepository + ?Sized>(
    repo: &R,
    id: TaskId,
) -> RepositoryResult<Task> {
    let deleted = repo.delete_task(id).await?;
    debug!(id = %deleted.id, "deleted task");
    Ok(deleted)
}
