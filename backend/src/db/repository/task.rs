//! Repository trait for task persistence.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{NewTask, Task, TaskId, TaskPatch};

/// Store operations for the task entity.
///
/// Every method performs exactly one store operation. No method retries,
/// and no method holds state across calls other than what the store itself keeps.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to be shared across request tasks.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Prepare the store for use (create the `tasks` table, check connectivity).
    ///
    /// Called once at startup. Stores with nothing to prepare keep the default.
    async fn initialize(&self) -> RepositoryResult<()> {
        Ok(())
    }

    /// Check that the store is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Fetch every task in store-defined order.
    async fn list_tasks(&self) -> RepositoryResult<Vec<Task>>;

    /// Fetch one task.
    ///
    /// # Errors
    /// `RepositoryError::NotFound` if no task has this id.
    async fn get_task(&self, id: TaskId) -> RepositoryResult<Task>;

    /// Insert a task and return it with its assigned id.
    async fn insert_task(&self, task: NewTask) -> RepositoryResult<Task>;

    /// Write the present fields of `patch` to the task and return the result.
    ///
    /// An empty patch writes nothing and returns the current task.
    ///
    /// # Errors
    /// `RepositoryError::NotFound` if no task has this id.
    async fn update_task(&self, id: TaskId, patch: TaskPatch) -> RepositoryResult<Task>;

    /// Remove a task and return its last stored values.
    ///
    /// # Errors
    /// `RepositoryError::NotFound` if no task has this id.
    async fn delete_task(&self, id: TaskId) -> RepositoryResult<Task>;
}
