//! In-memory task store.
//!
//! Ids are assigned from a monotonically increasing counter starting at 1 and
//! are never reused, matching a `BIGSERIAL` column. Tasks are listed in id order.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;

use crate::db::repository::{ErrorContext, RepositoryError, RepositoryResult, TaskRepository};
use crate::models::{NewTask, Task, TaskId, TaskPatch};

#[derive(Debug)]
struct LocalState {
    next_id: i64,
    tasks: BTreeMap<TaskId, Task>,
}

/// In-memory repository for development and tests.
#[derive(Debug)]
pub struct LocalRepository {
    state: RwLock<LocalState>,
}

impl LocalRepository {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(LocalState {
                next_id: 1,
                tasks: BTreeMap::new(),
            }),
        }
    }

    /// Number of stored tasks.
    pub fn len(&self) -> usize {
        self.state.read().tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn missing(operation: &str, id: TaskId) -> RepositoryError {
        RepositoryError::not_found_with_context(
            format!("Task {} does not exist", id),
            ErrorContext::for_task(operation, id),
        )
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(true)
    }

    async fn list_tasks(&self) -> RepositoryResult<Vec<Task>> {
        Ok(self.state.read().tasks.values().cloned().collect())
    }

    async fn get_task(&self, id: TaskId) -> RepositoryResult<Task> {
        self.state
            .read()
            .tasks
            .get(&id)
            .cloned()
            .ok_or_else(|| Self::missing("get_task", id))
    }

    async fn insert_task(&self, task: NewTask) -> RepositoryResult<Task> {
        let mut state = self.state.write();
        let id = TaskId::new(state.next_id);
        state.next_id += 1;

        let stored = Task {
            id,
            name: task.name,
            info: task.info,
            is_done: task.is_done,
        };
        state.tasks.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update_task(&self, id: TaskId, patch: TaskPatch) -> RepositoryResult<Task> {
        let mut state = self.state.write();
        let task = state
            .tasks
            .get_mut(&id)
            .ok_or_else(|| Self::missing("update_task", id))?;
        patch.apply(task);
        Ok(task.clone())
    }

    async fn delete_task(&self, id: TaskId) -> RepositoryResult<Task> {
        self.state
            .write()
            .tasks
            .remove(&id)
            .ok_or_else(|| Self::missing("delete_task", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Patch;

    #[tokio::test]
    async fn test_ids_are_assigned_sequentially_and_not_reused() {
        let repo = LocalRepository::new();
        let a = repo.insert_task(NewTask::new("a")).await.unwrap();
        let b = repo.insert_task(NewTask::new("b")).await.unwrap();
        assert_eq!(a.id, TaskId::new(1));
        assert_eq!(b.id, TaskId::new(2));

        repo.delete_task(b.id).await.unwrap();
        let c = repo.insert_task(NewTask::new("c")).await.unwrap();
        assert_eq!(c.id, TaskId::new(3));
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_id() {
        let repo = LocalRepository::new();
        for name in ["x", "y", "z"] {
            repo.insert_task(NewTask::new(name)).await.unwrap();
        }
        let names: Vec<String> = repo
            .list_tasks()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["x", "y", "z"]);
    }

    #[tokio::test]
    async fn test_update_missing_task_is_not_found() {
        let repo = LocalRepository::new();
        let err = repo
            .update_task(TaskId::new(5), TaskPatch::default())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.context().entity_id.as_deref(), Some("5"));
    }

    #[tokio::test]
    async fn test_update_applies_patch() {
        let repo = LocalRepository::new();
        let task = repo
            .insert_task(NewTask::new("a").with_info("note"))
            .await
            .unwrap();

        let updated = repo
            .update_task(
                task.id,
                TaskPatch {
                    is_done: Patch::Value(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.info, "note");
        assert!(updated.is_done);
        assert_eq!(repo.get_task(task.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_delete_returns_prior_values() {
        let repo = LocalRepository::new();
        let task = repo.insert_task(NewTask::new("gone")).await.unwrap();
        let deleted = repo.delete_task(task.id).await.unwrap();
        assert_eq!(deleted, task);
        assert!(repo.is_empty());
        assert!(repo.delete_task(task.id).await.unwrap_err().is_not_found());
    }
}
