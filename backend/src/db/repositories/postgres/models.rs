use diesel::prelude::*;

use super::schema::tasks;
use crate::models::{NewTask, Task, TaskId, TaskPatch};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    pub id: i64,
    pub name: String,
    pub info: String,
    pub is_done: bool,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Task {
            id: TaskId::new(row.id),
            name: row.name,
            info: row.info,
            is_done: row.is_done,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    pub name: String,
    pub info: String,
    pub is_done: bool,
}

impl From<NewTask> for NewTaskRow {
    fn from(task: NewTask) -> Self {
        Self {
            name: task.name,
            info: task.info,
            is_done: task.is_done,
        }
    }
}

/// Column writes for an update. `None` columns are left out of the `SET` clause.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = tasks)]
pub struct TaskChangeset {
    pub name: Option<String>,
    pub info: Option<String>,
    pub is_done: Option<bool>,
}

impl TaskChangeset {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.info.is_none() && self.is_done.is_none()
    }
}

impl From<TaskPatch> for TaskChangeset {
    fn from(patch: TaskPatch) -> Self {
        Self {
            name: patch.name.into_value(),
            info: patch.info.resolve_with(String::new),
            is_done: patch.is_done.resolve_with(|| false),
        }
    }
}
