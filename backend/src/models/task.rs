//! The task entity and its write-side shapes.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::patch::Patch;
use crate::define_id_type;

define_id_type!(i64, TaskId);

/// A persisted task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Store-assigned identifier, immutable after creation
    pub id: TaskId,
    pub name: String,
    pub info: String,
    pub is_done: bool,
}

/// A validated task ready to be inserted. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub name: String,
    pub info: String,
    pub is_done: bool,
}

impl NewTask {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            info: String::new(),
            is_done: false,
        }
    }

    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = info.into();
        self
    }

    pub fn done(mut self, is_done: bool) -> Self {
        self.is_done = is_done;
        self
    }
}

/// Field-level changes for an existing task.
///
/// `Null` resets `info` and `is_done` to their defaults. `name` has no
/// default and is never `Null` once validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub name: Patch<String>,
    pub info: Patch<String>,
    pub is_done: Patch<bool>,
}

impl TaskPatch {
    /// True when no field would be written.
    pub fn is_empty(&self) -> bool {
        self.name.is_absent() && self.info.is_absent() && self.is_done.is_absent()
    }

    /// Apply the patch to an in-memory task.
    pub fn apply(self, task: &mut Task) {
        if let Some(name) = self.name.into_value() {
            task.name = name;
        }
        self.info.apply_to(&mut task.info, String::new);
        self.is_done.apply_to(&mut task.is_done, || false);
    }
}
