//! Identifier types for tasks and subtasks.
//!
//! Identifiers are opaque strings. Records that arrive from the remote store
//! or the interpreter may carry ids in any shape, so the only structural rule
//! is that an id is non-empty after trimming.

use super::TaskDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a task within the task set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Creates a validated task identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTaskId`] when the value is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyTaskId);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Creates a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the first identifier derived from this one that `is_taken`
    /// rejects, using `-2`, `-3`, ... suffixes.
    ///
    /// Returns a clone of `self` when it is not taken.
    #[must_use]
    pub fn first_free(&self, is_taken: impl Fn(&str) -> bool) -> Self {
        Self(first_free_suffix(&self.0, is_taken))
    }
}

impl AsRef<str> for TaskId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier for a subtask, unique within its parent task.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubtaskId(String);

impl SubtaskId {
    /// Creates a validated subtask identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptySubtaskId`] when the value is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptySubtaskId);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Derives the identifier of the `position`-th subtask (1-based) of a task
    /// when the payload did not name one.
    #[must_use]
    pub fn derived(task_id: &TaskId, position: usize) -> Self {
        Self(format!("{task_id}-s{position}"))
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the first free variant of this identifier, see
    /// [`TaskId::first_free`].
    #[must_use]
    pub fn first_free(&self, is_taken: impl Fn(&str) -> bool) -> Self {
        Self(first_free_suffix(&self.0, is_taken))
    }
}

impl AsRef<str> for SubtaskId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for SubtaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn first_free_suffix(base: &str, is_taken: impl Fn(&str) -> bool) -> String {
    if !is_taken(base) {
        return base.to_owned();
    }
    (2_u64..)
        .map(|n| format!("{base}-{n}"))
        .find(|candidate| !is_taken(candidate))
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}
