//! Read-only views over the task set.

use super::{Task, TaskStatus, TaskType, sort_for_display};
use chrono::NaiveDate;

/// Active list filter. Absent fields match everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskFilter {
    /// Restrict to one task type.
    pub task_type: Option<TaskType>,
    /// Restrict to one status.
    pub status: Option<TaskStatus>,
}

impl TaskFilter {
    /// Filter on task type only.
    #[must_use]
    pub const fn by_type(task_type: TaskType) -> Self {
        Self {
            task_type: Some(task_type),
            status: None,
        }
    }

    /// Filter on status only.
    #[must_use]
    pub const fn by_status(status: TaskStatus) -> Self {
        Self {
            task_type: None,
            status: Some(status),
        }
    }

    /// Returns `true` when `task` passes the filter.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.task_type.is_none_or(|t| task.task_type() == t)
            && self.status.is_none_or(|s| task.status() == s)
    }
}

/// View state changed by query actions. Not part of the persisted task set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewState {
    filter: Option<TaskFilter>,
}

impl ViewState {
    /// Creates a view with the given filter.
    #[must_use]
    pub const fn new(filter: Option<TaskFilter>) -> Self {
        Self { filter }
    }

    /// Returns the active filter, if any.
    #[must_use]
    pub const fn filter(&self) -> Option<TaskFilter> {
        self.filter
    }

    /// Returns the task type the user is looking at, if any.
    #[must_use]
    pub fn active_type(&self) -> Option<TaskType> {
        self.filter.and_then(|filter| filter.task_type)
    }
}

/// Returns the tasks visible under `view`, sorted for display.
#[must_use]
pub fn visible_tasks<'a>(tasks: &'a [Task], view: &ViewState, today: NaiveDate) -> Vec<&'a Task> {
    let mut visible: Vec<&Task> = tasks
        .iter()
        .filter(|task| view.filter().is_none_or(|filter| filter.matches(task)))
        .collect();
    sort_for_display(&mut visible, today);
    visible
}

/// Returns the pending tasks due exactly on `today`.
///
/// This is the set the notification collaborator alerts on.
#[must_use]
pub fn due_today(tasks: &[Task], today: NaiveDate) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|task| task.status() == TaskStatus::Pending && task.due_date() == today)
        .collect()
}

/// Counts pending tasks.
#[must_use]
pub fn pending_count(tasks: &[Task]) -> usize {
    tasks
        .iter()
        .filter(|task| task.status() == TaskStatus::Pending)
        .count()
}
