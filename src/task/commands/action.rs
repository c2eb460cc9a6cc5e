//! Typed actions accepted by the reducer.

use crate::task::domain::{
    Priority, SubtaskId, Task, TaskFilter, TaskId, TaskStatus, TaskType,
};
use chrono::NaiveDate;

/// Request payload for creating a task.
///
/// Only the title and type are required; everything else is defaulted by the
/// reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub(crate) id: Option<TaskId>,
    pub(crate) title: String,
    pub(crate) task_type: TaskType,
    pub(crate) due_date: Option<NaiveDate>,
    pub(crate) status: Option<TaskStatus>,
    pub(crate) priority: Option<Priority>,
    pub(crate) subtasks: Vec<NewSubtask>,
}

impl NewTask {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(title: impl Into<String>, task_type: TaskType) -> Self {
        Self {
            id: None,
            title: title.into(),
            task_type,
            due_date: None,
            status: None,
            priority: None,
            subtasks: Vec::new(),
        }
    }

    /// Sets the identifier to use if it is still free.
    #[must_use]
    pub fn with_id(mut self, id: TaskId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the due date. Ignored for daily tasks.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets the initial status. Ignored for daily tasks.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the subtasks.
    #[must_use]
    pub fn with_subtasks(mut self, subtasks: impl IntoIterator<Item = NewSubtask>) -> Self {
        self.subtasks = subtasks.into_iter().collect();
        self
    }

    /// Returns the requested identifier, if any.
    #[must_use]
    pub const fn id(&self) -> Option<&TaskId> {
        self.id.as_ref()
    }

    /// Assigns `id` unless the request already names one.
    pub fn ensure_id(&mut self, id: impl FnOnce() -> TaskId) {
        if self.id.is_none() {
            self.id = Some(id());
        }
    }
}

/// Request payload for a new subtask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubtask {
    pub(crate) id: Option<SubtaskId>,
    pub(crate) title: String,
    pub(crate) is_completed: bool,
}

impl NewSubtask {
    /// Creates an unchecked subtask request.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            is_completed: false,
        }
    }

    /// Sets the identifier to use if it is still free.
    #[must_use]
    pub fn with_id(mut self, id: SubtaskId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the completion flag.
    #[must_use]
    pub const fn completed(mut self, is_completed: bool) -> Self {
        self.is_completed = is_completed;
        self
    }
}

/// A structured edit or query against the task list.
///
/// The first four variants are what the natural-language interpreter can
/// produce through an [`ActionEnvelope`](super::ActionEnvelope); the rest are
/// direct edits issued by the user interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Add a task.
    Create(NewTask),
    /// Replace the task with the same id wholesale.
    Update(Task),
    /// Remove a task. Absent ids are ignored.
    Delete(TaskId),
    /// Set or clear the active view filter.
    Query(Option<TaskFilter>),
    /// Flip a task between pending and done.
    ToggleStatus(TaskId),
    /// Move a non-daily task to another date.
    ChangeDueDate {
        /// Target task.
        id: TaskId,
        /// New due date.
        due_date: NaiveDate,
    },
    /// Change a task's priority.
    ChangePriority {
        /// Target task.
        id: TaskId,
        /// New priority.
        priority: Priority,
    },
    /// Append a subtask.
    AddSubtask {
        /// Parent task.
        task_id: TaskId,
        /// Subtask to add.
        subtask: NewSubtask,
    },
    /// Flip a subtask's completion flag.
    ToggleSubtask {
        /// Parent task.
        task_id: TaskId,
        /// Target subtask.
        subtask_id: SubtaskId,
    },
}

impl Action {
    /// Returns the wire name of the action kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Create(_) => "create",
            Self::Update(_) => "update",
            Self::Delete(_) => "delete",
            Self::Query(_) => "query",
            Self::ToggleStatus(_) => "toggle_status",
            Self::ChangeDueDate { .. } => "change_due_date",
            Self::ChangePriority { .. } => "change_priority",
            Self::AddSubtask { .. } => "add_subtask",
            Self::ToggleSubtask { .. } => "toggle_subtask",
        }
    }

    /// Returns `true` for actions that only touch view state.
    #[must_use]
    pub const fn is_view_only(&self) -> bool {
        matches!(self, Self::Query(_))
    }
}
