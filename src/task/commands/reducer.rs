//! Pure reducer applying actions to a task list.

use super::{Action, NewSubtask, NewTask};
use crate::task::domain::{
    Priority, Subtask, SubtaskId, Task, TaskData, TaskDomainError, TaskId, TaskStatus, TaskType,
    ViewState,
};
use chrono::NaiveDate;
use thiserror::Error;

/// Errors returned by [`apply`]. The input list is never modified.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommandError {
    /// The action or its payload failed validation.
    #[error(transparent)]
    Validation(#[from] TaskDomainError),

    /// No task has the target id.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The task exists but has no subtask with the target id.
    #[error("subtask {subtask_id} not found in task {task_id}")]
    SubtaskNotFound {
        /// Parent task.
        task_id: TaskId,
        /// Missing subtask.
        subtask_id: SubtaskId,
    },
}

/// Result type for reducer operations.
pub type CommandResult<T> = Result<T, CommandError>;

/// The task set together with its view state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskList {
    tasks: Vec<Task>,
    view: ViewState,
}

impl TaskList {
    /// Creates a list with no active filter.
    ///
    /// Repeated ids are re-keyed with the first free suffixed variant so the
    /// uniqueness invariant holds from the start.
    #[must_use]
    pub fn new(tasks: Vec<Task>) -> Self {
        let mut unique: Vec<Task> = Vec::with_capacity(tasks.len());
        for task in tasks {
            let free = task
                .id()
                .first_free(|candidate| unique.iter().any(|t| t.id().as_str() == candidate));
            if &free == task.id() {
                unique.push(task);
            } else {
                tracing::warn!(original = %task.id(), replacement = %free, "re-keyed duplicate task id");
                let mut data = task.into_data();
                data.id = free;
                if let Ok(rekeyed) = Task::from_data(data) {
                    unique.push(rekeyed);
                }
            }
        }
        Self {
            tasks: unique,
            view: ViewState::default(),
        }
    }

    /// Returns the tasks in insertion order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Returns the view state.
    #[must_use]
    pub const fn view(&self) -> &ViewState {
        &self.view
    }

    /// Looks a task up by id.
    #[must_use]
    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == id)
    }

    /// Replaces the task set, keeping the view state.
    #[must_use]
    pub fn with_tasks(&self, tasks: Vec<Task>) -> Self {
        Self {
            view: self.view,
            ..Self::new(tasks)
        }
    }

    fn contains_id(&self, candidate: &str) -> bool {
        self.tasks.iter().any(|task| task.id().as_str() == candidate)
    }

    fn task_mut(&mut self, id: &TaskId) -> CommandResult<&mut Task> {
        self.tasks
            .iter_mut()
            .find(|task| task.id() == id)
            .ok_or_else(|| CommandError::TaskNotFound(id.clone()))
    }
}

/// Applies `action` to `list` as of `today`, returning the next list.
///
/// Deterministic: the same inputs always give structurally equal results.
///
/// # Errors
///
/// Returns [`CommandError::Validation`] for malformed payloads and
/// [`CommandError::TaskNotFound`] or [`CommandError::SubtaskNotFound`] when a
/// target is absent. Deleting an absent id is not an error.
pub fn apply(list: &TaskList, action: &Action, today: NaiveDate) -> CommandResult<TaskList> {
    let mut next = list.clone();
    match action {
        Action::Create(new_task) => {
            let task = build_task(list, new_task, today)?;
            next.tasks.push(task);
        }
        Action::Update(task) => {
            let slot = next.task_mut(task.id())?;
            *slot = task.clone();
        }
        Action::Delete(id) => next.tasks.retain(|task| task.id() != id),
        Action::Query(filter) => next.view = ViewState::new(*filter),
        Action::ToggleStatus(id) => {
            let task = next.task_mut(id)?;
            task.set_status(task.status().toggled());
        }
        Action::ChangeDueDate { id, due_date } => {
            let task = next.task_mut(id)?;
            if task.task_type() == TaskType::Daily {
                return Err(TaskDomainError::DailyDatePinned.into());
            }
            task.set_due_date(*due_date);
        }
        Action::ChangePriority { id, priority } => next.task_mut(id)?.set_priority(*priority),
        Action::AddSubtask { task_id, subtask } => {
            let task = next.task_mut(task_id)?;
            let position = task.subtasks().len().saturating_add(1);
            let built = build_subtask(task_id, subtask, position)?;
            task.push_subtask(built);
        }
        Action::ToggleSubtask {
            task_id,
            subtask_id,
        } => {
            let subtask = next.task_mut(task_id)?.subtask_mut(subtask_id).ok_or_else(|| {
                CommandError::SubtaskNotFound {
                    task_id: task_id.clone(),
                    subtask_id: subtask_id.clone(),
                }
            })?;
            subtask.set_completed(!subtask.is_completed());
        }
    }
    Ok(next)
}

fn build_task(list: &TaskList, new_task: &NewTask, today: NaiveDate) -> CommandResult<Task> {
    let requested = match &new_task.id {
        Some(id) => id.clone(),
        None => TaskId::new(format!("task-{}", list.tasks.len().saturating_add(1)))?,
    };
    let id = requested.first_free(|candidate| list.contains_id(candidate));

    let (due_date, status) = match new_task.task_type {
        TaskType::Daily => (today, TaskStatus::Pending),
        task_type @ (TaskType::Weekly | TaskType::Monthly | TaskType::OneTime) => (
            new_task
                .due_date
                .ok_or(TaskDomainError::MissingDueDate(task_type))?,
            new_task.status.unwrap_or_default(),
        ),
    };

    let subtasks = new_task
        .subtasks
        .iter()
        .enumerate()
        .map(|(index, subtask)| build_subtask(&id, subtask, index.saturating_add(1)))
        .collect::<CommandResult<Vec<_>>>()?;

    Ok(Task::from_data(TaskData {
        id,
        title: new_task.title.clone(),
        task_type: new_task.task_type,
        due_date,
        status,
        priority: new_task.priority.unwrap_or(Priority::Medium),
        subtasks,
    })?)
}

fn build_subtask(task_id: &TaskId, subtask: &NewSubtask, position: usize) -> CommandResult<Subtask> {
    let id = subtask
        .id
        .clone()
        .unwrap_or_else(|| SubtaskId::derived(task_id, position));
    Ok(Subtask::new(id, subtask.title.clone(), subtask.is_completed)?)
}
