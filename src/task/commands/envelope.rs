//! Wire form of interpreter actions.
//!
//! The interpreter is untrusted. Every field arrives as optional text and is
//! checked here before a typed [`Action`] exists, so a malformed envelope
//! never reaches the reducer.

use super::{Action, NewSubtask, NewTask};
use crate::task::domain::{
    Priority, Subtask, SubtaskId, Task, TaskData, TaskDomainError, TaskFilter, TaskId, TaskStatus,
    TaskType, parse_due_date,
};
use serde::{Deserialize, Serialize};

/// `{kind, payload}` envelope as produced by the interpreter.
///
/// The discriminant is read from `db_action`, or `kind` as an alias.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionEnvelope {
    /// Action discriminant: `create`, `update`, `delete`, or `query`.
    #[serde(default, alias = "kind", skip_serializing_if = "Option::is_none")]
    pub db_action: Option<String>,
    /// Task payload for `create` and `update`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<TaskPayload>,
    /// Target for `delete`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    /// Filter for `query`; absent clears the filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<FilterPayload>,
    /// Failure reported by the interpreter instead of an action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Task fields inside an envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPayload {
    /// Task identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Task title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Task type.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub task_type: Option<String>,
    /// Due date, date-only or a datetime whose date part is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    /// Status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Priority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    /// Subtasks in order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtasks: Option<Vec<SubtaskPayload>>,
}

/// Subtask fields inside an envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtaskPayload {
    /// Subtask identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Subtask title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Completion flag.
    #[serde(
        default,
        rename = "isCompleted",
        alias = "is_completed",
        skip_serializing_if = "Option::is_none"
    )]
    pub is_completed: Option<bool>,
}

/// Filter fields inside a `query` envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterPayload {
    /// Task type filter.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub task_type: Option<String>,
    /// Status filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl ActionEnvelope {
    /// Decodes an envelope from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::MalformedPayload`] when the text is not a
    /// JSON object of the expected shape.
    pub fn from_json(raw: &str) -> Result<Self, TaskDomainError> {
        serde_json::from_str(raw).map_err(|err| TaskDomainError::MalformedPayload(err.to_string()))
    }

    /// Validates the envelope and converts it into a typed action.
    ///
    /// # Errors
    ///
    /// Returns a [`TaskDomainError`] when the discriminant is missing or
    /// unknown, a required field is absent, or an enum value is outside its
    /// closed set.
    pub fn into_action(self) -> Result<Action, TaskDomainError> {
        let kind = self
            .db_action
            .as_deref()
            .map(|raw| raw.trim().to_ascii_lowercase())
            .ok_or(TaskDomainError::MissingField("db_action"))?;
        match kind.as_str() {
            "create" => {
                let payload = self.task.ok_or(TaskDomainError::MissingField("task"))?;
                Ok(Action::Create(payload.into_new_task()?))
            }
            "update" => {
                let payload = self.task.ok_or(TaskDomainError::MissingField("task"))?;
                Ok(Action::Update(payload.into_task()?))
            }
            "delete" => {
                let raw_id = self
                    .task_id
                    .or_else(|| self.task.and_then(|task| task.id))
                    .ok_or(TaskDomainError::MissingField("task_id"))?;
                Ok(Action::Delete(TaskId::new(raw_id)?))
            }
            "query" => Ok(Action::Query(
                self.filters.map(FilterPayload::into_filter).transpose()?.flatten(),
            )),
            other => Err(TaskDomainError::UnknownAction(other.to_owned())),
        }
    }
}

impl TaskPayload {
    fn task_type(&self) -> Result<TaskType, TaskDomainError> {
        let raw = self
            .task_type
            .as_deref()
            .ok_or(TaskDomainError::MissingField("type"))?;
        Ok(TaskType::try_from(raw)?)
    }

    fn into_new_task(self) -> Result<NewTask, TaskDomainError> {
        let task_type = self.task_type()?;
        let title = self.title.ok_or(TaskDomainError::MissingField("title"))?;
        let mut new_task = NewTask::new(title, task_type);
        if let Some(raw_id) = self.id {
            new_task = new_task.with_id(TaskId::new(raw_id)?);
        }
        let due_date = self.due_date.as_deref().map(parse_due_date).transpose()?;
        let status = self
            .status
            .as_deref()
            .map(TaskStatus::try_from)
            .transpose()?;
        // Daily tasks are pinned to today and start pending.
        if task_type != TaskType::Daily {
            if let Some(date) = due_date {
                new_task = new_task.with_due_date(date);
            }
            if let Some(initial) = status {
                new_task = new_task.with_status(initial);
            }
        }
        if let Some(raw_priority) = self.priority.as_deref() {
            new_task = new_task.with_priority(Priority::try_from(raw_priority)?);
        }
        let subtasks = self
            .subtasks
            .unwrap_or_default()
            .into_iter()
            .map(SubtaskPayload::into_new_subtask)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(new_task.with_subtasks(subtasks))
    }

    fn into_task(self) -> Result<Task, TaskDomainError> {
        let task_type = self.task_type()?;
        let id = TaskId::new(self.id.ok_or(TaskDomainError::MissingField("id"))?)?;
        let title = self.title.ok_or(TaskDomainError::MissingField("title"))?;
        let due_date = parse_due_date(
            self.due_date
                .as_deref()
                .ok_or(TaskDomainError::MissingField("due_date"))?,
        )?;
        let status = self
            .status
            .as_deref()
            .map(TaskStatus::try_from)
            .transpose()?
            .unwrap_or_default();
        let priority = self
            .priority
            .as_deref()
            .map(Priority::try_from)
            .transpose()?
            .unwrap_or_default();
        let subtasks = self
            .subtasks
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(index, payload)| payload.into_subtask(&id, index.saturating_add(1)))
            .collect::<Result<Vec<_>, _>>()?;
        Task::from_data(TaskData {
            id,
            title,
            task_type,
            due_date,
            status,
            priority,
            subtasks,
        })
    }
}

impl SubtaskPayload {
    fn into_new_subtask(self) -> Result<NewSubtask, TaskDomainError> {
        let title = self
            .title
            .ok_or(TaskDomainError::MissingField("subtasks.title"))?;
        let mut subtask = NewSubtask::new(title).completed(self.is_completed.unwrap_or(false));
        if let Some(raw_id) = self.id {
            subtask = subtask.with_id(SubtaskId::new(raw_id)?);
        }
        Ok(subtask)
    }

    fn into_subtask(self, task_id: &TaskId, position: usize) -> Result<Subtask, TaskDomainError> {
        let id = match self.id {
            Some(raw_id) => SubtaskId::new(raw_id)?,
            None => SubtaskId::derived(task_id, position),
        };
        let title = self
            .title
            .ok_or(TaskDomainError::MissingField("subtasks.title"))?;
        Subtask::new(id, title, self.is_completed.unwrap_or(false))
    }
}

impl FilterPayload {
    fn into_filter(self) -> Result<Option<TaskFilter>, TaskDomainError> {
        let task_type = self
            .task_type
            .as_deref()
            .map(TaskType::try_from)
            .transpose()?;
        let status = self
            .status
            .as_deref()
            .map(TaskStatus::try_from)
            .transpose()?;
        if task_type.is_none() && status.is_none() {
            return Ok(None);
        }
        Ok(Some(TaskFilter { task_type, status }))
    }
}
