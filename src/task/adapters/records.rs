//! Wire records exchanged with the remote tabular store.
//!
//! Outgoing records are strictly typed. Incoming records are read leniently:
//! spreadsheet cells come back as numbers, datetimes, or JSON-in-a-string, and
//! all of that is sanitized here before a [`Task`] exists.

use crate::task::{
    domain::{
        Priority, Subtask, SubtaskId, Task, TaskData, TaskDomainError, TaskId, TaskStatus,
        TaskType, parse_due_date,
    },
    ports::{RemoteStoreError, RemoteStoreResult},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outgoing task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Task identifier.
    pub id: String,
    /// Task title.
    pub title: String,
    /// Task type.
    #[serde(rename = "type")]
    pub task_type: TaskType,
    /// Date-only due date (`YYYY-MM-DD`).
    pub due_date: String,
    /// Status.
    pub status: TaskStatus,
    /// Priority.
    pub priority: Priority,
    /// Subtasks in order.
    pub subtasks: Vec<SubtaskRecord>,
}

/// Outgoing subtask record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtaskRecord {
    /// Subtask identifier.
    pub id: String,
    /// Subtask title.
    pub title: String,
    /// Completion flag.
    #[serde(rename = "isCompleted")]
    pub is_completed: bool,
}

impl From<&Task> for TaskRecord {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id().to_string(),
            title: task.title().to_owned(),
            task_type: task.task_type(),
            due_date: task.due_date().format("%Y-%m-%d").to_string(),
            status: task.status(),
            priority: task.priority(),
            subtasks: task
                .subtasks()
                .iter()
                .map(|subtask| SubtaskRecord {
                    id: subtask.id().to_string(),
                    title: subtask.title().to_owned(),
                    is_completed: subtask.is_completed(),
                })
                .collect(),
        }
    }
}

/// Full-replace write request: `{"action": "sync", "tasks": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncRequest {
    action: &'static str,
    tasks: Vec<TaskRecord>,
}

impl SyncRequest {
    /// Builds the request for a task set.
    #[must_use]
    pub fn new(tasks: &[Task]) -> Self {
        Self {
            action: "sync",
            tasks: tasks.iter().map(TaskRecord::from).collect(),
        }
    }
}

/// Incoming task record as read from the store.
///
/// Any `color` column is ignored; colour is derived, never read back.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTaskRecord {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    title: Option<Value>,
    #[serde(default, rename = "type")]
    task_type: Option<String>,
    #[serde(default)]
    due_date: Option<Value>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    priority: Option<String>,
    #[serde(default)]
    subtasks: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RawSubtaskRecord {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default, rename = "isCompleted", alias = "is_completed")]
    is_completed: Option<bool>,
}

impl RawTaskRecord {
    /// Sanitizes the record into a task.
    ///
    /// Missing priority defaults to medium and missing status to pending. A
    /// malformed subtasks field becomes an empty list.
    ///
    /// # Errors
    ///
    /// Returns a [`TaskDomainError`] when the id, title, type, or due date
    /// is missing or malformed, or an enum value is outside its set.
    pub fn into_task(self) -> Result<Task, TaskDomainError> {
        let id = TaskId::new(
            self.id
                .as_ref()
                .and_then(cell_text)
                .ok_or(TaskDomainError::MissingField("id"))?,
        )?;
        let title = self
            .title
            .as_ref()
            .and_then(cell_text)
            .ok_or(TaskDomainError::MissingField("title"))?;
        let task_type = TaskType::try_from(
            self.task_type
                .as_deref()
                .ok_or(TaskDomainError::MissingField("type"))?,
        )?;
        let due_date = parse_due_date(
            &self
                .due_date
                .as_ref()
                .and_then(cell_text)
                .ok_or(TaskDomainError::MissingField("due_date"))?,
        )?;
        let status = non_blank(self.status.as_deref())
            .map(TaskStatus::try_from)
            .transpose()?
            .unwrap_or_default();
        let priority = non_blank(self.priority.as_deref())
            .map(Priority::try_from)
            .transpose()?
            .unwrap_or_default();
        let subtasks = parse_subtasks(self.subtasks, &id);
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

#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum LoadResponse {
    Success {
        #[serde(default)]
        data: Vec<RawTaskRecord>,
    },
    Error {
        #[serde(default)]
        message: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
struct Acknowledgement {
    status: String,
    #[serde(default)]
    message: Option<String>,
}

/// Decodes a read reply into tasks.
///
/// # Errors
///
/// Returns [`RemoteStoreError::Parse`] for an undecodable body or a record
/// that cannot be sanitized, and [`RemoteStoreError::Rejected`] for an
/// explicit error reply.
pub fn decode_load_response(body: &str) -> RemoteStoreResult<Vec<Task>> {
    let response: LoadResponse = serde_json::from_str(body)
        .map_err(|err| RemoteStoreError::Parse(format!("invalid load reply: {err}")))?;
    match response {
        LoadResponse::Success { data } => data
            .into_iter()
            .enumerate()
            .map(|(row, record)| {
                record
                    .into_task()
                    .map_err(|err| RemoteStoreError::Parse(format!("record {row}: {err}")))
            })
            .collect(),
        LoadResponse::Error { message } => Err(RemoteStoreError::Rejected(
            message.unwrap_or_else(|| "unknown error".to_owned()),
        )),
    }
}

/// Checks a write acknowledgement.
///
/// Only an explicit `{"status": "error"}` counts as failure; bodies that are
/// not JSON are accepted, since the write already reached the store.
///
/// # Errors
///
/// Returns [`RemoteStoreError::Rejected`] for an explicit error reply.
pub fn check_acknowledgement(body: &str) -> RemoteStoreResult<()> {
    match serde_json::from_str::<Acknowledgement>(body) {
        Ok(ack) if ack.status.eq_ignore_ascii_case("error") => Err(RemoteStoreError::Rejected(
            ack.message.unwrap_or_else(|| "unknown error".to_owned()),
        )),
        Ok(_) => Ok(()),
        Err(err) => {
            tracing::debug!(error = %err, "write acknowledgement is not JSON; assuming success");
            Ok(())
        }
    }
}

fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}

fn parse_subtasks(raw: Option<Value>, task_id: &TaskId) -> Vec<Subtask> {
    let value = match raw {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::String(text)) if text.trim().is_empty() => return Vec::new(),
        Some(Value::String(text)) => match serde_json::from_str::<Value>(&text) {
            Ok(decoded) => decoded,
            Err(err) => {
                tracing::warn!(task_id = %task_id, error = %err, "unparsable subtasks; using empty list");
                return Vec::new();
            }
        },
        Some(other) => other,
    };
    let records: Vec<RawSubtaskRecord> = match serde_json::from_value(value) {
        Ok(records) => records,
        Err(err) => {
            tracing::warn!(task_id = %task_id, error = %err, "malformed subtasks; using empty list");
            return Vec::new();
        }
    };
    let converted: Result<Vec<Subtask>, TaskDomainError> = records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            let id = match record.id.as_ref().and_then(cell_text) {
                Some(text) => SubtaskId::new(text)?,
                None => SubtaskId::derived(task_id, index.saturating_add(1)),
            };
            Subtask::new(
                id,
                record.title.unwrap_or_default(),
                record.is_completed.unwrap_or(false),
            )
        })
        .collect();
    converted.unwrap_or_else(|err| {
        tracing::warn!(task_id = %task_id, error = %err, "invalid subtask; using empty list");
        Vec::new()
    })
}
