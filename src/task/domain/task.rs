//! Task aggregate and its closed value sets.

use super::{ParseValueError, SubtaskId, TaskDomainError, TaskId};
use chrono::{DateTime, Local, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Recurrence class of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    /// Repeats every calendar day.
    Daily,
    /// Repeats every ISO week, anchored on Monday.
    Weekly,
    /// Repeats every calendar month, anchored on the first day.
    Monthly,
    /// Never repeats.
    #[serde(rename = "onetime")]
    OneTime,
}

impl TaskType {
    /// All task types in display order.
    pub const ALL: [Self; 4] = [Self::Daily, Self::Weekly, Self::Monthly, Self::OneTime];

    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::OneTime => "onetime",
        }
    }

    /// Returns `true` for the types that roll over.
    #[must_use]
    pub const fn is_recurring(self) -> bool {
        match self {
            Self::Daily | Self::Weekly | Self::Monthly => true,
            Self::OneTime => false,
        }
    }
}

impl TryFrom<&str> for TaskType {
    type Error = ParseValueError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "onetime" | "one-time" | "one_time" => Ok(Self::OneTime),
            _ => Err(ParseValueError::new("task type", value)),
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Completion status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Still to do.
    #[default]
    Pending,
    /// Completed.
    Done,
}

impl TaskStatus {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Done => "done",
        }
    }

    /// Returns the opposite status.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Pending => Self::Done,
            Self::Done => Self::Pending,
        }
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseValueError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "done" => Ok(Self::Done),
            _ => Err(ParseValueError::new("task status", value)),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Can wait.
    Low,
    /// The default.
    #[default]
    Medium,
    /// Comes first.
    High,
}

impl Priority {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Ordering weight: high=3, medium=2, low=1.
    #[must_use]
    pub const fn weight(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }
}

impl TryFrom<&str> for Priority {
    type Error = ParseValueError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ParseValueError::new("priority", value)),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Display colour derived from due date and status.
///
/// Never stored; see [`Task::color`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskColor {
    /// Pending and overdue.
    Red,
    /// Everything else.
    Green,
}

/// Parses a due date in the local time zone, dropping any time of day.
///
/// See [`parse_due_date_in`].
///
/// # Errors
///
/// Returns [`TaskDomainError::InvalidDueDate`] when no calendar date can be
/// read.
pub fn parse_due_date(raw: &str) -> Result<NaiveDate, TaskDomainError> {
    parse_due_date_in(raw, &Local)
}

/// Parses a due date as seen from `zone`, dropping any time of day.
///
/// Accepts `YYYY-MM-DD` and datetime strings whose first segment is a date.
/// A datetime carrying an offset (`2024-05-19T22:00:00.000Z`) names an
/// instant and is converted to `zone` before the time is dropped. One
/// without an offset (`2024-05-20 08:00`) is already a wall-clock time and
/// is truncated as is.
///
/// # Errors
///
/// Returns [`TaskDomainError::InvalidDueDate`] when no calendar date can be
/// read.
pub fn parse_due_date_in<Tz: TimeZone>(
    raw: &str,
    zone: &Tz,
) -> Result<NaiveDate, TaskDomainError> {
    let trimmed = raw.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(instant.with_timezone(zone).date_naive());
    }
    let date_part = trimmed
        .split_once(['T', ' '])
        .map_or(trimmed, |(date, _)| date);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|_| TaskDomainError::InvalidDueDate(raw.to_owned()))
}

/// Checklist item nested under a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subtask {
    id: SubtaskId,
    title: String,
    is_completed: bool,
}

impl Subtask {
    /// Creates a subtask with a trimmed, non-empty title.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptySubtaskTitle`] if the title is blank.
    pub fn new(
        id: SubtaskId,
        title: impl Into<String>,
        is_completed: bool,
    ) -> Result<Self, TaskDomainError> {
        let raw = title.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptySubtaskTitle);
        }
        Ok(Self {
            id,
            title: trimmed.to_owned(),
            is_completed,
        })
    }

    /// Returns the subtask identifier.
    #[must_use]
    pub const fn id(&self) -> &SubtaskId {
        &self.id
    }

    /// Returns the subtask title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns whether the subtask is checked off.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.is_completed
    }

    pub(crate) const fn set_completed(&mut self, completed: bool) {
        self.is_completed = completed;
    }
}

/// Parameter object for building a [`Task`] from already-typed fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskData {
    /// Task identifier.
    pub id: TaskId,
    /// Title; trimmed and checked for emptiness.
    pub title: String,
    /// Recurrence class.
    pub task_type: TaskType,
    /// Calendar due date.
    pub due_date: NaiveDate,
    /// Completion status.
    pub status: TaskStatus,
    /// Priority.
    pub priority: Priority,
    /// Subtasks in insertion order.
    pub subtasks: Vec<Subtask>,
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id: TaskId,
    title: String,
    task_type: TaskType,
    due_date: NaiveDate,
    status: TaskStatus,
    priority: Priority,
    subtasks: Vec<Subtask>,
}

impl Task {
    /// Builds a validated task.
    ///
    /// Subtask ids that repeat within the task are replaced with the first
    /// free suffixed variant so the list keeps its order and length.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] if the title is blank.
    pub fn from_data(data: TaskData) -> Result<Self, TaskDomainError> {
        let trimmed = data.title.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }
        let mut subtasks: Vec<Subtask> = Vec::with_capacity(data.subtasks.len());
        for mut subtask in data.subtasks {
            subtask.id = subtask
                .id
                .first_free(|candidate| subtasks.iter().any(|s| s.id.as_str() == candidate));
            subtasks.push(subtask);
        }
        Ok(Self {
            id: data.id,
            title: trimmed.to_owned(),
            task_type: data.task_type,
            due_date: data.due_date,
            status: data.status,
            priority: data.priority,
            subtasks,
        })
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> &TaskId {
        &self.id
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the recurrence class.
    #[must_use]
    pub const fn task_type(&self) -> TaskType {
        self.task_type
    }

    /// Returns the due date.
    #[must_use]
    pub const fn due_date(&self) -> NaiveDate {
        self.due_date
    }

    /// Returns the completion status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the subtasks in insertion order.
    #[must_use]
    pub fn subtasks(&self) -> &[Subtask] {
        &self.subtasks
    }

    /// Returns `true` when the task is pending and due before `today`.
    #[must_use]
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status == TaskStatus::Pending && self.due_date < today
    }

    /// Derives the display colour for `today`.
    #[must_use]
    pub fn color(&self, today: NaiveDate) -> TaskColor {
        if self.is_overdue(today) {
            TaskColor::Red
        } else {
            TaskColor::Green
        }
    }

    /// Decomposes the task into its parameter object.
    #[must_use]
    pub fn into_data(self) -> TaskData {
        TaskData {
            id: self.id,
            title: self.title,
            task_type: self.task_type,
            due_date: self.due_date,
            status: self.status,
            priority: self.priority,
            subtasks: self.subtasks,
        }
    }

    pub(crate) const fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
    }

    pub(crate) const fn set_due_date(&mut self, due_date: NaiveDate) {
        self.due_date = due_date;
    }

    pub(crate) const fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
    }

    pub(crate) fn subtask_mut(&mut self, id: &SubtaskId) -> Option<&mut Subtask> {
        self.subtasks.iter_mut().find(|subtask| &subtask.id == id)
    }

    pub(crate) fn subtasks_mut(&mut self) -> impl Iterator<Item = &mut Subtask> {
        self.subtasks.iter_mut()
    }

    /// Appends a subtask, re-keying it if its id is already used here.
    pub(crate) fn push_subtask(&mut self, mut subtask: Subtask) -> SubtaskId {
        subtask.id = subtask
            .id
            .first_free(|candidate| self.subtasks.iter().any(|s| s.id.as_str() == candidate));
        let id = subtask.id.clone();
        self.subtasks.push(subtask);
        id
    }
}
