//! Error types for task domain validation and parsing.

use super::TaskType;
use thiserror::Error;

/// Errors returned while constructing or validating domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task identifier is blank.
    #[error("task id must not be empty")]
    EmptyTaskId,

    /// The subtask identifier is blank.
    #[error("subtask id must not be empty")]
    EmptySubtaskId,

    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The subtask title is empty after trimming.
    #[error("subtask title must not be empty")]
    EmptySubtaskTitle,

    /// A closed enumeration received a value outside its set.
    #[error(transparent)]
    InvalidValue(#[from] ParseValueError),

    /// The due date could not be read as a calendar date.
    #[error("invalid due date '{0}', expected YYYY-MM-DD")]
    InvalidDueDate(String),

    /// A task type that requires an explicit due date was given none.
    #[error("{0} tasks require a due date")]
    MissingDueDate(TaskType),

    /// Daily tasks are pinned to the current date.
    #[error("the due date of a daily task cannot be changed")]
    DailyDatePinned,

    /// A required payload field is absent.
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    /// The action discriminant is absent or unknown.
    #[error("unknown action kind: {0}")]
    UnknownAction(String),

    /// The payload could not be decoded at all.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

/// Error returned while parsing a closed enumeration from text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {field}: {value}")]
pub struct ParseValueError {
    /// Name of the enumeration being parsed.
    pub field: &'static str,
    /// The rejected input.
    pub value: String,
}

impl ParseValueError {
    pub(crate) fn new(field: &'static str, value: &str) -> Self {
        Self {
            field,
            value: value.to_owned(),
        }
    }
}
