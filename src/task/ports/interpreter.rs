//! Port for the natural-language interpreter.

use crate::task::{
    commands::ActionEnvelope,
    domain::{Task, TaskType},
};
use async_trait::async_trait;
use thiserror::Error;

/// Turns free text into one action envelope.
///
/// Implementations are untrusted: whatever they return is validated before it
/// reaches the reducer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommandInterpreter: Send + Sync {
    /// Interprets `text` against the current task snapshot.
    ///
    /// `active_type` is the task type the user is currently viewing, if any.
    ///
    /// # Errors
    ///
    /// Returns [`InterpreterError`] when no envelope can be produced.
    async fn interpret(
        &self,
        text: &str,
        snapshot: &[Task],
        active_type: Option<TaskType>,
    ) -> Result<ActionEnvelope, InterpreterError>;
}

/// Interpreter failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InterpreterError {
    /// The interpreter could not be reached or failed internally.
    #[error("interpreter unavailable: {0}")]
    Unavailable(String),

    /// The interpreter answered with an error string instead of an action.
    #[error("interpreter reported: {0}")]
    Reported(String),
}
