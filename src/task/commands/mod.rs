//! Command reducer for task edits and queries.
//!
//! Actions arrive either as typed [`Action`] values from the user interface or
//! as untrusted [`ActionEnvelope`] JSON from the natural-language interpreter.
//! Both end in [`apply`], which is pure: it never touches its input and never
//! applies half an action.

mod action;
mod envelope;
mod reducer;

pub use action::{Action, NewSubtask, NewTask};
pub use envelope::{ActionEnvelope, FilterPayload, SubtaskPayload, TaskPayload};
pub use reducer::{CommandError, CommandResult, TaskList, apply};
