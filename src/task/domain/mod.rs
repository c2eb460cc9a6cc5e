//! Domain model for the task state engine.
//!
//! The domain holds the task aggregate, the rollover rules for recurring
//! tasks, and display ordering. Everything here is pure: no I/O, no clocks,
//! callers pass "today" in explicitly.

mod error;
mod ids;
mod ordering;
mod recurrence;
mod task;
mod view;

pub use error::{ParseValueError, TaskDomainError};
pub use ids::{SubtaskId, TaskId};
pub use ordering::{compare_tasks, sort_for_display};
pub use recurrence::{reset_stale, reset_stale_in_place};
pub use task::{
    Priority, Subtask, Task, TaskColor, TaskData, TaskStatus, TaskType, parse_due_date,
    parse_due_date_in,
};
pub use view::{TaskFilter, ViewState, due_today, pending_count, visible_tasks};
