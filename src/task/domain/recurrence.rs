//! Rollover of stale recurring tasks.
//!
//! A recurring task is stale when its due date falls before the anchor date of
//! the current period. Rolling it over moves the due date to the anchor and
//! clears all completion state, so a weekly chore finished last week shows up
//! as pending again this Monday.

use super::{Task, TaskStatus, TaskType};
use chrono::{Datelike, Days, NaiveDate};

impl TaskType {
    /// Returns the start of the current period for this task type.
    ///
    /// - daily: `today`
    /// - weekly: the Monday on or before `today`
    /// - monthly: the first day of `today`'s month
    /// - one-time: `None`
    #[must_use]
    pub fn anchor_date(self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::Daily => Some(today),
            Self::Weekly => {
                let since_monday = u64::from(today.weekday().num_days_from_monday());
                today.checked_sub_days(Days::new(since_monday))
            }
            Self::Monthly => today.with_day(1),
            Self::OneTime => None,
        }
    }
}

impl Task {
    /// Returns `true` when the task's due date precedes its period anchor.
    #[must_use]
    pub fn is_stale(&self, today: NaiveDate) -> bool {
        self.task_type()
            .anchor_date(today)
            .is_some_and(|anchor| self.due_date() < anchor)
    }

    /// Rolls a stale task over to the current period.
    ///
    /// Returns `true` when the task changed.
    pub(crate) fn roll_over(&mut self, today: NaiveDate) -> bool {
        let Some(anchor) = self.task_type().anchor_date(today) else {
            return false;
        };
        if self.due_date() >= anchor {
            return false;
        }
        self.set_due_date(anchor);
        self.set_status(TaskStatus::Pending);
        for subtask in self.subtasks_mut() {
            subtask.set_completed(false);
        }
        true
    }
}

/// Rolls every stale recurring task over to the period containing `today`.
///
/// One-time tasks and tasks already inside the current period are returned
/// unchanged. Applying the function twice with the same `today` gives the
/// same result as applying it once.
#[must_use]
pub fn reset_stale(tasks: &[Task], today: NaiveDate) -> Vec<Task> {
    tasks
        .iter()
        .cloned()
        .map(|mut task| {
            task.roll_over(today);
            task
        })
        .collect()
}

/// In-place variant of [`reset_stale`] returning how many tasks rolled over.
pub fn reset_stale_in_place(tasks: &mut [Task], today: NaiveDate) -> usize {
    tasks
        .iter_mut()
        .map(|task| task.roll_over(today))
        .filter(|rolled| *rolled)
        .count()
}
