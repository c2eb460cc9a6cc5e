//! Display ordering for task lists.

use super::{Task, TaskStatus, TaskType};
use chrono::NaiveDate;
use std::cmp::{Ordering, Reverse};

/// Compares two tasks for display relative to `today`.
///
/// Rules, applied until one discriminates:
///
/// 1. Pending before done.
/// 2. Two done tasks: later due date first.
/// 3. Two pending one-time tasks: higher priority first, then earlier due
///    date. Priority dominates the date.
/// 4. Any other pending pair: overdue first, then higher priority, then
///    earlier due date.
///
/// Ties compare equal so a stable sort keeps insertion order.
#[must_use]
pub fn compare_tasks(a: &Task, b: &Task, today: NaiveDate) -> Ordering {
    match (a.status(), b.status()) {
        (TaskStatus::Pending, TaskStatus::Done) => Ordering::Less,
        (TaskStatus::Done, TaskStatus::Pending) => Ordering::Greater,
        (TaskStatus::Done, TaskStatus::Done) => b.due_date().cmp(&a.due_date()),
        (TaskStatus::Pending, TaskStatus::Pending) => compare_pending(a, b, today),
    }
}

fn compare_pending(a: &Task, b: &Task, today: NaiveDate) -> Ordering {
    let priority_then_date = |x: &Task| (Reverse(x.priority().weight()), x.due_date());
    if a.task_type() == TaskType::OneTime && b.task_type() == TaskType::OneTime {
        return priority_then_date(a).cmp(&priority_then_date(b));
    }
    let overdue_first = |x: &Task| Reverse(x.due_date() < today);
    overdue_first(a)
        .cmp(&overdue_first(b))
        .then_with(|| priority_then_date(a).cmp(&priority_then_date(b)))
}

/// Sorts tasks in place for display. Stable.
pub fn sort_for_display(tasks: &mut [&Task], today: NaiveDate) {
    tasks.sort_by(|a, b| compare_tasks(a, b, today));
}
