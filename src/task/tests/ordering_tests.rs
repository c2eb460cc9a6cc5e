//! Display ordering.

use super::support::{date, ids, task, ymd};
use crate::task::domain::{Priority, Task, TaskStatus, TaskType, compare_tasks, sort_for_display};
use chrono::NaiveDate;
use rstest::{fixture, rstest};
use std::cmp::Ordering;

#[fixture]
fn today() -> NaiveDate {
    date(2024, 6, 5)
}

fn sorted(tasks: &[Task], today: NaiveDate) -> Vec<String> {
    let mut refs: Vec<&Task> = tasks.iter().collect();
    sort_for_display(&mut refs, today);
    ids(&refs)
}

#[rstest]
fn onetime_priority_dominates_due_date(today: NaiveDate) {
    let tasks = vec![
        task("A", TaskType::OneTime, ymd("2024-06-01"))
            .priority(Priority::Low)
            .build(),
        task("B", TaskType::OneTime, ymd("2024-06-10"))
            .priority(Priority::High)
            .build(),
    ];

    assert_eq!(sorted(&tasks, today), ["B", "A"]);
}

#[rstest]
fn pending_precedes_done(today: NaiveDate) {
    let tasks = vec![
        task("done-high", TaskType::OneTime, date(2024, 6, 1))
            .priority(Priority::High)
            .done()
            .build(),
        task("pending-low", TaskType::Weekly, date(2024, 6, 30))
            .priority(Priority::Low)
            .build(),
    ];

    assert_eq!(sorted(&tasks, today), ["pending-low", "done-high"]);
}

#[rstest]
fn overdue_recurring_task_precedes_higher_priority(today: NaiveDate) {
    let overdue = task("late", TaskType::Monthly, date(2024, 6, 1))
        .priority(Priority::Low)
        .build();
    let upcoming = task("soon", TaskType::Weekly, today)
        .priority(Priority::High)
        .build();

    assert_eq!(compare_tasks(&overdue, &upcoming, today), Ordering::Less);
    assert_eq!(compare_tasks(&upcoming, &overdue, today), Ordering::Greater);
}

#[rstest]
fn mixed_pair_uses_overdue_rule(today: NaiveDate) {
    let overdue_onetime = task("o", TaskType::OneTime, date(2024, 6, 1))
        .priority(Priority::Low)
        .build();
    let current_daily = task("d", TaskType::Daily, today)
        .priority(Priority::High)
        .build();

    assert_eq!(sorted(&[current_daily, overdue_onetime], today), ["o", "d"]);
}

#[rstest]
fn priority_then_earlier_date_among_current_tasks(today: NaiveDate) {
    let tasks = vec![
        task("med-late", TaskType::Weekly, date(2024, 6, 9)).build(),
        task("med-early", TaskType::Weekly, date(2024, 6, 6)).build(),
        task("high", TaskType::Monthly, date(2024, 6, 20))
            .priority(Priority::High)
            .build(),
    ];

    assert_eq!(sorted(&tasks, today), ["high", "med-early", "med-late"]);
}

#[rstest]
fn done_tasks_sort_latest_first(today: NaiveDate) {
    let tasks = vec![
        task("old", TaskType::OneTime, date(2024, 5, 1)).done().build(),
        task("new", TaskType::OneTime, date(2024, 6, 4)).done().build(),
        task("mid", TaskType::Weekly, date(2024, 5, 20)).done().build(),
    ];

    assert_eq!(sorted(&tasks, today), ["new", "mid", "old"]);
}

#[rstest]
fn ties_keep_insertion_order(today: NaiveDate) {
    let tasks = vec![
        task("first", TaskType::Weekly, date(2024, 6, 7)).build(),
        task("second", TaskType::Monthly, date(2024, 6, 7)).build(),
        task("third", TaskType::Weekly, date(2024, 6, 7)).build(),
    ];

    assert_eq!(sorted(&tasks, today), ["first", "second", "third"]);
}

#[rstest]
fn resorting_sorted_output_is_stable(today: NaiveDate) {
    let tasks = vec![
        task("a", TaskType::OneTime, date(2024, 6, 1)).done().build(),
        task("b", TaskType::Daily, today).build(),
        task("c", TaskType::Weekly, date(2024, 6, 3))
            .priority(Priority::Low)
            .build(),
        task("d", TaskType::OneTime, date(2024, 6, 30))
            .priority(Priority::High)
            .build(),
        task("e", TaskType::OneTime, date(2024, 6, 2)).build(),
        task("f", TaskType::Monthly, date(2024, 6, 1)).done().build(),
    ];

    let mut once: Vec<&Task> = tasks.iter().collect();
    sort_for_display(&mut once, today);
    let mut twice = once.clone();
    sort_for_display(&mut twice, today);

    assert_eq!(ids(&once), ids(&twice));
    let first_done = once
        .iter()
        .position(|t| t.status() == TaskStatus::Done)
        .expect("done tasks present");
    assert!(
        once.iter()
            .skip(first_done)
            .all(|t| t.status() == TaskStatus::Done)
    );
}
