//! Builders and a fixed clock shared by the task unit tests.

use crate::task::domain::{
    Priority, Subtask, SubtaskId, Task, TaskData, TaskId, TaskStatus, TaskType,
};
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use mockable::Clock;
use std::sync::Mutex;

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}

pub(super) fn ymd(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("valid YYYY-MM-DD date")
}

/// Clock pinned to noon local time on a settable calendar day.
#[derive(Debug)]
pub(super) struct FixedClock {
    today: Mutex<NaiveDate>,
}

impl FixedClock {
    pub(super) const fn on(today: NaiveDate) -> Self {
        Self {
            today: Mutex::new(today),
        }
    }

    pub(super) fn set(&self, today: NaiveDate) {
        *self.today.lock().expect("clock lock") = today;
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        let today = *self.today.lock().expect("clock lock");
        let noon = today.and_hms_opt(12, 0, 0).expect("valid time of day");
        Local
            .from_local_datetime(&noon)
            .earliest()
            .expect("noon exists in local time")
    }

    fn utc(&self) -> DateTime<Utc> {
        self.local().with_timezone(&Utc)
    }
}

/// Fluent builder over [`TaskData`] with test-friendly defaults.
pub(super) struct TaskBuilder {
    data: TaskData,
}

pub(super) fn task(id: &str, task_type: TaskType, due_date: NaiveDate) -> TaskBuilder {
    TaskBuilder {
        data: TaskData {
            id: TaskId::new(id).expect("valid task id"),
            title: format!("task {id}"),
            task_type,
            due_date,
            status: TaskStatus::Pending,
            priority: Priority::Medium,
            subtasks: Vec::new(),
        },
    }
}

impl TaskBuilder {
    pub(super) fn title(mut self, title: &str) -> Self {
        title.clone_into(&mut self.data.title);
        self
    }

    pub(super) const fn status(mut self, status: TaskStatus) -> Self {
        self.data.status = status;
        self
    }

    pub(super) const fn done(self) -> Self {
        self.status(TaskStatus::Done)
    }

    pub(super) const fn priority(mut self, priority: Priority) -> Self {
        self.data.priority = priority;
        self
    }

    pub(super) fn subtask(mut self, id: &str, title: &str, completed: bool) -> Self {
        let subtask = Subtask::new(SubtaskId::new(id).expect("valid subtask id"), title, completed)
            .expect("valid subtask");
        self.data.subtasks.push(subtask);
        self
    }

    pub(super) fn build(self) -> Task {
        Task::from_data(self.data).expect("valid task")
    }
}

pub(super) fn ids(tasks: &[&Task]) -> Vec<String> {
    tasks.iter().map(|task| task.id().to_string()).collect()
}
