use crate::runnable::Runnable;
use chrono::{Local, TimeZone};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// How a task is re-armed after it runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TaskKind {
    /// Runs every `frequency` seconds until removed
    Repeated,
    /// Runs once, then is removed from the registry
    OneShot,
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskKind::Repeated => f.write_str("Repeated"),
            TaskKind::OneShot => f.write_str("One-Shot"),
        }
    }
}

/// A registered task, owned by the registry
pub(crate) struct TaskRecord {
    /// Registry-unique identity, never reused
    pub(crate) id: u64,
    pub(crate) name: String,
    pub(crate) runnable: Arc<dyn Runnable>,
    pub(crate) kind: TaskKind,
    /// Seconds between runs, 0 for one-shot tasks
    pub(crate) frequency: u64,
    /// Unix seconds at which the task becomes eligible
    pub(crate) next_due: i64,
    /// Generation of the last sweep that ran this task, 0 if none has
    pub(crate) last_sweep: u64,
}

impl TaskRecord {
    pub(crate) fn info(&self) -> TaskInfo {
        TaskInfo {
            name: self.name.clone(),
            kind: self.kind,
            frequency: self.frequency,
            next_due: self.next_due,
        }
    }
}

/// A task claimed by a sweep, copied out of its record so it stays valid
/// after the lock is dropped and the record is possibly removed.
pub(crate) struct DueTask {
    pub(crate) id: u64,
    pub(crate) name: String,
    pub(crate) kind: TaskKind,
    pub(crate) runnable: Arc<dyn Runnable>,
}

/// Point-in-time description of a registered task
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskInfo {
    pub name: String,
    pub kind: TaskKind,
    pub frequency: u64,
    pub next_due: i64,
}

impl TaskInfo {
    /// `next_due` in local time, formatted like `Thu Oct 19 10:00:00 2026`
    pub fn next_due_local(&self) -> String {
        match Local.timestamp_opt(self.next_due, 0).single() {
            Some(at) => at.format("%a %b %e %T %Y").to_string(),
            None => self.next_due.to_string(),
        }
    }
}
