//! Human-readable listing of the registered tasks.

use crate::task::TaskInfo;
use serde::Serialize;
use std::fmt;

/// Snapshot of the task list, rendered as a fixed-width table by `Display`
///
/// ```text
/// Name                      | Type     | Frequency | Next Due
/// --------------------------+----------+-----------+-------------------------
/// cache-expiry              | Repeated | 5         | Thu Oct 19 10:00:05 2026
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct TaskReport {
    tasks: Vec<TaskInfo>,
}

impl TaskReport {
    pub fn new(tasks: Vec<TaskInfo>) -> Self {
        Self { tasks }
    }

    pub fn tasks(&self) -> &[TaskInfo] {
        &self.tasks
    }
}

impl fmt::Display for TaskReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<25} | Type     | Frequency | Next Due", "Name")?;
        writeln!(
            f,
            "--------------------------+----------+-----------+-------------------------"
        )?;
        for task in &self.tasks {
            writeln!(
                f,
                "{:<25} | {:<8} | {:<9} | {}",
                task.name,
                task.kind.to_string(),
                task.frequency,
                task.next_due_local()
            )?;
        }
        Ok(())
    }
}
