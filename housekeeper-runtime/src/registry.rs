//! The task registry: an ordered list of task records behind one lock.
//!
//! The lock only protects the structure of the list. It is never held while a
//! task runs, which is what lets a task add or remove entries, itself included.

use crate::error::{HousekeeperError, Result};
use crate::runnable::Runnable;
use crate::task::{DueTask, TaskInfo, TaskKind, TaskRecord};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Default)]
struct Tasks {
    records: Vec<TaskRecord>,
    next_id: u64,
}

/// Registered tasks in insertion order, keyed by unique name
#[derive(Default)]
pub(crate) struct TaskRegistry {
    tasks: Mutex<Tasks>,
}

impl TaskRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Register a task that runs every `frequency` seconds, first at `now + frequency`
    pub(crate) fn add_repeated(
        &self,
        name: &str,
        runnable: Arc<dyn Runnable>,
        frequency: u64,
        now: i64,
    ) -> Result<i64> {
        self.insert(
            name,
            runnable,
            TaskKind::Repeated,
            frequency,
            now.saturating_add_unsigned(frequency),
        )
    }

    /// Register a task that runs once, `delay` seconds after `now`
    pub(crate) fn add_oneshot(
        &self,
        name: &str,
        runnable: Arc<dyn Runnable>,
        delay: u64,
        now: i64,
    ) -> Result<i64> {
        self.insert(name, runnable, TaskKind::OneShot, 0, now.saturating_add_unsigned(delay))
    }

    fn insert(
        &self,
        name: &str,
        runnable: Arc<dyn Runnable>,
        kind: TaskKind,
        frequency: u64,
        next_due: i64,
    ) -> Result<i64> {
        let mut owned_name = String::new();
        owned_name
            .try_reserve_exact(name.len())
            .map_err(|_| HousekeeperError::AllocationFailure(name.to_string()))?;
        owned_name.push_str(name);

        let mut tasks = self.tasks.lock();
        if tasks.records.iter().any(|record| record.name == name) {
            return Err(HousekeeperError::DuplicateName(owned_name));
        }
        tasks
            .records
            .try_reserve(1)
            .map_err(|_| HousekeeperError::AllocationFailure(name.to_string()))?;

        tasks.next_id += 1;
        let id = tasks.next_id;
        tasks.records.push(TaskRecord {
            id,
            name: owned_name,
            runnable,
            kind,
            frequency,
            next_due,
            last_sweep: 0,
        });
        Ok(next_due)
    }

    /// Remove the named task, returning whether it was registered
    pub(crate) fn remove(&self, name: &str) -> bool {
        let removed = {
            let mut tasks = self.tasks.lock();
            let index = tasks.records.iter().position(|record| record.name == name);
            index.map(|index| tasks.records.remove(index))
        };
        // The record, and with it possibly the last reference to its runnable,
        // is dropped here with the lock already released.
        removed.is_some()
    }

    /// Remove a claimed task only if the record is still the one that was claimed.
    /// A task re-registered under the same name while running is left alone.
    pub(crate) fn remove_claimed(&self, due: &DueTask) -> bool {
        let removed = {
            let mut tasks = self.tasks.lock();
            let index = tasks
                .records
                .iter()
                .position(|record| record.id == due.id && record.name == due.name);
            index.map(|index| tasks.records.remove(index))
        };
        removed.is_some()
    }

    /// Copy of every record's public fields, in registration order
    pub(crate) fn snapshot(&self) -> Vec<TaskInfo> {
        self.tasks.lock().records.iter().map(TaskRecord::info).collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.tasks.lock().records.len()
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.tasks.lock().records.iter().any(|record| record.name == name)
    }

    /// Id of the most recently registered record, 0 if none ever was
    pub(crate) fn newest_id(&self) -> u64 {
        self.tasks.lock().next_id
    }

    /// Claim the first task, scanning from the head, that is due at `now`, was
    /// registered no later than `newest_id` and has not run yet in sweep `sweep`.
    ///
    /// `next_due` is moved forward before the lock is released, so nobody can
    /// observe a stale due time for a task that is about to run.
    pub(crate) fn claim_due(&self, now: i64, sweep: u64, newest_id: u64) -> Option<DueTask> {
        let mut tasks = self.tasks.lock();
        let record = tasks.records.iter_mut().find(|record| {
            record.next_due <= now && record.id <= newest_id && record.last_sweep != sweep
        })?;

        record.next_due = now.saturating_add_unsigned(record.frequency);
        record.last_sweep = sweep;
        Some(DueTask {
            id: record.id,
            name: record.name.clone(),
            kind: record.kind,
            runnable: Arc::clone(&record.runnable),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn noop() -> Arc<dyn Runnable> {
        Arc::new(|| {})
    }

    #[test]
    fn add_repeated_returns_due_time() {
        let registry = TaskRegistry::new();
        let due = registry.add_repeated("sweep", noop(), 5, 1000).unwrap();
        assert_eq!(due, 1005);
        assert_eq!(
            registry.snapshot(),
            vec![TaskInfo {
                name: "sweep".into(),
                kind: TaskKind::Repeated,
                frequency: 5,
                next_due: 1005,
            }]
        );
    }

    #[test]
    fn duplicate_repeated_name_is_rejected() {
        let registry = TaskRegistry::new();
        let first_runs = Arc::new(AtomicUsize::new(0));
        let second_runs = Arc::new(AtomicUsize::new(0));
        let first = Arc::clone(&first_runs);
        let second = Arc::clone(&second_runs);
        let original: Arc<dyn Runnable> = Arc::new(move || {
            first.fetch_add(1, Ordering::SeqCst);
        });
        let intruder: Arc<dyn Runnable> = Arc::new(move || {
            second.fetch_add(1, Ordering::SeqCst);
        });

        registry.add_repeated("sweep", original, 5, 1000).unwrap();
        let err = registry.add_repeated("sweep", intruder, 9, 1000).unwrap_err();
        assert!(matches!(err, HousekeeperError::DuplicateName(ref name) if name == "sweep"));
        let snapshot = registry.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].frequency, 5);

        // The surviving registration still fires with its own callback
        let due = registry.claim_due(1005, 1, registry.newest_id()).unwrap();
        assert_eq!(due.name, "sweep");
        due.runnable.run();
        assert_eq!(first_runs.load(Ordering::SeqCst), 1);
        assert_eq!(second_runs.load(Ordering::SeqCst), 0);
        assert_eq!(registry.snapshot()[0].next_due, 1010);
    }

    #[test]
    fn duplicate_oneshot_name_is_rejected() {
        let registry = TaskRegistry::new();
        registry.add_repeated("warmup", noop(), 5, 1000).unwrap();
        let err = registry.add_oneshot("warmup", noop(), 2, 1000).unwrap_err();
        assert!(matches!(err, HousekeeperError::DuplicateName(_)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn oneshot_has_zero_frequency() {
        let registry = TaskRegistry::new();
        let due = registry.add_oneshot("warmup", noop(), 2, 1000).unwrap();
        assert_eq!(due, 1002);
        let info = &registry.snapshot()[0];
        assert_eq!(info.kind, TaskKind::OneShot);
        assert_eq!(info.frequency, 0);
    }

    #[test]
    fn remove_reports_whether_task_existed() {
        let registry = TaskRegistry::new();
        registry.add_repeated("a", noop(), 1, 0).unwrap();
        registry.add_repeated("b", noop(), 1, 0).unwrap();
        assert!(!registry.remove("nonexistent"));
        assert_eq!(registry.len(), 2);
        assert!(registry.remove("a"));
        assert!(!registry.remove("a"));
        let names: Vec<_> = registry.snapshot().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["b"]);
    }

    #[test]
    fn snapshot_keeps_insertion_order() {
        let registry = TaskRegistry::new();
        for name in ["c", "a", "b"] {
            registry.add_repeated(name, noop(), 1, 0).unwrap();
        }
        let names: Vec<_> = registry.snapshot().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn huge_frequency_saturates() {
        let registry = TaskRegistry::new();
        let due = registry.add_repeated("far", noop(), u64::MAX, 1000).unwrap();
        assert_eq!(due, i64::MAX);
    }

    #[test]
    fn claim_due_skips_tasks_not_yet_due() {
        let registry = TaskRegistry::new();
        registry.add_repeated("later", noop(), 10, 1000).unwrap();
        registry.add_repeated("soon", noop(), 2, 1000).unwrap();

        let newest = registry.newest_id();
        let due = registry.claim_due(1002, 1, newest).unwrap();
        assert_eq!(due.name, "soon");
        assert_eq!(due.kind, TaskKind::Repeated);
        assert!(registry.claim_due(1002, 1, newest).is_none());

        let soon = registry.snapshot().into_iter().find(|t| t.name == "soon").unwrap();
        assert_eq!(soon.next_due, 1004);
    }

    #[test]
    fn claim_due_runs_a_task_once_per_sweep() {
        let registry = TaskRegistry::new();
        registry.add_repeated("busy", noop(), 0, 1000).unwrap();
        let newest = registry.newest_id();
        assert!(registry.claim_due(1000, 1, newest).is_some());
        assert!(registry.claim_due(1000, 1, newest).is_none());
        assert!(registry.claim_due(1000, 2, newest).is_some());
    }

    #[test]
    fn claim_due_ignores_records_newer_than_the_sweep() {
        let registry = TaskRegistry::new();
        registry.add_oneshot("old", noop(), 0, 1000).unwrap();
        let newest = registry.newest_id();
        assert_eq!(newest, 1);

        // Registered after the sweep took its bound, already due
        registry.add_oneshot("new", noop(), 0, 1000).unwrap();
        let due = registry.claim_due(1000, 1, newest).unwrap();
        assert_eq!(due.name, "old");
        assert!(registry.remove_claimed(&due));
        assert!(registry.claim_due(1000, 1, newest).is_none());

        let due = registry.claim_due(1000, 2, registry.newest_id()).unwrap();
        assert_eq!(due.name, "new");
    }

    #[test]
    fn claimed_runnable_outlives_removal() {
        let registry = TaskRegistry::new();
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&runs);
        let task: Arc<dyn Runnable> = Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        registry.add_oneshot("once", task, 0, 1000).unwrap();

        let due = registry.claim_due(1000, 1, registry.newest_id()).unwrap();
        assert!(registry.remove("once"));
        due.runnable.run();
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert!(!registry.remove_claimed(&due));
    }

    #[test]
    fn remove_claimed_leaves_reregistered_task() {
        let registry = TaskRegistry::new();
        registry.add_oneshot("once", noop(), 0, 1000).unwrap();
        let due = registry.claim_due(1000, 1, registry.newest_id()).unwrap();
        assert!(registry.remove("once"));
        registry.add_oneshot("once", noop(), 60, 1000).unwrap();

        assert!(!registry.remove_claimed(&due));
        assert!(registry.contains("once"));
    }
}
