use super::handle::HousekeeperHandle;
use super::worker;
use crate::clock::Clock;
use crate::config::HousekeeperConfig;
use crate::error::{HousekeeperError, Result};
use crate::heartbeat::Heartbeat;
use crate::registry::TaskRegistry;
use crate::report::TaskReport;
use crate::runnable::Runnable;
use crate::task::{TaskInfo, TaskKind};
use parking_lot::Mutex;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};
use std::sync::{Arc, Weak};
use tracing::{debug, error, info, warn};

/// Lifecycle of the loop thread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Built, loop thread not started
    Idle,
    Running,
    /// Shutdown requested, loop thread has not exited yet
    ShuttingDown,
    Stopped,
}

impl LoopState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => LoopState::Idle,
            1 => LoopState::Running,
            2 => LoopState::ShuttingDown,
            _ => LoopState::Stopped,
        }
    }
}

pub(crate) struct Shared {
    pub(crate) config: HousekeeperConfig,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) registry: TaskRegistry,
    pub(crate) heartbeat: Heartbeat,
    pub(crate) shutdown: AtomicBool,
    state: AtomicU8,
    sweeps: AtomicU64,
    /// Held for the duration of a sweep so two sweeps never interleave
    sweeping: Mutex<()>,
}

impl Shared {
    pub(crate) fn set_state(&self, state: LoopState) {
        self.state.store(state as u8, Ordering::Release);
    }
}

/// Periodic task scheduler with a heartbeat counter
///
/// Cloning is cheap and every clone drives the same registry and loop. Tasks
/// that need to add or remove tasks while they run capture a clone, or a
/// [`WeakHousekeeper`] to avoid keeping the scheduler alive from inside its
/// own registry.
#[derive(Clone)]
pub struct Housekeeper {
    pub(crate) shared: Arc<Shared>,
}

/// Non-owning reference to a [`Housekeeper`]
#[derive(Clone)]
pub struct WeakHousekeeper {
    shared: Weak<Shared>,
}

impl WeakHousekeeper {
    pub fn upgrade(&self) -> Option<Housekeeper> {
        self.shared.upgrade().map(|shared| Housekeeper { shared })
    }
}

impl Housekeeper {
    pub(crate) fn new(config: HousekeeperConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            shared: Arc::new(Shared {
                config,
                clock,
                registry: TaskRegistry::new(),
                heartbeat: Heartbeat::new(),
                shutdown: AtomicBool::new(false),
                state: AtomicU8::new(LoopState::Idle as u8),
                sweeps: AtomicU64::new(0),
                sweeping: Mutex::new(()),
            }),
        }
    }

    pub fn downgrade(&self) -> WeakHousekeeper {
        WeakHousekeeper {
            shared: Arc::downgrade(&self.shared),
        }
    }

    pub fn config(&self) -> &HousekeeperConfig {
        &self.shared.config
    }

    /// Register a task that runs every `frequency` seconds until removed
    ///
    /// Returns the Unix time of the first run, `now + frequency`.
    pub fn add_repeated<R>(&self, name: &str, task: R, frequency: u64) -> Result<i64>
    where
        R: Runnable + 'static,
    {
        let now = self.shared.clock.now();
        let result = self
            .shared
            .registry
            .add_repeated(name, Arc::new(task), frequency, now);
        log_registration(name, TaskKind::Repeated, &result);
        result
    }

    /// Register a task that runs once, `delay` seconds from now
    ///
    /// Names are unique across both kinds of task, so this fails with
    /// `DuplicateName` just like [`Housekeeper::add_repeated`].
    pub fn add_oneshot<R>(&self, name: &str, task: R, delay: u64) -> Result<i64>
    where
        R: Runnable + 'static,
    {
        let now = self.shared.clock.now();
        let result = self
            .shared
            .registry
            .add_oneshot(name, Arc::new(task), delay, now);
        log_registration(name, TaskKind::OneShot, &result);
        result
    }

    /// Remove a task by name. Returns false if no such task is registered.
    ///
    /// Safe to call from inside a running task, including on itself. A task
    /// that is already running finishes its current invocation.
    pub fn remove(&self, name: &str) -> bool {
        let removed = self.shared.registry.remove(name);
        debug!(task = %name, removed, "housekeeper task remove");
        removed
    }

    /// Whether a task with this name is currently registered
    pub fn contains(&self, name: &str) -> bool {
        self.shared.registry.contains(name)
    }

    pub fn task_count(&self) -> usize {
        self.shared.registry.len()
    }

    /// Registered tasks in registration order
    pub fn list(&self) -> Vec<TaskInfo> {
        self.shared.registry.snapshot()
    }

    /// Printable table of the registered tasks
    pub fn report(&self) -> TaskReport {
        TaskReport::new(self.list())
    }

    /// Number of ticks elapsed since the loop started
    pub fn heartbeat(&self) -> u64 {
        self.shared.heartbeat.get()
    }

    pub fn state(&self) -> LoopState {
        LoopState::from_u8(self.shared.state.load(Ordering::Acquire))
    }

    /// Ask the loop to stop. It notices at its next tick; a sweep that is in
    /// progress runs to completion first.
    pub fn request_shutdown(&self) {
        self.shared.shutdown.store(true, Ordering::Release);
        let _ = self.shared.state.compare_exchange(
            LoopState::Running as u8,
            LoopState::ShuttingDown as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }

    pub fn is_shutdown_requested(&self) -> bool {
        self.shared.shutdown.load(Ordering::Acquire)
    }

    /// Start the loop on its own thread
    pub fn start(&self) -> Result<HousekeeperHandle> {
        if self
            .shared
            .state
            .compare_exchange(
                LoopState::Idle as u8,
                LoopState::Running as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_err()
        {
            return Err(HousekeeperError::AlreadyRunning);
        }

        let shared = Arc::clone(&self.shared);
        let spawned = std::thread::Builder::new()
            .name(self.shared.config.thread_name.clone())
            .spawn(move || worker::run(shared));

        match spawned {
            Ok(thread) => {
                info!(
                    tick_interval = ?self.shared.config.tick_interval,
                    ticks_per_sweep = self.shared.config.ticks_per_sweep,
                    "Housekeeper started"
                );
                Ok(HousekeeperHandle::new(self.clone(), thread))
            }
            Err(e) => {
                self.shared.set_state(LoopState::Idle);
                error!(error = %e, "Failed to start housekeeper thread");
                Err(HousekeeperError::Spawn(e))
            }
        }
    }

    /// Run every task that is due now, returning how many ran
    ///
    /// The loop thread calls this once per sweep interval. The clock is read
    /// once and that instant is used for every due check of the sweep. Tasks
    /// run with the registry unlocked, and after each one the scan starts over
    /// from the head of the list, since the task may have changed it. Each record
    /// runs at most once per sweep, and only records registered before the sweep
    /// began are eligible: a task added by a callback, even one re-registered
    /// under its old name, waits for the next sweep.
    ///
    /// If another sweep is already in progress (for example when called from
    /// inside a task) this returns 0 without running anything.
    pub fn sweep(&self) -> usize {
        let shared = &self.shared;
        let Some(_sweeping) = shared.sweeping.try_lock() else {
            debug!("Sweep already in progress, skipping");
            return 0;
        };

        let now = shared.clock.now();
        let generation = shared.sweeps.fetch_add(1, Ordering::Relaxed) + 1;
        let newest = shared.registry.newest_id();
        let mut executed = 0;

        while let Some(due) = shared.registry.claim_due(now, generation, newest) {
            debug!(task = %due.name, kind = %due.kind, "Running housekeeper task");
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| due.runnable.run()));
            if let Err(payload) = outcome {
                error!(
                    task = %due.name,
                    panic = %panic_message(payload.as_ref()),
                    "Housekeeper task panicked"
                );
            }
            if due.kind == TaskKind::OneShot {
                shared.registry.remove_claimed(&due);
            }
            executed += 1;
        }

        if executed > 0 {
            debug!(executed, generation, "Housekeeper sweep finished");
        }
        executed
    }
}

fn log_registration(name: &str, kind: TaskKind, result: &Result<i64>) {
    match result {
        Ok(due) => info!(task = %name, %kind, due, "Housekeeper task registered"),
        Err(e) => warn!(task = %name, %kind, error = %e, "Housekeeper task rejected"),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
