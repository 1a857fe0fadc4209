//! Housekeeper Runtime - periodic task execution on a single background thread
//!
//! Subsystems register repeated or one-shot tasks by name; one loop thread
//! wakes every tick, advances a heartbeat counter, and every few ticks sweeps
//! the registry and runs whatever is due. Tasks run with the registry unlocked,
//! so they may add and remove tasks, themselves included.

mod clock;
mod config;
mod error;
mod heartbeat;
mod registry;
mod report;
mod runnable;
mod scheduler;
mod task;
mod time_unit;

// Re-export public API
pub use crate::clock::{Clock, ManualClock, SystemClock};
pub use crate::config::{load_toml_config, load_yaml_config, HousekeeperConfig};
pub use crate::error::{HousekeeperError, Result};
pub use crate::report::TaskReport;
pub use crate::runnable::Runnable;
pub use crate::scheduler::{
    Housekeeper, HousekeeperBuilder, HousekeeperHandle, LoopState, WeakHousekeeper,
};
pub use crate::task::{TaskInfo, TaskKind};
pub use crate::time_unit::TimeUnit;
