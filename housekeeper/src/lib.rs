//! # Housekeeper - periodic maintenance tasks on one background thread
//!
//! Subsystems that need regular upkeep (cache expiry, statistics rollover,
//! connection pruning) register a task by name instead of running their own
//! timer thread. The housekeeper runs every task on a single loop thread and
//! also maintains a heartbeat counter that other code can use as a cheap
//! logical clock.
//!
//! ## Features
//!
//! - **Repeated tasks**: run every N seconds until removed
//! - **One-shot tasks**: run once after a delay, then disappear
//! - **Re-entrant**: a running task may add or remove tasks, itself included
//! - **Heartbeat**: a counter advanced once per tick (100ms by default)
//! - **Config support**: tick timing from TOML/YAML files and `APP_` environment variables
//!
//! ## Quick Start
//!
//! ```rust
//! use housekeeper::HousekeeperBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let housekeeper = HousekeeperBuilder::new().build()?;
//!
//!     let first_run = housekeeper.add_repeated(
//!         "stats-rollover",
//!         || println!("rolling over statistics"),
//!         60,
//!     )?;
//!     housekeeper.add_oneshot("warmup", || println!("warming caches"), 2)?;
//!     assert!(first_run > 0);
//!
//!     let handle = housekeeper.start()?;
//!     println!("{}", housekeeper.report());
//!
//!     handle.join()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! Create `config/application.toml`:
//!
//! ```toml
//! [housekeeper]
//! tick_interval = "100ms"
//! ticks_per_sweep = 10
//! thread_name = "housekeeper"
//! ```
//!
//! Or `config/application.yaml`:
//!
//! ```yaml
//! housekeeper:
//!   tick_interval: 100
//!   ticks_per_sweep: 10
//! ```
//!
//! Values can be overridden with `APP_`-prefixed environment variables:
//!
//! ```bash
//! export APP_HOUSEKEEPER__TICK_INTERVAL=50ms
//! ```

// Re-export core types
pub use housekeeper_runtime::{
    load_toml_config, load_yaml_config, Clock, Housekeeper, HousekeeperBuilder,
    HousekeeperConfig, HousekeeperError, HousekeeperHandle, LoopState, ManualClock, Result,
    Runnable, SystemClock, TaskInfo, TaskKind, TaskReport, TimeUnit, WeakHousekeeper,
};

// Make housekeeper_runtime available for embedders that want the full path
pub use housekeeper_runtime;
