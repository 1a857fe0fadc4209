use super::housekeeper::Housekeeper;
use crate::clock::{Clock, SystemClock};
use crate::config::{load_toml_config, load_yaml_config, HousekeeperConfig};
use crate::error::Result;
use config::Config;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Builder for the housekeeper
pub struct HousekeeperBuilder {
    pub(crate) config: HousekeeperConfig,
    pub(crate) clock: Arc<dyn Clock>,
}

impl Default for HousekeeperBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HousekeeperBuilder {
    /// Create a builder with the default timing (100ms ticks, a sweep every 10 ticks)
    /// and the system clock
    pub fn new() -> Self {
        Self {
            config: HousekeeperConfig::default(),
            clock: Arc::new(SystemClock),
        }
    }

    /// Create with settings from the `[housekeeper]` table of a TOML file
    pub fn with_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = load_toml_config(path)?;
        Self::with_config(&config)
    }

    /// Create with settings from the `housekeeper` map of a YAML file
    pub fn with_yaml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = load_yaml_config(path)?;
        Self::with_config(&config)
    }

    /// Create with settings from an already loaded config
    pub fn with_config(config: &Config) -> Result<Self> {
        Ok(Self {
            config: HousekeeperConfig::from_config(config)?,
            clock: Arc::new(SystemClock),
        })
    }

    pub fn settings(mut self, config: HousekeeperConfig) -> Self {
        self.config = config;
        self
    }

    pub fn tick_interval(mut self, tick_interval: Duration) -> Self {
        self.config.tick_interval = tick_interval;
        self
    }

    pub fn ticks_per_sweep(mut self, ticks_per_sweep: u32) -> Self {
        self.config.ticks_per_sweep = ticks_per_sweep;
        self
    }

    pub fn thread_name(mut self, thread_name: impl Into<String>) -> Self {
        self.config.thread_name = thread_name.into();
        self
    }

    /// Use a different time source, typically a `ManualClock` in tests
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Build the housekeeper (does not start the loop yet)
    ///
    /// Tasks can be registered before or after `start()`.
    pub fn build(self) -> Result<Housekeeper> {
        self.config.validate()?;
        Ok(Housekeeper::new(self.config, self.clock))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HousekeeperError;
    use crate::scheduler::LoopState;

    #[test]
    fn builds_idle_with_defaults() {
        let hk = HousekeeperBuilder::new().build().unwrap();
        assert_eq!(hk.state(), LoopState::Idle);
        assert_eq!(hk.heartbeat(), 0);
        assert_eq!(hk.config(), &HousekeeperConfig::default());
    }

    #[test]
    fn zero_tick_interval_is_rejected() {
        let result = HousekeeperBuilder::new()
            .tick_interval(Duration::ZERO)
            .build();
        assert!(matches!(result, Err(HousekeeperError::InvalidConfig(_))));
    }

    #[test]
    fn overrides_apply_on_top_of_loaded_settings() {
        let config = Config::builder()
            .set_override("housekeeper.ticks_per_sweep", 4)
            .unwrap()
            .build()
            .unwrap();
        let hk = HousekeeperBuilder::with_config(&config)
            .unwrap()
            .thread_name("hk-override")
            .build()
            .unwrap();
        assert_eq!(hk.config().ticks_per_sweep, 4);
        assert_eq!(hk.config().thread_name, "hk-override");
    }
}
