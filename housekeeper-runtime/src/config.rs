use crate::error::{HousekeeperError, Result};
use crate::time_unit::TimeUnit;
use config::{Config, File, FileFormat};
use serde::{Deserialize, Deserializer};
use std::path::Path;
use std::time::Duration;

/// Key of the table the housekeeper settings live under
const SECTION: &str = "housekeeper";

/// Settings for the tick/sweep loop
///
/// ```toml
/// [housekeeper]
/// tick_interval = "100ms"
/// ticks_per_sweep = 10
/// thread_name = "housekeeper"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HousekeeperConfig {
    /// Sleep between two heartbeat increments
    #[serde(deserialize_with = "deserialize_interval")]
    pub tick_interval: Duration,
    /// Number of ticks between two sweeps of the task list
    pub ticks_per_sweep: u32,
    /// Name given to the loop thread
    pub thread_name: String,
}

impl Default for HousekeeperConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(100),
            ticks_per_sweep: 10,
            thread_name: "housekeeper".to_string(),
        }
    }
}

impl HousekeeperConfig {
    /// Read the `[housekeeper]` table, falling back to defaults when absent
    pub fn from_config(config: &Config) -> Result<Self> {
        let settings = match config.get::<HousekeeperConfig>(SECTION) {
            Ok(settings) => settings,
            Err(config::ConfigError::NotFound(_)) => HousekeeperConfig::default(),
            Err(e) => return Err(e.into()),
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings the loop cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.tick_interval.is_zero() {
            return Err(HousekeeperError::InvalidConfig(
                "tick_interval must be greater than zero".to_string(),
            ));
        }
        if self.ticks_per_sweep == 0 {
            return Err(HousekeeperError::InvalidConfig(
                "ticks_per_sweep must be at least 1".to_string(),
            ));
        }
        if self.thread_name.is_empty() {
            return Err(HousekeeperError::InvalidConfig(
                "thread_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IntervalValue {
    Millis(u64),
    Text(String),
}

fn deserialize_interval<'de, D>(deserializer: D) -> std::result::Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    match IntervalValue::deserialize(deserializer)? {
        IntervalValue::Millis(ms) => Ok(Duration::from_millis(ms)),
        IntervalValue::Text(text) => TimeUnit::parse_interval(&text, TimeUnit::Milliseconds)
            .ok_or_else(|| serde::de::Error::custom(format!("Invalid interval value: {}", text))),
    }
}

fn environment() -> config::Environment {
    // APP_HOUSEKEEPER__TICK_INTERVAL -> housekeeper.tick_interval
    config::Environment::with_prefix("APP")
        .prefix_separator("_")
        .separator("__")
}

/// Load config from a specific TOML file
pub fn load_toml_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let config = Config::builder()
        .add_source(File::from(path.as_ref()).format(FileFormat::Toml))
        .add_source(environment())
        .build()?;
    Ok(config)
}

/// Load config from a specific YAML file
pub fn load_yaml_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let config = Config::builder()
        .add_source(File::from(path.as_ref()).format(FileFormat::Yaml))
        .add_source(environment())
        .build()?;
    Ok(config)
}
