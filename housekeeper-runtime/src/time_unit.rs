use std::time::Duration;

/// Time unit used when reading intervals from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
}

impl TimeUnit {
    pub fn to_duration(&self, value: u64) -> Duration {
        match self {
            TimeUnit::Milliseconds => Duration::from_millis(value),
            TimeUnit::Seconds => Duration::from_secs(value),
            TimeUnit::Minutes => Duration::from_secs(value.saturating_mul(60)),
            TimeUnit::Hours => Duration::from_secs(value.saturating_mul(3_600)),
        }
    }

    /// Parse a duration string like "100ms", "1s", "2m", "1h"
    /// Returns (value, TimeUnit) if successful
    ///
    /// Only lowercase suffixes are accepted and no space is allowed between
    /// the number and the suffix.
    pub fn parse_duration(s: &str) -> Option<(u64, TimeUnit)> {
        let s = s.trim();

        let split_pos = s.find(|c: char| !c.is_ascii_digit())?;
        if split_pos == 0 {
            return None;
        }

        let (num_str, unit_str) = s.split_at(split_pos);
        let value = num_str.parse::<u64>().ok()?;

        let time_unit = match unit_str {
            "ms" => TimeUnit::Milliseconds,
            "s" => TimeUnit::Seconds,
            "m" => TimeUnit::Minutes,
            "h" => TimeUnit::Hours,
            _ => return None,
        };

        Some((value, time_unit))
    }

    /// Parse an interval given either in shorthand ("250ms", "1s") or as a
    /// bare number, which is read in `default_unit`.
    pub fn parse_interval(s: &str, default_unit: TimeUnit) -> Option<Duration> {
        if let Some((value, unit)) = Self::parse_duration(s) {
            return Some(unit.to_duration(value));
        }
        s.trim()
            .parse::<u64>()
            .ok()
            .map(|value| default_unit.to_duration(value))
    }
}
