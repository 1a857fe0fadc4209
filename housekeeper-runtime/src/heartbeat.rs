use std::sync::atomic::{AtomicU64, Ordering};

/// Coarse logical clock advanced once per housekeeper tick
///
/// Only the loop thread writes it. Readers on other threads use relaxed loads:
/// the value may lag slightly behind the loop, but it never decreases and a
/// 64-bit counter does not wrap at any tick rate a process will live through.
#[derive(Debug, Default)]
pub(crate) struct Heartbeat(AtomicU64);

impl Heartbeat {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Current number of elapsed ticks
    pub(crate) fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    pub(crate) fn advance(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_increments_by_one() {
        let heartbeat = Heartbeat::new();
        assert_eq!(heartbeat.get(), 0);
        assert_eq!(heartbeat.advance(), 1);
        assert_eq!(heartbeat.advance(), 2);
        assert_eq!(heartbeat.get(), 2);
    }
}
