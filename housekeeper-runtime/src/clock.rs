//! Time sources for the housekeeper loop.
//!
//! The loop only ever needs two things from the outside world: the current
//! wall-clock time in whole seconds, and a way to put its thread to sleep.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Wall-clock time and sleep, as seen by the scheduler
pub trait Clock: Send + Sync {
    /// Current time as Unix seconds
    fn now(&self) -> i64;

    /// Block the calling thread for `duration`
    fn sleep(&self, duration: Duration);
}

/// The real system clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(elapsed) => i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX),
            // Clock set before 1970
            Err(e) => -i64::try_from(e.duration().as_secs()).unwrap_or(i64::MAX),
        }
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// A clock driven by hand, for tests and simulations
///
/// Time is kept in milliseconds. `sleep` moves virtual time forward by the
/// requested amount and only briefly yields the real thread, so a loop running
/// on a `ManualClock` goes through its ticks much faster than real time.
#[derive(Debug)]
pub struct ManualClock {
    now_ms: AtomicI64,
    pause: Duration,
}

impl ManualClock {
    /// Create a clock reading `start_secs`
    pub fn new(start_secs: i64) -> Self {
        Self {
            now_ms: AtomicI64::new(start_secs.saturating_mul(1000)),
            pause: Duration::from_micros(200),
        }
    }

    /// Real time spent by each `sleep` call (defaults to 200µs)
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    /// Jump to an absolute time
    pub fn set(&self, secs: i64) {
        self.now_ms.store(secs.saturating_mul(1000), Ordering::SeqCst);
    }

    /// Move time forward
    pub fn advance(&self, by: Duration) {
        let ms = i64::try_from(by.as_millis()).unwrap_or(i64::MAX);
        let _ = self
            .now_ms
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |now| Some(now.saturating_add(ms)));
    }

    /// Current virtual time in milliseconds
    pub fn now_millis(&self) -> i64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> i64 {
        self.now_millis().div_euclid(1000)
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration);
        if self.pause.is_zero() {
            std::thread::yield_now();
        } else {
            std::thread::sleep(self.pause);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_is_after_2020() {
        assert!(SystemClock.now() > 1_577_836_800);
    }

    #[test]
    fn manual_clock_sleep_advances_virtual_time() {
        let clock = ManualClock::new(1000).with_pause(Duration::ZERO);
        for _ in 0..9 {
            clock.sleep(Duration::from_millis(100));
        }
        assert_eq!(clock.now(), 1000);
        clock.sleep(Duration::from_millis(100));
        assert_eq!(clock.now(), 1001);
    }

    #[test]
    fn manual_clock_set_and_advance() {
        let clock = ManualClock::new(0);
        clock.set(1000);
        clock.advance(Duration::from_secs(5));
        assert_eq!(clock.now(), 1005);
        assert_eq!(clock.now_millis(), 1_005_000);
    }
}
