use super::housekeeper::{Housekeeper, LoopState, Shared};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

/// Marks the loop stopped however the thread exits
struct StoppedOnExit<'a>(&'a Shared);

impl Drop for StoppedOnExit<'_> {
    fn drop(&mut self) {
        self.0.set_state(LoopState::Stopped);
    }
}

/// Body of the loop thread: tick, and sweep every `ticks_per_sweep` ticks
pub(crate) fn run(shared: Arc<Shared>) {
    let _stopped = StoppedOnExit(&shared);
    let housekeeper = Housekeeper {
        shared: Arc::clone(&shared),
    };
    let tick = shared.config.tick_interval;
    let ticks_per_sweep = shared.config.ticks_per_sweep;

    'ticking: loop {
        for _ in 0..ticks_per_sweep {
            shared.clock.sleep(tick);
            if shared.shutdown.load(Ordering::Acquire) {
                break 'ticking;
            }
            shared.heartbeat.advance();
        }
        housekeeper.sweep();
    }

    info!(heartbeat = shared.heartbeat.get(), "Housekeeper stopped");
}
