use super::housekeeper::Housekeeper;
use crate::error::{HousekeeperError, Result};
use std::thread::JoinHandle;
use tracing::info;

/// Handle for a running housekeeper loop
/// Used to stop the loop and wait for its thread.
///
/// Dropping the handle detaches the thread; the loop keeps running until
/// some clone of the [`Housekeeper`] requests shutdown.
pub struct HousekeeperHandle {
    housekeeper: Housekeeper,
    thread: JoinHandle<()>,
}

impl HousekeeperHandle {
    pub(crate) fn new(housekeeper: Housekeeper, thread: JoinHandle<()>) -> Self {
        Self {
            housekeeper,
            thread,
        }
    }

    pub fn housekeeper(&self) -> &Housekeeper {
        &self.housekeeper
    }

    /// Signal the loop to stop without waiting for it
    pub fn request_shutdown(&self) {
        self.housekeeper.request_shutdown();
    }

    /// Whether the loop thread has exited
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Signal the loop to stop and block until its thread exits
    ///
    /// Takes at most one tick interval, plus the remainder of a sweep if one
    /// is in progress.
    pub fn join(self) -> Result<()> {
        self.housekeeper.request_shutdown();
        self.thread
            .join()
            .map_err(|_| HousekeeperError::ThreadPanicked)?;
        info!("Housekeeper thread joined");
        Ok(())
    }

    /// Shutdown the loop from async code
    ///
    /// The join runs on tokio's blocking pool so the calling runtime is not
    /// stalled while the loop finishes its current tick.
    pub async fn shutdown(self) -> Result<()> {
        tokio::task::spawn_blocking(move || self.join()).await?
    }
}

impl std::fmt::Debug for HousekeeperHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HousekeeperHandle")
            .field("state", &self.housekeeper.state())
            .field("finished", &self.thread.is_finished())
            .finish()
    }
}
