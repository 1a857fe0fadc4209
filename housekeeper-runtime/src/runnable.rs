/// Work that the housekeeper runs on its loop thread
///
/// Any `Fn()` closure that is `Send + Sync` is a `Runnable`, so most callers
/// never implement this trait by hand. Implement it directly when the task is
/// better expressed as a type that owns its state.
///
/// # Example
///
/// ```rust
/// use housekeeper_runtime::Runnable;
/// use std::sync::atomic::{AtomicU64, Ordering};
///
/// struct PurgeStale {
///     purged: AtomicU64,
/// }
///
/// impl Runnable for PurgeStale {
///     fn run(&self) {
///         self.purged.fetch_add(1, Ordering::Relaxed);
///     }
/// }
///
/// # fn main() {
/// let task = PurgeStale { purged: AtomicU64::new(0) };
/// task.run();
/// assert_eq!(task.purged.load(Ordering::Relaxed), 1);
/// # }
/// ```
pub trait Runnable: Send + Sync {
    /// Execute the task once
    fn run(&self);
}

impl<F> Runnable for F
where
    F: Fn() + Send + Sync,
{
    fn run(&self) {
        self()
    }
}
