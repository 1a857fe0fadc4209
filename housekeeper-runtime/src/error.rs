//! Error types for the housekeeper runtime.

use thiserror::Error;

/// Errors returned by housekeeper operations
///
/// Registry failures are always returned to the caller that asked for the
/// change; nothing here is ever raised on the loop thread.
#[derive(Error, Debug)]
pub enum HousekeeperError {
    /// A task with this name is already registered
    #[error("Duplicate task name: {0}")]
    DuplicateName(String),

    /// The task record could not be allocated; the registry is unchanged
    #[error("Allocation failure while registering task: {0}")]
    AllocationFailure(String),

    /// Configuration values were readable but not usable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration source could not be loaded or parsed
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// The OS refused to start the loop thread
    #[error("Failed to start housekeeper thread: {0}")]
    Spawn(#[source] std::io::Error),

    /// `start` was called on a housekeeper whose loop already ran
    #[error("Housekeeper loop has already been started")]
    AlreadyRunning,

    /// The loop thread terminated by panicking
    #[error("Housekeeper thread panicked")]
    ThreadPanicked,

    /// The blocking join task could not be completed
    #[error("Failed to join housekeeper thread: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Result type alias using `HousekeeperError`
pub type Result<T> = std::result::Result<T, HousekeeperError>;
