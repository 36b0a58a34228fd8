//! Alarm engine error hierarchy.
//!
//! Only infrastructure failures are errors. Business outcomes such as a
//! duplicate insert or a cancellation for an unknown number are returned as
//! plain outcome values (see [`crate::InsertOutcome`], [`crate::RegisterOutcome`]
//! and [`crate::CancelOutcome`]).

use config::ConfigError;
use tokio::task::JoinError;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration source could not be loaded or deserialized
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Configuration loaded but failed validation
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Metric registration failures
    #[error(transparent)]
    Metrics(#[from] prometheus::Error),

    /// A background task (coordinator or monitor worker) panicked or was aborted
    #[error("Background task failed: {0}")]
    TaskFailed(#[from] JoinError),

    /// The scheduler was asked to run twice
    #[error("Coordinator already running")]
    AlreadyRunning,
}
