//! error.rs
//! Construction-time errors for window counters.

use thiserror::Error;

/// Errors returned when building a [`Counter`](crate::Counter).
///
/// Counting itself never fails; only misconfiguration and thread spawning do.
#[derive(Debug, Error)]
pub enum CounterError {
    /// The window size was zero, which would make every bucket boundary undefined.
    #[error("window size must be greater than zero")]
    ZeroSize,

    /// The background sync thread could not be started.
    #[error("failed to spawn window sync thread: {0}")]
    SpawnSyncLoop(#[from] std::io::Error),
}

/// Result type for counter construction.
pub type Result<T> = std::result::Result<T, CounterError>;
