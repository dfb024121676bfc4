//! Counter configuration.

use std::time::Duration;

use crate::error::{CounterError, Result};

/// Default window size used by [`CounterConfig::default`].
pub const DEFAULT_WINDOW_SIZE: Duration = Duration::from_secs(60);

/// Settings for building a [`Counter`](crate::Counter).
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use rate_guard_counter::CounterConfig;
///
/// let config = CounterConfig::new(Duration::from_secs(10))
///     .sync_interval(Duration::from_millis(500));
///
/// assert!(config.validate().is_ok());
/// assert!(CounterConfig::new(Duration::ZERO).validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterConfig {
    /// Length of one window bucket. Must be non-zero.
    pub size: Duration,
    /// Period of the background sync loop. Zero disables the loop.
    pub sync_interval: Duration,
}

impl CounterConfig {
    /// Creates a configuration with the given window size and no background sync.
    pub fn new(size: Duration) -> Self {
        Self {
            size,
            sync_interval: Duration::ZERO,
        }
    }

    /// Sets how often the current window is synchronized in the background.
    pub fn sync_interval(mut self, interval: Duration) -> Self {
        self.sync_interval = interval;
        self
    }

    /// Returns `true` if a background sync loop will be started.
    pub fn syncs_in_background(&self) -> bool {
        !self.sync_interval.is_zero()
    }

    /// Checks the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CounterError::ZeroSize`] if `size` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.size.is_zero() {
            return Err(CounterError::ZeroSize);
        }
        Ok(())
    }
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_SIZE)
    }
}
