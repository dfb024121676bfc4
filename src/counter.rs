use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::{trace, warn};

use crate::config::CounterConfig;
use crate::error::Result;
use crate::sync_loop::SyncLoop;
use crate::types::{Count, StopFn};
use crate::window::{NewWindow, Window};
use crate::windows::LocalWindow;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Sliding window event counter built from two window buckets.
///
/// The counter keeps a *current* window, holding events for the bucket that
/// contains "now", and a *previous* window for the bucket right before it. The
/// number of events in the trailing `size` is estimated by weighting the previous
/// bucket by how much of it still falls inside the trailing window:
///
/// ```text
/// estimate = trunc(prev_count * (size - elapsed) / size) + curr_count
/// ```
///
/// where `elapsed` is the time since the current bucket started. The estimate is
/// exact when events arrive uniformly within each bucket.
///
/// # Window Management
///
/// Buckets are aligned to multiples of `size` counted from `UNIX_EPOCH`. Every
/// operation first advances the windows to the bucket containing `now`:
/// - Same bucket: nothing changes
/// - Exactly one bucket later: the current count becomes the previous count
/// - More than one bucket later: the previous count is zero, since nothing was
///   observed in the bucket just before the new one
///
/// An instant earlier than the current bucket never rotates backwards.
///
/// # Backends
///
/// The current window comes from a factory and may be any [`Window`]. The previous
/// window is always a [`LocalWindow`] because it only ever holds a snapshot.
///
/// # Thread Safety
///
/// One mutex guards both windows. Share the counter through an `Arc`.
///
/// # Example
///
/// ```rust
/// use std::time::{Duration, UNIX_EPOCH};
/// use rate_guard_counter::Counter;
/// use rate_guard_counter::windows::LocalWindow;
///
/// let (counter, stop) =
///     Counter::new(Duration::from_secs(60), LocalWindow::new, Duration::ZERO).unwrap();
///
/// let t0 = UNIX_EPOCH + Duration::from_secs(1_700_000_040); // bucket boundary
/// counter.add_n(t0, 10);
///
/// // 1s into the next bucket, 59/60 of the previous bucket still counts.
/// assert_eq!(counter.count(t0 + Duration::from_secs(61)), 9);
///
/// counter.stop();
/// stop();
/// ```
pub struct Counter {
    /// Duration of one window bucket
    size: Duration,
    /// Period of the background sync loop, zero when disabled
    sync_interval: Duration,
    /// Both windows, shared weakly with the sync loop
    state: Arc<Mutex<CounterState>>,
    /// Running sync loop, taken on stop
    sync_loop: Mutex<Option<SyncLoop>>,
}

/// The two buckets guarded by the counter's lock
struct CounterState {
    curr: Box<dyn Window>,
    prev: LocalWindow,
}

impl Counter {
    /// Creates a new counter and returns it along with the current window's stop
    /// function.
    ///
    /// # Parameters
    ///
    /// * `size` - Duration of one window bucket
    /// * `new_window` - Factory for the current window, e.g. [`LocalWindow::new`]
    /// * `sync_interval` - Period of background syncs; zero disables them
    ///
    /// When `sync_interval` is non-zero a background thread calls the current
    /// window's `sync` on that period. It runs until [`stop`](Counter::stop) is
    /// called or the counter is dropped.
    ///
    /// # Errors
    ///
    /// * [`CounterError::ZeroSize`](crate::CounterError::ZeroSize) - If `size` is zero
    /// * [`CounterError::SpawnSyncLoop`](crate::CounterError::SpawnSyncLoop) - If the
    ///   sync thread cannot be started; the window's stop function has already
    ///   been called in that case
    pub fn new<F>(size: Duration, new_window: F, sync_interval: Duration) -> Result<(Self, StopFn)>
    where
        F: NewWindow,
    {
        Self::with_config(CounterConfig::new(size).sync_interval(sync_interval), new_window)
    }

    /// Creates a new counter from a [`CounterConfig`].
    ///
    /// See [`Counter::new`] for details.
    pub fn with_config<F>(config: CounterConfig, new_window: F) -> Result<(Self, StopFn)>
    where
        F: NewWindow,
    {
        config.validate()?;

        let (curr, curr_stop) = new_window.new_window();

        // The previous window never receives additions, so it needs no backend
        // of its own. This keeps a counter at one sync loop at most.
        let (prev, _) = LocalWindow::new();

        let state = Arc::new(Mutex::new(CounterState {
            curr: Box::new(curr),
            prev,
        }));

        let sync_loop = if config.syncs_in_background() {
            let weak = Arc::downgrade(&state);
            let spawned = SyncLoop::spawn(config.sync_interval, move |now| {
                if let Some(state) = weak.upgrade() {
                    lock_state(&state).curr.sync(now);
                }
            });
            match spawned {
                Ok(sync_loop) => Some(sync_loop),
                Err(err) => {
                    curr_stop();
                    return Err(err.into());
                }
            }
        } else {
            None
        };

        let counter = Counter {
            size: config.size,
            sync_interval: config.sync_interval,
            state,
            sync_loop: Mutex::new(sync_loop),
        };
        Ok((counter, curr_stop))
    }

    /// Returns the duration of one window bucket.
    ///
    /// The size is fixed at construction; build a new counter to change it.
    #[inline]
    pub fn size(&self) -> Duration {
        self.size
    }

    /// Returns the background sync period, zero if background sync is disabled.
    #[inline]
    pub fn sync_interval(&self) -> Duration {
        self.sync_interval
    }

    /// Records one event at the current system time.
    ///
    /// Shorthand for `add_n(SystemTime::now(), 1)`.
    pub fn increment(&self) {
        self.add_n(SystemTime::now(), 1);
    }

    /// Records `n` events at `now`.
    ///
    /// After adding, the current window is synced immediately so a synchronized
    /// backend can publish the update without waiting for the background loop.
    pub fn add_n(&self, now: SystemTime, n: Count) {
        let mut state = lock_state(&self.state);
        self.advance(&mut state, now);

        state.curr.add_count(n);
        state.curr.sync(now);
    }

    /// Returns the estimated number of events in the window of `size` ending at `now`.
    ///
    /// The previous bucket's weighted share is truncated toward zero, never rounded.
    pub fn count(&self, now: SystemTime) -> Count {
        let mut state = lock_state(&self.state);
        self.advance(&mut state, now);

        let size = self.size.as_nanos();
        // A `now` before the current bucket (clock went backwards) counts as zero elapsed.
        let elapsed = now
            .duration_since(state.curr.start())
            .map_or(0, |d| d.as_nanos())
            .min(size);

        weighted_count(state.prev.count(), size - elapsed, size)
            .saturating_add(state.curr.count())
    }

    /// Stops the background sync loop and waits for it to exit.
    ///
    /// Safe to call more than once, and a no-op when background sync is disabled.
    /// This does not call the window's stop function returned from
    /// [`Counter::new`]; invoke that separately once you are done with the counter.
    pub fn stop(&self) {
        let sync_loop = self
            .sync_loop
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(sync_loop) = sync_loop {
            sync_loop.stop();
        }
    }

    /// Rotates the windows so the current one contains `now`.
    fn advance(&self, state: &mut CounterState, now: SystemTime) {
        let new_curr_start = truncate(now, self.size);

        let behind = match new_curr_start.duration_since(state.curr.start()) {
            Ok(gap) => gap.as_nanos() / self.size.as_nanos(),
            Err(_) => return,
        };
        if behind < 1 {
            return;
        }

        let new_prev_count = if behind == 1 {
            // The new previous window is exactly the old current one. The count
            // is a snapshot and may lag a synchronized backend's store.
            state.curr.count()
        } else {
            0
        };
        trace!(windows = %behind, new_prev_count, "rotating windows");

        let new_prev_start = new_curr_start.checked_sub(self.size).unwrap_or(UNIX_EPOCH);
        state.prev.reset(new_prev_start, new_prev_count);
        state.curr.reset(new_curr_start, 0);
    }
}

impl Drop for Counter {
    fn drop(&mut self) {
        self.stop();
    }
}

impl fmt::Debug for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Counter")
            .field("size", &self.size)
            .field("sync_interval", &self.sync_interval)
            .finish_non_exhaustive()
    }
}

fn lock_state(state: &Mutex<CounterState>) -> MutexGuard<'_, CounterState> {
    state.lock().unwrap_or_else(|poisoned| {
        warn!("recovering poisoned window counter lock");
        poisoned.into_inner()
    })
}

/// Floors `now` to a multiple of `size` since `UNIX_EPOCH`.
///
/// Instants before the epoch clamp to the epoch.
fn truncate(now: SystemTime, size: Duration) -> SystemTime {
    let since_epoch = now.duration_since(UNIX_EPOCH).map_or(0, |d| d.as_nanos());
    let aligned = since_epoch - since_epoch % size.as_nanos();
    UNIX_EPOCH + Duration::new((aligned / NANOS_PER_SEC) as u64, (aligned % NANOS_PER_SEC) as u32)
}

/// Computes `trunc(prev * remaining / size)`.
fn weighted_count(prev: Count, remaining: u128, size: u128) -> Count {
    let remaining = remaining as i128;
    let size = size as i128;
    match remaining.checked_mul(prev as i128) {
        Some(product) => (product / size) as Count,
        None => (remaining as f64 / size as f64 * prev as f64) as Count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_aligns_to_size() {
        let size = Duration::from_secs(60);
        let t = UNIX_EPOCH + Duration::from_millis(125_500);
        assert_eq!(truncate(t, size), UNIX_EPOCH + Duration::from_secs(120));
        assert_eq!(truncate(UNIX_EPOCH + size, size), UNIX_EPOCH + size);
    }

    #[test]
    fn truncate_clamps_before_epoch() {
        let t = UNIX_EPOCH - Duration::from_secs(5);
        assert_eq!(truncate(t, Duration::from_secs(60)), UNIX_EPOCH);
    }

    #[test]
    fn weighted_count_truncates() {
        assert_eq!(weighted_count(10, 59, 60), 9);
        assert_eq!(weighted_count(10, 60, 60), 10);
        assert_eq!(weighted_count(10, 0, 60), 0);
        assert_eq!(weighted_count(-10, 59, 60), -9);
    }

    #[test]
    fn weighted_count_falls_back_to_float_on_overflow() {
        let size = u128::MAX >> 40;
        assert_eq!(weighted_count(Count::MAX, size, size), Count::MAX);
        // 0.5 * i64::MAX in f64 rounds up to 2^62 before truncation
        assert_eq!(weighted_count(Count::MAX, size / 2 + 1, size + 1), 1 << 62);
    }
}
